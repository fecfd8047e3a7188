pub mod config;
pub mod easing;
pub mod error;
pub mod input;
pub mod math;
pub mod process;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod shape;
pub mod stage;

// Re-export key types at crate root for convenience
pub use config::SchedulerConfig;
pub use easing::{ease, lerp, lerp_vec2, Easing};
pub use error::{MotionError, Result};
pub use input::{Cursor, HostCommand, InputEvent, InputQueue, Viewport};
pub use math::{Affine2, Rect, Vec2};
pub use process::{
    Clock, NavigationStyle, Process, ProcessId, ProcessKind, Status, TrailStyle, DEFAULT_DURATION,
};
pub use render::{render, RecordingSurface, Surface, SurfaceOp, TextAlign, Visual};
pub use scene::Scene;
pub use scheduler::{ProcessContext, Scheduler};
pub use shape::{hex_points, rect_points, Shape, ShapeId};
pub use stage::Stage;
