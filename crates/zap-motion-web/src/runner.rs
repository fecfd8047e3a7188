use glam::Vec2;
use zap_motion::{HostCommand, InputEvent, Scheduler, Surface};

/// Generic runner that wires a scheduler to a drawing surface.
///
/// Each concrete animation (e.g., `hex-intro`) creates a `thread_local!`
/// MotionRunner and exports free functions via `#[wasm_bindgen]`, because
/// wasm-bindgen cannot export generic structs directly.
pub struct MotionRunner<S: Surface> {
    scheduler: Scheduler,
    surface: S,
    frames: u64,
}

impl<S: Surface> MotionRunner<S> {
    pub fn new(scheduler: Scheduler, surface: S) -> Self {
        Self {
            scheduler,
            surface,
            frames: 0,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.scheduler.push_input(event);
    }

    /// Where the surface sits on the page and how large it is, for mapping
    /// pointer coordinates into world space.
    pub fn set_viewport(&mut self, origin: Vec2, size: Vec2) {
        self.scheduler.stage_mut().set_viewport(origin, size);
    }

    /// Run one frame: advance processes, then repaint the live shapes.
    pub fn tick(&mut self, dt: f32) {
        self.scheduler.tick(dt);

        self.surface.begin_frame();
        self.scheduler.stage_mut().render(&mut self.surface);
        self.frames += 1;
    }

    /// Host commands emitted since the last call, oldest first.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        self.scheduler.drain_commands()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
