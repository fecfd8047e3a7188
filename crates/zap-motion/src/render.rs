//! Render pass over the live shape list.
//!
//! The core does not rasterize anything. It walks the live shapes in order,
//! hands each one's world-space polygon to a [`Surface`], and asks the surface
//! to paint the shape's [`Visual`]. Children are drawn after their parent,
//! clipped to the parent's path.

use glam::Vec2;

use crate::math::Rect;
use crate::scene::Scene;
use crate::shape::ShapeId;

pub const DEFAULT_COLOR: &str = "#EA2E49";
pub const DEFAULT_LINE_WIDTH: f32 = 8.0;
pub const DEFAULT_FONT: &str = "15px Arial";

/// Horizontal text alignment, mirroring the Canvas2D keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::Center => "center",
            TextAlign::End => "end",
        }
    }
}

/// How a shape is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    /// Stroke the outline.
    Stroke { color: String, line_width: f32 },
    /// Fill the polygon.
    Fill { color: String },
    /// Stretch a named image over the world bounds.
    Image { asset: String },
    /// Draw text at the vertical middle of the world bounds.
    Text {
        text: String,
        font: String,
        align: TextAlign,
        color: String,
    },
}

impl Default for Visual {
    fn default() -> Self {
        Visual::stroke(DEFAULT_COLOR, DEFAULT_LINE_WIDTH)
    }
}

impl Visual {
    pub fn stroke(color: impl Into<String>, line_width: f32) -> Self {
        Visual::Stroke {
            color: color.into(),
            line_width,
        }
    }

    pub fn fill(color: impl Into<String>) -> Self {
        Visual::Fill { color: color.into() }
    }

    pub fn image(asset: impl Into<String>) -> Self {
        Visual::Image { asset: asset.into() }
    }

    pub fn text(text: impl Into<String>, font: impl Into<String>, color: impl Into<String>) -> Self {
        Visual::Text {
            text: text.into(),
            font: font.into(),
            align: TextAlign::Start,
            color: color.into(),
        }
    }
}

/// Drawing backend. The current path is set with [`Surface::set_path`] and
/// then painted or used as a clip.
pub trait Surface {
    /// Called once per frame before anything is painted.
    fn begin_frame(&mut self) {}

    /// Replace the current path with a closed polygon through `points`.
    fn set_path(&mut self, points: &[Vec2]);
    fn stroke(&mut self, color: &str, line_width: f32);
    fn fill(&mut self, color: &str);
    fn draw_image(&mut self, asset: &str, dest: Rect);
    fn fill_text(&mut self, text: &str, font: &str, align: TextAlign, color: &str, pos: Vec2);
    /// Save state and clip subsequent drawing to the current path.
    fn push_clip(&mut self);
    /// Restore the state saved by the matching `push_clip`.
    fn pop_clip(&mut self);
}

/// Paint `roots` and their descendants, parent before children.
/// Shapes without points are skipped together with their subtree.
pub fn render<S: Surface + ?Sized>(scene: &mut Scene, roots: &[ShapeId], surface: &mut S) {
    for &id in roots {
        render_shape(scene, id, surface);
    }
}

fn render_shape<S: Surface + ?Sized>(scene: &mut Scene, id: ShapeId, surface: &mut S) {
    let points = scene.world_points(id);
    if points.is_empty() {
        return;
    }
    surface.set_path(points);

    let Some(shape) = scene.get(id) else { return };
    let visual = shape.visual.clone();
    let children = shape.children().to_vec();

    if let Some(visual) = visual {
        paint(scene, id, &visual, surface);
    }

    if !children.is_empty() {
        surface.push_clip();
        for child in children {
            render_shape(scene, child, surface);
        }
        surface.pop_clip();
    }
}

fn paint<S: Surface + ?Sized>(scene: &mut Scene, id: ShapeId, visual: &Visual, surface: &mut S) {
    match visual {
        Visual::Stroke { color, line_width } => surface.stroke(color, *line_width),
        Visual::Fill { color } => surface.fill(color),
        Visual::Image { asset } => {
            if let Some(bounds) = scene.world_bounds(id) {
                surface.draw_image(asset, bounds);
            }
        }
        Visual::Text { text, font, align, color } => {
            if let Some(bounds) = scene.world_bounds(id) {
                let pos = Vec2::new(bounds.x, bounds.y + bounds.height * 0.5);
                surface.fill_text(text, font, *align, color, pos);
            }
        }
    }
}

/// Surface that records calls, for tests and headless inspection.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
}

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Path(Vec<Vec2>),
    Stroke { color: String, line_width: f32 },
    Fill { color: String },
    Image { asset: String, dest: Rect },
    Text { text: String, pos: Vec2 },
    PushClip,
    PopClip,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn set_path(&mut self, points: &[Vec2]) {
        self.ops.push(SurfaceOp::Path(points.to_vec()));
    }

    fn stroke(&mut self, color: &str, line_width: f32) {
        self.ops.push(SurfaceOp::Stroke {
            color: color.to_string(),
            line_width,
        });
    }

    fn fill(&mut self, color: &str) {
        self.ops.push(SurfaceOp::Fill { color: color.to_string() });
    }

    fn draw_image(&mut self, asset: &str, dest: Rect) {
        self.ops.push(SurfaceOp::Image {
            asset: asset.to_string(),
            dest,
        });
    }

    fn fill_text(&mut self, text: &str, _font: &str, _align: TextAlign, _color: &str, pos: Vec2) {
        self.ops.push(SurfaceOp::Text {
            text: text.to_string(),
            pos,
        });
    }

    fn push_clip(&mut self) {
        self.ops.push(SurfaceOp::PushClip);
    }

    fn pop_clip(&mut self) {
        self.ops.push(SurfaceOp::PopClip);
    }
}
