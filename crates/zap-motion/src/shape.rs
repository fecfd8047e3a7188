use glam::Vec2;

use crate::math::Rect;
use crate::render::Visual;

/// Handle to a shape stored in a [`Scene`](crate::scene::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

/// A polygon node with a local scale/rotation/translation.
///
/// World-space points and bounds are cached and only recomputed after the node
/// (or one of its ancestors) is dirtied. Mutate shapes through the owning
/// [`Scene`](crate::scene::Scene) so the cache is invalidated.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Local-space polygon, in drawing order.
    pub points: Vec<Vec2>,
    pub translation: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub scale: Vec2,
    /// How the render pass paints this node. `None` keeps the node invisible
    /// while still clipping its children.
    pub visual: Option<Visual>,
    /// Navigation target opened when the node is clicked.
    pub url: Option<String>,
    pub(crate) parent: Option<ShapeId>,
    pub(crate) children: Vec<ShapeId>,
    pub(crate) world_points: Vec<Vec2>,
    pub(crate) points_dirty: bool,
    pub(crate) world_bounds: Option<Rect>,
}

impl Shape {
    /// Shape with the given local points and default transform.
    /// Visible by default with the standard stroke.
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            translation: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            visual: Some(Visual::default()),
            url: None,
            parent: None,
            children: Vec::new(),
            world_points: Vec::new(),
            points_dirty: true,
            world_bounds: None,
        }
    }

    /// Shape with no points. Generation processes fill it in later.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Axis-aligned rectangle, clockwise from the top-left corner.
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(rect_points(x, y, width, height).to_vec())
    }

    /// Pointy-top hexagon centered on (x, y), first point at the top.
    pub fn hex(x: f32, y: f32, diameter: f32) -> Self {
        Self::new(hex_points(x, y, diameter).to_vec())
    }

    // -- Builder pattern --

    pub fn with_translation(mut self, translation: Vec2) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = Some(visual);
        self
    }

    pub fn without_visual(mut self) -> Self {
        self.visual = None;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    // -- Accessors --

    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    pub fn children(&self) -> &[ShapeId] {
        &self.children
    }

    /// Whether the cached world points need recomputing.
    pub fn is_dirty(&self) -> bool {
        self.points_dirty
    }

    pub(crate) fn invalidate(&mut self) {
        self.points_dirty = true;
        self.world_bounds = None;
    }
}

/// Corners of a rectangle: top-left, top-right, bottom-right, bottom-left.
pub fn rect_points(x: f32, y: f32, width: f32, height: f32) -> [Vec2; 4] {
    [
        Vec2::new(x, y),
        Vec2::new(x + width, y),
        Vec2::new(x + width, y + height),
        Vec2::new(x, y + height),
    ]
}

/// Vertices of a pointy-top hexagon, clockwise from the top vertex.
pub fn hex_points(x: f32, y: f32, diameter: f32) -> [Vec2; 6] {
    let a = diameter * 0.25;
    let b = a * 3.0_f32.sqrt();
    [
        Vec2::new(x, y - 2.0 * a),
        Vec2::new(x + b, y - a),
        Vec2::new(x + b, y + a),
        Vec2::new(x, y + 2.0 * a),
        Vec2::new(x - b, y + a),
        Vec2::new(x - b, y - a),
    ]
}
