// math.rs
//
// 2D vector/matrix primitives. Vectors and matrices are glam types; this module
// adds the scale→rotate→translate builder and the world-space bounding rect.

pub use glam::{Affine2, Vec2};

/// Build a 2x3 affine transform applying scale, then rotation, then translation.
///
/// Rebuilt on every call: shapes cache their world points, not their matrices.
#[inline]
pub fn from_srt(scale: Vec2, rotation: f32, translation: Vec2) -> Affine2 {
    Affine2::from_scale_angle_translation(scale, rotation, translation)
}

/// Rotate `v` around the origin by `radians`.
#[inline]
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    Vec2::from_angle(radians).rotate(v)
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Tightest rect around `points`. An empty slice yields a zero rect.
    pub fn from_points(points: &[Vec2]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), &p| (min.min(p), max.max(p)),
        );
        Self {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.x + self.width && p.y <= self.y + self.height
    }
}
