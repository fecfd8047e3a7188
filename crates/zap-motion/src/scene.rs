// scene.rs
//
// Shape arena. Shapes live in a flat table keyed by ShapeId; hierarchy is
// expressed through ids (children owned by the parent's child list, parent
// stored as a non-owning id), so there are no reference cycles.
//
// Usage:
//   let mut scene = Scene::new();
//   let parent = scene.spawn(Shape::hex(0.0, 0.0, 100.0));
//   let child = scene.spawn(Shape::rect(-50.0, -50.0, 100.0, 100.0));
//   scene.attach(parent, child);
//   scene.set_translation(parent, Vec2::new(10.0, 0.0));  // dirties both
//   let pts = scene.world_points(child);                  // recomputed lazily

use std::collections::HashMap;

use glam::{Affine2, Vec2};

use crate::math::{from_srt, Rect};
use crate::shape::{Shape, ShapeId};

/// Arena owning every shape in the motion system.
#[derive(Debug, Default)]
pub struct Scene {
    shapes: HashMap<ShapeId, Shape>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a shape and return its handle.
    pub fn spawn(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.insert(id, shape);
        id
    }

    /// Make `child` a child of `parent`, detaching it from any previous parent.
    /// Ignored when either id is unknown or when it would create a cycle.
    pub fn attach(&mut self, parent: ShapeId, child: ShapeId) {
        if parent == child || !self.shapes.contains_key(&parent) || !self.shapes.contains_key(&child) {
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("attach: {:?} is an ancestor of {:?}, ignoring", child, parent);
            return;
        }

        if let Some(old) = self.shapes.get(&child).and_then(|s| s.parent) {
            if let Some(old_parent) = self.shapes.get_mut(&old) {
                old_parent.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = self.shapes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.shapes.get_mut(&parent) {
            node.children.push(child);
        }
        self.mark_dirty(child);
    }

    /// Attach several children in order.
    pub fn attach_all(&mut self, parent: ShapeId, children: impl IntoIterator<Item = ShapeId>) {
        for child in children {
            self.attach(parent, child);
        }
    }

    /// Remove a shape and its whole subtree. Returns the removed root shape.
    pub fn despawn(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.shapes.remove(&id)?;
        if let Some(parent) = shape.parent {
            if let Some(parent_node) = self.shapes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        let mut stack = shape.children.clone();
        while let Some(child) = stack.pop() {
            if let Some(removed) = self.shapes.remove(&child) {
                stack.extend(removed.children);
            }
        }
        Some(shape)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Direct mutable access. Callers changing geometry must call
    /// [`Scene::mark_dirty`] afterwards; prefer [`Scene::update`].
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Mutate a shape and invalidate its world cache (and its descendants').
    /// Returns `None` if the shape does not exist.
    pub fn update<R>(&mut self, id: ShapeId, f: impl FnOnce(&mut Shape) -> R) -> Option<R> {
        let result = f(self.shapes.get_mut(&id)?);
        self.mark_dirty(id);
        Some(result)
    }

    pub fn set_translation(&mut self, id: ShapeId, translation: Vec2) {
        self.update(id, |s| s.translation = translation);
    }

    pub fn set_rotation(&mut self, id: ShapeId, rotation: f32) {
        self.update(id, |s| s.rotation = rotation);
    }

    pub fn set_scale(&mut self, id: ShapeId, scale: Vec2) {
        self.update(id, |s| s.scale = scale);
    }

    /// Invalidate cached world state for `id` and every descendant.
    pub fn mark_dirty(&mut self, id: ShapeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(shape) = self.shapes.get_mut(&current) {
                shape.invalidate();
                stack.extend_from_slice(&shape.children);
            }
        }
    }

    /// Absolute transform: the parent's absolute transform composed with the
    /// local one. Roots use their local transform as-is.
    pub fn abs_transform(&self, id: ShapeId) -> Affine2 {
        let mut transform = Affine2::IDENTITY;
        let mut current = self.shapes.get(&id);
        while let Some(shape) = current {
            transform = from_srt(shape.scale, shape.rotation, shape.translation) * transform;
            current = shape.parent.and_then(|p| self.shapes.get(&p));
        }
        transform
    }

    /// World-space points, recomputed only when the shape is dirty.
    /// Unknown ids yield an empty slice.
    pub fn world_points(&mut self, id: ShapeId) -> &[Vec2] {
        let needs_refresh = match self.shapes.get(&id) {
            Some(shape) => shape.points_dirty,
            None => return &[],
        };
        if needs_refresh {
            let transform = self.abs_transform(id);
            if let Some(shape) = self.shapes.get_mut(&id) {
                shape.world_points.clear();
                shape
                    .world_points
                    .extend(shape.points.iter().map(|&p| transform.transform_point2(p)));
                shape.points_dirty = false;
            }
        }
        match self.shapes.get(&id) {
            Some(shape) => &shape.world_points,
            None => &[],
        }
    }

    /// World-space bounding rect of the shape's points.
    pub fn world_bounds(&mut self, id: ShapeId) -> Option<Rect> {
        if let Some(bounds) = self.shapes.get(&id)?.world_bounds {
            return Some(bounds);
        }
        let bounds = Rect::from_points(self.world_points(id));
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.world_bounds = Some(bounds);
        }
        Some(bounds)
    }

    /// Even-odd point-in-polygon test against the shape's world points.
    pub fn world_contains(&mut self, id: ShapeId, x: f32, y: f32) -> bool {
        polygon_contains(self.world_points(id), x, y)
    }

    /// Number of shapes in the arena.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn is_ancestor(&self, candidate: ShapeId, of: ShapeId) -> bool {
        let mut current = self.shapes.get(&of).and_then(|s| s.parent);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.shapes.get(&id).and_then(|s| s.parent);
        }
        false
    }
}

/// Ray-casting test: a horizontal ray from (x, y) toggles `inside` at every
/// edge it crosses.
pub fn polygon_contains(points: &[Vec2], x: f32, y: f32) -> bool {
    let mut inside = false;
    if points.is_empty() {
        return inside;
    }
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
