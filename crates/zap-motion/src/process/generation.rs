// process/generation.rs
//
// Animated polygon reveals. Each generator appends placeholder points to its
// shape when it is initialized and then interpolates them onto a target
// rectangle or hexagon. Point indices are relative to the shape's point count
// before the append, so generators also work on shapes that already hold points.

use glam::Vec2;

use super::{Behavior, Clock, Outcome};
use crate::math::Rect;
use crate::scheduler::ProcessContext;
use crate::shape::{hex_points, rect_points, Shape, ShapeId};

/// Append `count` copies of `at` and return the index of the first one.
fn add_points(ctx: &mut ProcessContext<'_>, shape: ShapeId, count: usize, at: Vec2) -> Option<usize> {
    let base = ctx.scene().update(shape, |s: &mut Shape| {
        let base = s.points.len();
        s.points.extend(std::iter::repeat(at).take(count));
        base
    });
    if base.is_none() {
        log::debug!("generate: shape {:?} missing at init", shape);
    }
    base
}

/// Grows a rectangle by sweeping its right edge from left to right.
///
/// Points 0 and 3 are pinned to the left edge on init; 1 and 2 slide along
/// the top and bottom edges.
#[derive(Debug, Clone)]
pub struct GenerateRect {
    shape: ShapeId,
    target: [Vec2; 4],
    base: Option<usize>,
}

impl GenerateRect {
    pub fn new(shape: ShapeId, target: Rect) -> Self {
        Self {
            shape,
            target: rect_points(target.x, target.y, target.width, target.height),
            base: None,
        }
    }
}

impl Behavior for GenerateRect {
    fn init(&mut self, ctx: &mut ProcessContext<'_>) {
        let t = self.target;
        self.base = add_points(ctx, self.shape, 4, t[0]);
        if let Some(base) = self.base {
            ctx.scene().update(self.shape, |s| {
                s.points[base + 2] = t[3];
                s.points[base + 3] = t[3];
            });
        }
    }

    fn step(&mut self, dt: f32, clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        clock.advance(dt);
        let progress = clock.progress();
        let t = self.target;

        if let Some(base) = self.base {
            ctx.scene().update(self.shape, |s| {
                if let Some(p) = s.points.get_mut(base..base + 4) {
                    p[1] = t[0].lerp(t[1], progress);
                    p[2] = t[3].lerp(t[2], progress);
                }
            });
        }

        if progress == 1.0 {
            Outcome::Resolved
        } else {
            Outcome::Pending
        }
    }
}

/// Reveals a rectangle from its top-left corner in two phases.
///
/// Five placeholder points start at the top-left corner. Phase 0 sweeps two
/// of them along the top edge and two down the left edge; phase 1 swings
/// one from each pair to the bottom-right corner. The polygon is then cut
/// back to its four corners.
#[derive(Debug, Clone)]
pub struct GenerateRectDiagonally {
    shape: ShapeId,
    target: [Vec2; 4],
    base: Option<usize>,
    phase: u32,
}

impl GenerateRectDiagonally {
    pub fn new(shape: ShapeId, target: Rect) -> Self {
        Self {
            shape,
            target: rect_points(target.x, target.y, target.width, target.height),
            base: None,
            phase: 0,
        }
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }
}

impl Behavior for GenerateRectDiagonally {
    fn phases(&self) -> u32 {
        2
    }

    fn init(&mut self, ctx: &mut ProcessContext<'_>) {
        self.base = add_points(ctx, self.shape, 5, self.target[0]);
    }

    fn step(&mut self, dt: f32, clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        clock.advance(dt);
        let progress = clock.progress();
        let t = self.target;
        let phase = self.phase;
        let finishing = phase == 1 && progress == 1.0;

        if let Some(base) = self.base {
            ctx.scene().update(self.shape, |s| {
                if let Some(p) = s.points.get_mut(base..base + 5) {
                    if phase == 0 {
                        p[0] = t[0].lerp(t[1], progress);
                        p[1] = t[0].lerp(t[1], progress);
                        p[3] = t[0].lerp(t[3], progress);
                        p[4] = t[0].lerp(t[3], progress);
                    } else {
                        p[0] = t[1].lerp(t[2], progress);
                        p[4] = t[3].lerp(t[2], progress);
                    }
                }
                if finishing {
                    s.points.truncate(base + 4);
                }
            });
        }

        if progress < 1.0 {
            return Outcome::Pending;
        }
        if finishing {
            return Outcome::Resolved;
        }
        self.phase += 1;
        clock.next_phase();
        Outcome::Pending
    }
}

/// Grows a hexagon from its center in three phases.
///
/// Phase 0 pushes two triples of points out to opposite vertices; phase 1
/// spreads one pair of each triple to the next vertex; phase 2 moves the last
/// point of each triple one vertex further, closing the outline.
///
/// Placeholders start at `center`, not at the local origin, so an off-center
/// hex still grows out of its own middle. The two coincide for a zero center.
#[derive(Debug, Clone)]
pub struct GenerateHex {
    shape: ShapeId,
    center: Vec2,
    target: [Vec2; 6],
    base: Option<usize>,
    phase: u32,
}

impl GenerateHex {
    pub fn new(shape: ShapeId, center: Vec2, diameter: f32) -> Self {
        Self {
            shape,
            center,
            target: hex_points(center.x, center.y, diameter),
            base: None,
            phase: 0,
        }
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }
}

impl Behavior for GenerateHex {
    fn phases(&self) -> u32 {
        3
    }

    fn init(&mut self, ctx: &mut ProcessContext<'_>) {
        self.base = add_points(ctx, self.shape, 6, self.center);
    }

    fn step(&mut self, dt: f32, clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        clock.advance(dt);
        let progress = clock.progress();
        let (t, c, phase) = (self.target, self.center, self.phase);

        if let Some(base) = self.base {
            ctx.scene().update(self.shape, |s| {
                let Some(p) = s.points.get_mut(base..base + 6) else { return };
                match phase {
                    0 => {
                        for q in &mut p[0..3] {
                            *q = c.lerp(t[2], progress);
                        }
                        for q in &mut p[3..6] {
                            *q = c.lerp(t[5], progress);
                        }
                    }
                    1 => {
                        p[1] = t[2].lerp(t[3], progress);
                        p[2] = t[2].lerp(t[3], progress);
                        p[4] = t[5].lerp(t[0], progress);
                        p[5] = t[5].lerp(t[0], progress);
                    }
                    _ => {
                        p[2] = t[3].lerp(t[4], progress);
                        p[5] = t[0].lerp(t[1], progress);
                    }
                }
            });
        }

        if progress < 1.0 {
            return Outcome::Pending;
        }
        if phase >= 2 {
            return Outcome::Resolved;
        }
        self.phase += 1;
        clock.next_phase();
        Outcome::Pending
    }
}

#[cfg(test)]
mod tests {
    use crate::math::Rect;
    use crate::process::Process;
    use crate::scheduler::Scheduler;
    use crate::shape::{hex_points, rect_points, Shape};
    use glam::Vec2;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn rect_pins_left_edge_on_init() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn_live(Shape::empty());
        s.enqueue(Process::generate_rect(id, Rect::new(0.0, 0.0, 300.0, 50.0)).with_duration(400.0));

        let pts = &s.scene().get(id).unwrap().points;
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], Vec2::ZERO);
        assert_eq!(pts[1], Vec2::ZERO);
        assert_eq!(pts[2], Vec2::new(0.0, 50.0));
        assert_eq!(pts[3], Vec2::new(0.0, 50.0));
    }

    #[test]
    fn rect_sweeps_right_edge() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn_live(Shape::empty());
        s.enqueue(Process::generate_rect(id, Rect::new(0.0, 0.0, 300.0, 50.0)).with_duration(400.0));

        s.tick(200.0);
        let pts = s.scene().get(id).unwrap().points.clone();
        assert_eq!(pts[1], Vec2::new(150.0, 0.0));
        assert_eq!(pts[2], Vec2::new(150.0, 50.0));

        s.tick(200.0);
        assert_eq!(s.scene().get(id).unwrap().points, rect_points(0.0, 0.0, 300.0, 50.0).to_vec());
        assert!(s.is_empty());
    }

    #[test]
    fn rect_diagonal_ends_with_four_corners() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn_live(Shape::empty().with_scale(Vec2::new(-1.0, 1.0)));
        let target = Rect::new(-100.0, -150.0, 250.0, 300.0);
        let pid = s.enqueue(Process::generate_rect_diagonally(id, target).with_duration(400.0));
        assert_eq!(s.scene().get(id).unwrap().points.len(), 5);

        // Phase 0 halfway: top and left edges half drawn.
        s.tick(100.0);
        let pts = s.scene().get(id).unwrap().points.clone();
        assert!(close(pts[0], Vec2::new(25.0, -150.0)));
        assert!(close(pts[3], Vec2::new(-100.0, 0.0)));
        assert_eq!(pts[2], Vec2::new(-100.0, -150.0));

        s.tick(100.0);
        assert!(s.contains(pid));
        assert_eq!(s.scene().get(id).unwrap().points.len(), 5);
        s.tick(200.0);
        assert!(!s.contains(pid));

        let pts = s.scene().get(id).unwrap().points.clone();
        assert_eq!(pts.len(), 4);
        let corners = rect_points(target.x, target.y, target.width, target.height);
        for corner in corners {
            assert!(pts.iter().any(|&p| close(p, corner)), "missing corner {:?}", corner);
        }
    }

    #[test]
    fn hex_ends_on_canonical_hexagon() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn_live(Shape::empty());
        let center = Vec2::new(20.0, -10.0);
        let pid = s.enqueue(Process::generate_hex(id, center, 100.0).with_duration(600.0));
        assert!(s.scene().get(id).unwrap().points.iter().all(|&p| p == center));

        for _ in 0..3 {
            s.tick(200.0);
        }
        assert!(!s.contains(pid));

        let pts = s.scene().get(id).unwrap().points.clone();
        let target = hex_points(center.x, center.y, 100.0);
        assert_eq!(pts.len(), 6);
        // Same outline, starting two vertices along.
        for (i, p) in pts.iter().enumerate() {
            assert!(close(*p, target[(i + 2) % 6]), "point {} at {:?}", i, p);
        }
    }

    #[test]
    fn hex_phase_boundaries() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn_live(Shape::empty());
        s.enqueue(Process::generate_hex(id, Vec2::ZERO, 100.0).with_duration(300.0));
        let target = hex_points(0.0, 0.0, 100.0);

        s.tick(100.0);
        let pts = s.scene().get(id).unwrap().points.clone();
        assert!(pts[0..3].iter().all(|&p| close(p, target[2])));
        assert!(pts[3..6].iter().all(|&p| close(p, target[5])));

        // Surplus time is dropped at a phase change.
        s.tick(50.0);
        let pts = s.scene().get(id).unwrap().points.clone();
        assert!(close(pts[1], target[2].lerp(target[3], 0.5)));
        assert!(close(pts[0], target[2]));
    }

    #[test]
    fn generators_append_after_existing_points() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn_live(Shape::new(vec![Vec2::new(1.0, 1.0)]));
        s.enqueue(Process::generate_rect_diagonally(id, Rect::new(0.0, 0.0, 10.0, 10.0)));
        s.drain_all();
        let pts = s.scene().get(id).unwrap().points.clone();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn missing_shape_still_completes() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn(Shape::empty());
        s.scene_mut().despawn(id);
        s.enqueue(Process::generate_hex(id, Vec2::ZERO, 100.0));
        s.drain_all();
        assert!(s.is_empty());
    }
}
