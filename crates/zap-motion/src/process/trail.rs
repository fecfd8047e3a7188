use glam::Vec2;

use super::{Behavior, Clock, Outcome};
use crate::render::{Visual, DEFAULT_COLOR};
use crate::scheduler::ProcessContext;
use crate::shape::{Shape, ShapeId};

/// Look of a contour trail.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailStyle {
    pub color: String,
    /// Line width of the oldest segment.
    pub min_line_width: f32,
    /// Upper bound the segment widths ramp towards; the head is the widest.
    pub max_line_width: f32,
    /// Number of segments in the trail.
    pub num_shapes: usize,
}

impl Default for TrailStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            min_line_width: 6.0,
            max_line_width: 14.0,
            num_shapes: 10,
        }
    }
}

/// Comet trail running around a host shape's outline, one edge per phase.
///
/// On init the trail spawns `num_shapes` short two-point segments and shows
/// them. Every step shifts each segment into its predecessor's place and moves
/// the head along the current edge. Never completes by itself; resolving it
/// hides and destroys the segments.
#[derive(Debug, Clone)]
pub struct ContourTrail {
    host: ShapeId,
    style: TrailStyle,
    segments: Vec<ShapeId>,
    edge: usize,
    edges: usize,
}

impl ContourTrail {
    pub fn new(host: ShapeId, style: TrailStyle) -> Self {
        Self {
            host,
            style,
            segments: Vec::new(),
            edge: 0,
            edges: 0,
        }
    }

    pub fn host(&self) -> ShapeId {
        self.host
    }

    /// Segment shapes, oldest first.
    pub fn segments(&self) -> &[ShapeId] {
        &self.segments
    }
}

impl Behavior for ContourTrail {
    fn phases(&self) -> u32 {
        self.edges.max(1) as u32
    }

    fn init(&mut self, ctx: &mut ProcessContext<'_>) {
        let Some(&start) = ctx.scene().world_points(self.host).first() else {
            log::debug!("contour trail: host {:?} has no points", self.host);
            return;
        };
        self.edges = ctx.scene().world_points(self.host).len();

        let n = self.style.num_shapes;
        let width_range = self.style.max_line_width - self.style.min_line_width;
        for i in 0..n {
            let line_width = self.style.min_line_width + width_range * i as f32 / n as f32;
            let segment = Shape::new(vec![start, start + Vec2::ONE])
                .with_visual(Visual::stroke(self.style.color.clone(), line_width));
            let id = ctx.stage.spawn_live(segment);
            self.segments.push(id);
        }
    }

    fn step(&mut self, dt: f32, clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        clock.advance(dt);
        let progress = clock.progress();

        let contour = ctx.scene().world_points(self.host).to_vec();
        let Some(&head) = self.segments.last() else {
            return Outcome::Pending;
        };
        if contour.is_empty() {
            return Outcome::Pending;
        }

        let scene = ctx.scene();
        for pair in self.segments.windows(2) {
            let newer = scene.get(pair[1]).map(|s| s.points.clone());
            if let Some(points) = newer {
                scene.update(pair[0], |s| s.points = points);
            }
        }

        let n = contour.len();
        let from = contour[self.edge % n];
        let to = contour[(self.edge + 1) % n];
        scene.update(head, |s| {
            s.points.clear();
            s.points.push(from.lerp(to, progress));
            s.points.push((from + Vec2::ONE).lerp(to + Vec2::ONE, progress));
        });

        if progress == 1.0 {
            self.edge = (self.edge + 1) % n;
            clock.next_phase();
        }
        Outcome::Pending
    }

    fn on_resolve(&mut self, ctx: &mut ProcessContext<'_>) {
        for id in self.segments.drain(..) {
            ctx.stage.remove(id);
        }
    }
}
