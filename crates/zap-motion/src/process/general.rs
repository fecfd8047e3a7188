use std::fmt;

use glam::Vec2;

use super::{Behavior, Clock, Outcome};
use crate::easing::lerp_vec2;
use crate::scheduler::ProcessContext;
use crate::shape::ShapeId;
use crate::stage::Stage;

/// Advance the clock and report completion once progress hits 1.
fn run_timer(dt: f32, clock: &mut Clock) -> (f32, Outcome) {
    clock.advance(dt);
    let progress = clock.progress();
    let outcome = if progress == 1.0 {
        Outcome::Resolved
    } else {
        Outcome::Pending
    };
    (progress, outcome)
}

/// No-op hold.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wait;

impl Behavior for Wait {
    fn step(&mut self, dt: f32, clock: &mut Clock, _ctx: &mut ProcessContext<'_>) -> Outcome {
        run_timer(dt, clock).1
    }
}

/// Barrier: completes when it is the last non-endless process standing.
/// Ignores elapsed time entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitAllProcesses;

impl Behavior for WaitAllProcesses {
    fn step(&mut self, _dt: f32, _clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        if ctx.resolvable_count() <= 1 {
            Outcome::Resolved
        } else {
            Outcome::Pending
        }
    }
}

/// One-shot side effect on the stage.
pub struct Execute {
    command: Box<dyn FnMut(&mut Stage)>,
}

impl Execute {
    pub fn new(command: impl FnMut(&mut Stage) + 'static) -> Self {
        Self {
            command: Box::new(command),
        }
    }
}

impl fmt::Debug for Execute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Execute(..)")
    }
}

impl Behavior for Execute {
    fn step(&mut self, _dt: f32, _clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        (self.command)(ctx.stage);
        Outcome::Resolved
    }
}

/// Moves a shape's translation from the origin to `target`.
#[derive(Debug, Clone, Copy)]
pub struct Translate {
    shape: ShapeId,
    target: Vec2,
}

impl Translate {
    pub fn new(shape: ShapeId, target: Vec2) -> Self {
        Self { shape, target }
    }
}

impl Behavior for Translate {
    fn step(&mut self, dt: f32, clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        let (progress, outcome) = run_timer(dt, clock);
        ctx.scene()
            .set_translation(self.shape, lerp_vec2(Vec2::ZERO, self.target, progress));
        outcome
    }
}

/// Turns a shape from 0 to `target` radians.
#[derive(Debug, Clone, Copy)]
pub struct Rotate {
    shape: ShapeId,
    target: f32,
}

impl Rotate {
    pub fn new(shape: ShapeId, target: f32) -> Self {
        Self { shape, target }
    }
}

impl Behavior for Rotate {
    fn step(&mut self, dt: f32, clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        let (progress, outcome) = run_timer(dt, clock);
        ctx.scene().set_rotation(self.shape, progress * self.target);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use crate::easing::Easing;
    use crate::process::Process;
    use crate::scheduler::Scheduler;
    use crate::shape::Shape;
    use glam::Vec2;
    use std::f32::consts::PI;

    #[test]
    fn translate_interpolates_from_origin() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn_live(Shape::hex(0.0, 0.0, 100.0).with_translation(Vec2::new(7.0, 7.0)));
        s.enqueue(Process::translate(id, Vec2::new(100.0, -50.0)).with_duration(300.0));

        s.tick(150.0);
        assert_eq!(s.scene().get(id).unwrap().translation, Vec2::new(50.0, -25.0));
        s.tick(150.0);
        assert_eq!(s.scene().get(id).unwrap().translation, Vec2::new(100.0, -50.0));
        assert!(s.is_empty());
    }

    #[test]
    fn translate_dirties_world_points() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn_live(Shape::rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(s.scene_mut().world_points(id)[0], Vec2::ZERO);
        s.enqueue(Process::translate(id, Vec2::new(10.0, 0.0)).with_duration(100.0));
        s.tick(100.0);
        assert_eq!(s.scene_mut().world_points(id)[0], Vec2::new(10.0, 0.0));
    }

    #[test]
    fn rotate_is_eased() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn_live(Shape::hex(0.0, 0.0, 100.0));
        s.enqueue(
            Process::rotate(id, -2.0 * PI)
                .with_duration(300.0)
                .with_easing(Easing::CubicInOut),
        );
        s.tick(75.0);
        let quarter = s.scene().get(id).unwrap().rotation;
        assert!((quarter - (-2.0 * PI * 0.0625)).abs() < 1e-4, "got {}", quarter);
        s.tick(225.0);
        assert_eq!(s.scene().get(id).unwrap().rotation, -2.0 * PI);
    }

    #[test]
    fn overshooting_curves_stay_within_target() {
        for easing in [Easing::BackOut, Easing::ElasticOut, Easing::BounceOut] {
            let mut s = Scheduler::default();
            let id = s.stage_mut().spawn_live(Shape::hex(0.0, 0.0, 100.0));
            s.enqueue(Process::rotate(id, 1.0).with_duration(1000.0).with_easing(easing));
            s.enqueue(
                Process::translate(id, Vec2::new(100.0, 0.0))
                    .with_duration(1000.0)
                    .with_easing(easing),
            );

            let (mut angle, mut x) = (0.0, 0.0);
            for _ in 0..100 {
                s.tick(10.0);
                let shape = s.scene().get(id).unwrap();
                let (a, tx) = (shape.rotation, shape.translation.x);
                assert!((angle..=1.0).contains(&a), "{:?}: rotation {}", easing, a);
                assert!((x..=100.0).contains(&tx), "{:?}: translation {}", easing, tx);
                angle = a;
                x = tx;
            }
            assert_eq!(angle, 1.0);
            assert_eq!(x, 100.0);
            assert!(s.is_empty());
        }
    }

    #[test]
    fn steps_on_missing_shapes_do_not_panic() {
        let mut s = Scheduler::default();
        let id = s.stage_mut().spawn(Shape::empty());
        s.scene_mut().despawn(id);
        s.enqueue(Process::translate(id, Vec2::ONE).with_duration(10.0));
        s.enqueue(Process::rotate(id, 1.0).with_duration(10.0));
        s.tick(10.0);
        assert!(s.is_empty());
    }
}
