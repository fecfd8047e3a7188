// process/interactive.rs
//
// Endless processes reacting to host input. They read the events the
// scheduler delivered for the current tick instead of registering callbacks,
// so input handling happens in tick order like everything else.

use glam::Vec2;

use super::{Behavior, Clock, Outcome, Process, ProcessId, TrailStyle};
use crate::input::{Cursor, HostCommand, InputEvent};
use crate::render::DEFAULT_COLOR;
use crate::scheduler::ProcessContext;
use crate::shape::ShapeId;

/// Hover/click behavior of a [`Navigation`] process.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationStyle {
    /// Where the world origin sits inside the surface, as a fraction of its size.
    pub translation_factor: Vec2,
    /// Hover trail spawned around the shape under the cursor.
    pub trail: TrailStyle,
    /// Time for the hover trail to travel once around a shape, in milliseconds.
    pub trail_duration: f32,
}

impl Default for NavigationStyle {
    fn default() -> Self {
        Self {
            translation_factor: Vec2::splat(0.5),
            trail: TrailStyle {
                color: DEFAULT_COLOR.to_string(),
                min_line_width: 6.0,
                max_line_width: 14.0,
                num_shapes: 14,
            },
            trail_duration: 1250.0,
        }
    }
}

impl NavigationStyle {
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.trail.color = color.into();
        self
    }

    pub fn with_translation_factor(mut self, factor: Vec2) -> Self {
        self.translation_factor = factor;
        self
    }
}

/// Hit-tests pointer moves against a set of shapes, runs a contour trail
/// around the hovered one and opens its URL on click.
#[derive(Debug, Clone)]
pub struct Navigation {
    targets: Vec<ShapeId>,
    style: NavigationStyle,
    hover: Option<(ShapeId, ProcessId)>,
}

impl Navigation {
    pub fn new(targets: Vec<ShapeId>, style: NavigationStyle) -> Self {
        Self {
            targets,
            style,
            hover: None,
        }
    }

    /// The hovered shape and its trail process, if any.
    pub fn hover(&self) -> Option<(ShapeId, ProcessId)> {
        self.hover
    }

    fn pointer_moved(&mut self, page: Vec2, ctx: &mut ProcessContext<'_>) {
        let world = ctx
            .stage
            .viewport()
            .page_to_world(page, self.style.translation_factor);
        let hit = self
            .targets
            .iter()
            .copied()
            .find(|&id| ctx.scene().world_contains(id, world.x, world.y));

        match (hit, self.hover) {
            (Some(shape), Some((hovered, _))) if shape == hovered => {}
            (Some(shape), current) => {
                if current.is_some() {
                    self.retire_hover(ctx);
                }
                let trail = Process::contour_trail(shape, self.style.trail.clone())
                    .with_duration(self.style.trail_duration);
                let trail_id = ctx.enqueue(trail);
                self.hover = Some((shape, trail_id));
                ctx.stage.emit(HostCommand::SetCursor(Cursor::Pointer));
            }
            (None, Some(_)) => self.retire_hover(ctx),
            (None, None) => {}
        }
    }

    fn clicked(&mut self, ctx: &mut ProcessContext<'_>) {
        let Some((shape, _)) = self.hover else { return };
        let url = ctx.scene().get(shape).and_then(|s| s.url.clone());
        if let Some(url) = url {
            log::info!("navigating to {}", url);
            ctx.stage.emit(HostCommand::OpenUrl(url));
        }
        self.retire_hover(ctx);
    }

    fn retire_hover(&mut self, ctx: &mut ProcessContext<'_>) {
        if let Some((_, trail)) = self.hover.take() {
            ctx.resolve(trail);
            ctx.stage.emit(HostCommand::SetCursor(Cursor::Auto));
        }
    }
}

impl Behavior for Navigation {
    fn step(&mut self, _dt: f32, _clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        for event in ctx.input() {
            match event {
                InputEvent::PointerMove { x, y } => self.pointer_moved(Vec2::new(*x, *y), ctx),
                InputEvent::Click { .. } => self.clicked(ctx),
                InputEvent::KeyDown { .. } => {}
            }
        }
        Outcome::Pending
    }

    fn on_resolve(&mut self, ctx: &mut ProcessContext<'_>) {
        self.retire_hover(ctx);
    }
}

/// Drains the scheduler when one of the configured keys is pressed.
#[derive(Debug, Clone)]
pub struct ResolveProcessesOnKeyDown {
    keys: Vec<String>,
}

impl ResolveProcessesOnKeyDown {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Behavior for ResolveProcessesOnKeyDown {
    fn step(&mut self, _dt: f32, _clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome {
        let pressed = ctx.input().iter().any(|event| {
            matches!(event, InputEvent::KeyDown { key } if self.keys.iter().any(|k| k == key))
        });
        if pressed {
            log::info!("skip key pressed, resolving all processes");
            ctx.request_drain();
        }
        Outcome::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use crate::shape::Shape;

    struct Fixture {
        scheduler: Scheduler,
        left: ShapeId,
        right: ShapeId,
        nav: ProcessId,
    }

    // World origin at the surface's top-left corner, surface at page (0, 0).
    fn fixture() -> Fixture {
        let mut scheduler = Scheduler::default();
        scheduler
            .stage_mut()
            .set_viewport(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let left = scheduler
            .stage_mut()
            .spawn_live(Shape::hex(100.0, 100.0, 100.0).with_url("https://left.example"));
        let right = scheduler
            .stage_mut()
            .spawn_live(Shape::hex(300.0, 100.0, 100.0));
        let style = NavigationStyle::default().with_translation_factor(Vec2::ZERO);
        let nav = scheduler.enqueue(Process::navigation(vec![left, right], style));
        Fixture {
            scheduler,
            left,
            right,
            nav,
        }
    }

    fn hovered(s: &Scheduler, nav: ProcessId) -> Option<(ShapeId, ProcessId)> {
        match s.get(nav).map(|p| p.kind()) {
            Some(crate::process::ProcessKind::Navigation(n)) => n.hover(),
            _ => None,
        }
    }

    #[test]
    fn hover_spawns_trail_and_exit_retires_it() {
        let Fixture { mut scheduler, left, nav, .. } = fixture();

        scheduler.push_input(InputEvent::PointerMove { x: 100.0, y: 100.0 });
        scheduler.tick(16.0);
        let (shape, trail) = hovered(&scheduler, nav).unwrap();
        assert_eq!(shape, left);
        assert!(scheduler.contains(trail));
        assert_eq!(scheduler.stage().live().len(), 2 + 14);
        assert_eq!(
            scheduler.drain_commands(),
            vec![HostCommand::SetCursor(Cursor::Pointer)]
        );

        // Moving within the same shape keeps the same trail.
        scheduler.push_input(InputEvent::PointerMove { x: 110.0, y: 90.0 });
        scheduler.tick(16.0);
        assert_eq!(hovered(&scheduler, nav).unwrap().1, trail);

        scheduler.push_input(InputEvent::PointerMove { x: 700.0, y: 500.0 });
        scheduler.tick(16.0);
        assert!(hovered(&scheduler, nav).is_none());
        assert!(!scheduler.contains(trail));
        assert_eq!(scheduler.stage().live().len(), 2);
        assert_eq!(
            scheduler.drain_commands(),
            vec![HostCommand::SetCursor(Cursor::Auto)]
        );
    }

    #[test]
    fn moving_between_shapes_swaps_trails() {
        let Fixture { mut scheduler, right, nav, .. } = fixture();

        scheduler.push_input(InputEvent::PointerMove { x: 100.0, y: 100.0 });
        scheduler.push_input(InputEvent::PointerMove { x: 300.0, y: 100.0 });
        scheduler.tick(16.0);

        let (shape, _) = hovered(&scheduler, nav).unwrap();
        assert_eq!(shape, right);
        assert_eq!(scheduler.stage().live().len(), 2 + 14);
    }

    #[test]
    fn click_opens_url_and_retires_effect() {
        let Fixture { mut scheduler, nav, .. } = fixture();

        scheduler.push_input(InputEvent::PointerMove { x: 100.0, y: 100.0 });
        scheduler.push_input(InputEvent::Click { x: 100.0, y: 100.0 });
        scheduler.tick(16.0);

        assert!(hovered(&scheduler, nav).is_none());
        assert_eq!(scheduler.stage().live().len(), 2);
        let commands = scheduler.drain_commands();
        assert!(commands.contains(&HostCommand::OpenUrl("https://left.example".into())));
        assert_eq!(commands.last(), Some(&HostCommand::SetCursor(Cursor::Auto)));
    }

    #[test]
    fn click_without_url_only_retires() {
        let Fixture { mut scheduler, nav, .. } = fixture();

        scheduler.push_input(InputEvent::PointerMove { x: 300.0, y: 100.0 });
        scheduler.push_input(InputEvent::Click { x: 300.0, y: 100.0 });
        scheduler.tick(16.0);

        assert!(hovered(&scheduler, nav).is_none());
        assert!(!scheduler
            .drain_commands()
            .iter()
            .any(|c| matches!(c, HostCommand::OpenUrl(_))));
    }

    #[test]
    fn pointer_is_mapped_through_viewport() {
        let mut scheduler = Scheduler::default();
        scheduler
            .stage_mut()
            .set_viewport(Vec2::new(50.0, 20.0), Vec2::new(1000.0, 400.0));
        let hex = scheduler.stage_mut().spawn_live(Shape::hex(0.0, 0.0, 100.0));
        let style = NavigationStyle::default().with_translation_factor(Vec2::new(0.36, 0.5));
        let nav = scheduler.enqueue(Process::navigation(vec![hex], style));

        // World origin is at page (50 + 360, 20 + 200).
        scheduler.push_input(InputEvent::PointerMove { x: 410.0, y: 220.0 });
        scheduler.tick(16.0);
        assert_eq!(hovered(&scheduler, nav).map(|h| h.0), Some(hex));
    }

    #[test]
    fn resolving_navigation_retires_hover() {
        let Fixture { mut scheduler, nav, .. } = fixture();
        scheduler.push_input(InputEvent::PointerMove { x: 100.0, y: 100.0 });
        scheduler.tick(16.0);

        assert!(scheduler.resolve(nav));
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.stage().live().len(), 2);
    }

    #[test]
    fn key_listener_ignores_other_keys() {
        let mut scheduler = Scheduler::default();
        scheduler.enqueue(Process::resolve_on_key_down(["Escape"]));
        let wait = scheduler.enqueue(Process::wait(1000.0));

        scheduler.push_input(InputEvent::key_down("Enter"));
        scheduler.tick(1.0);
        assert!(scheduler.contains(wait));

        scheduler.push_input(InputEvent::key_down("Escape"));
        scheduler.tick(1.0);
        assert!(!scheduler.contains(wait));
    }
}
