//! Host-facing event plumbing.
//!
//! Inbound: the host pushes pointer/keyboard events into an [`InputQueue`]; the
//! scheduler drains it once per tick so input-driven processes see events in a
//! deterministic order. Outbound: processes emit [`HostCommand`]s which the host
//! drains after each tick.

use glam::Vec2;

/// Input events in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The cursor moved to page coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A click at page coordinates (x, y).
    Click { x: f32, y: f32 },
    /// A key was pressed. `key` follows DOM `KeyboardEvent.key` naming.
    KeyDown { key: String },
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        InputEvent::KeyDown { key: key.into() }
    }
}

/// A queue of input events, filled by the host and drained each tick.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Cursor styles the host can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Auto,
    Pointer,
}

impl Cursor {
    /// CSS cursor keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Auto => "auto",
            Cursor::Pointer => "pointer",
        }
    }
}

/// Side effects requested by processes, executed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    OpenUrl(String),
    SetCursor(Cursor),
}

/// Placement of the drawing surface on the page, used to map page
/// coordinates into world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Top-left corner of the surface in page coordinates.
    pub origin: Vec2,
    /// Surface size in pixels.
    pub size: Vec2,
}

impl Viewport {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Map a page position into world space, where the world origin sits at
    /// `size * translation_factor` inside the surface.
    pub fn page_to_world(&self, page: Vec2, translation_factor: Vec2) -> Vec2 {
        page - self.origin - self.size * translation_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { x: 10.0, y: 20.0 });
        q.push(InputEvent::key_down("Escape"));
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], InputEvent::KeyDown { key: "Escape".into() });
        assert!(q.is_empty());
    }

    #[test]
    fn page_to_world_applies_origin_and_factor() {
        let vp = Viewport::new(Vec2::new(10.0, 20.0), Vec2::new(1000.0, 600.0));
        let world = vp.page_to_world(Vec2::new(510.0, 320.0), Vec2::new(0.5, 0.5));
        assert_eq!(world, Vec2::ZERO);
    }

    #[test]
    fn cursor_css() {
        assert_eq!(Cursor::Pointer.as_css(), "pointer");
        assert_eq!(Cursor::default().as_css(), "auto");
    }
}
