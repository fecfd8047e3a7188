use glam::Vec2;

use crate::input::{HostCommand, Viewport};
use crate::scene::Scene;
use crate::shape::{Shape, ShapeId};

/// Shared world state that processes act on: the shape arena, the ordered
/// list of live (rendered) root shapes, the host viewport, and the outbox of
/// host commands.
#[derive(Debug, Default)]
pub struct Stage {
    pub scene: Scene,
    live: Vec<ShapeId>,
    viewport: Viewport,
    commands: Vec<HostCommand>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a shape into the arena without showing it.
    pub fn spawn(&mut self, shape: Shape) -> ShapeId {
        self.scene.spawn(shape)
    }

    /// Spawn a shape and append it to the live list.
    pub fn spawn_live(&mut self, shape: Shape) -> ShapeId {
        let id = self.scene.spawn(shape);
        self.show(id);
        id
    }

    /// Append a shape to the live list. Already-live shapes keep their slot.
    pub fn show(&mut self, id: ShapeId) {
        if !self.live.contains(&id) {
            self.live.push(id);
        }
    }

    /// Remove a shape from the live list by identity.
    pub fn hide(&mut self, id: ShapeId) -> bool {
        match self.live.iter().position(|&s| s == id) {
            Some(index) => {
                self.live.remove(index);
                true
            }
            None => false,
        }
    }

    /// Hide and destroy a shape with its subtree.
    pub fn remove(&mut self, id: ShapeId) {
        self.hide(id);
        self.scene.despawn(id);
    }

    /// Live shapes in render order.
    pub fn live(&self) -> &[ShapeId] {
        &self.live
    }

    pub fn is_live(&self, id: ShapeId) -> bool {
        self.live.contains(&id)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, origin: Vec2, size: Vec2) {
        self.viewport = Viewport::new(origin, size);
    }

    /// Queue a command for the host.
    pub fn emit(&mut self, command: HostCommand) {
        log::debug!("host command: {:?}", command);
        self.commands.push(command);
    }

    /// Take all queued host commands.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Paint the live shapes onto `surface`.
    pub fn render<S: crate::render::Surface + ?Sized>(&mut self, surface: &mut S) {
        crate::render::render(&mut self.scene, &self.live, surface);
    }
}
