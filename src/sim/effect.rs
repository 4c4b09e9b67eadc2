//! Short-lived screen effects (explosions)
//!
//! An effect is a stationary, non-colliding entity that plays `frame_count`
//! animation frames `delay` seconds apart and then frees its slot. The
//! animation itself is the renderer's business; the core only tracks which
//! frame is current.

use glam::Vec2;

use super::entity::Entity;
use super::pool::Pooled;

#[derive(Debug, Clone, Default)]
pub struct Effect {
    pub entity: Entity,
    pub frame_count: u32,
    pub delay: f32,
    pub elapsed: f32,
}

impl Pooled for Effect {
    fn entity(&self) -> &Entity {
        &self.entity
    }
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl Effect {
    pub fn start(&mut self, pos: Vec2, frame_count: u32, delay: f32) {
        self.frame_count = frame_count;
        self.delay = delay;
        self.elapsed = 0.0;
        self.entity.stage(pos, 0.0, 1);
    }

    /// Animation frame currently showing
    pub fn frame(&self) -> u32 {
        if self.delay <= 0.0 {
            return 0;
        }
        ((self.elapsed / self.delay) as u32).min(self.frame_count.saturating_sub(1))
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed >= self.frame_count as f32 * self.delay {
            self.entity.destroy();
        }
    }
}
