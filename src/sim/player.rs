//! The player's interceptor
//!
//! The ship always flies forward. The input decoder supplies a velocity
//! vector: its direction is the heading the ship turns toward (rate-limited)
//! and its magnitude scales the speed.

use glam::Vec2;

use super::entity::Entity;
use crate::consts::*;

#[derive(Debug, Clone, Default)]
pub struct Player {
    pub entity: Entity,
    /// Ignores enemy shots while set
    pub invincible: bool,
    /// Seconds of invincibility left
    pub invincible_time: f32,
    /// Last input vector from the decoder
    pub velocity: Vec2,
}

impl Player {
    pub fn new() -> Self {
        let mut player = Self::default();
        player.reset();
        player
    }

    /// Back to the start position, facing up, with no invincibility
    pub fn reset(&mut self) {
        self.entity = Entity {
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            ..Default::default()
        };
        self.entity
            .stage(Vec2::new(PLAYER_START_X, PLAYER_START_Y), std::f32::consts::FRAC_PI_2, 1);
        self.invincible = false;
        self.invincible_time = 0.0;
        self.velocity = Vec2::ZERO;
    }

    /// Respawn after a miss with fresh invincibility
    pub fn rebirth(&mut self, invincible_time: f32) {
        self.reset();
        self.invincible = invincible_time > 0.0;
        self.invincible_time = invincible_time.max(0.0);
    }

    /// Apply an input vector. Components are expected in [-1, 1].
    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.velocity = Vec2::new(vx, vy);
    }

    /// Where the ship sits on screen. It drifts back from center against its
    /// heading in proportion to speed.
    pub fn screen_pos(&self) -> Vec2 {
        let center = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
        let lead = self.entity.speed / PLAYER_SPEED * PLAYER_SCREEN_LEAD;
        center - Vec2::from_angle(self.entity.angle) * lead
    }

    /// Steer toward the input direction, tick invincibility, then move
    pub fn update(&mut self, dt: f32) {
        if !self.entity.staged {
            return;
        }

        let magnitude = self.velocity.length().min(1.0);
        if magnitude > PLAYER_DEAD_ZONE {
            let target = self.entity.pos + self.velocity;
            self.entity.steer_toward(target, PLAYER_ROT_SPEED, dt);
            self.entity.speed = PLAYER_SPEED * magnitude;
        } else {
            self.entity.rot_speed = 0.0;
            self.entity.speed = 0.0;
        }

        if self.invincible {
            self.invincible_time -= dt;
            if self.invincible_time <= 0.0 {
                self.invincible_time = 0.0;
                self.invincible = false;
            }
        }

        self.entity.move_by(dt, WORLD_WIDTH, WORLD_HEIGHT);
    }
}
