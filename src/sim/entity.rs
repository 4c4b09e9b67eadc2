//! Base simulation object
//!
//! Everything that moves and can be hit (player, enemies, shots, effects)
//! embeds an [`Entity`]. Visual presentation is not stored here; the scene
//! reports attach/detach events keyed by pool handle instead.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::{
    Rect, destination_angle, rad_to_screen_angle, rect_from_center, rotation_direction, wrap_range,
};

/// Position, heading, hit box and HP of one simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Absolute world position (independent of the screen scroll)
    pub pos: Vec2,
    /// Hit box width
    pub width: i32,
    /// Hit box height
    pub height: i32,
    /// Units per second along `angle`
    pub speed: f32,
    /// Heading in radians (0 = +x, counter-clockwise positive)
    pub angle: f32,
    /// Radians per second
    pub rot_speed: f32,
    /// Hit points; <= 0 means destroyed
    pub hit_point: i32,
    /// True while occupying an active pool slot
    pub staged: bool,
    /// Wrap the position into the stage after moving
    pub wraps: bool,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            width: 0,
            height: 0,
            speed: 0.0,
            angle: 0.0,
            rot_speed: 0.0,
            hit_point: 0,
            staged: false,
            wraps: true,
        }
    }
}

impl Entity {
    /// Place the entity at a pose and mark it live
    pub fn stage(&mut self, pos: Vec2, angle: f32, hit_point: i32) {
        self.pos = pos;
        self.angle = angle;
        self.hit_point = hit_point;
        self.staged = true;
    }

    /// Advance position along the heading and the heading by the turn rate
    pub fn move_by(&mut self, dt: f32, world_width: f32, world_height: f32) {
        self.pos += Vec2::from_angle(self.angle) * self.speed * dt;
        if self.rot_speed != 0.0 {
            self.angle = wrap_range(self.angle + self.rot_speed * dt, -PI, PI);
        }

        if self.wraps {
            self.pos.x = wrap_range(self.pos.x, 0.0, world_width);
            self.pos.y = wrap_range(self.pos.y, 0.0, world_height);
        }
    }

    /// Set the turn rate to approach `target`, at most `max_rate` rad/s.
    ///
    /// The rate never overshoots the remaining gap within one `dt`, so the
    /// heading settles on the target instead of oscillating around it.
    pub fn steer_toward(&mut self, target: Vec2, max_rate: f32, dt: f32) {
        let (x, y) = (self.pos.x, self.pos.y);
        let direction = rotation_direction(self.angle, x, y, target.x, target.y);
        let gap = wrap_range(destination_angle(x, y, target.x, target.y) - self.angle, -PI, PI).abs();
        let settle_rate = if dt > 0.0 { gap / dt } else { 0.0 };
        self.rot_speed = direction as f32 * max_rate.min(settle_rate);
    }

    /// Face `target` immediately
    pub fn face(&mut self, target: Vec2) {
        self.angle = destination_angle(self.pos.x, self.pos.y, target.x, target.y);
        self.rot_speed = 0.0;
    }

    /// Mark destroyed and give up the pool slot. Idempotent.
    pub fn destroy(&mut self) {
        self.hit_point = self.hit_point.min(0);
        self.staged = false;
        self.speed = 0.0;
        self.rot_speed = 0.0;
    }

    /// Hit box centered on the position
    pub fn hit_rect(&self) -> Rect {
        rect_from_center(self.pos, self.width as f32, self.height as f32)
    }

    /// Heading in screen degrees (0 = up, clockwise positive)
    pub fn screen_angle(&self) -> f32 {
        rad_to_screen_angle(self.angle)
    }

    /// Whether HP has run out
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hit_point <= 0
    }
}
