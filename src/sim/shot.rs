//! Projectiles
//!
//! Player and enemy shots share one type; only the launch parameters differ.
//! A shot flies straight and removes itself once it has covered its range,
//! whether or not it hit anything.

use glam::Vec2;

use super::entity::Entity;
use super::pool::Pooled;
use crate::consts::*;

/// Which side fired the shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotSide {
    #[default]
    Player,
    Enemy,
}

#[derive(Debug, Clone, Default)]
pub struct Shot {
    pub entity: Entity,
    pub side: ShotSide,
    /// Distance covered since launch
    pub distance: f32,
    /// Self-destruct once `distance` exceeds this
    pub range: f32,
    /// HP removed from the target on hit
    pub damage: i32,
}

impl Pooled for Shot {
    fn entity(&self) -> &Entity {
        &self.entity
    }
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl Shot {
    /// Launch a player shot from `pos` along `angle`
    pub fn launch_player(&mut self, pos: Vec2, angle: f32) {
        self.side = ShotSide::Player;
        self.entity.width = PLAYER_SHOT_WIDTH;
        self.entity.height = PLAYER_SHOT_HEIGHT;
        self.entity.speed = PLAYER_SHOT_SPEED;
        self.range = PLAYER_SHOT_RANGE;
        self.damage = PLAYER_SHOT_DAMAGE;
        self.distance = 0.0;
        self.entity.stage(pos, angle, 1);
    }

    /// Launch an enemy shot from `pos` along `angle`
    pub fn launch_enemy(&mut self, pos: Vec2, angle: f32) {
        self.side = ShotSide::Enemy;
        self.entity.width = ENEMY_SHOT_SIZE;
        self.entity.height = ENEMY_SHOT_SIZE;
        self.entity.speed = ENEMY_SHOT_SPEED;
        self.range = ENEMY_SHOT_RANGE;
        self.damage = ENEMY_SHOT_DAMAGE;
        self.distance = 0.0;
        self.entity.stage(pos, angle, 1);
    }

    /// Move, then self-destruct past the range limit
    pub fn update(&mut self, dt: f32) {
        self.entity.move_by(dt, WORLD_WIDTH, WORLD_HEIGHT);
        self.distance += self.entity.speed * dt;
        if self.distance > self.range {
            self.entity.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shot_expires_after_range() {
        let mut shot = Shot::default();
        shot.launch_player(Vec2::new(100.0, 100.0), 0.0);

        // 1200 u/s over a 600 u range: gone shortly after half a second
        for _ in 0..29 {
            shot.update(1.0 / 60.0);
        }
        assert!(shot.entity.staged);

        for _ in 0..2 {
            shot.update(1.0 / 60.0);
        }
        assert!(!shot.entity.staged);
    }

    #[test]
    fn test_enemy_shot_parameters() {
        let mut shot = Shot::default();
        shot.launch_enemy(Vec2::ZERO, 1.0);
        assert_eq!(shot.side, ShotSide::Enemy);
        assert_eq!(shot.damage, ENEMY_SHOT_DAMAGE);
        assert_eq!(shot.entity.speed, ENEMY_SHOT_SPEED);
        assert!(shot.entity.staged);
    }
}
