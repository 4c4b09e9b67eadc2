//! Radar: where the enemies are, relative to the player's heading
//!
//! Read-only consumer of the enemy pool and the scrolling view. Marker storage
//! is sized to the pool once and refilled every frame without reallocating.

use glam::Vec2;

use super::background::Background;
use super::collision::torus_delta;
use super::enemy::Enemy;
use super::pool::Pool;
use crate::math::wrap_range;

/// Radar range in world units; farther enemies are pinned to the rim
pub const RADAR_RANGE: f32 = 512.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarMarker {
    /// Direction to the enemy relative to the player's heading
    /// (0 = dead ahead, counter-clockwise positive)
    pub bearing: f32,
    /// Distance over `RADAR_RANGE`, clamped to 1.0
    pub range: f32,
    /// Whether the enemy is already inside the visible screen
    pub on_screen: bool,
}

impl RadarMarker {
    /// Marker position on a unit radar disc whose "up" is the player's heading
    pub fn disc_position(&self) -> Vec2 {
        Vec2::from_angle(self.bearing + std::f32::consts::FRAC_PI_2) * self.range
    }
}

#[derive(Debug, Clone, Default)]
pub struct Radar {
    markers: Vec<RadarMarker>,
}

impl Radar {
    pub fn new(capacity: usize) -> Self {
        Self {
            markers: Vec::with_capacity(capacity),
        }
    }

    /// Rebuild markers from the live enemies
    pub fn update(
        &mut self,
        enemies: &Pool<Enemy>,
        player_pos: Vec2,
        player_angle: f32,
        view: &Background,
    ) {
        use std::f32::consts::PI;

        self.markers.clear();
        for enemy in enemies.iter_active() {
            let delta = torus_delta(player_pos, enemy.entity.pos);
            let bearing = if delta == Vec2::ZERO {
                0.0
            } else {
                wrap_range(delta.to_angle() - player_angle, -PI, PI)
            };
            self.markers.push(RadarMarker {
                bearing,
                range: (delta.length() / RADAR_RANGE).min(1.0),
                on_screen: view.is_on_screen(enemy.entity.pos),
            });
        }
    }

    pub fn markers(&self) -> &[RadarMarker] {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::sim::enemy::EnemyKind;
    use std::f32::consts::FRAC_PI_2;

    fn centered_on(pos: Vec2) -> Background {
        let mut view = Background::new();
        view.move_with_screen(pos, Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0));
        view
    }

    #[test]
    fn test_markers_follow_heading() {
        let mut enemies: Pool<Enemy> = Pool::new(4);
        let (_, enemy) = enemies.acquire().unwrap();
        enemy.spawn(EnemyKind::Normal, Vec2::new(600.0, 500.0), 0.0);
        let (_, enemy) = enemies.acquire().unwrap();
        enemy.spawn(EnemyKind::Normal, Vec2::new(500.0, 900.0), 0.0);

        let mut radar = Radar::new(4);
        // Player faces up (+y)
        let player = Vec2::new(500.0, 500.0);
        radar.update(&enemies, player, FRAC_PI_2, &centered_on(player));
        let markers = radar.markers();
        assert_eq!(markers.len(), 2);

        // First enemy is to the right: a quarter turn clockwise from ahead
        assert!((markers[0].bearing + FRAC_PI_2).abs() < 1e-4);
        assert!(markers[0].on_screen);

        // Second enemy is dead ahead and off-screen
        assert!(markers[1].bearing.abs() < 1e-4);
        assert!(!markers[1].on_screen);
        let disc = markers[1].disc_position();
        assert!(disc.x.abs() < 1e-4 && disc.y > 0.0);
    }

    #[test]
    fn test_destroyed_enemies_drop_off() {
        let mut enemies: Pool<Enemy> = Pool::new(2);
        let (_, enemy) = enemies.acquire().unwrap();
        enemy.spawn(EnemyKind::Normal, Vec2::new(10.0, 10.0), 0.0);
        enemies.release(0);

        let mut radar = Radar::new(2);
        radar.update(&enemies, Vec2::ZERO, 0.0, &centered_on(Vec2::ZERO));
        assert!(radar.markers().is_empty());
    }

    #[test]
    fn test_on_screen_follows_view_not_player() {
        let mut enemies: Pool<Enemy> = Pool::new(1);
        let (_, enemy) = enemies.acquire().unwrap();
        enemy.spawn(EnemyKind::Normal, Vec2::new(500.0, 300.0), 0.0);

        let player = Vec2::new(500.0, 500.0);
        let mut radar = Radar::new(1);

        // Centered view: 200 below the player is past the bottom edge
        radar.update(&enemies, player, FRAC_PI_2, &centered_on(player));
        assert!(!radar.markers()[0].on_screen);

        // Player pushed up the screen: the same enemy is now in view
        let mut view = Background::new();
        view.move_with_screen(player, Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - 40.0));
        radar.update(&enemies, player, FRAC_PI_2, &view);
        assert!(radar.markers()[0].on_screen);
    }
}
