//! Shot-versus-target collision resolution
//!
//! Hit boxes are axis-aligned rectangles centered on each entity, compared on
//! the wrapped stage so that objects straddling an edge still collide.
//!
//! Ordering rules:
//! - shots are visited in pool slot order, targets likewise
//! - a shot hits at most one target per pass: the first overlapping target in
//!   slot order wins, not the nearest one
//! - a shot is destroyed on any hit, whether or not the target survives
//! - a target destroyed by an earlier shot is skipped by later shots

use glam::Vec2;

use super::entity::Entity;
use super::player::Player;
use super::pool::{Pool, Pooled};
use super::shot::Shot;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::math::wrap_delta;

/// Shortest vector from `from` to `to` on the wrapped stage
#[inline]
pub fn torus_delta(from: Vec2, to: Vec2) -> Vec2 {
    Vec2::new(
        wrap_delta(from.x, to.x, WORLD_WIDTH),
        wrap_delta(from.y, to.y, WORLD_HEIGHT),
    )
}

/// The copy of `to` nearest to `from` on the wrapped stage
#[inline]
pub fn nearest_image(from: Vec2, to: Vec2) -> Vec2 {
    from + torus_delta(from, to)
}

/// Strict hit-box overlap; boxes that only touch do not collide
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    let d = torus_delta(a.pos, b.pos).abs();
    d.x < (a.width + b.width) as f32 / 2.0 && d.y < (a.height + b.height) as f32 / 2.0
}

/// Resolve every live shot against every live target.
///
/// On a hit the target loses the shot's damage, the shot is destroyed and
/// `on_hit` is called with the target and its slot so the caller can run
/// destroy behavior once HP reaches zero. Returns the number of hits.
pub fn resolve_shots<T: Pooled>(
    shots: &mut Pool<Shot>,
    targets: &mut Pool<T>,
    mut on_hit: impl FnMut(usize, &mut T),
) -> u32 {
    let mut hits = 0;
    for s in 0..shots.capacity() {
        if !shots.is_active(s) {
            continue;
        }
        for t in 0..targets.capacity() {
            if !targets.is_active(t) {
                continue;
            }
            let shot = shots.slot_mut(s);
            let target = targets.slot_mut(t);
            if !overlaps(&shot.entity, target.entity()) {
                continue;
            }

            target.entity_mut().hit_point -= shot.damage;
            shot.entity.destroy();
            hits += 1;
            on_hit(t, target);
            break;
        }
    }
    hits
}

/// Resolve enemy shots against the player. An invincible or absent player is
/// not tested at all, so shots pass through. Returns the number of hits.
pub fn resolve_shots_vs_player(shots: &mut Pool<Shot>, player: &mut Player) -> u32 {
    let mut hits = 0;
    for s in 0..shots.capacity() {
        if !player.entity.staged || player.invincible || player.entity.is_dead() {
            break;
        }
        if !shots.is_active(s) {
            continue;
        }
        let shot = shots.slot_mut(s);
        if overlaps(&shot.entity, &player.entity) {
            player.entity.hit_point -= shot.damage;
            shot.entity.destroy();
            hits += 1;
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Enemy, EnemyKind};

    fn shot_at(pool: &mut Pool<Shot>, pos: Vec2) {
        let (_, shot) = pool.acquire().unwrap();
        shot.launch_player(pos, 0.0);
    }

    fn enemy_at(pool: &mut Pool<Enemy>, pos: Vec2) {
        let (_, enemy) = pool.acquire().unwrap();
        enemy.spawn(EnemyKind::ThreeWay, pos, 0.0);
    }

    #[test]
    fn test_overlap_across_wrap_seam() {
        let a = Entity {
            pos: Vec2::new(1.0, 100.0),
            width: 10,
            height: 10,
            ..Default::default()
        };
        let b = Entity {
            pos: Vec2::new(WORLD_WIDTH - 2.0, 100.0),
            width: 10,
            height: 10,
            ..Default::default()
        };
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_exact_overlap_hits_once() {
        let mut shots: Pool<Shot> = Pool::new(4);
        let mut enemies: Pool<Enemy> = Pool::new(4);
        enemy_at(&mut enemies, Vec2::new(200.0, 200.0));
        shot_at(&mut shots, Vec2::new(200.0, 200.0));
        let before = enemies.slot(0).entity.hit_point;

        let hits = resolve_shots(&mut shots, &mut enemies, |_, _| {});
        assert_eq!(hits, 1);
        assert_eq!(shots.active_count(), 0);
        assert_eq!(
            enemies.slot(0).entity.hit_point,
            before - crate::consts::PLAYER_SHOT_DAMAGE
        );
    }

    #[test]
    fn test_miss_changes_nothing() {
        let mut shots: Pool<Shot> = Pool::new(4);
        let mut enemies: Pool<Enemy> = Pool::new(4);
        enemy_at(&mut enemies, Vec2::new(200.0, 200.0));
        shot_at(&mut shots, Vec2::new(400.0, 400.0));
        let enemy_before = enemies.slot(0).entity.clone();
        let shot_before = shots.slot(0).entity.clone();

        let hits = resolve_shots(&mut shots, &mut enemies, |_, _| {});
        assert_eq!(hits, 0);
        assert_eq!(enemies.slot(0).entity, enemy_before);
        assert_eq!(shots.slot(0).entity, shot_before);
    }

    #[test]
    fn test_first_slot_wins_tie() {
        let mut shots: Pool<Shot> = Pool::new(4);
        let mut enemies: Pool<Enemy> = Pool::new(4);
        // Slot 1 is closer to the shot, slot 0 still wins
        enemy_at(&mut enemies, Vec2::new(206.0, 200.0));
        enemy_at(&mut enemies, Vec2::new(200.0, 200.0));
        shot_at(&mut shots, Vec2::new(200.0, 200.0));
        let hp = enemies.slot(0).entity.hit_point;

        let mut hit_slots = Vec::new();
        resolve_shots(&mut shots, &mut enemies, |slot, _| hit_slots.push(slot));
        assert_eq!(hit_slots, vec![0]);
        assert_eq!(enemies.slot(0).entity.hit_point, hp - 1);
        assert_eq!(enemies.slot(1).entity.hit_point, hp);
    }

    #[test]
    fn test_destroyed_target_not_hit_again() {
        let mut shots: Pool<Shot> = Pool::new(4);
        let mut enemies: Pool<Enemy> = Pool::new(4);
        enemy_at(&mut enemies, Vec2::new(200.0, 200.0));
        enemies.slot_mut(0).entity.hit_point = 1;
        shot_at(&mut shots, Vec2::new(200.0, 200.0));
        shot_at(&mut shots, Vec2::new(200.0, 200.0));

        let hits = resolve_shots(&mut shots, &mut enemies, |_, enemy| {
            if enemy.entity.is_dead() {
                enemy.entity.destroy();
            }
        });
        assert_eq!(hits, 1);
        // Second shot found nothing to hit and keeps flying
        assert_eq!(shots.active_count(), 1);
    }

    #[test]
    fn test_invincible_player_ignores_shots() {
        let mut shots: Pool<Shot> = Pool::new(2);
        let mut player = Player::new();
        let (_, shot) = shots.acquire().unwrap();
        shot.launch_enemy(player.entity.pos, 0.0);

        player.rebirth(2.0);
        assert_eq!(resolve_shots_vs_player(&mut shots, &mut player), 0);
        assert_eq!(shots.active_count(), 1);
        assert_eq!(player.entity.hit_point, 1);

        player.invincible = false;
        assert_eq!(resolve_shots_vs_player(&mut shots, &mut player), 1);
        assert_eq!(shots.active_count(), 0);
        assert!(player.entity.is_dead());
    }
}
