//! Enemies and their behavior dispatch
//!
//! Each enemy type maps to one static [`Behavior`] entry: a create, an action
//! and a destroy function plus fixed tuning parameters. The entry is looked up
//! once at spawn and cached on the enemy, so the per-frame call is a plain
//! function pointer jump and the type cannot change mid-life.
//!
//! Behaviors never touch the scene directly. They push [`EnemyCommand`]s into
//! a buffer the scene applies after the enemy pass, which keeps the enemy pool
//! free of re-entrant mutation while it is being traversed.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::nearest_image;
use super::entity::Entity;
use super::pool::Pooled;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::math::n_way_angles;

/// Enemy types selectable from spawn scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slow chaser, single aimed shot
    #[default]
    Normal,
    /// Fast mover
    HighSpeed,
    /// Tight turner
    HighTurn,
    /// Three-shot bursts
    HighShot,
    /// Aimed 3-way spread
    ThreeWay,
    /// Slow, tough, snaps to face the player and fires a 5-way spread
    Cannon,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Normal,
        EnemyKind::HighSpeed,
        EnemyKind::HighTurn,
        EnemyKind::HighShot,
        EnemyKind::ThreeWay,
        EnemyKind::Cannon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Normal => "normal",
            EnemyKind::HighSpeed => "high_speed",
            EnemyKind::HighTurn => "high_turn",
            EnemyKind::HighShot => "high_shot",
            EnemyKind::ThreeWay => "three_way",
            EnemyKind::Cannon => "cannon",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Some(EnemyKind::Normal),
            "high_speed" | "highspeed" => Some(EnemyKind::HighSpeed),
            "high_turn" | "highturn" => Some(EnemyKind::HighTurn),
            "high_shot" | "highshot" | "rapid" => Some(EnemyKind::HighShot),
            "three_way" | "3way" | "nway" => Some(EnemyKind::ThreeWay),
            "cannon" | "canon" => Some(EnemyKind::Cannon),
            _ => None,
        }
    }

    /// Behavior table entry for this type
    pub fn behavior(self) -> &'static Behavior {
        &BEHAVIORS[self as usize]
    }
}

/// Side effects requested by a behavior, applied by the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyCommand {
    FireShot { pos: Vec2, angle: f32 },
    AddScore(u64),
    Explosion { pos: Vec2 },
}

/// What a behavior may read and request during one call
pub struct EnemyContext<'a> {
    /// Player position, `None` while the player is down
    pub player_pos: Option<Vec2>,
    pub commands: &'a mut Vec<EnemyCommand>,
}

/// Fixed tuning for one enemy type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorParams {
    pub speed: f32,
    /// Max turn rate in rad/s; infinite means the enemy snaps to its target
    pub turn_rate: f32,
    pub hit_point: i32,
    pub score: u64,
    pub size: i32,
    /// Seconds between volleys
    pub fire_interval: f32,
    /// Shots per volley
    pub way: usize,
    /// Radians between shots of one volley
    pub spread: f32,
    /// Shots per burst (1 = no bursts)
    pub burst: i32,
    /// Seconds between shots within a burst
    pub burst_gap: f32,
}

pub type CreateFn = fn(&mut Enemy);
pub type ActionFn = fn(&mut Enemy, f32, &mut EnemyContext);
pub type DestroyFn = fn(&mut Enemy, &mut EnemyContext);

/// One enemy type's bound functions and parameters
pub struct Behavior {
    pub kind: EnemyKind,
    pub params: BehaviorParams,
    pub create: CreateFn,
    pub action: ActionFn,
    pub destroy: DestroyFn,
}

impl std::fmt::Debug for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Behavior").field("kind", &self.kind).finish()
    }
}

const DEG: f32 = PI / 180.0;

/// Indexed by `EnemyKind as usize`
static BEHAVIORS: [Behavior; 6] = [
    Behavior {
        kind: EnemyKind::Normal,
        params: BehaviorParams {
            speed: 120.0,
            turn_rate: 0.5,
            hit_point: 1,
            score: 100,
            size: 16,
            fire_interval: 5.0,
            way: 1,
            spread: 0.0,
            burst: 1,
            burst_gap: 0.0,
        },
        create: create_standard,
        action: action_chase,
        destroy: destroy_standard,
    },
    Behavior {
        kind: EnemyKind::HighSpeed,
        params: BehaviorParams {
            speed: 240.0,
            turn_rate: 0.5,
            hit_point: 1,
            score: 200,
            size: 16,
            fire_interval: 5.0,
            way: 1,
            spread: 0.0,
            burst: 1,
            burst_gap: 0.0,
        },
        create: create_standard,
        action: action_chase,
        destroy: destroy_standard,
    },
    Behavior {
        kind: EnemyKind::HighTurn,
        params: BehaviorParams {
            speed: 140.0,
            turn_rate: 1.6,
            hit_point: 1,
            score: 200,
            size: 16,
            fire_interval: 5.0,
            way: 1,
            spread: 0.0,
            burst: 1,
            burst_gap: 0.0,
        },
        create: create_standard,
        action: action_chase,
        destroy: destroy_standard,
    },
    Behavior {
        kind: EnemyKind::HighShot,
        params: BehaviorParams {
            speed: 100.0,
            turn_rate: 0.5,
            hit_point: 2,
            score: 300,
            size: 16,
            fire_interval: 2.0,
            way: 1,
            spread: 0.0,
            burst: 3,
            burst_gap: 0.15,
        },
        create: create_standard,
        action: action_burst,
        destroy: destroy_standard,
    },
    Behavior {
        kind: EnemyKind::ThreeWay,
        params: BehaviorParams {
            speed: 100.0,
            turn_rate: 0.4,
            hit_point: 3,
            score: 500,
            size: 16,
            fire_interval: 3.0,
            way: 3,
            spread: 15.0 * DEG,
            burst: 1,
            burst_gap: 0.0,
        },
        create: create_standard,
        action: action_chase,
        destroy: destroy_standard,
    },
    Behavior {
        kind: EnemyKind::Cannon,
        params: BehaviorParams {
            speed: 40.0,
            turn_rate: f32::INFINITY,
            hit_point: 10,
            score: 1000,
            size: 32,
            fire_interval: 4.0,
            way: 5,
            spread: 12.0 * DEG,
            burst: 1,
            burst_gap: 0.0,
        },
        create: create_standard,
        action: action_cannon,
        destroy: destroy_standard,
    },
];

/// A live enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub entity: Entity,
    /// Seconds since spawn
    pub time: f32,
    /// Behavior-specific progress counter (volleys or burst shots fired)
    pub state: i32,
    behavior: &'static Behavior,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            entity: Entity::default(),
            time: 0.0,
            state: 0,
            behavior: EnemyKind::Normal.behavior(),
        }
    }
}

impl Pooled for Enemy {
    fn entity(&self) -> &Entity {
        &self.entity
    }
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl Enemy {
    /// Bind the behavior for `kind` and place the enemy
    pub fn spawn(&mut self, kind: EnemyKind, pos: Vec2, angle: f32) {
        self.behavior = kind.behavior();
        self.time = 0.0;
        self.state = 0;
        self.entity.stage(pos, angle, 1);
        (self.behavior.create)(self);
    }

    pub fn kind(&self) -> EnemyKind {
        self.behavior.kind
    }

    pub fn params(&self) -> &'static BehaviorParams {
        &self.behavior.params
    }

    /// Run the bound action, then move
    pub fn update(&mut self, dt: f32, ctx: &mut EnemyContext) {
        (self.behavior.action)(self, dt, ctx);
        self.entity.move_by(dt, WORLD_WIDTH, WORLD_HEIGHT);
    }

    /// Run the bound destroy behavior. Does nothing if already destroyed.
    pub fn destroy(&mut self, ctx: &mut EnemyContext) {
        if self.entity.staged {
            (self.behavior.destroy)(self, ctx);
        }
    }

    /// Turn toward the player within the type's turn rate
    fn aim(&mut self, dt: f32, ctx: &EnemyContext) {
        let Some(player) = ctx.player_pos else {
            self.entity.rot_speed = 0.0;
            return;
        };
        let target = nearest_image(self.entity.pos, player);
        let rate = self.params().turn_rate;
        if rate.is_infinite() {
            self.entity.face(target);
        } else {
            self.entity.steer_toward(target, rate, dt);
        }
    }

    /// Fire one volley of `way` shots centered on the player (or the heading)
    fn fire(&mut self, ctx: &mut EnemyContext) {
        let pos = self.entity.pos;
        let center = match ctx.player_pos {
            Some(player) => {
                let d = nearest_image(pos, player) - pos;
                if d == Vec2::ZERO { self.entity.angle } else { d.to_angle() }
            }
            None => self.entity.angle,
        };
        let params = self.params();
        for angle in n_way_angles(params.way, center, params.spread) {
            ctx.commands.push(EnemyCommand::FireShot { pos, angle });
        }
    }
}

fn create_standard(enemy: &mut Enemy) {
    let params = enemy.params();
    enemy.entity.speed = params.speed;
    enemy.entity.hit_point = params.hit_point;
    enemy.entity.width = params.size;
    enemy.entity.height = params.size;
    enemy.entity.rot_speed = 0.0;
}

/// Chase the player, one volley every `fire_interval`.
/// `state` counts volley slots used since spawn, fired or skipped.
fn action_chase(enemy: &mut Enemy, dt: f32, ctx: &mut EnemyContext) {
    enemy.time += dt;
    enemy.aim(dt, ctx);

    let interval = enemy.params().fire_interval;
    let next_volley = (enemy.state + 1) as f32 * interval;
    if enemy.time < next_volley {
        return;
    }

    // Every slot up to now is spent; no backlog builds while the player is down
    enemy.state = (enemy.time / interval) as i32;
    if ctx.player_pos.is_some() {
        enemy.fire(ctx);
    }
}

/// Chase the player, firing `burst` shots `burst_gap` apart every interval.
/// `state` counts burst shots used since spawn, fired or skipped.
fn action_burst(enemy: &mut Enemy, dt: f32, ctx: &mut EnemyContext) {
    enemy.time += dt;
    enemy.aim(dt, ctx);

    let params = enemy.params();
    let burst = params.burst.max(1);
    let round = enemy.state / burst;
    let index = enemy.state % burst;
    let next_shot = (round + 1) as f32 * params.fire_interval + index as f32 * params.burst_gap;
    if enemy.time < next_shot {
        return;
    }

    if ctx.player_pos.is_some() {
        enemy.state += 1;
        enemy.fire(ctx);
    } else {
        // Drop the rest of the due burst
        enemy.state = (enemy.time / params.fire_interval) as i32 * burst;
    }
}

/// Seconds before each volley the cannon stops to brace
pub const CANNON_BRACE_TIME: f32 = 0.6;

/// Creep toward the player always facing it, halting to brace before each
/// wide volley
fn action_cannon(enemy: &mut Enemy, dt: f32, ctx: &mut EnemyContext) {
    let params = enemy.params();
    let next_volley = (enemy.state + 1) as f32 * params.fire_interval;
    let bracing = next_volley - enemy.time <= CANNON_BRACE_TIME;
    enemy.entity.speed = if bracing { 0.0 } else { params.speed };

    action_chase(enemy, dt, ctx);
}

fn destroy_standard(enemy: &mut Enemy, ctx: &mut EnemyContext) {
    ctx.commands.push(EnemyCommand::AddScore(enemy.params().score));
    ctx.commands.push(EnemyCommand::Explosion { pos: enemy.entity.pos });
    enemy.entity.destroy();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned(kind: EnemyKind) -> Enemy {
        let mut enemy = Enemy::default();
        enemy.spawn(kind, Vec2::new(100.0, 100.0), 0.0);
        enemy
    }

    fn shots(commands: &[EnemyCommand]) -> Vec<f32> {
        commands
            .iter()
            .filter_map(|c| match c {
                EnemyCommand::FireShot { angle, .. } => Some(*angle),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_behavior_table_matches_kind() {
        for kind in EnemyKind::ALL {
            assert_eq!(kind.behavior().kind, kind);
            assert_eq!(EnemyKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EnemyKind::from_name("dragon"), None);
    }

    #[test]
    fn test_spawn_binds_parameters() {
        let enemy = spawned(EnemyKind::Cannon);
        assert_eq!(enemy.kind(), EnemyKind::Cannon);
        assert_eq!(enemy.entity.hit_point, 10);
        assert_eq!(enemy.entity.width, 32);
        assert_eq!(enemy.entity.speed, 40.0);
        assert!(enemy.entity.staged);
    }

    #[test]
    fn test_chaser_turns_gradually() {
        let mut enemy = spawned(EnemyKind::Normal);
        let mut commands = Vec::new();
        let mut ctx = EnemyContext {
            player_pos: Some(Vec2::new(100.0, 300.0)),
            commands: &mut commands,
        };
        enemy.update(0.1, &mut ctx);
        // Facing +x, player straight above: 0.5 rad/s for 0.1 s
        assert!((enemy.entity.angle - 0.05).abs() < 1e-4);
    }

    #[test]
    fn test_cannon_snaps_to_player() {
        let mut enemy = spawned(EnemyKind::Cannon);
        let mut commands = Vec::new();
        let mut ctx = EnemyContext {
            player_pos: Some(Vec2::new(100.0, 300.0)),
            commands: &mut commands,
        };
        enemy.update(0.01, &mut ctx);
        assert!((enemy.entity.angle - PI / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_three_way_volley() {
        let mut enemy = spawned(EnemyKind::ThreeWay);
        let mut commands = Vec::new();
        let mut ctx = EnemyContext {
            player_pos: Some(Vec2::new(300.0, 100.0)),
            commands: &mut commands,
        };
        for _ in 0..29 {
            enemy.update(0.1, &mut ctx);
        }
        assert!(shots(&ctx.commands[..]).is_empty());

        enemy.update(0.2, &mut ctx);
        let angles = shots(&ctx.commands[..]);
        assert_eq!(angles.len(), 3);
        assert!(angles[0] < angles[1] && angles[1] < angles[2]);
        assert!((angles[2] - angles[1] - 15.0 * DEG).abs() < 1e-4);
    }

    #[test]
    fn test_burst_fires_three_then_waits() {
        let mut enemy = spawned(EnemyKind::HighShot);
        let mut commands = Vec::new();
        let mut ctx = EnemyContext {
            player_pos: Some(Vec2::new(300.0, 100.0)),
            commands: &mut commands,
        };
        // Burst at 2.0, 2.15, 2.30; next burst at 4.0
        for _ in 0..300 {
            enemy.update(0.01, &mut ctx);
        }
        assert_eq!(shots(&ctx.commands[..]).len(), 3);
        assert_eq!(enemy.state, 3);
    }

    #[test]
    fn test_no_fire_without_player() {
        let mut enemy = spawned(EnemyKind::Normal);
        let mut commands = Vec::new();
        let mut ctx = EnemyContext {
            player_pos: None,
            commands: &mut commands,
        };
        for _ in 0..100 {
            enemy.update(0.1, &mut ctx);
        }
        assert!(commands.is_empty());
    }

    #[test]
    fn test_no_backlog_after_player_returns() {
        for kind in [EnemyKind::HighShot, EnemyKind::ThreeWay] {
            let mut enemy = spawned(kind);
            let mut commands = Vec::new();
            let mut ctx = EnemyContext {
                player_pos: None,
                commands: &mut commands,
            };
            // Seven seconds down covers several fire intervals
            for _ in 0..420 {
                enemy.update(1.0 / 60.0, &mut ctx);
            }
            assert!(ctx.commands.is_empty());

            ctx.player_pos = Some(Vec2::new(300.0, 100.0));
            let mut per_frame = Vec::new();
            for _ in 0..10 {
                let before = ctx.commands.len();
                enemy.update(1.0 / 60.0, &mut ctx);
                per_frame.push(ctx.commands.len() - before);
            }
            let volleys = per_frame.iter().filter(|&&n| n > 0).count();
            assert!(volleys <= 1, "{kind:?} fired {per_frame:?}");
        }
    }

    #[test]
    fn test_cannon_braces_before_volley() {
        let mut enemy = spawned(EnemyKind::Cannon);
        let mut commands = Vec::new();
        let mut ctx = EnemyContext {
            player_pos: Some(Vec2::new(100.0, 400.0)),
            commands: &mut commands,
        };
        let interval = enemy.params().fire_interval;

        // Cruising well before the first volley
        for _ in 0..100 {
            enemy.update(0.01, &mut ctx);
        }
        assert_eq!(enemy.entity.speed, enemy.params().speed);

        // Halted just before it
        while enemy.time < interval - CANNON_BRACE_TIME / 2.0 {
            enemy.update(0.01, &mut ctx);
        }
        assert_eq!(enemy.entity.speed, 0.0);
        let braced_at = enemy.entity.pos;
        enemy.update(0.01, &mut ctx);
        assert_eq!(enemy.entity.pos, braced_at);

        // Moving again once the volley is out
        while shots(&ctx.commands[..]).is_empty() {
            enemy.update(0.01, &mut ctx);
        }
        assert_eq!(shots(&ctx.commands[..]).len(), 5);
        enemy.update(0.01, &mut ctx);
        assert_eq!(enemy.entity.speed, enemy.params().speed);
    }

    #[test]
    fn test_destroy_awards_score_once() {
        let mut enemy = spawned(EnemyKind::HighSpeed);
        let mut commands = Vec::new();
        let mut ctx = EnemyContext {
            player_pos: None,
            commands: &mut commands,
        };
        enemy.destroy(&mut ctx);
        enemy.destroy(&mut ctx);
        assert!(!enemy.entity.staged);
        assert_eq!(
            commands
                .iter()
                .filter(|c| matches!(c, EnemyCommand::AddScore(200)))
                .count(),
            1
        );
    }
}
