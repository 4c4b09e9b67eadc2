//! Facts the scene reports to the outside world
//!
//! Renderers attach and detach visuals, achievement and leaderboard
//! collaborators react to stage and game-over facts. Events are buffered on
//! the scene and drained by the host after each tick; the core never waits on
//! whoever consumes them.

use serde::{Deserialize, Serialize};

use super::pool::Handle;

/// Which pool an entity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Player,
    PlayerShot,
    Enemy,
    EnemyShot,
    Effect,
}

/// Stable address of one entity occupancy, used as the visual key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub pool: PoolKind,
    pub handle: Handle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An entity entered the stage. `angle` is in screen degrees.
    AttachVisual {
        entity: EntityRef,
        x: f32,
        y: f32,
        angle: f32,
    },
    /// An entity left the stage
    DetachVisual { entity: EntityRef },
    StageCleared {
        stage: u32,
        time_secs: u32,
        hit_rate: u32,
    },
    WaveCleared { stage: u32, wave: u32 },
    LifeLost { remaining: i32 },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
}
