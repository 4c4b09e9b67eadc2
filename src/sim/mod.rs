//! Per-frame simulation
//!
//! Everything here is driven by [`GameScene::tick`] on a single thread:
//! - Fixed-capacity pools, allocated once per session
//! - Stable iteration order (pool slot order) for updates and collisions
//! - No rendering, audio or platform dependencies

pub mod background;
pub mod collision;
pub mod effect;
pub mod enemy;
pub mod entity;
pub mod event;
pub mod input;
pub mod player;
pub mod pool;
pub mod radar;
pub mod result;
pub mod scene;
pub mod script;
pub mod shot;

pub use background::Background;
pub use collision::{nearest_image, overlaps, resolve_shots, resolve_shots_vs_player, torus_delta};
pub use effect::Effect;
pub use enemy::{Behavior, BehaviorParams, Enemy, EnemyCommand, EnemyContext, EnemyKind};
pub use entity::Entity;
pub use event::{EntityRef, GameEvent, PoolKind};
pub use input::{InputEvent, TickInput};
pub use player::Player;
pub use pool::{Handle, Pool, Pooled};
pub use radar::{Radar, RadarMarker};
pub use result::{ResultCalculator, ResultPhase};
pub use scene::{GameScene, SceneExit, SceneState};
pub use script::{
    EmbeddedScripts, ProceduralScripts, ScriptCursor, ScriptSource, SpawnRecord, WaveScript,
    parse_wave,
};
pub use shot::{Shot, ShotSide};
