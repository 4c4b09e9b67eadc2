//! Keigeki - simulation core of a top-down interceptor shooter
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, pools, enemy behaviors, scene state machine)
//! - `math`: Angle and rectangle helpers shared by the simulation
//! - `highscores`: High-score record and its persistence contract
//! - `config`: Data-driven tunables (pool sizes, delays, lives)
//! - `error`: Error types for persistence and spawn scripts

pub mod config;
pub mod error;
pub mod highscores;
pub mod math;
pub mod sim;

pub use config::GameConfig;
pub use error::{PersistError, ScriptError};
pub use highscores::{HiScoreRecord, HiScoreStore, JsonFileStore, MemoryStore};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Stage dimensions. The stage is a torus: entities leaving one edge
    /// re-enter from the opposite one.
    pub const WORLD_WIDTH: f32 = 1024.0;
    pub const WORLD_HEIGHT: f32 = 1024.0;

    /// Visible screen size; the view scrolls over the stage following the player
    pub const SCREEN_WIDTH: f32 = 480.0;
    pub const SCREEN_HEIGHT: f32 = 320.0;
    /// Background tile edge; the stage is an exact multiple of it
    pub const TILE_SIZE: f32 = 64.0;

    /// Player start position (stage center)
    pub const PLAYER_START_X: f32 = WORLD_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = WORLD_HEIGHT / 2.0;
    /// Player hit box
    pub const PLAYER_SIZE: i32 = 16;
    /// Player top speed (units/s) at full input deflection
    pub const PLAYER_SPEED: f32 = 240.0;
    /// Player turn rate (rad/s)
    pub const PLAYER_ROT_SPEED: f32 = 3.0;
    /// Input magnitude below which the stick is treated as centered
    pub const PLAYER_DEAD_ZONE: f32 = 0.05;
    /// How far back from screen center the ship sits at full speed, leaving
    /// more of the view ahead of it
    pub const PLAYER_SCREEN_LEAD: f32 = 64.0;

    /// Player shot
    pub const PLAYER_SHOT_RANGE: f32 = 600.0;
    pub const PLAYER_SHOT_SPEED: f32 = 1200.0;
    pub const PLAYER_SHOT_WIDTH: i32 = 2;
    pub const PLAYER_SHOT_HEIGHT: i32 = 8;
    pub const PLAYER_SHOT_DAMAGE: i32 = 1;

    /// Enemy shot
    pub const ENEMY_SHOT_RANGE: f32 = 500.0;
    pub const ENEMY_SHOT_SPEED: f32 = 240.0;
    pub const ENEMY_SHOT_SIZE: i32 = 6;
    pub const ENEMY_SHOT_DAMAGE: i32 = 1;

    /// Explosion effect
    pub const EXPLOSION_FRAMES: u32 = 8;
    pub const EXPLOSION_FRAME_DELAY: f32 = 0.05;
}
