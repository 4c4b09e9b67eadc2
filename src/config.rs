//! Game tunables
//!
//! Loaded from an optional JSON file. Every field has a default, so a partial
//! file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Runtime configuration for a play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Pool capacities ===
    /// Player shots alive at once
    pub player_shot_capacity: usize,
    /// Enemies alive at once
    pub enemy_capacity: usize,
    /// Enemy shots alive at once
    pub enemy_shot_capacity: usize,
    /// Explosion effects alive at once
    pub effect_capacity: usize,

    // === Rules ===
    /// Spare lives at session start
    pub initial_lives: i32,

    // === Timing (seconds) ===
    /// Delay between entering a stage and the first wave
    pub start_delay: f32,
    /// Delay between losing a life and the player reappearing
    pub rebirth_delay: f32,
    /// Pause between one wave clearing and the next spawning
    pub wave_interval: f32,
    /// Pause between the last wave clearing and the result screen
    pub stage_clear_delay: f32,
    /// Pause between leaving the result screen and the next stage start
    pub next_stage_delay: f32,
    /// Invincibility granted on (re)spawn
    pub invincible_time: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_shot_capacity: 16,
            enemy_capacity: 32,
            enemy_shot_capacity: 64,
            effect_capacity: 32,

            initial_lives: 2,

            start_delay: 1.5,
            rebirth_delay: 2.0,
            wave_interval: 2.0,
            stage_clear_delay: 2.0,
            next_stage_delay: 1.0,
            invincible_time: 2.0,
        }
    }
}

impl GameConfig {
    /// Parse from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Malformed config {} ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("No config at {} ({e}), using defaults", path.display());
                Self::default()
            }
        }
    }
}
