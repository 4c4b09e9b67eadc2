//! Keigeki headless driver
//!
//! Runs a full play session at a fixed 60 Hz with a simple autopilot at the
//! controls, logs what happens and prints a summary.
//!
//! Usage:
//!   RUST_LOG=info cargo run --release -- --frames 20000
//!   cargo run --release -- --procedural --seed 7 --stages 5 --hiscore hiscore.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use rand_pcg::Pcg32;

use keigeki::consts::SIM_DT;
use keigeki::sim::{
    EmbeddedScripts, GameEvent, GameScene, InputEvent, ProceduralScripts, SceneState,
    ScriptSource, torus_delta,
};
use keigeki::{GameConfig, HiScoreStore, JsonFileStore, MemoryStore};

#[derive(Parser, Debug)]
#[command(name = "keigeki")]
#[command(about = "Run a headless keigeki session with an autopilot")]
struct Args {
    /// Seed for procedural stages and autopilot jitter
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Stop after this many frames even if the session is still running
    #[arg(long, default_value_t = 36_000)]
    frames: u64,

    /// JSON config file (missing or malformed falls back to defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// High-score file; kept in memory when omitted
    #[arg(long)]
    hiscore: Option<PathBuf>,

    /// Use generated stages instead of the built-in campaign
    #[arg(long)]
    procedural: bool,

    /// Number of generated stages
    #[arg(long, default_value_t = 5)]
    stages: u32,
}

/// Steers toward the nearest enemy and fires when roughly lined up
struct Autopilot {
    rng: Pcg32,
    cooldown: u32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::new(seed, 0xa02b_dbf7_bb3c_0a7),
            cooldown: 0,
        }
    }

    fn drive<H: HiScoreStore>(&mut self, scene: &mut GameScene<H>) {
        match scene.state() {
            SceneState::Result => scene.queue_input(InputEvent::Confirm),
            SceneState::Playing | SceneState::WaveClear => self.fly(scene),
            _ => {}
        }
    }

    fn fly<H: HiScoreStore>(&mut self, scene: &mut GameScene<H>) {
        let (pos, angle) = (scene.player().entity.pos, scene.player().entity.angle);
        let nearest = scene
            .enemies()
            .iter_active()
            .map(|enemy| torus_delta(pos, enemy.entity.pos))
            .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));

        let Some(delta) = nearest else {
            scene.queue_input(InputEvent::Velocity { vx: 0.0, vy: 0.0 });
            return;
        };

        // Hang back at mid range so shots have room to land
        let throttle = if delta.length() > 200.0 { 1.0 } else { 0.3 };
        let dir = delta.normalize_or_zero() * throttle;
        scene.queue_input(InputEvent::Velocity {
            vx: dir.x,
            vy: dir.y,
        });

        self.cooldown = self.cooldown.saturating_sub(1);
        let heading = glam::Vec2::from_angle(angle);
        let lined_up = heading.dot(delta.normalize_or_zero()) > 0.97;
        if lined_up && self.cooldown == 0 {
            scene.queue_input(InputEvent::Fire);
            self.cooldown = 6 + self.rng.random_range(0..6);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path),
        None => GameConfig::default(),
    };

    let scripts: Box<dyn ScriptSource> = if args.procedural {
        Box::new(ProceduralScripts::new(args.seed, args.stages))
    } else {
        Box::new(EmbeddedScripts)
    };

    let store: Box<dyn HiScoreStore> = match &args.hiscore {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
            Box::new(JsonFileStore::new(path))
        }
        None => Box::new(MemoryStore::new()),
    };

    log::info!(
        "Keigeki starting: {} stages, seed {}",
        scripts.stage_count(),
        args.seed
    );

    let mut scene = GameScene::new(config, scripts, store);
    let mut pilot = Autopilot::new(args.seed);
    let mut frames = 0;
    let mut visuals: i64 = 0;

    while frames < args.frames && scene.exit().is_none() {
        pilot.drive(&mut scene);
        scene.tick(SIM_DT);
        frames += 1;

        for event in scene.drain_events() {
            match event {
                GameEvent::AttachVisual { .. } => visuals += 1,
                GameEvent::DetachVisual { .. } => visuals -= 1,
                GameEvent::WaveCleared { stage, wave } => {
                    log::info!("[{frames}] wave {stage}-{wave} cleared");
                }
                GameEvent::StageCleared {
                    stage,
                    time_secs,
                    hit_rate,
                } => {
                    println!("Stage {stage} cleared: {time_secs}s, hit rate {hit_rate}%");
                }
                GameEvent::LifeLost { remaining } => {
                    log::info!("[{frames}] life lost, {remaining} left");
                }
                GameEvent::GameOver { score } => println!("Game over: {score}"),
                GameEvent::NewHighScore { score } => {
                    log::debug!("[{frames}] new high score {score}");
                }
            }
        }
    }

    println!();
    println!("=== SESSION ===");
    println!("  Exit:       {:?}", scene.exit());
    println!("  Frames:     {frames} ({:.1}s)", frames as f32 * SIM_DT);
    println!("  Stage:      {}", scene.stage());
    println!("  Score:      {}", scene.score());
    println!("  High score: {}", scene.hiscore());
    println!("  Lives:      {}", scene.life().max(0));
    let scroll = scene.background().scroll();
    println!("  View:       ({:.0}, {:.0})", scroll.x, scroll.y);
    println!("  Live visuals at end: {visuals}");
    Ok(())
}
