//! Game scene controller
//!
//! Owns every pool, the player, the radar and the result tally, and sequences
//! a play session:
//!
//! ```text
//! PreLoad -> Start -> Playing <-> Pause / QuitMenu
//!                     Playing -> WaveClear -> Playing (next wave)
//!                     Playing -> StageClear -> Result -> Start (next stage)
//!                     Playing -> GameOver
//! any gameplay state -> Sleep (timed) -> back where it was
//! ```
//!
//! The host drives it with [`GameScene::tick`], feeds input through
//! [`GameScene::queue_input`] and drains [`GameEvent`]s afterwards. Invalid
//! requests (resume while not paused, skip outside the result screen...) are
//! no-ops.

use glam::Vec2;

use super::background::Background;
use super::collision::{resolve_shots, resolve_shots_vs_player};
use super::effect::Effect;
use super::enemy::{Enemy, EnemyCommand, EnemyContext, EnemyKind};
use super::event::{EntityRef, GameEvent, PoolKind};
use super::input::{InputEvent, TickInput};
use super::player::Player;
use super::pool::{Handle, Pool};
use super::radar::Radar;
use super::result::ResultCalculator;
use super::script::{ScriptCursor, ScriptSource};
use super::shot::Shot;
use crate::config::GameConfig;
use crate::consts::{EXPLOSION_FRAMES, EXPLOSION_FRAME_DELAY};
use crate::highscores::{HiScoreRecord, HiScoreStore, load_hiscore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneState {
    /// Constructed, nothing loaded yet
    #[default]
    PreLoad,
    /// Stage intro countdown
    Start,
    Playing,
    /// Between waves; the world keeps running
    WaveClear,
    /// Last wave down, short pause before the tally
    StageClear,
    /// Result tally on screen
    Result,
    GameOver,
    Pause,
    QuitMenu,
    /// Timed hold, returns to the state it interrupted
    Sleep,
}

/// Why the scene stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneExit {
    GameOver,
    AllStagesCleared,
    Quit,
}

pub struct GameScene<H: HiScoreStore> {
    config: GameConfig,
    state: SceneState,
    /// Where Pause/QuitMenu return to
    resume_state: SceneState,
    /// Where Sleep returns to
    wake_state: SceneState,
    exit: Option<SceneExit>,

    stage: u32,
    wave: u32,
    life: i32,
    score: u64,
    hiscore: u64,
    new_record: bool,

    shot_count: u32,
    hit_count: u32,
    miss_count: u32,
    /// Enemies spawned this stage
    enemy_count: u32,

    /// Countdown for timed transitions of the current state
    state_interval: f32,
    /// Countdown until the player respawns
    rebirth_interval: f32,
    sleep_interval: f32,
    /// Seconds spent in Playing/WaveClear this stage
    play_time: f32,

    player: Player,
    player_generation: u32,
    player_shots: Pool<Shot>,
    enemies: Pool<Enemy>,
    enemy_shots: Pool<Shot>,
    effects: Pool<Effect>,
    background: Background,
    radar: Radar,
    result: ResultCalculator,

    scripts: Box<dyn ScriptSource>,
    cursor: ScriptCursor,
    store: H,

    inputs: Vec<InputEvent>,
    events: Vec<GameEvent>,
    commands: Vec<EnemyCommand>,
}

impl<H: HiScoreStore> GameScene<H> {
    /// Build the scene and read the stored high score. Nothing is spawned
    /// until the first tick.
    pub fn new(config: GameConfig, scripts: Box<dyn ScriptSource>, store: H) -> Self {
        let mut player = Player::new();
        player.entity.destroy();

        let mut scene = Self {
            state: SceneState::PreLoad,
            resume_state: SceneState::Playing,
            wake_state: SceneState::PreLoad,
            exit: None,
            stage: 1,
            wave: 0,
            life: config.initial_lives,
            score: 0,
            hiscore: 0,
            new_record: false,
            shot_count: 0,
            hit_count: 0,
            miss_count: 0,
            enemy_count: 0,
            state_interval: 0.0,
            rebirth_interval: 0.0,
            sleep_interval: 0.0,
            play_time: 0.0,
            player,
            player_generation: 0,
            player_shots: Pool::new(config.player_shot_capacity),
            enemies: Pool::new(config.enemy_capacity),
            enemy_shots: Pool::new(config.enemy_shot_capacity),
            effects: Pool::new(config.effect_capacity),
            background: Background::new(),
            radar: Radar::new(config.enemy_capacity),
            result: ResultCalculator::new(),
            scripts,
            cursor: ScriptCursor::default(),
            store,
            inputs: Vec::with_capacity(16),
            events: Vec::with_capacity(64),
            commands: Vec::with_capacity(32),
            config,
        };
        scene.read_hi_score();
        scene
    }

    // === Host interface ===

    /// Queue input for the next tick
    pub fn queue_input(&mut self, event: InputEvent) {
        self.inputs.push(event);
    }

    /// Take every event reported since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32) {
        let input = TickInput::from_events(&self.inputs);
        self.inputs.clear();

        if self.exit.is_some() {
            return;
        }

        self.handle_input(&input);

        match self.state {
            SceneState::PreLoad => self.load(),
            SceneState::Start => self.update_start(dt),
            SceneState::Playing => self.update_playing(dt),
            SceneState::WaveClear => self.update_wave_clear(dt),
            SceneState::StageClear => self.update_stage_clear(dt),
            SceneState::Result => self.update_result(dt),
            SceneState::Sleep => self.update_sleep(dt),
            SceneState::GameOver | SceneState::Pause | SceneState::QuitMenu => {}
        }

        self.sweep_visuals();
    }

    fn handle_input(&mut self, input: &TickInput) {
        match self.state {
            SceneState::Start
            | SceneState::Playing
            | SceneState::WaveClear
            | SceneState::StageClear => {
                if let Some((vx, vy)) = input.velocity {
                    self.player.set_velocity(vx, vy);
                }
                if matches!(self.state, SceneState::Playing | SceneState::WaveClear) {
                    for _ in 0..input.fire {
                        self.fire_player_shot();
                    }
                    if input.pause {
                        self.pause();
                    } else if input.quit_menu {
                        self.view_quit_menu();
                    }
                }
            }
            SceneState::Pause => {
                if input.resume || input.pause {
                    self.resume();
                }
            }
            SceneState::QuitMenu => {
                if input.quit_confirm {
                    self.exec_quit_menu();
                } else if input.quit_cancel {
                    self.cancel_quit_menu();
                }
            }
            SceneState::Result => {
                if input.confirm {
                    self.skip_result();
                }
            }
            _ => {}
        }
    }

    fn load(&mut self) {
        self.reset_all();
        log::info!("Stage {} start", self.stage);
        self.state = SceneState::Start;
    }

    // === State updates ===

    /// Count down the stage intro, then start the first wave
    pub fn update_start(&mut self, dt: f32) {
        self.state_interval -= dt;
        if self.state_interval <= 0.0 {
            self.wave = 1;
            self.read_script(self.stage, self.wave);
            self.state = SceneState::Playing;
        }
    }

    /// Spawn from the script, run the world, detect misses and wave clear
    pub fn update_playing(&mut self, dt: f32) {
        self.play_time += dt;

        let mut due = std::mem::take(&mut self.cursor);
        due.advance(dt, |record| {
            self.entry_enemy(record.kind, Vec2::new(record.x, record.y), record.angle);
        });
        self.cursor = due;

        self.step_world(dt);
        if self.state != SceneState::Playing {
            return;
        }

        if self.cursor.is_exhausted() && self.enemies.active_count() == 0 {
            self.clear_wave();
        }
    }

    /// Keep the world running through the gap between waves
    pub fn update_wave_clear(&mut self, dt: f32) {
        self.play_time += dt;
        self.step_world(dt);
        if self.state != SceneState::WaveClear {
            return;
        }

        self.state_interval -= dt;
        if self.state_interval <= 0.0 {
            self.wave += 1;
            self.read_script(self.stage, self.wave);
            self.state = SceneState::Playing;
        }
    }

    /// Let the last shots and explosions play out, then show the tally
    pub fn update_stage_clear(&mut self, dt: f32) {
        self.player.update(dt);
        self.follow_player();
        self.player_shots.for_each_active(|_, shot| shot.update(dt));
        self.effects.for_each_active(|_, effect| effect.update(dt));

        self.state_interval -= dt;
        if self.state_interval <= 0.0 {
            self.result.set_parameters(
                self.stage,
                self.score,
                self.play_time as u32,
                self.hit_rate(),
                self.life.max(0) as u32,
                self.enemy_count,
            );
            self.state_interval = self.config.next_stage_delay;
            self.state = SceneState::Result;
        }
    }

    /// Run the tally, banking each bonus step as it counts up; once it is
    /// done, move to the next stage or finish
    pub fn update_result(&mut self, dt: f32) {
        if !self.result.is_finished() {
            let counted = self.result.update(dt);
            self.add_score(counted);
            return;
        }

        self.state_interval -= dt;
        if self.state_interval > 0.0 {
            return;
        }

        if self.stage >= self.scripts.stage_count() {
            log::info!("All stages cleared, final score {}", self.score);
            self.write_hi_score();
            self.exit = Some(SceneExit::AllStagesCleared);
            return;
        }

        self.stage += 1;
        self.reset_all();
        log::info!("Stage {} start", self.stage);
        self.state = SceneState::Start;
    }

    pub fn update_sleep(&mut self, dt: f32) {
        self.sleep_interval -= dt;
        if self.sleep_interval <= 0.0 {
            self.state = self.wake_state;
        }
    }

    /// Player, shots, enemies and effects for one frame, then collisions
    fn step_world(&mut self, dt: f32) {
        if !self.player.entity.staged && self.life >= 0 {
            self.rebirth_interval -= dt;
            if self.rebirth_interval <= 0.0 {
                self.respawn_player(true);
            }
        }

        self.player.update(dt);
        self.follow_player();
        self.player_shots.for_each_active(|_, shot| shot.update(dt));

        let player_pos = self.player_pos();
        let commands = &mut self.commands;
        self.enemies.for_each_active(|_, enemy| {
            let mut ctx = EnemyContext {
                player_pos,
                commands: &mut *commands,
            };
            enemy.update(dt, &mut ctx);
        });
        self.apply_enemy_commands();

        self.enemy_shots.for_each_active(|_, shot| shot.update(dt));
        self.effects.for_each_active(|_, effect| effect.update(dt));

        let commands = &mut self.commands;
        let hits = resolve_shots(&mut self.player_shots, &mut self.enemies, |_, enemy| {
            if enemy.entity.is_dead() {
                let mut ctx = EnemyContext {
                    player_pos,
                    commands: &mut *commands,
                };
                enemy.destroy(&mut ctx);
            }
        });
        self.hit_count += hits;
        self.apply_enemy_commands();

        resolve_shots_vs_player(&mut self.enemy_shots, &mut self.player);

        let player = &self.player.entity;
        self.radar
            .update(&self.enemies, player.pos, player.angle, &self.background);

        if self.player.entity.staged && self.player.entity.is_dead() {
            self.miss();
        }
    }

    fn apply_enemy_commands(&mut self) {
        let mut commands = std::mem::take(&mut self.commands);
        for command in commands.drain(..) {
            match command {
                EnemyCommand::FireShot { pos, angle } => {
                    self.fire_enemy_shot(pos, angle);
                }
                EnemyCommand::AddScore(points) => self.add_score(points),
                EnemyCommand::Explosion { pos } => {
                    self.entry_effect(pos);
                }
            }
        }
        self.commands = commands;
    }

    // === Transitions ===

    /// The player was shot down
    pub fn miss(&mut self) {
        if !matches!(self.state, SceneState::Playing | SceneState::WaveClear) {
            return;
        }

        let pos = self.player.entity.pos;
        self.player.entity.destroy();
        self.player.velocity = Vec2::ZERO;
        self.detach_player();
        self.entry_effect(pos);

        self.life -= 1;
        self.miss_count += 1;
        self.events.push(GameEvent::LifeLost {
            remaining: self.life,
        });

        if self.life < 0 {
            log::info!("Game over, score {}", self.score);
            self.state = SceneState::GameOver;
            self.write_hi_score();
            self.events.push(GameEvent::GameOver { score: self.score });
            self.exit = Some(SceneExit::GameOver);
        } else {
            log::info!("Player down, {} lives left", self.life);
            self.rebirth_interval = self.config.rebirth_delay;
        }
    }

    /// Current wave is done: queue the next one or finish the stage
    pub fn clear_wave(&mut self) {
        log::info!("Stage {} wave {} cleared", self.stage, self.wave);
        self.events.push(GameEvent::WaveCleared {
            stage: self.stage,
            wave: self.wave,
        });

        if self.wave < self.scripts.wave_count(self.stage) {
            self.state_interval = self.config.wave_interval;
            self.state = SceneState::WaveClear;
        } else {
            self.clear_stage();
        }
    }

    /// Every wave of the stage is done
    pub fn clear_stage(&mut self) {
        let time_secs = self.play_time as u32;
        let hit_rate = self.hit_rate();
        log::info!(
            "Stage {} cleared in {time_secs}s, hit rate {hit_rate}%",
            self.stage
        );

        self.enemy_shots.reset();
        self.events.push(GameEvent::StageCleared {
            stage: self.stage,
            time_secs,
            hit_rate,
        });
        self.write_hi_score();

        self.state_interval = self.config.stage_clear_delay;
        self.state = SceneState::StageClear;
    }

    pub fn pause(&mut self) {
        if matches!(self.state, SceneState::Playing | SceneState::WaveClear) {
            log::info!("Paused");
            self.resume_state = self.state;
            self.state = SceneState::Pause;
        }
    }

    pub fn resume(&mut self) {
        if self.state == SceneState::Pause {
            log::info!("Resumed");
            self.state = self.resume_state;
        }
    }

    /// Hold the scene for `duration` seconds, then return to the current state
    pub fn sleep(&mut self, duration: f32) {
        if matches!(
            self.state,
            SceneState::Start
                | SceneState::Playing
                | SceneState::WaveClear
                | SceneState::StageClear
                | SceneState::Result
        ) {
            self.wake_state = self.state;
            self.sleep_interval = duration;
            self.state = SceneState::Sleep;
        }
    }

    pub fn view_quit_menu(&mut self) {
        if matches!(self.state, SceneState::Playing | SceneState::WaveClear) {
            self.resume_state = self.state;
            self.state = SceneState::QuitMenu;
        }
    }

    pub fn exec_quit_menu(&mut self) {
        if self.state == SceneState::QuitMenu {
            log::info!("Quit at stage {}, score {}", self.stage, self.score);
            self.write_hi_score();
            self.exit = Some(SceneExit::Quit);
        }
    }

    pub fn cancel_quit_menu(&mut self) {
        if self.state == SceneState::QuitMenu {
            self.state = self.resume_state;
        }
    }

    /// Jump the result tally to its end
    pub fn skip_result(&mut self) {
        if self.state == SceneState::Result {
            let rest = self.result.finish();
            self.add_score(rest);
        }
    }

    /// Fresh pools, player and per-stage counters. Lives and score carry over.
    pub fn reset_all(&mut self) {
        self.player_shots.reset();
        self.enemies.reset();
        self.enemy_shots.reset();
        self.effects.reset();
        self.commands.clear();
        self.cursor.clear();

        self.wave = 0;
        self.shot_count = 0;
        self.hit_count = 0;
        self.enemy_count = 0;
        self.play_time = 0.0;
        self.rebirth_interval = 0.0;
        self.state_interval = self.config.start_delay;

        self.respawn_player(false);
    }

    // === Entity entry points ===

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.score > self.hiscore {
            self.hiscore = self.score;
            if !self.new_record {
                self.new_record = true;
                self.events.push(GameEvent::NewHighScore { score: self.score });
            }
        }
    }

    /// Fire from the player's nose. Returns false if the player is down or
    /// the shot pool is full.
    pub fn fire_player_shot(&mut self) -> bool {
        if !self.player.entity.staged {
            return false;
        }
        let Some((handle, shot)) = self.player_shots.acquire() else {
            log::debug!("Player shot dropped, pool full");
            return false;
        };
        shot.launch_player(self.player.entity.pos, self.player.entity.angle);
        let entity = &shot.entity;
        let event = attach(PoolKind::PlayerShot, handle, entity.pos, entity.screen_angle());
        self.events.push(event);
        self.shot_count += 1;
        true
    }

    pub fn fire_enemy_shot(&mut self, pos: Vec2, angle: f32) -> Option<Handle> {
        let Some((handle, shot)) = self.enemy_shots.acquire() else {
            log::debug!("Enemy shot dropped, pool full");
            return None;
        };
        shot.launch_enemy(pos, angle);
        let event = attach(PoolKind::EnemyShot, handle, pos, shot.entity.screen_angle());
        self.events.push(event);
        Some(handle)
    }

    pub fn entry_enemy(&mut self, kind: EnemyKind, pos: Vec2, angle: f32) -> Option<Handle> {
        let Some((handle, enemy)) = self.enemies.acquire() else {
            log::debug!("{} spawn dropped, pool full", kind.as_str());
            return None;
        };
        enemy.spawn(kind, pos, angle);
        let event = attach(PoolKind::Enemy, handle, pos, enemy.entity.screen_angle());
        self.events.push(event);
        self.enemy_count += 1;
        Some(handle)
    }

    pub fn entry_effect(&mut self, pos: Vec2) -> Option<Handle> {
        let Some((handle, effect)) = self.effects.acquire() else {
            log::debug!("Explosion dropped, pool full");
            return None;
        };
        effect.start(pos, EXPLOSION_FRAMES, EXPLOSION_FRAME_DELAY);
        self.events.push(attach(PoolKind::Effect, handle, pos, 0.0));
        Some(handle)
    }

    /// Load a wave into the spawn cursor. A missing wave loads as empty.
    pub fn read_script(&mut self, stage: u32, wave: u32) {
        let script = self.scripts.wave(stage, wave).unwrap_or_else(|| {
            log::warn!("No script for stage {stage} wave {wave}");
            Default::default()
        });
        log::info!("Stage {stage} wave {wave}: {} spawns", script.len());
        self.cursor.load(script);
    }

    pub fn read_hi_score(&mut self) {
        self.hiscore = load_hiscore(&mut self.store);
    }

    /// Persist the high score if this session beat it. Failures are logged.
    pub fn write_hi_score(&mut self) {
        if !self.new_record {
            return;
        }
        if let Err(e) = self.store.write(&HiScoreRecord::new(self.hiscore)) {
            log::warn!("Failed to save high score: {e}");
        }
    }

    /// Percentage of player shots that hit, this stage
    pub fn hit_rate(&self) -> u32 {
        if self.shot_count == 0 {
            return 0;
        }
        (self.hit_count * 100 / self.shot_count).min(100)
    }

    // === Visual bookkeeping ===

    fn player_ref(&self) -> EntityRef {
        EntityRef {
            pool: PoolKind::Player,
            handle: Handle {
                slot: 0,
                generation: self.player_generation,
            },
        }
    }

    fn player_pos(&self) -> Option<Vec2> {
        self.player.entity.staged.then_some(self.player.entity.pos)
    }

    fn detach_player(&mut self) {
        self.events.push(GameEvent::DetachVisual {
            entity: self.player_ref(),
        });
    }

    fn respawn_player(&mut self, invincible: bool) {
        if self.player.entity.staged {
            self.detach_player();
        }
        if invincible {
            self.player.rebirth(self.config.invincible_time);
        } else {
            self.player.reset();
        }
        self.player_generation = self.player_generation.wrapping_add(1);
        self.follow_player();

        let entity = &self.player.entity;
        self.events.push(GameEvent::AttachVisual {
            entity: self.player_ref(),
            x: entity.pos.x,
            y: entity.pos.y,
            angle: entity.screen_angle(),
        });
    }

    /// Scroll the view to keep the ship at its screen position. The view
    /// holds still while the player is down.
    fn follow_player(&mut self) {
        if self.player.entity.staged {
            self.background
                .move_with_screen(self.player.entity.pos, self.player.screen_pos());
        }
    }

    fn sweep_visuals(&mut self) {
        let events = &mut self.events;
        self.player_shots
            .sweep(|handle| events.push(detach(PoolKind::PlayerShot, handle)));
        self.enemies
            .sweep(|handle| events.push(detach(PoolKind::Enemy, handle)));
        self.enemy_shots
            .sweep(|handle| events.push(detach(PoolKind::EnemyShot, handle)));
        self.effects
            .sweep(|handle| events.push(detach(PoolKind::Effect, handle)));
    }

    // === Accessors ===

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn exit(&self) -> Option<SceneExit> {
        self.exit
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn hiscore(&self) -> u64 {
        self.hiscore
    }

    pub fn shot_count(&self) -> u32 {
        self.shot_count
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    pub fn enemy_count(&self) -> u32 {
        self.enemy_count
    }

    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_shots(&self) -> &Pool<Shot> {
        &self.player_shots
    }

    pub fn enemies(&self) -> &Pool<Enemy> {
        &self.enemies
    }

    pub fn enemy_shots(&self) -> &Pool<Shot> {
        &self.enemy_shots
    }

    pub fn effects(&self) -> &Pool<Effect> {
        &self.effects
    }

    /// The scrolling view; maps world positions from events onto the screen
    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn radar(&self) -> &Radar {
        &self.radar
    }

    pub fn result(&self) -> &ResultCalculator {
        &self.result
    }

    /// Spawn progress through the current wave
    pub fn script_cursor(&self) -> &ScriptCursor {
        &self.cursor
    }

    pub fn store(&self) -> &H {
        &self.store
    }
}

fn attach(pool: PoolKind, handle: Handle, pos: Vec2, angle: f32) -> GameEvent {
    GameEvent::AttachVisual {
        entity: EntityRef { pool, handle },
        x: pos.x,
        y: pos.y,
        angle,
    }
}

fn detach(pool: PoolKind, handle: Handle) -> GameEvent {
    GameEvent::DetachVisual {
        entity: EntityRef { pool, handle },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::highscores::MemoryStore;
    use crate::sim::result::ResultPhase;
    use crate::sim::script::{SpawnRecord, WaveScript};

    /// Fixed waves per stage, for driving the scene precisely
    struct Scripted(Vec<Vec<WaveScript>>);

    impl ScriptSource for Scripted {
        fn wave(&self, stage: u32, wave: u32) -> Option<WaveScript> {
            self.0
                .get(stage as usize - 1)?
                .get(wave as usize - 1)
                .cloned()
        }
        fn wave_count(&self, stage: u32) -> u32 {
            self.0.get(stage as usize - 1).map_or(0, |w| w.len() as u32)
        }
        fn stage_count(&self) -> u32 {
            self.0.len() as u32
        }
    }

    fn one_enemy(kind: EnemyKind, x: f32, y: f32, angle: f32) -> WaveScript {
        WaveScript {
            records: vec![SpawnRecord {
                kind,
                x,
                y,
                angle,
                delay: 0.0,
            }],
        }
    }

    fn scene(waves: Vec<Vec<WaveScript>>) -> GameScene<MemoryStore> {
        GameScene::new(
            GameConfig::default(),
            Box::new(Scripted(waves)),
            MemoryStore::new(),
        )
    }

    fn run_until(scene: &mut GameScene<MemoryStore>, state: SceneState, max_frames: usize) {
        for _ in 0..max_frames {
            if scene.state() == state {
                return;
            }
            scene.tick(SIM_DT);
        }
        assert_eq!(scene.state(), state, "state not reached");
    }

    #[test]
    fn test_preload_then_start_then_playing() {
        let mut scene = scene(vec![vec![WaveScript::default()]]);
        assert_eq!(scene.state(), SceneState::PreLoad);
        scene.tick(SIM_DT);
        assert_eq!(scene.state(), SceneState::Start);
        assert!(scene.player().entity.staged);

        run_until(&mut scene, SceneState::Playing, 200);
        assert_eq!(scene.wave(), 1);
    }

    #[test]
    fn test_miss_at_zero_lives_is_game_over_once() {
        let mut scene = scene(vec![vec![one_enemy(EnemyKind::Normal, 100.0, 100.0, 0.0)]]);
        scene.life = 0;
        run_until(&mut scene, SceneState::Playing, 200);
        scene.tick(SIM_DT);
        scene.events.clear();

        scene.player.entity.hit_point = 0;
        scene.tick(SIM_DT);
        assert_eq!(scene.state(), SceneState::GameOver);
        assert_eq!(scene.exit(), Some(SceneExit::GameOver));
        assert_eq!(scene.life(), -1);

        let enemy_pos = scene.enemies().slot(0).entity.pos;
        for _ in 0..120 {
            scene.queue_input(InputEvent::Pause);
            scene.tick(SIM_DT);
        }
        assert_eq!(scene.state(), SceneState::GameOver);
        assert_eq!(scene.enemies().slot(0).entity.pos, enemy_pos);
        let overs = scene
            .drain_events()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_miss_with_lives_respawns_invincible() {
        let mut scene = scene(vec![vec![one_enemy(EnemyKind::Normal, 100.0, 100.0, 0.0)]]);
        run_until(&mut scene, SceneState::Playing, 200);
        scene.tick(SIM_DT);

        scene.player.entity.hit_point = 0;
        scene.tick(SIM_DT);
        assert_eq!(scene.life(), 1);
        assert_eq!(scene.state(), SceneState::Playing);
        assert!(!scene.player().entity.staged);

        let frames = (scene.config().rebirth_delay / SIM_DT) as usize + 2;
        for _ in 0..frames {
            scene.tick(SIM_DT);
        }
        assert!(scene.player().entity.staged);
        assert!(scene.player().invincible);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut scene = scene(vec![vec![one_enemy(EnemyKind::Normal, 100.0, 100.0, 0.0)]]);
        // Resume outside pause is a no-op
        scene.resume();
        assert_eq!(scene.state(), SceneState::PreLoad);

        run_until(&mut scene, SceneState::Playing, 200);
        scene.queue_input(InputEvent::Pause);
        scene.tick(SIM_DT);
        assert_eq!(scene.state(), SceneState::Pause);

        let time = scene.play_time();
        scene.tick(SIM_DT);
        assert_eq!(scene.play_time(), time);

        scene.queue_input(InputEvent::Resume);
        scene.tick(SIM_DT);
        assert_eq!(scene.state(), SceneState::Playing);
        assert!(scene.play_time() > time);
    }

    #[test]
    fn test_quit_menu() {
        let mut scene = scene(vec![vec![one_enemy(EnemyKind::Normal, 100.0, 100.0, 0.0)]]);
        run_until(&mut scene, SceneState::Playing, 200);

        scene.queue_input(InputEvent::QuitMenu);
        scene.tick(SIM_DT);
        assert_eq!(scene.state(), SceneState::QuitMenu);
        scene.queue_input(InputEvent::QuitCancel);
        scene.tick(SIM_DT);
        assert_eq!(scene.state(), SceneState::Playing);

        scene.view_quit_menu();
        scene.exec_quit_menu();
        assert_eq!(scene.exit(), Some(SceneExit::Quit));
    }

    #[test]
    fn test_sleep_returns_to_interrupted_state() {
        let mut scene = scene(vec![vec![one_enemy(EnemyKind::Normal, 100.0, 100.0, 0.0)]]);
        run_until(&mut scene, SceneState::Playing, 200);
        scene.sleep(0.1);
        assert_eq!(scene.state(), SceneState::Sleep);
        for _ in 0..10 {
            scene.tick(SIM_DT);
        }
        assert_eq!(scene.state(), SceneState::Playing);

        scene.pause();
        scene.sleep(1.0);
        assert_eq!(scene.state(), SceneState::Pause);
    }

    #[test]
    fn test_wave_then_stage_clear_then_result() {
        let mut scene = scene(vec![
            vec![WaveScript::default(), WaveScript::default()],
            vec![WaveScript::default()],
        ]);
        run_until(&mut scene, SceneState::WaveClear, 200);
        assert_eq!(scene.wave(), 1);
        run_until(&mut scene, SceneState::StageClear, 400);
        assert_eq!(scene.wave(), 2);
        run_until(&mut scene, SceneState::Result, 400);

        scene.queue_input(InputEvent::Confirm);
        scene.tick(SIM_DT);
        assert!(scene.result().is_finished());

        run_until(&mut scene, SceneState::Start, 200);
        assert_eq!(scene.stage(), 2);
        // Lives left over become rest bonus
        assert_eq!(scene.score(), 2 * 1000);

        run_until(&mut scene, SceneState::Result, 1000);
        for _ in 0..2000 {
            if scene.exit().is_some() {
                break;
            }
            scene.tick(SIM_DT);
        }
        assert_eq!(scene.exit(), Some(SceneExit::AllStagesCleared));
        assert_eq!(scene.store().writes, 2);
    }

    #[test]
    fn test_spawn_and_detach_events() {
        let mut scene = scene(vec![vec![one_enemy(EnemyKind::Normal, 100.0, 100.0, 0.0)]]);
        run_until(&mut scene, SceneState::Playing, 200);
        scene.tick(SIM_DT);

        let attached: Vec<_> = scene
            .drain_events()
            .filter_map(|e| match e {
                GameEvent::AttachVisual { entity, .. } => Some(entity.pool),
                _ => None,
            })
            .collect();
        assert_eq!(attached, vec![PoolKind::Player, PoolKind::Enemy]);

        scene.enemies.release(0);
        scene.tick(SIM_DT);
        let detached = scene
            .drain_events()
            .filter(|e| {
                matches!(e, GameEvent::DetachVisual { entity } if entity.pool == PoolKind::Enemy)
            })
            .count();
        assert_eq!(detached, 1);
    }

    #[test]
    fn test_hiscore_read_at_construction() {
        let scene = GameScene::new(
            GameConfig::default(),
            Box::new(Scripted(vec![])),
            MemoryStore::with_record(HiScoreRecord::new(777)),
        );
        assert_eq!(scene.state(), SceneState::PreLoad);
        assert_eq!(scene.hiscore(), 777);
    }

    #[test]
    fn test_score_rises_during_time_bonus() {
        let mut scene = scene(vec![vec![WaveScript::default()]]);
        run_until(&mut scene, SceneState::StageClear, 400);
        // Ten enemies cleared in no time: 400 points of time bonus
        scene.enemy_count = 10;
        run_until(&mut scene, SceneState::Result, 400);
        assert_eq!(scene.score(), 0);

        for _ in 0..600 {
            if scene.result().phase() == ResultPhase::TimeBonus {
                break;
            }
            scene.tick(SIM_DT);
        }
        for _ in 0..5 {
            scene.tick(SIM_DT);
        }
        assert_eq!(scene.result().phase(), ResultPhase::TimeBonus);
        assert!(scene.score() > 0 && scene.score() < 400);
        assert_eq!(scene.score(), scene.result().score());
        assert_eq!(scene.hiscore(), scene.score());

        let records = scene
            .drain_events()
            .filter(|e| matches!(e, GameEvent::NewHighScore { .. }))
            .count();
        assert_eq!(records, 1);
    }

    #[test]
    fn test_view_follows_player() {
        let mut scene = scene(vec![vec![one_enemy(EnemyKind::Normal, 100.0, 100.0, 0.0)]]);
        scene.tick(SIM_DT);
        let start = scene.player().entity.pos;
        let seen = scene.background().to_screen(start);
        assert!((seen - scene.player().screen_pos()).length() < 1e-3);

        run_until(&mut scene, SceneState::Playing, 200);
        for _ in 0..30 {
            scene.queue_input(InputEvent::Velocity { vx: 1.0, vy: 0.0 });
            scene.tick(SIM_DT);
        }
        let player = scene.player();
        assert_ne!(player.entity.pos, start);
        assert_ne!(player.screen_pos(), Vec2::new(240.0, 160.0));
        let seen = scene.background().to_screen(player.entity.pos);
        assert!((seen - player.screen_pos()).length() < 1e-3);
    }

    #[test]
    fn test_hit_rate() {
        let mut scene = scene(vec![vec![WaveScript::default()]]);
        assert_eq!(scene.hit_rate(), 0);
        scene.shot_count = 4;
        scene.hit_count = 3;
        assert_eq!(scene.hit_rate(), 75);
    }

    #[test]
    fn test_exhausted_pool_drops_spawn() {
        let mut scene = GameScene::new(
            GameConfig {
                enemy_capacity: 1,
                ..Default::default()
            },
            Box::new(Scripted(vec![vec![WaveScript::default()]])),
            MemoryStore::new(),
        );
        assert!(scene.entry_enemy(EnemyKind::Normal, Vec2::ZERO, 0.0).is_some());
        assert!(scene.entry_enemy(EnemyKind::Normal, Vec2::ZERO, 0.0).is_none());
        assert_eq!(scene.enemy_count(), 1);
        assert_eq!(scene.enemies().dropped_count(), 1);
    }
}
