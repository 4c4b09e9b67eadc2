//! Stage result tally
//!
//! After a stage clear the result screen reveals the clear time, hit rate and
//! remaining lives one at a time, then counts each bonus up into the score in
//! fixed increments. Skipping jumps straight to the end and lands on the same
//! score as watching it through.

/// Reveal/count-up phases, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultPhase {
    #[default]
    ScoreView,
    TimeView,
    HitView,
    RestView,
    TimeBonus,
    HitBonus,
    RestBonus,
    Finish,
}

/// Pause after each reveal
pub const VIEW_WAIT: f32 = 0.5;
/// Seconds between bonus count-up steps
pub const BONUS_STEP: f32 = 0.02;
/// Pause after a bonus reaches its target
pub const BONUS_WAIT: f32 = 0.5;

/// Seconds per enemy allowed before the time bonus runs out
pub const TIME_PER_ENEMY: i64 = 4;
pub const TIME_BONUS_RATE: i64 = 10;
pub const HIT_BONUS_RATE: u64 = 20;
pub const REST_BONUS_RATE: u64 = 1000;

pub const TIME_BONUS_STEP: u64 = 10;
pub const HIT_BONUS_STEP: u64 = 20;
pub const REST_BONUS_STEP: u64 = 100;

/// One bonus line: shown value and where it is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bonus {
    pub value: u64,
    pub target: u64,
}

impl Bonus {
    fn new(target: u64) -> Self {
        Self { value: 0, target }
    }

    /// Count up by at most `step`; returns the amount actually added
    fn step(&mut self, step: u64) -> u64 {
        let added = step.min(self.target - self.value);
        self.value += added;
        added
    }

    fn is_done(&self) -> bool {
        self.value >= self.target
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultCalculator {
    phase: ResultPhase,
    stage: u32,
    /// Running score shown on screen, bonuses included as they count up
    score: u64,
    time_secs: u32,
    hit_rate: u32,
    rest: u32,
    time_bonus: Bonus,
    hit_bonus: Bonus,
    rest_bonus: Bonus,
    delay: f32,
}

/// `max(0, enemy_count * 4 - time) * 10`
pub fn time_bonus(time_secs: u32, enemy_count: u32) -> u64 {
    let allowance = i64::from(enemy_count) * TIME_PER_ENEMY;
    ((allowance - i64::from(time_secs)).max(0) * TIME_BONUS_RATE) as u64
}

impl ResultCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load final stage statistics and restart the reveal
    pub fn set_parameters(
        &mut self,
        stage: u32,
        score: u64,
        time_secs: u32,
        hit_rate: u32,
        rest: u32,
        enemy_count: u32,
    ) {
        *self = Self {
            phase: ResultPhase::ScoreView,
            stage,
            score,
            time_secs,
            hit_rate,
            rest,
            time_bonus: Bonus::new(time_bonus(time_secs, enemy_count)),
            hit_bonus: Bonus::new(u64::from(hit_rate) * HIT_BONUS_RATE),
            rest_bonus: Bonus::new(u64::from(rest) * REST_BONUS_RATE),
            delay: VIEW_WAIT,
        };
        log::debug!(
            "Result stage {stage}: time bonus {}, hit bonus {}, rest bonus {}",
            self.time_bonus.target,
            self.hit_bonus.target,
            self.rest_bonus.target
        );
    }

    /// Advance the reveal. Large `dt` values catch up step by step.
    ///
    /// Returns the bonus points counted up during this call.
    pub fn update(&mut self, dt: f32) -> u64 {
        let before = self.score;
        self.delay -= dt;
        while self.delay <= 0.0 && self.phase != ResultPhase::Finish {
            self.step();
        }
        self.score - before
    }

    fn step(&mut self) {
        use ResultPhase::*;

        match self.phase {
            ScoreView => self.enter(TimeView, VIEW_WAIT),
            TimeView => self.enter(HitView, VIEW_WAIT),
            HitView => self.enter(RestView, VIEW_WAIT),
            RestView => self.enter(TimeBonus, BONUS_STEP),
            TimeBonus => self.count_up(TimeBonus),
            HitBonus => self.count_up(HitBonus),
            RestBonus => self.count_up(RestBonus),
            Finish => {}
        }
    }

    fn enter(&mut self, phase: ResultPhase, wait: f32) {
        self.phase = phase;
        self.delay += wait;
    }

    fn count_up(&mut self, phase: ResultPhase) {
        let (bonus, increment, next) = match phase {
            ResultPhase::TimeBonus => (&mut self.time_bonus, TIME_BONUS_STEP, ResultPhase::HitBonus),
            ResultPhase::HitBonus => (&mut self.hit_bonus, HIT_BONUS_STEP, ResultPhase::RestBonus),
            _ => (&mut self.rest_bonus, REST_BONUS_STEP, ResultPhase::Finish),
        };

        if bonus.is_done() {
            self.enter(next, BONUS_STEP);
            return;
        }

        self.score += bonus.step(increment);
        self.delay += if bonus.is_done() { BONUS_WAIT } else { BONUS_STEP };
    }

    /// Jump every bonus to its target. Returns the points that were still
    /// left to count.
    pub fn finish(&mut self) -> u64 {
        let before = self.score;
        for bonus in [&mut self.time_bonus, &mut self.hit_bonus, &mut self.rest_bonus] {
            self.score += bonus.target - bonus.value;
            bonus.value = bonus.target;
        }
        self.phase = ResultPhase::Finish;
        self.delay = 0.0;
        self.score - before
    }

    pub fn is_finished(&self) -> bool {
        self.phase == ResultPhase::Finish
    }

    pub fn phase(&self) -> ResultPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn time_secs(&self) -> u32 {
        self.time_secs
    }

    pub fn hit_rate(&self) -> u32 {
        self.hit_rate
    }

    pub fn rest(&self) -> u32 {
        self.rest
    }

    pub fn time_bonus(&self) -> Bonus {
        self.time_bonus
    }

    pub fn hit_bonus(&self) -> Bonus {
        self.hit_bonus
    }

    pub fn rest_bonus(&self) -> Bonus {
        self.rest_bonus
    }
}
