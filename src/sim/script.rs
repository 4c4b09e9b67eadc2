//! Enemy spawn scripts
//!
//! A wave is an ordered list of spawn records. Each record waits `delay`
//! seconds after the previous one, then places one enemy. The scene walks a
//! wave with a [`ScriptCursor`] and does not care where the records came from:
//! built-in text tables, a file, or the procedural generator.
//!
//! Text format, one record per line, `#` starts a comment:
//!
//! ```text
//! # kind, x, y, angle (degrees), delay (seconds)
//! normal, 200, 800, 270, 0.5
//! ```
//!
//! Positions are world coordinates. Angles use the heading convention
//! (0 = +x, counter-clockwise positive).

use rand::Rng;
use rand_pcg::Pcg32;

use super::enemy::EnemyKind;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::error::ScriptError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRecord {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    /// Initial heading in radians
    pub angle: f32,
    /// Seconds after the previous record
    pub delay: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveScript {
    pub records: Vec<SpawnRecord>,
}

impl WaveScript {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Supplies waves per stage. Stages and waves are numbered from 1.
pub trait ScriptSource {
    fn wave(&self, stage: u32, wave: u32) -> Option<WaveScript>;
    fn wave_count(&self, stage: u32) -> u32;
    fn stage_count(&self) -> u32;
}

/// Parse one non-comment line
pub fn parse_record(line_no: usize, line: &str) -> Result<SpawnRecord, ScriptError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 5 {
        return Err(ScriptError::FieldCount {
            line: line_no,
            found: fields.len(),
        });
    }

    let kind = EnemyKind::from_name(fields[0]).ok_or_else(|| ScriptError::UnknownKind {
        line: line_no,
        name: fields[0].to_string(),
    })?;

    let number = |idx: usize, field: &'static str| -> Result<f32, ScriptError> {
        fields[idx]
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(ScriptError::BadNumber {
                line: line_no,
                field,
            })
    };

    let delay = number(4, "delay")?;
    if delay < 0.0 {
        return Err(ScriptError::BadNumber {
            line: line_no,
            field: "delay",
        });
    }

    Ok(SpawnRecord {
        kind,
        x: number(1, "x")?,
        y: number(2, "y")?,
        angle: number(3, "angle")?.to_radians(),
        delay,
    })
}

/// Parse a whole wave. Malformed lines are logged and skipped; the second
/// value is how many were skipped.
pub fn parse_wave(text: &str) -> (WaveScript, usize) {
    let mut script = WaveScript::default();
    let mut skipped = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        match parse_record(idx + 1, line) {
            Ok(record) => script.records.push(record),
            Err(e) => {
                log::warn!("Skipping spawn record: {e}");
                skipped += 1;
            }
        }
    }

    (script, skipped)
}

const STAGE1: [&str; 3] = [
    "# first contact\n\
     normal, 512, 900, 270, 0.5\n\
     normal, 300, 850, 300, 1.0\n\
     normal, 724, 850, 240, 0.0\n",
    "normal, 100, 512, 0, 0.5\n\
     normal, 924, 512, 180, 0.0\n\
     high_speed, 512, 100, 90, 1.5\n",
    "high_turn, 200, 200, 45, 0.5\n\
     high_turn, 824, 824, 225, 0.0\n\
     normal, 512, 950, 270, 1.0\n\
     normal, 512, 74, 90, 0.0\n",
];

const STAGE2: [&str; 3] = [
    "high_shot, 512, 900, 270, 0.5\n\
     normal, 200, 900, 300, 0.5\n\
     normal, 824, 900, 240, 0.0\n",
    "three_way, 150, 512, 0, 0.5\n\
     high_speed, 874, 200, 135, 1.0\n\
     high_speed, 874, 824, 225, 0.0\n",
    "high_shot, 100, 100, 45, 0.5\n\
     high_shot, 924, 924, 225, 0.5\n\
     three_way, 512, 950, 270, 1.0\n\
     high_turn, 512, 74, 90, 0.0\n",
];

const STAGE3: [&str; 3] = [
    "three_way, 300, 850, 300, 0.5\n\
     three_way, 724, 850, 240, 0.0\n\
     high_shot, 512, 74, 90, 1.0\n",
    "high_speed, 100, 512, 0, 0.5\n\
     high_speed, 924, 512, 180, 0.0\n\
     high_turn, 512, 100, 90, 0.5\n\
     high_turn, 512, 924, 270, 0.0\n\
     three_way, 200, 200, 45, 1.0\n",
    "# boss wave\n\
     cannon, 512, 900, 270, 1.0\n\
     normal, 300, 900, 270, 2.0\n\
     normal, 724, 900, 270, 0.0\n\
     high_shot, 512, 74, 90, 2.0\n",
];

const EMBEDDED: [[&str; 3]; 3] = [STAGE1, STAGE2, STAGE3];

/// Built-in three-stage campaign
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedScripts;

impl ScriptSource for EmbeddedScripts {
    fn wave(&self, stage: u32, wave: u32) -> Option<WaveScript> {
        let text = EMBEDDED
            .get((stage as usize).checked_sub(1)?)?
            .get((wave as usize).checked_sub(1)?)?;
        Some(parse_wave(text).0)
    }

    fn wave_count(&self, stage: u32) -> u32 {
        match stage {
            1..=3 => EMBEDDED[stage as usize - 1].len() as u32,
            _ => 0,
        }
    }

    fn stage_count(&self) -> u32 {
        EMBEDDED.len() as u32
    }
}

/// Seeded random waves that grow with the stage number
#[derive(Debug, Clone)]
pub struct ProceduralScripts {
    seed: u64,
    stages: u32,
    waves_per_stage: u32,
}

impl ProceduralScripts {
    pub fn new(seed: u64, stages: u32) -> Self {
        Self {
            seed,
            stages: stages.max(1),
            waves_per_stage: 3,
        }
    }

    /// Kinds unlock as stages progress; the cannon only shows up in the last
    /// wave of a stage from stage 3 on.
    fn pick_kind(rng: &mut Pcg32, stage: u32) -> EnemyKind {
        let unlocked = (2 + stage as usize).min(EnemyKind::ALL.len() - 1);
        EnemyKind::ALL[rng.random_range(0..unlocked)]
    }
}

impl ScriptSource for ProceduralScripts {
    fn wave(&self, stage: u32, wave: u32) -> Option<WaveScript> {
        if stage == 0 || stage > self.stages || wave == 0 || wave > self.waves_per_stage {
            return None;
        }

        // Each wave gets its own stream so waves are reproducible in isolation
        let stream = (u64::from(stage) << 32) | u64::from(wave);
        let mut rng = Pcg32::new(self.seed, stream);

        let count = 2 + stage + wave + rng.random_range(0..2);
        let mut records = Vec::with_capacity(count as usize + 1);
        for i in 0..count {
            records.push(SpawnRecord {
                kind: Self::pick_kind(&mut rng, stage),
                x: rng.random_range(0.0..WORLD_WIDTH),
                y: rng.random_range(0.0..WORLD_HEIGHT),
                angle: rng.random_range(-std::f32::consts::PI..std::f32::consts::PI),
                delay: if i == 0 { 0.5 } else { rng.random_range(0.0..1.5) },
            });
        }

        if stage >= 3 && wave == self.waves_per_stage {
            records.push(SpawnRecord {
                kind: EnemyKind::Cannon,
                x: WORLD_WIDTH / 2.0,
                y: rng.random_range(0.0..WORLD_HEIGHT),
                angle: 0.0,
                delay: 1.0,
            });
        }

        Some(WaveScript { records })
    }

    fn wave_count(&self, stage: u32) -> u32 {
        if (1..=self.stages).contains(&stage) {
            self.waves_per_stage
        } else {
            0
        }
    }

    fn stage_count(&self) -> u32 {
        self.stages
    }
}

/// Walks one wave, releasing records as their delays elapse
#[derive(Debug, Clone, Default)]
pub struct ScriptCursor {
    script: WaveScript,
    index: usize,
    wait: f32,
}

impl ScriptCursor {
    /// Start walking `script` from its first record
    pub fn load(&mut self, script: WaveScript) {
        self.wait = script.records.first().map_or(0.0, |r| r.delay);
        self.script = script;
        self.index = 0;
    }

    /// Forget the current wave
    pub fn clear(&mut self) {
        self.script.records.clear();
        self.index = 0;
        self.wait = 0.0;
    }

    /// Advance the clock and hand every record that is due to `spawn`, in
    /// script order
    pub fn advance(&mut self, dt: f32, mut spawn: impl FnMut(&SpawnRecord)) {
        if self.is_exhausted() {
            return;
        }
        self.wait -= dt;
        while self.wait <= 0.0 {
            let Some(record) = self.script.records.get(self.index) else {
                break;
            };
            spawn(record);
            self.index += 1;
            match self.script.records.get(self.index) {
                Some(next) => self.wait += next.delay,
                None => break,
            }
        }
    }

    /// Every record has been released
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.script.records.len()
    }

    /// Records in the loaded wave
    pub fn total(&self) -> usize {
        self.script.records.len()
    }
}
