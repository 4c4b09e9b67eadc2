//! High-score record and persistence
//!
//! The record is a tiny versioned value object. Storage sits behind
//! [`HiScoreStore`]; the scene treats any read failure (missing file, bad
//! JSON, wrong version) as "no prior score".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// Current record layout version
pub const HISCORE_VERSION: u32 = 1;

/// Persisted high score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiScoreRecord {
    pub version: u32,
    pub hiscore: u64,
}

impl HiScoreRecord {
    pub fn new(hiscore: u64) -> Self {
        Self {
            version: HISCORE_VERSION,
            hiscore,
        }
    }

    /// Check the version tag, turning a mismatch into an error
    pub fn validated(self) -> Result<Self, PersistError> {
        if self.version == HISCORE_VERSION {
            Ok(self)
        } else {
            Err(PersistError::VersionMismatch {
                expected: HISCORE_VERSION,
                found: self.version,
            })
        }
    }
}

impl Default for HiScoreRecord {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Read/write contract for the high-score record
pub trait HiScoreStore {
    fn read(&mut self) -> Result<HiScoreRecord, PersistError>;
    fn write(&mut self, record: &HiScoreRecord) -> Result<(), PersistError>;
}

impl<T: HiScoreStore + ?Sized> HiScoreStore for Box<T> {
    fn read(&mut self) -> Result<HiScoreRecord, PersistError> {
        (**self).read()
    }

    fn write(&mut self, record: &HiScoreRecord) -> Result<(), PersistError> {
        (**self).write(record)
    }
}

/// Load the high score, degrading every failure to 0
pub fn load_hiscore(store: &mut dyn HiScoreStore) -> u64 {
    match store.read().and_then(HiScoreRecord::validated) {
        Ok(record) => {
            log::info!("Loaded high score {}", record.hiscore);
            record.hiscore
        }
        Err(e) => {
            log::warn!("No usable high score ({e}), starting from 0");
            0
        }
    }
}

/// In-memory store (tests, demo runs without a file)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub record: Option<HiScoreRecord>,
    /// Number of successful writes
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: HiScoreRecord) -> Self {
        Self {
            record: Some(record),
            writes: 0,
        }
    }
}

impl HiScoreStore for MemoryStore {
    fn read(&mut self) -> Result<HiScoreRecord, PersistError> {
        self.record.ok_or_else(|| {
            PersistError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no record stored",
            ))
        })
    }

    fn write(&mut self, record: &HiScoreRecord) -> Result<(), PersistError> {
        self.record = Some(*record);
        self.writes += 1;
        Ok(())
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HiScoreStore for JsonFileStore {
    fn read(&mut self) -> Result<HiScoreRecord, PersistError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write(&mut self, record: &HiScoreRecord) -> Result<(), PersistError> {
        let json = serde_json::to_string(record)?;
        // The record on disk is either the old one or the new one, never partial
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("High score {} saved to {}", record.hiscore, self.path.display());
        Ok(())
    }
}
