//! Error types for the persistence and script boundaries
//!
//! The simulation itself never fails: these errors only surface from
//! collaborator-facing APIs, and the scene degrades to a default when it
//! receives one.

use std::fmt;

/// Failure reading or writing the high-score record
#[derive(Debug)]
pub enum PersistError {
    /// Underlying storage failed
    Io(std::io::Error),
    /// Stored bytes are not a valid record
    Format(serde_json::Error),
    /// Record was written by an incompatible version
    VersionMismatch { expected: u32, found: u32 },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "high-score storage error: {e}"),
            PersistError::Format(e) => write!(f, "malformed high-score record: {e}"),
            PersistError::VersionMismatch { expected, found } => {
                write!(f, "high-score record version {found}, expected {expected}")
            }
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Format(e) => Some(e),
            PersistError::VersionMismatch { .. } => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Format(e)
    }
}

/// A spawn script line that could not be turned into a spawn record
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// Wrong number of comma-separated fields
    FieldCount { line: usize, found: usize },
    /// Enemy type name not recognized
    UnknownKind { line: usize, name: String },
    /// A numeric field failed to parse or is not finite
    BadNumber { line: usize, field: &'static str },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::FieldCount { line, found } => {
                write!(f, "line {line}: expected 5 fields, found {found}")
            }
            ScriptError::UnknownKind { line, name } => {
                write!(f, "line {line}: unknown enemy type '{name}'")
            }
            ScriptError::BadNumber { line, field } => {
                write!(f, "line {line}: invalid {field}")
            }
        }
    }
}

impl std::error::Error for ScriptError {}
