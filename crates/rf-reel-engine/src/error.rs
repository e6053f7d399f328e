//! Error types for the reel engine

use thiserror::Error;

/// Core engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid game setting '{game}': {reason}")]
    InvalidSetting { game: String, reason: String },

    #[error("Invalid weighted table: {0}")]
    InvalidLut(String),

    #[error("Screen shape mismatch: expected {expected} cells, got {actual}")]
    ScreenShape { expected: usize, actual: usize },

    #[error("Reel source exhausted on column {column} at index {index}")]
    ReelExhausted { column: usize, index: usize },

    #[error("Bet mode {mode} out of range ({count} bet units)")]
    BetModeOutOfRange { mode: usize, count: usize },

    #[error("Invalid engine state: cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub(crate) fn setting(game: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            game: game.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type EngineResult<T> = Result<T, EngineError>;
