//! Error types for statistics recording

use thiserror::Error;

/// Statistics error type. Every variant is a fatal contract violation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Bet unit list is empty")]
    EmptyBetUnits,

    #[error("Bet unit {value} at index {index} is not positive")]
    NonPositiveBetUnit { index: usize, value: f64 },

    #[error("Bet mode {mode} out of range ({count} bet units)")]
    BetModeOutOfRange { mode: usize, count: usize },

    #[error("Initial bets must be non-negative, got {0}")]
    NegativeInitBets(i64),

    #[error("Invalid bucket edges: {0}")]
    InvalidBuckets(String),

    #[error("Cannot merge recorders of different games: {expected} vs {found}")]
    IdentityMismatch { expected: String, found: String },

    #[error("Cannot merge recorders with different bucket layouts")]
    BucketMismatch,

    #[error("Nothing to merge")]
    NothingToMerge,
}

/// Result type alias
pub type StatsResult<T> = Result<T, StatsError>;
