//! Error types for batch simulation

use rf_reel_engine::{CatalogError, RegistryError, SessionError};
use rf_reel_stats::StatsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid simulation options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Worker {worker} failed: {source}")]
    Worker {
        worker: usize,
        #[source]
        source: SessionError,
    },

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias
pub type SimResult<T> = Result<T, SimError>;
