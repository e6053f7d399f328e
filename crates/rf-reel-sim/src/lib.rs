//! # rf-reel-sim — Parallel Batch Simulator for Reel Games
//!
//! Spreads millions of spins across a rayon pool. Every worker owns its
//! session, random stream and recorder; recorders are merged once all
//! workers have joined.
//!
//! ```rust,ignore
//! let outcome = simulate(registry, catalog, &GameRef::Id(1001), &SimOptions::default().with_seed(7))?;
//! println!("{outcome}");
//! ```

pub mod error;
pub mod simulate;

pub use error::{SimError, SimResult};
pub use simulate::{
    PlayerLineage, SimOptions, SimulationOutcome, WorkerSummary, simulate, split_spins,
};
