//! # rf-reel-stats — Mergeable Statistics for Reel Game Simulations
//!
//! One [`Recorder`] per worker accumulates running sums, bucketed win
//! distributions and a bankroll simulation. Recorders from independent
//! workers are combined with [`Recorder::merge`] after every worker has
//! finished, and [`Recorder::done`] projects an immutable [`StatReport`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut recorder = Recorder::new("sugar-tumble", 1001, vec![1.0, 2.0], 0, 100)?;
//! recorder.record(&spin);
//! let report = Recorder::merge(&[recorder, other])?.done();
//! println!("RTP {:.4}", report.summary.rtp);
//! ```

pub mod bucket;
pub mod error;
pub mod recorder;
pub mod report;

pub use bucket::WinBucket;
pub use error::{StatsError, StatsResult};
pub use recorder::{Basic, Distribution, GameIdentity, Player, Recorder};
pub use report::{
    BucketStats, DistributionReport, Moments, MultiplierMoments, PlayerReport, StatReport, Summary,
};
