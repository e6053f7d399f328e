//! # rf-reel-engine — Round Execution Engine for Reel Games
//!
//! Computes spin outcomes for weighted-reel games with cascade (tumble)
//! mechanics. Deterministic for a seeded runtime handle.
//!
//! ## Features
//!
//! - **Cascade Primitives**: in-place clear, gravity and fill on a fixed screen
//! - **Round Execution**: spin → mode → round → step → act state machine
//! - **Logic Registry**: logic key → constructor, with typed Ext/checkpoint bindings
//! - **Game Settings**: YAML/JSON settings indexed by id and name
//! - **Run Modes**: Audit (screens and snapshots kept) or Throughput (totals only)
//!
//! ## Architecture
//!
//! ```text
//! GameCatalog ──▶ Arc<GameSetting> ──▶ LogicRegistry::build
//!                                           │
//!                                           v
//! BetRequest ──▶ SpinSession ──▶ dyn GameLogic (tumble, ways)
//!                                    │
//!                                    ├── ReelSet::gen_screen
//!                                    ├── Scorer::calc_screen
//!                                    ├── cascade::{clear, gravity, fill}
//!                                    └── RoundEngine
//!                                           │
//!                                           v
//!                                      SpinResult
//! ```

pub mod cascade;
pub mod catalog;
pub mod config;
pub mod error;
pub mod games;
pub mod logic;
pub mod paytable;
pub mod reels;
pub mod registry;
pub mod round;
pub mod runtime;
pub mod screen;
pub mod session;
pub mod spin;
pub mod symbols;

pub use catalog::{CatalogError, GameCatalog, GameRef};
pub use config::GameSetting;
pub use error::{EngineError, EngineResult};
pub use logic::{Checkpoint, Extension, GameLogic};
pub use paytable::{PayAnywhereScorer, Scorer, TriggerCompare, WaysScorer, WinAccumulator};
pub use reels::{Lut, LutEntry, ReelSet, ReelSource};
pub use registry::{
    Capability, CapabilityKind, LogicBuilder, LogicKey, LogicRegistry, RegistryBuilder,
    RegistryError,
};
pub use round::RoundEngine;
pub use runtime::{BetRequest, RunMode, RuntimeHandle};
pub use screen::Screen;
pub use session::{SessionError, SpinSession};
pub use spin::*;
pub use symbols::*;
