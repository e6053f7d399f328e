//! Per-worker runtime handle and bet requests

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::GameRef;

/// What the engine keeps per spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Keep screens on every act and extension snapshots on every mode
    Audit,
    /// Keep totals only
    #[default]
    Throughput,
}

impl RunMode {
    #[inline]
    pub fn is_audit(self) -> bool {
        matches!(self, Self::Audit)
    }
}

/// Random source plus run mode, owned by exactly one worker
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    rng: ChaCha8Rng,
    mode: RunMode,
}

impl RuntimeHandle {
    /// Deterministic handle
    pub fn seeded(seed: u64, mode: RunMode) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            mode,
        }
    }

    /// Handle seeded from the OS
    pub fn from_os_rng(mode: RunMode) -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
            mode,
        }
    }

    #[inline]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    #[inline]
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

/// One spin request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetRequest {
    /// Game to play
    pub game: GameRef,
    /// Index into the game's bet units
    pub bet_mode: usize,
}

impl BetRequest {
    pub fn new(game: impl Into<GameRef>, bet_mode: usize) -> Self {
        Self {
            game: game.into(),
            bet_mode,
        }
    }
}
