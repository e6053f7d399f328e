//! Spin results: Act ⊂ Step ⊂ Round ⊂ Mode ⊂ Spin

use serde::{Deserialize, Serialize};

use crate::screen::Screen;

/// Atomic recorded operation inside a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActKind {
    GenScreen,
    CalcScore,
    Clear,
    Gravity,
    Fill,
    Trigger,
}

/// One recorded act
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Act {
    pub kind: ActKind,
    /// Win produced by this act (scoring and instant trigger pays)
    pub win: f64,
    /// Cells touched (hit-map, cleared cells, scatter positions)
    pub cells: Vec<usize>,
    /// Screen after the act (audit mode only)
    pub screen: Option<Screen>,
}

/// One cascade iteration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Step {
    /// Acts in execution order (empty in throughput mode)
    pub acts: Vec<Act>,
    /// Scored win of this step
    pub win: f64,
}

/// One logical play unit within a mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Round {
    pub steps: Vec<Step>,
    /// Step wins plus instant pays
    pub win: f64,
    /// Non-zero when this round triggered a feature
    pub trigger: u32,
}

impl Round {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Play context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Base,
    Free,
}

/// Immutable result of one mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeResult {
    kind: ModeKind,
    bet: f64,
    win: f64,
    trigger: u32,
    rounds: Vec<Round>,
    ext: Option<serde_json::Value>,
    checkpoint: Option<serde_json::Value>,
}

impl ModeResult {
    /// Result with no recorded rounds, for tests and external producers
    pub fn summary(kind: ModeKind, bet: f64, win: f64, trigger: u32) -> Self {
        Self {
            kind,
            bet,
            win,
            trigger,
            rounds: Vec::new(),
            ext: None,
            checkpoint: None,
        }
    }

    pub(crate) fn from_rounds(kind: ModeKind, bet: f64, rounds: Vec<Round>) -> Self {
        let win = rounds.iter().map(|r| r.win).sum();
        let trigger = rounds.iter().filter(|r| r.trigger != 0).count() as u32;
        Self {
            kind,
            bet,
            win,
            trigger,
            rounds,
            ext: None,
            checkpoint: None,
        }
    }

    pub(crate) fn with_audit(
        mut self,
        ext: Option<serde_json::Value>,
        checkpoint: Option<serde_json::Value>,
    ) -> Self {
        self.ext = ext;
        self.checkpoint = checkpoint;
        self
    }

    pub fn kind(&self) -> ModeKind {
        self.kind
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn win(&self) -> f64 {
        self.win
    }

    /// Number of rounds that triggered
    pub fn trigger(&self) -> u32 {
        self.trigger
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Extension snapshot taken when the mode finished (audit mode only)
    pub fn ext(&self) -> Option<&serde_json::Value> {
        self.ext.as_ref()
    }

    /// Resume point recorded when the mode finished (audit mode only)
    pub fn checkpoint(&self) -> Option<&serde_json::Value> {
        self.checkpoint.as_ref()
    }
}

/// Sealed spin result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResult {
    bet: f64,
    win: f64,
    modes: Vec<ModeResult>,
}

impl SpinResult {
    /// Seal a list of mode results; totals are summed in order
    pub fn from_modes(modes: Vec<ModeResult>) -> Self {
        let bet = modes.iter().map(|m| m.bet).sum();
        let win = modes.iter().map(|m| m.win).sum();
        Self { bet, win, modes }
    }

    /// Total bet
    pub fn bet(&self) -> f64 {
        self.bet
    }

    /// Total win across all modes
    pub fn win(&self) -> f64 {
        self.win
    }

    /// Win of mode 0
    pub fn base_win(&self) -> f64 {
        self.modes.first().map(|m| m.win).unwrap_or(0.0)
    }

    /// Win of every mode after the base
    pub fn free_win(&self) -> f64 {
        self.modes.iter().skip(1).map(|m| m.win).sum()
    }

    pub fn modes(&self) -> &[ModeResult] {
        &self.modes
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    /// Did the spin leave the base mode?
    pub fn triggered(&self) -> bool {
        self.modes.len() > 1
    }

    pub fn is_win(&self) -> bool {
        self.win > 0.0
    }
}
