//! Tumble — cascading pay-anywhere game
//!
//! - Base round: cascade until a step scores nothing (or `max_steps`)
//! - Scatters on the final screen ≥ threshold → instant scatter pay + free mode
//! - Free rounds run on the free reel set and can retrigger, capped at
//!   `max_free_rounds` rounds in total

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::common::{self, Board, Scratch};
use crate::config::GameSetting;
use crate::error::EngineError;
use crate::logic::{Checkpoint, Extension, GameLogic};
use crate::paytable::{PayAnywhereScorer, TriggerCompare, positions_of_kind};
use crate::round::RoundEngine;
use crate::runtime::{BetRequest, RuntimeHandle};
use crate::spin::{ActKind, ModeKind, SpinResult};
use crate::symbols::{SymbolCode, SymbolKind, SymbolTable};

/// Fixed config decoded from `params`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TumbleFixed {
    /// Minimum count for a pay-anywhere win
    pub min_count: usize,
    pub scatter_threshold: usize,
    pub trigger_compare: TriggerCompare,
    pub free_rounds: u32,
    pub retrigger_rounds: u32,
    pub max_free_rounds: u32,
    /// Refill symbols per column per round (default rows × max_steps)
    pub fill_depth: Option<usize>,
}

impl Default for TumbleFixed {
    fn default() -> Self {
        Self {
            min_count: 8,
            scatter_threshold: 4,
            trigger_compare: TriggerCompare::GreaterOrEqual,
            free_rounds: 10,
            retrigger_rounds: 5,
            max_free_rounds: 50,
            fill_depth: None,
        }
    }
}

/// Per-spin extension state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TumbleExt {
    /// Scatters on the last round's final screen
    pub scatter_count: usize,
    pub scatter_positions: Vec<usize>,
    /// Any round of this spin triggered
    pub triggered: bool,
}

impl Extension for TumbleExt {
    fn reset(&mut self) {
        self.scatter_count = 0;
        self.scatter_positions.clear();
        self.triggered = false;
    }
}

/// Free mode resume point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TumbleCheckpoint {
    pub remaining_free_rounds: u32,
    pub played_free_rounds: u32,
    pub free_win: f64,
}

impl Checkpoint for TumbleCheckpoint {}

#[derive(Debug, Clone, Copy)]
struct RoundPlay {
    win: f64,
    triggered: bool,
}

pub struct TumbleGame {
    setting: Arc<GameSetting>,
    fixed: TumbleFixed,
    symbols: Arc<SymbolTable>,
    scatter: SymbolCode,
    scorer: PayAnywhereScorer,
    fill_depth: usize,
    engine: RoundEngine,
    scratch: Scratch,
    ext: TumbleExt,
}

impl TumbleGame {
    pub const KEY: &'static str = "tumble";

    pub fn new(setting: Arc<GameSetting>, handle: &RuntimeHandle) -> Result<Self, EngineError> {
        let fixed: TumbleFixed = setting.decode_params()?;
        let symbols = Arc::new(setting.symbol_table()?);
        let scatter = symbols
            .scatter_code()
            .ok_or_else(|| EngineError::setting(&setting.name, "tumble needs a scatter symbol"))?;
        if fixed.scatter_threshold == 0 {
            return Err(EngineError::setting(&setting.name, "scatter_threshold must be positive"));
        }
        if fixed.free_rounds == 0 || fixed.max_free_rounds < fixed.free_rounds {
            return Err(EngineError::setting(
                &setting.name,
                format!(
                    "free_rounds {} must be positive and within max_free_rounds {}",
                    fixed.free_rounds, fixed.max_free_rounds
                ),
            ));
        }

        let fill_depth = fixed
            .fill_depth
            .unwrap_or(setting.rows * setting.max_steps);
        let scorer = PayAnywhereScorer::new(Arc::clone(&symbols), fixed.min_count);
        let scratch = Scratch::new(setting.rows, setting.cols);

        Ok(Self {
            fixed,
            symbols,
            scatter,
            scorer,
            fill_depth,
            engine: RoundEngine::new(handle.mode()),
            scratch,
            ext: TumbleExt::default(),
            setting,
        })
    }

    /// Registry constructor
    pub fn build(
        setting: Arc<GameSetting>,
        handle: &RuntimeHandle,
    ) -> Result<Box<dyn GameLogic>, EngineError> {
        Ok(Box::new(Self::new(setting, handle)?))
    }

    pub fn fixed(&self) -> &TumbleFixed {
        &self.fixed
    }

    fn play_round<R: Rng + ?Sized>(
        &mut self,
        kind: ModeKind,
        bet_multiplier: f64,
        rng: &mut R,
    ) -> Result<RoundPlay, EngineError> {
        let reels = match kind {
            ModeKind::Base => &self.setting.base_reels,
            ModeKind::Free => self.setting.free_reels(),
        };
        let board = Board {
            reels,
            scorer: &self.scorer,
            bet_multiplier,
            cascading: true,
            max_steps: self.setting.max_steps,
            fill_depth: self.fill_depth,
        };

        self.engine.open_round()?;
        let outcome = common::play_steps(&mut self.engine, &mut self.scratch, &board, rng)?;

        let positions = positions_of_kind(&self.scratch.screen, &self.symbols, SymbolKind::Scatter);
        let threshold = self.fixed.scatter_threshold;
        let triggered = self
            .fixed
            .trigger_compare
            .triggered(positions.len(), threshold);
        let scatter_pay = if triggered {
            threshold as f64 * self.symbols.pay(self.scatter, threshold) * bet_multiplier
        } else {
            0.0
        };

        self.engine
            .record_act(ActKind::Trigger, scatter_pay, &positions, &self.scratch.screen)?;
        self.engine.finish_step(outcome.terminal_win)?;
        if triggered {
            self.engine.add_round_win(scatter_pay)?;
            self.engine.set_trigger(1)?;
        }

        self.ext.scatter_count = positions.len();
        self.ext.scatter_positions = positions;
        self.ext.triggered |= triggered;

        let win = self.engine.finish_round()?;
        Ok(RoundPlay { win, triggered })
    }

    fn play_free<R: Rng + ?Sized>(&mut self, bet_unit: f64, rng: &mut R) -> Result<(), EngineError> {
        let run_mode = self.engine.run_mode();
        self.engine.open_mode(ModeKind::Free, 0.0)?;

        let mut checkpoint = TumbleCheckpoint {
            remaining_free_rounds: self.fixed.free_rounds,
            ..Default::default()
        };
        while checkpoint.remaining_free_rounds > 0 {
            checkpoint.remaining_free_rounds -= 1;
            checkpoint.played_free_rounds += 1;

            let round = self.play_round(ModeKind::Free, bet_unit, rng)?;
            checkpoint.free_win += round.win;
            if round.triggered {
                let scheduled = checkpoint.played_free_rounds + checkpoint.remaining_free_rounds;
                let room = self.fixed.max_free_rounds.saturating_sub(scheduled);
                checkpoint.remaining_free_rounds += self.fixed.retrigger_rounds.min(room);
            }
        }

        let result = self
            .engine
            .finish_mode(self.ext.snapshot(run_mode), checkpoint.snapshot(run_mode))?;
        self.engine.append_mode_result(result)
    }
}

impl GameLogic for TumbleGame {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn get_result(
        &mut self,
        request: &BetRequest,
        handle: &mut RuntimeHandle,
    ) -> Result<SpinResult, EngineError> {
        let bet_unit = self.setting.bet_unit(request.bet_mode)?;
        let run_mode = self.engine.run_mode();
        let rng = handle.rng();

        self.engine.start_new_spin();
        self.ext.reset();

        self.engine.open_mode(ModeKind::Base, bet_unit)?;
        self.play_round(ModeKind::Base, bet_unit, rng)?;
        let base = self.engine.finish_mode(self.ext.snapshot(run_mode), None)?;
        let triggered = base.trigger() != 0;
        self.engine.append_mode_result(base)?;

        if triggered {
            self.play_free(bet_unit, rng)?;
        }

        self.engine.end()
    }
}
