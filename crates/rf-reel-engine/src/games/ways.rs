//! Ways — non-cascading left-to-right ways game
//!
//! Exactly one step per round. More than `scatter_threshold` scatters in the
//! base round award `free_rounds` free rounds on the free reel set; free
//! rounds do not retrigger.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::common::{self, Board, Scratch};
use crate::config::GameSetting;
use crate::error::EngineError;
use crate::logic::GameLogic;
use crate::paytable::{TriggerCompare, WaysScorer, positions_of_kind};
use crate::round::RoundEngine;
use crate::runtime::{BetRequest, RuntimeHandle};
use crate::spin::{ActKind, ModeKind, SpinResult};
use crate::symbols::{SymbolKind, SymbolTable};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaysFixed {
    pub min_count: usize,
    pub scatter_threshold: usize,
    pub trigger_compare: TriggerCompare,
    pub free_rounds: u32,
    /// Applied to the bet multiplier during free rounds
    pub free_multiplier: f64,
}

impl Default for WaysFixed {
    fn default() -> Self {
        Self {
            min_count: 3,
            scatter_threshold: 2,
            trigger_compare: TriggerCompare::Greater,
            free_rounds: 8,
            free_multiplier: 1.0,
        }
    }
}

pub struct WaysGame {
    setting: Arc<GameSetting>,
    fixed: WaysFixed,
    symbols: Arc<SymbolTable>,
    scorer: WaysScorer,
    engine: RoundEngine,
    scratch: Scratch,
}

impl WaysGame {
    pub const KEY: &'static str = "ways";

    pub fn new(setting: Arc<GameSetting>, handle: &RuntimeHandle) -> Result<Self, EngineError> {
        let fixed: WaysFixed = setting.decode_params()?;
        if !(fixed.free_multiplier > 0.0) || !fixed.free_multiplier.is_finite() {
            return Err(EngineError::setting(
                &setting.name,
                format!("free_multiplier {} is not positive", fixed.free_multiplier),
            ));
        }
        let symbols = Arc::new(setting.symbol_table()?);
        let scorer = WaysScorer::new(Arc::clone(&symbols), fixed.min_count);

        Ok(Self {
            fixed,
            symbols,
            scorer,
            engine: RoundEngine::new(handle.mode()),
            scratch: Scratch::new(setting.rows, setting.cols),
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

    pub fn fixed(&self) -> &WaysFixed {
        &self.fixed
    }

    /// Play one round; returns whether it triggered
    fn play_round<R: Rng + ?Sized>(
        &mut self,
        kind: ModeKind,
        bet_multiplier: f64,
        rng: &mut R,
    ) -> Result<bool, EngineError> {
        let reels = match kind {
            ModeKind::Base => &self.setting.base_reels,
            ModeKind::Free => self.setting.free_reels(),
        };
        let board = Board {
            reels,
            scorer: &self.scorer,
            bet_multiplier,
            cascading: false,
            max_steps: 1,
            fill_depth: 0,
        };

        self.engine.open_round()?;
        let outcome = common::play_steps(&mut self.engine, &mut self.scratch, &board, rng)?;

        let mut triggered = false;
        if kind == ModeKind::Base {
            let positions =
                positions_of_kind(&self.scratch.screen, &self.symbols, SymbolKind::Scatter);
            triggered = self
                .fixed
                .trigger_compare
                .triggered(positions.len(), self.fixed.scatter_threshold);
            self.engine
                .record_act(ActKind::Trigger, 0.0, &positions, &self.scratch.screen)?;
        }
        self.engine.finish_step(outcome.terminal_win)?;
        if triggered {
            self.engine.set_trigger(1)?;
        }
        self.engine.finish_round()?;
        Ok(triggered)
    }
}

impl GameLogic for WaysGame {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn get_result(
        &mut self,
        request: &BetRequest,
        handle: &mut RuntimeHandle,
    ) -> Result<SpinResult, EngineError> {
        let bet_unit = self.setting.bet_unit(request.bet_mode)?;
        let rng = handle.rng();

        self.engine.start_new_spin();

        self.engine.open_mode(ModeKind::Base, bet_unit)?;
        let triggered = self.play_round(ModeKind::Base, bet_unit, rng)?;
        let base = self.engine.finish_mode(None, None)?;
        self.engine.append_mode_result(base)?;

        if triggered {
            let multiplier = bet_unit * self.fixed.free_multiplier;
            self.engine.open_mode(ModeKind::Free, 0.0)?;
            for _ in 0..self.fixed.free_rounds {
                self.play_round(ModeKind::Free, multiplier, rng)?;
            }
            let free = self.engine.finish_mode(None, None)?;
            self.engine.append_mode_result(free)?;
        }

        self.engine.end()
    }
}
