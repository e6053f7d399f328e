//! Round execution engine — spin → mode → round → step → act state machine
//!
//! ```text
//! Idle ──start_new_spin──▶ Open ──end──▶ Closed
//!                           │
//!                           ├── open_mode ─┬─ open_round ─┬─ open_step ─ record_act* ─ finish_step
//!                           │              │              └─ finish_round
//!                           │              └─ finish_mode ──▶ ModeResult
//!                           └── append_mode_result (base first, execution order)
//! ```
//!
//! One engine belongs to one worker and runs one spin at a time.

use crate::error::EngineError;
use crate::runtime::RunMode;
use crate::screen::Screen;
use crate::spin::{Act, ActKind, ModeKind, ModeResult, Round, SpinResult, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Open,
    Closed,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug)]
struct OpenMode {
    kind: ModeKind,
    bet: f64,
    rounds: Vec<Round>,
}

/// Spin state machine
#[derive(Debug)]
pub struct RoundEngine {
    run_mode: RunMode,
    phase: Phase,
    modes: Vec<ModeResult>,
    bet: f64,
    win: f64,
    mode: Option<OpenMode>,
    round: Option<Round>,
    step: Option<Step>,
}

impl RoundEngine {
    pub fn new(run_mode: RunMode) -> Self {
        Self {
            run_mode,
            phase: Phase::Idle,
            modes: Vec::new(),
            bet: 0.0,
            win: 0.0,
            mode: None,
            round: None,
            step: None,
        }
    }

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    /// Enter Open and zero every spin-level accumulator
    pub fn start_new_spin(&mut self) {
        self.phase = Phase::Open;
        self.modes.clear();
        self.bet = 0.0;
        self.win = 0.0;
        self.mode = None;
        self.round = None;
        self.step = None;
    }

    /// Running total bet of appended modes
    pub fn total_bet(&self) -> f64 {
        self.bet
    }

    /// Running total win of appended modes
    pub fn total_win(&self) -> f64 {
        self.win
    }

    /// Number of appended mode results
    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    fn invalid(&self, action: &'static str) -> EngineError {
        let state = match (&self.mode, &self.round, &self.step) {
            _ if self.phase != Phase::Open => self.phase.label(),
            (_, _, Some(_)) => "a step is open",
            (_, Some(_), None) => "a round is open",
            (Some(_), None, None) => "a mode is open",
            (None, None, None) => "no mode is open",
        };
        EngineError::InvalidState { action, state }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // MODE
    // ═══════════════════════════════════════════════════════════════════════

    pub fn open_mode(&mut self, kind: ModeKind, bet: f64) -> Result<(), EngineError> {
        if self.phase != Phase::Open || self.mode.is_some() {
            return Err(self.invalid("open a mode"));
        }
        if self.modes.is_empty() && kind != ModeKind::Base {
            return Err(EngineError::InvalidState {
                action: "open a non-base mode",
                state: "the base mode has not run",
            });
        }
        self.mode = Some(OpenMode {
            kind,
            bet,
            rounds: Vec::new(),
        });
        Ok(())
    }

    /// Close the open mode and yield its immutable result
    pub fn finish_mode(
        &mut self,
        ext: Option<serde_json::Value>,
        checkpoint: Option<serde_json::Value>,
    ) -> Result<ModeResult, EngineError> {
        if self.round.is_some() {
            return Err(self.invalid("finish a mode"));
        }
        let Some(mode) = self.mode.take() else {
            return Err(self.invalid("finish a mode"));
        };
        Ok(ModeResult::from_rounds(mode.kind, mode.bet, mode.rounds).with_audit(ext, checkpoint))
    }

    /// Attach a finished mode result in execution order
    pub fn append_mode_result(&mut self, result: ModeResult) -> Result<(), EngineError> {
        if self.phase != Phase::Open || self.mode.is_some() {
            return Err(self.invalid("append a mode result"));
        }
        if self.modes.is_empty() && result.kind() != ModeKind::Base {
            return Err(EngineError::InvalidState {
                action: "append a non-base mode result",
                state: "no base mode result is attached",
            });
        }
        self.bet += result.bet();
        self.win += result.win();
        self.modes.push(result);
        Ok(())
    }

    /// Seal the spin
    pub fn end(&mut self) -> Result<SpinResult, EngineError> {
        if self.phase != Phase::Open || self.mode.is_some() || self.modes.is_empty() {
            return Err(self.invalid("end the spin"));
        }
        self.phase = Phase::Closed;
        Ok(SpinResult::from_modes(std::mem::take(&mut self.modes)))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ROUND
    // ═══════════════════════════════════════════════════════════════════════

    pub fn open_round(&mut self) -> Result<(), EngineError> {
        if self.mode.is_none() || self.round.is_some() {
            return Err(self.invalid("open a round"));
        }
        self.round = Some(Round::default());
        Ok(())
    }

    /// Steps already finished in the open round
    pub fn round_steps(&self) -> usize {
        self.round.as_ref().map(|r| r.steps.len()).unwrap_or(0)
    }

    /// Add an instant pay to the open round
    pub fn add_round_win(&mut self, amount: f64) -> Result<(), EngineError> {
        match self.round.as_mut() {
            Some(round) => {
                round.win += amount;
                Ok(())
            }
            None => Err(self.invalid("add a round win")),
        }
    }

    /// Set the open round's trigger flag
    pub fn set_trigger(&mut self, trigger: u32) -> Result<(), EngineError> {
        match self.round.as_mut() {
            Some(round) => {
                round.trigger = trigger;
                Ok(())
            }
            None => Err(self.invalid("set a trigger")),
        }
    }

    /// Close the open round; returns its win
    pub fn finish_round(&mut self) -> Result<f64, EngineError> {
        if self.step.is_some() {
            return Err(self.invalid("finish a round"));
        }
        let (Some(round), Some(mode)) = (self.round.take(), self.mode.as_mut()) else {
            return Err(self.invalid("finish a round"));
        };
        let win = round.win;
        mode.rounds.push(round);
        Ok(win)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // STEP / ACT
    // ═══════════════════════════════════════════════════════════════════════

    pub fn open_step(&mut self) -> Result<(), EngineError> {
        if self.round.is_none() || self.step.is_some() {
            return Err(self.invalid("open a step"));
        }
        self.step = Some(Step::default());
        Ok(())
    }

    /// Record an act in the open step. Throughput mode keeps nothing.
    pub fn record_act(
        &mut self,
        kind: ActKind,
        win: f64,
        cells: &[usize],
        screen: &Screen,
    ) -> Result<(), EngineError> {
        let audit = self.run_mode.is_audit();
        let Some(step) = self.step.as_mut() else {
            return Err(self.invalid("record an act"));
        };
        if audit {
            step.acts.push(Act {
                kind,
                win,
                cells: cells.to_vec(),
                screen: Some(screen.clone()),
            });
        }
        Ok(())
    }

    /// Close the open step with its scored win
    pub fn finish_step(&mut self, win: f64) -> Result<(), EngineError> {
        let (Some(mut step), Some(round)) = (self.step.take(), self.round.as_mut()) else {
            return Err(self.invalid("finish a step"));
        };
        step.win = win;
        round.win += win;
        round.steps.push(step);
        Ok(())
    }
}
