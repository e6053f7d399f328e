//! Step loop and per-worker scratch shared by the built-in variants

use rand::Rng;

use crate::cascade;
use crate::error::EngineError;
use crate::paytable::{Scorer, WinAccumulator};
use crate::reels::ReelSet;
use crate::round::RoundEngine;
use crate::screen::Screen;
use crate::spin::ActKind;
use crate::symbols::SymbolCode;

/// Per-worker mutable scratch, allocated once per logic instance
#[derive(Debug)]
pub struct Scratch {
    pub screen: Screen,
    /// Fill-start row per column after the last gravity pass
    pub fill_start: Vec<Option<usize>>,
    /// Continuation index per column, reset every round
    pub cursor: Vec<usize>,
    /// Refill source per column, drawn on demand within a round
    pub strips: Vec<Vec<SymbolCode>>,
    pub acc: WinAccumulator,
}

impl Scratch {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            screen: Screen::new(rows, cols),
            fill_start: vec![None; cols],
            cursor: vec![0; cols],
            strips: vec![Vec::new(); cols],
            acc: WinAccumulator::new(),
        }
    }

    fn reset_round(&mut self) {
        self.cursor.fill(0);
        self.fill_start.fill(None);
        for strip in &mut self.strips {
            strip.clear();
        }
    }

    /// Grow each refill source so the coming fill can be served, up to `depth`
    fn top_up<R: Rng + ?Sized>(&mut self, reels: &ReelSet, depth: usize, rng: &mut R) {
        for (col, strip) in self.strips.iter_mut().enumerate() {
            let Some(start) = self.fill_start[col] else {
                continue;
            };
            let Some(lut) = reels.reel(col) else {
                continue;
            };
            let need = (self.cursor[col] + start + 1).min(depth);
            while strip.len() < need {
                strip.push(lut.draw(rng));
            }
        }
    }
}

/// What one round plays on
pub struct Board<'a> {
    pub reels: &'a ReelSet,
    pub scorer: &'a dyn Scorer,
    pub bet_multiplier: f64,
    /// Clear/gravity/fill after winning steps
    pub cascading: bool,
    pub max_steps: usize,
    /// Symbols each column may consume for refills within one round
    pub fill_depth: usize,
}

/// Outcome of the step loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepsOutcome {
    /// Sum of every step's scored win
    pub win: f64,
    /// Scored win of the still-open terminal step
    pub terminal_win: f64,
}

/// Generate a screen and run score → clear → gravity → fill until a step
/// scores nothing, the board does not cascade, or `max_steps` is reached.
///
/// The round must be open. The terminal step is left open so the caller can
/// record trigger acts on the final screen before `finish_step`.
pub fn play_steps<R: Rng + ?Sized>(
    engine: &mut RoundEngine,
    scratch: &mut Scratch,
    board: &Board<'_>,
    rng: &mut R,
) -> Result<StepsOutcome, EngineError> {
    scratch.reset_round();
    board.reels.gen_screen_into(&mut scratch.screen, rng);

    engine.open_step()?;
    engine.record_act(ActKind::GenScreen, 0.0, &[], &scratch.screen)?;

    let mut win = 0.0;
    loop {
        board
            .scorer
            .calc_screen(board.bet_multiplier, &scratch.screen, &mut scratch.acc);
        let step_win = scratch.acc.win;
        win += step_win;
        engine.record_act(
            ActKind::CalcScore,
            step_win,
            &scratch.acc.hit_map,
            &scratch.screen,
        )?;

        let steps = engine.round_steps() + 1;
        if !scratch.acc.is_win() || !board.cascading || steps >= board.max_steps {
            if board.cascading && scratch.acc.is_win() {
                log::debug!("Cascade bound reached after {} steps", steps);
            } else if board.cascading {
                log::debug!("Cascade ended after {} steps", steps);
            }
            return Ok(StepsOutcome {
                win,
                terminal_win: step_win,
            });
        }

        cascade::clear(&mut scratch.screen, &scratch.acc.hit_map);
        engine.record_act(ActKind::Clear, 0.0, &scratch.acc.hit_map, &scratch.screen)?;

        cascade::gravity(&mut scratch.screen, &mut scratch.fill_start);
        engine.record_act(ActKind::Gravity, 0.0, &[], &scratch.screen)?;

        scratch.top_up(board.reels, board.fill_depth, rng);
        cascade::fill(
            &mut scratch.screen,
            &scratch.fill_start,
            &scratch.strips,
            &mut scratch.cursor,
        )?;
        engine.record_act(ActKind::Fill, 0.0, &[], &scratch.screen)?;

        engine.finish_step(step_win)?;
        engine.open_step()?;
    }
}
