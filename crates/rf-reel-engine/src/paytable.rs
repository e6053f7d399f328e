//! Screen scoring and trigger detection
//!
//! `Scorer::calc_screen` is a pure function of (screen, paytable, bet
//! multiplier): it overwrites the accumulator's win and hit-map on every call
//! and keeps nothing between calls.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::screen::Screen;
use crate::symbols::{SymbolCode, SymbolKind, SymbolTable};

/// Transient output of one scoring call
#[derive(Debug, Clone, Default)]
pub struct WinAccumulator {
    /// Win amount for this call
    pub win: f64,
    /// Flat indices of the cells that contributed, sorted and deduplicated
    pub hit_map: Vec<usize>,
}

impl WinAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous call's output
    pub fn reset(&mut self) {
        self.win = 0.0;
        self.hit_map.clear();
    }

    pub fn is_win(&self) -> bool {
        self.win > 0.0
    }

    fn finish(&mut self) {
        self.hit_map.sort_unstable();
        self.hit_map.dedup();
    }
}

/// CalcScreen contract
pub trait Scorer: Send + Sync {
    fn calc_screen(&self, bet_multiplier: f64, screen: &Screen, acc: &mut WinAccumulator);
}

/// Left-to-right ways-to-win. Wilds substitute for normal symbols.
#[derive(Debug, Clone)]
pub struct WaysScorer {
    symbols: Arc<SymbolTable>,
    normals: Vec<SymbolCode>,
    min_count: usize,
}

impl WaysScorer {
    pub fn new(symbols: Arc<SymbolTable>, min_count: usize) -> Self {
        let normals = symbols.normal_codes();
        Self {
            symbols,
            normals,
            min_count: min_count.max(1),
        }
    }

    #[inline]
    fn matches(&self, cell: SymbolCode, target: SymbolCode) -> bool {
        cell == target || self.symbols.kind(cell) == Some(SymbolKind::Wild)
    }
}

impl Scorer for WaysScorer {
    fn calc_screen(&self, bet_multiplier: f64, screen: &Screen, acc: &mut WinAccumulator) {
        acc.reset();
        let rows = screen.rows();

        for &target in &self.normals {
            // rows^cols can exceed u64
            let mut ways = 1.0f64;
            let mut length = 0;
            for col in 0..screen.cols() {
                let hits = (0..rows)
                    .filter(|&row| self.matches(screen.get(row, col), target))
                    .count();
                if hits == 0 {
                    break;
                }
                ways *= hits as f64;
                length += 1;
            }

            if length < self.min_count {
                continue;
            }
            let pay = self.symbols.pay(target, length);
            if pay <= 0.0 {
                continue;
            }

            acc.win += pay * ways * bet_multiplier;
            for col in 0..length {
                for row in 0..rows {
                    if self.matches(screen.get(row, col), target) {
                        acc.hit_map.push(screen.index(row, col));
                    }
                }
            }
        }

        acc.finish();
    }
}

/// Pays any normal symbol seen at least `min_count` times anywhere on the
/// screen. Wilds count toward every normal symbol present.
#[derive(Debug, Clone)]
pub struct PayAnywhereScorer {
    symbols: Arc<SymbolTable>,
    normals: Vec<SymbolCode>,
    min_count: usize,
}

impl PayAnywhereScorer {
    pub fn new(symbols: Arc<SymbolTable>, min_count: usize) -> Self {
        let normals = symbols.normal_codes();
        Self {
            symbols,
            normals,
            min_count: min_count.max(1),
        }
    }
}

impl Scorer for PayAnywhereScorer {
    fn calc_screen(&self, bet_multiplier: f64, screen: &Screen, acc: &mut WinAccumulator) {
        acc.reset();

        let wilds: Vec<usize> = screen
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, c)| self.symbols.kind(**c) == Some(SymbolKind::Wild))
            .map(|(i, _)| i)
            .collect();

        for &target in &self.normals {
            let own = screen.cells().iter().filter(|&&c| c == target).count();
            if own == 0 {
                continue;
            }
            let count = own + wilds.len();
            if count < self.min_count {
                continue;
            }
            let pay = self.symbols.pay(target, count);
            if pay <= 0.0 {
                continue;
            }

            acc.win += pay * bet_multiplier;
            acc.hit_map.extend(
                screen
                    .cells()
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| **c == target)
                    .map(|(i, _)| i),
            );
            acc.hit_map.extend_from_slice(&wilds);
        }

        acc.finish();
    }
}

/// Trigger threshold comparison, configured per game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCompare {
    /// `count > threshold`
    Greater,
    /// `count >= threshold`
    #[default]
    GreaterOrEqual,
}

impl TriggerCompare {
    #[inline]
    pub fn triggered(self, count: usize, threshold: usize) -> bool {
        match self {
            Self::Greater => count > threshold,
            Self::GreaterOrEqual => count >= threshold,
        }
    }
}

/// Flat indices of every cell holding a symbol of `kind`
pub fn positions_of_kind(screen: &Screen, symbols: &SymbolTable, kind: SymbolKind) -> Vec<usize> {
    screen
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, c)| symbols.kind(**c) == Some(kind))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolDef;
    use approx::assert_relative_eq;

    fn table() -> Arc<SymbolTable> {
        Arc::new(
            SymbolTable::new(vec![
                SymbolDef::normal(1, "HP1", &[(3, 2.0), (4, 5.0)]),
                SymbolDef::normal(2, "LP1", &[(3, 0.5)]),
                SymbolDef::wild(8, "WILD"),
                SymbolDef::scatter(9, "SCATTER"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_ways_counts_multiple_positions() {
        // 1 1 1 2
        // 2 1 3 3
        let screen = Screen::from_cells(2, 4, vec![1, 1, 1, 2, 2, 1, 3, 3]).unwrap();
        let scorer = WaysScorer::new(table(), 3);
        let mut acc = WinAccumulator::new();
        scorer.calc_screen(1.0, &screen, &mut acc);

        // symbol 1: 1 × 2 × 1 ways over 3 columns
        assert_relative_eq!(acc.win, 4.0);
        assert_eq!(acc.hit_map, vec![0, 1, 2, 5]);
    }

    #[test]
    fn test_ways_wild_substitutes() {
        let screen = Screen::from_cells(1, 4, vec![2, 8, 2, 2]).unwrap();
        let scorer = WaysScorer::new(table(), 3);
        let mut acc = WinAccumulator::new();
        scorer.calc_screen(2.0, &screen, &mut acc);
        assert_relative_eq!(acc.win, 1.0);
        assert_eq!(acc.hit_map, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_ways_scatter_never_pays() {
        let screen = Screen::from_cells(1, 3, vec![9, 9, 9]).unwrap();
        let scorer = WaysScorer::new(table(), 3);
        let mut acc = WinAccumulator::new();
        scorer.calc_screen(1.0, &screen, &mut acc);
        assert!(!acc.is_win());
        assert!(acc.hit_map.is_empty());
    }

    #[test]
    fn test_ways_large_board_does_not_overflow() {
        // 9^21 ways exceeds u64::MAX
        let screen = Screen::from_cells(9, 21, vec![1; 9 * 21]).unwrap();
        let scorer = WaysScorer::new(table(), 3);
        let mut acc = WinAccumulator::new();
        scorer.calc_screen(1.0, &screen, &mut acc);

        assert_relative_eq!(acc.win, 5.0 * 9f64.powi(21), max_relative = 1e-12);
        assert!(acc.win > u64::MAX as f64);
        assert_eq!(acc.hit_map.len(), 9 * 21);
    }

    #[test]
    fn test_pay_anywhere() {
        let screen = Screen::from_cells(2, 3, vec![1, 2, 1, 8, 1, 9]).unwrap();
        let scorer = PayAnywhereScorer::new(table(), 3);
        let mut acc = WinAccumulator::new();
        scorer.calc_screen(1.0, &screen, &mut acc);

        // three 1s + one wild = 4 → 5.0; 2 has one + wild = 2 → no pay
        assert_relative_eq!(acc.win, 5.0);
        assert_eq!(acc.hit_map, vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_accumulator_is_reset_between_calls() {
        let scorer = PayAnywhereScorer::new(table(), 3);
        let mut acc = WinAccumulator::new();
        let winning = Screen::from_cells(1, 3, vec![1, 1, 1]).unwrap();
        let losing = Screen::from_cells(1, 3, vec![1, 2, 9]).unwrap();

        scorer.calc_screen(1.0, &winning, &mut acc);
        assert!(acc.is_win());
        scorer.calc_screen(1.0, &losing, &mut acc);
        assert!(!acc.is_win());
        assert!(acc.hit_map.is_empty());
    }

    #[test]
    fn test_trigger_compare() {
        assert!(TriggerCompare::GreaterOrEqual.triggered(3, 3));
        assert!(!TriggerCompare::Greater.triggered(3, 3));
        assert!(TriggerCompare::Greater.triggered(4, 3));
    }

    #[test]
    fn test_positions_of_kind() {
        let screen = Screen::from_cells(1, 4, vec![9, 1, 9, 8]).unwrap();
        assert_eq!(positions_of_kind(&screen, &table(), SymbolKind::Scatter), vec![0, 2]);
    }
}
