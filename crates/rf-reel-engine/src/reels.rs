//! Weighted lookup tables, reel sets and reel sources

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::screen::Screen;
use crate::symbols::SymbolCode;

/// One weighted entry of a lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LutEntry {
    pub symbol: SymbolCode,
    pub weight: u32,
}

/// Weighted lookup table producing one symbol per draw
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<LutEntry>", into = "Vec<LutEntry>")]
pub struct Lut {
    entries: Vec<LutEntry>,
    /// Running weight total through each entry
    cumulative: Vec<u64>,
    total: u64,
}

impl Lut {
    /// Build a table; needs at least one entry and a positive total weight
    pub fn new(entries: Vec<LutEntry>) -> Result<Self, EngineError> {
        if entries.is_empty() {
            return Err(EngineError::InvalidLut("table has no entries".into()));
        }
        if let Some(e) = entries.iter().find(|e| e.weight == 0) {
            return Err(EngineError::InvalidLut(format!(
                "symbol {} has zero weight",
                e.symbol
            )));
        }

        let mut total = 0u64;
        let cumulative = entries
            .iter()
            .map(|e| {
                total += e.weight as u64;
                total
            })
            .collect();

        Ok(Self {
            entries,
            cumulative,
            total,
        })
    }

    /// Uniform table over `symbols`
    pub fn uniform(symbols: &[SymbolCode]) -> Result<Self, EngineError> {
        Self::new(
            symbols
                .iter()
                .map(|&symbol| LutEntry { symbol, weight: 1 })
                .collect(),
        )
    }

    /// Weighted pick: index of the chosen entry
    #[inline]
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r = rng.random_range(0..self.total);
        self.cumulative.partition_point(|&c| c <= r)
    }

    /// Draw one symbol
    #[inline]
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> SymbolCode {
        self.entries[self.pick(rng)].symbol
    }

    pub fn entries(&self) -> &[LutEntry] {
        &self.entries
    }

    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// Does any entry produce `symbol`?
    pub fn produces(&self, symbol: SymbolCode) -> bool {
        self.entries.iter().any(|e| e.symbol == symbol)
    }
}

impl TryFrom<Vec<LutEntry>> for Lut {
    type Error = EngineError;

    fn try_from(entries: Vec<LutEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<Lut> for Vec<LutEntry> {
    fn from(lut: Lut) -> Self {
        lut.entries
    }
}

/// Ordered collection of reels, one lookup table per column
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReelSet {
    reels: Vec<Lut>,
}

impl ReelSet {
    pub fn new(reels: Vec<Lut>) -> Self {
        Self { reels }
    }

    /// Number of reels (columns)
    pub fn len(&self) -> usize {
        self.reels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reels.is_empty()
    }

    pub fn reel(&self, col: usize) -> Option<&Lut> {
        self.reels.get(col)
    }

    pub fn reels(&self) -> &[Lut] {
        &self.reels
    }

    /// GenScreen: sample every cell independently from its column's table
    pub fn gen_screen<R: Rng + ?Sized>(&self, rows: usize, rng: &mut R) -> Screen {
        let mut screen = Screen::new(rows, self.reels.len());
        self.gen_screen_into(&mut screen, rng);
        screen
    }

    /// GenScreen into an existing buffer (column count must match)
    pub fn gen_screen_into<R: Rng + ?Sized>(&self, screen: &mut Screen, rng: &mut R) {
        let cols = screen.cols();
        for (idx, cell) in screen.cells_mut().iter_mut().enumerate() {
            *cell = self.reels[idx % cols].draw(rng);
        }
    }
}

/// A finite, sequential symbol source addressed by continuation index
pub trait ReelSource {
    /// Symbol at `index`, or `None` once the source runs out
    fn symbol_at(&self, index: usize) -> Option<SymbolCode>;
}

impl ReelSource for [SymbolCode] {
    #[inline]
    fn symbol_at(&self, index: usize) -> Option<SymbolCode> {
        self.get(index).copied()
    }
}

impl ReelSource for Vec<SymbolCode> {
    #[inline]
    fn symbol_at(&self, index: usize) -> Option<SymbolCode> {
        self.get(index).copied()
    }
}
