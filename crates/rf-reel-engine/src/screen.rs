//! Fixed-size screen of symbol codes, laid out row-major

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::symbols::{EMPTY, SymbolCode};

/// A `rows × cols` board. Cell `(row, col)` lives at `row * cols + col`;
/// row 0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    rows: usize,
    cols: usize,
    cells: Vec<SymbolCode>,
}

impl Screen {
    /// Create an all-empty screen
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![EMPTY; rows * cols],
        }
    }

    /// Wrap existing cells; length must equal `rows × cols`
    pub fn from_cells(
        rows: usize,
        cols: usize,
        cells: Vec<SymbolCode>,
    ) -> Result<Self, EngineError> {
        if cells.len() != rows * cols {
            return Err(EngineError::ScreenShape {
                expected: rows * cols,
                actual: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cell count
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of `(row, col)`
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Symbol at `(row, col)`
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> SymbolCode {
        self.cells[self.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, symbol: SymbolCode) {
        let idx = self.index(row, col);
        self.cells[idx] = symbol;
    }

    pub fn cells(&self) -> &[SymbolCode] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [SymbolCode] {
        &mut self.cells
    }

    /// Column `col` read top to bottom
    pub fn column(&self, col: usize) -> Vec<SymbolCode> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    /// Number of empty-sentinel cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == EMPTY).count()
    }

    /// Copy another screen of the same shape into this one
    pub fn copy_from(&mut self, other: &Screen) -> Result<(), EngineError> {
        if other.rows != self.rows || other.cols != self.cols {
            return Err(EngineError::ScreenShape {
                expected: self.len(),
                actual: other.len(),
            });
        }
        self.cells.copy_from_slice(&other.cells);
        Ok(())
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>2}", self.get(row, col))?;
            }
        }
        Ok(())
    }
}
