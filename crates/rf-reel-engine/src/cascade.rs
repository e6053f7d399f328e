//! Cascade/tumble primitives
//!
//! Three in-place operations on a fixed-size [`Screen`]:
//!
//! ```text
//! clear    hit-map cells → EMPTY
//! gravity  compact each column toward the bottom, record fill-start rows
//! fill     draw into the gaps from per-column reel sources
//! ```
//!
//! None of them allocate; callers own the fill-start and cursor buffers.

use crate::error::EngineError;
use crate::reels::ReelSource;
use crate::screen::Screen;
use crate::symbols::EMPTY;

/// Set every in-bounds hit-map cell to `EMPTY`.
///
/// Out-of-bounds indices are ignored. Returns the number of cells that held
/// a symbol before clearing.
pub fn clear(screen: &mut Screen, hit_map: &[usize]) -> usize {
    let cells = screen.cells_mut();
    let mut cleared = 0;
    for &idx in hit_map {
        if let Some(cell) = cells.get_mut(idx) {
            if *cell != EMPTY {
                cleared += 1;
            }
            *cell = EMPTY;
        }
    }
    cleared
}

/// Compact non-empty cells of every column toward the bottom.
///
/// Single backward scan per column: the write pointer starts at the bottom
/// row, the read pointer walks upward and each non-empty cell is copied down
/// to the write pointer. Everything above the final write pointer becomes
/// `EMPTY`, and that row is stored in `fill_start[col]` (`None` when the
/// column is full).
///
/// `fill_start` must hold at least `screen.cols()` entries.
pub fn gravity(screen: &mut Screen, fill_start: &mut [Option<usize>]) {
    let rows = screen.rows();
    let cols = screen.cols();
    let cells = screen.cells_mut();

    for col in 0..cols {
        // Rows below `write` are settled.
        let mut write = rows;
        for read in (0..rows).rev() {
            let symbol = cells[read * cols + col];
            if symbol != EMPTY {
                write -= 1;
                cells[write * cols + col] = symbol;
            }
        }
        for row in 0..write {
            cells[row * cols + col] = EMPTY;
        }
        fill_start[col] = write.checked_sub(1);
    }
}

/// Fill every column from its fill-start row upward.
///
/// Column `col` draws sequentially from `sources[col]` starting at
/// `cursor[col]`; the cursor advances by one per symbol consumed and is never
/// wrapped. Running out of a source is a configuration error.
///
/// Returns the number of symbols drawn.
pub fn fill<S: ReelSource>(
    screen: &mut Screen,
    fill_start: &[Option<usize>],
    sources: &[S],
    cursor: &mut [usize],
) -> Result<usize, EngineError> {
    let cols = screen.cols();
    let cells = screen.cells_mut();
    let mut drawn = 0;

    for col in 0..cols {
        let Some(start) = fill_start[col] else {
            continue;
        };
        for row in (0..=start).rev() {
            let index = cursor[col];
            let symbol = sources[col]
                .symbol_at(index)
                .ok_or(EngineError::ReelExhausted { column: col, index })?;
            cells[row * cols + col] = symbol;
            cursor[col] = index + 1;
            drawn += 1;
        }
    }

    Ok(drawn)
}
