//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the color of a
//! locked block. Uses a flat array for cache locality; dimensions never change.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use crate::pieces::Offset;
use crate::types::{Cell, ColorId, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;

/// Contents of one row captured just before it was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedRow {
    /// Row index the line occupied before removal
    pub y: usize,
    pub cells: [Cell; WIDTH],
}

/// Result of [`Board::clear_lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearedLines {
    /// Removed rows, bottom-most first
    pub rows: Vec<ClearedRow>,
}

impl ClearedLines {
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether a single absolute cell is blocked for a falling piece.
    ///
    /// Walls and the floor block; the space above the top row does not.
    #[inline]
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.is_occupied(x, y)
    }

    /// Check whether `shape` placed at origin (x, y) overlaps a wall, the
    /// floor or a locked block.
    ///
    /// Cells above the visible board (y < 0) never collide, so pieces may
    /// spawn and rotate partially above the top.
    pub fn check_collision(&self, shape: &[Offset], x: i8, y: i8) -> bool {
        shape
            .iter()
            .any(|&(dx, dy)| self.is_blocked(x.saturating_add(dx), y.saturating_add(dy)))
    }

    /// Write `color` into every cell of `shape` at origin (x, y).
    ///
    /// Cells outside the board are dropped; callers validate placement first.
    pub fn lock_piece(&mut self, shape: &[Offset], x: i8, y: i8, color: ColorId) {
        for &(dx, dy) in shape {
            self.set(x.saturating_add(dx), y.saturating_add(dy), Some(color));
        }
    }

    /// Borrow one row; `None` below the floor
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        let start = y.checked_mul(WIDTH)?;
        self.cells.get(start..start.checked_add(WIDTH)?)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map_or(false, |row| row.iter().all(|cell| cell.is_some()))
    }

    /// Remove every full row, shifting the rows above down and inserting
    /// empty rows at the top.
    ///
    /// Any number of simultaneous full rows is handled in one bottom-up
    /// compaction pass; the relative order of surviving rows is preserved.
    pub fn clear_lines(&mut self) -> ClearedLines {
        let mut cleared = ClearedLines::default();
        let mut write_y = BOARD_HEIGHT as usize;

        // Scan from bottom to top
        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                let start = read_y * WIDTH;
                let mut cells = [None; WIDTH];
                cells.copy_from_slice(&self.cells[start..start + WIDTH]);
                cleared.rows.push(ClearedRow { y: read_y, cells });
            } else {
                write_y -= 1;
                if write_y != read_y {
                    // copy_within handles the overlapping ranges
                    let src_start = read_y * WIDTH;
                    self.cells
                        .copy_within(src_start..src_start + WIDTH, write_y * WIDTH);
                }
            }
        }

        // Clear the vacated rows at the top
        self.cells[..write_y * WIDTH].fill(None);

        cleared
    }

    /// Reset every cell to empty
    pub fn reset(&mut self) {
        self.cells.fill(None);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Fill a whole row, leaving out the given columns.
    ///
    /// Test and demo helper for setting up line clears.
    pub fn fill_row_except(&mut self, y: i8, holes: &[i8], color: ColorId) {
        for x in 0..BOARD_WIDTH as i8 {
            if !holes.contains(&x) {
                self.set(x, y, Some(color));
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
