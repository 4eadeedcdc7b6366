//! Board generation and the flat/pretty string codecs.
//!
//! The reference board is generated once at startup: a wall layer drawn
//! cell-by-cell from a weighted distribution, then one cell per unique
//! letter of the target word. The flat encoding (row-major, one char per
//! cell, no separators) is the wire form pushed to the store; the pretty
//! encoding is for terminal display only.

use crate::word::TargetWord;
use crate::{SYMBOL_EMPTY, SYMBOL_WALL_H, SYMBOL_WALL_V};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("wall weight table is empty or all zero")]
    BadWeights,
    #[error("no empty cell left to place letter '{0}'")]
    NoEmptyCell(char),
    #[error("map string holds {got} cells, expected {want}")]
    BadLength { got: usize, want: usize },
}

/// Relative spawn weights for the wall draw. Empty cells must dominate or
/// letter placement runs out of room.
#[derive(Debug, Clone, Copy)]
pub struct WallWeights {
    pub empty: u32,
    pub vertical: u32,
    pub horizontal: u32,
}

impl Default for WallWeights {
    fn default() -> Self {
        Self {
            empty: 17,
            vertical: 1,
            horizontal: 1,
        }
    }
}

/// Square grid of cell symbols, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<char>,
}

impl Board {
    /// Builds a reference board: wall layer first (independent weighted draw
    /// per cell), then each unique letter of `word` placed exactly once on a
    /// uniformly chosen empty cell, redrawing until an empty cell is hit.
    pub fn generate(
        size: usize,
        weights: &WallWeights,
        word: &TargetWord,
        rng: &mut impl Rng,
    ) -> Result<Self, BoardError> {
        let symbols = [SYMBOL_EMPTY, SYMBOL_WALL_V, SYMBOL_WALL_H];
        let draw = WeightedIndex::new([weights.empty, weights.vertical, weights.horizontal])
            .map_err(|_| BoardError::BadWeights)?;

        let mut cells = Vec::with_capacity(size * size);
        for _ in 0..size * size {
            cells.push(symbols[draw.sample(rng)]);
        }
        let mut board = Board { size, cells };

        for &letter in word.unique() {
            // Redraw-until-empty terminates iff an empty cell remains.
            if !board.cells.contains(&SYMBOL_EMPTY) {
                return Err(BoardError::NoEmptyCell(letter));
            }
            loop {
                let x = rng.gen_range(0..size);
                let y = rng.gen_range(0..size);
                if board.at(x, y) == SYMBOL_EMPTY {
                    board.set(x, y, letter);
                    break;
                }
            }
        }

        Ok(board)
    }

    /// Inverse of [`Board::encode`]; `flat` must hold exactly `size²` chars.
    pub fn decode(flat: &str, size: usize) -> Result<Self, BoardError> {
        let cells: Vec<char> = flat.chars().collect();
        if cells.len() != size * size {
            return Err(BoardError::BadLength {
                got: cells.len(),
                want: size * size,
            });
        }
        Ok(Board { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Symbol at an in-range cell. Panics on out-of-range coordinates;
    /// callers clamp first or use [`Board::get`].
    pub fn at(&self, x: usize, y: usize) -> char {
        debug_assert!(x < self.size && y < self.size);
        self.cells[y * self.size + x]
    }

    /// Bounds-checked lookup for raw, possibly out-of-range coordinates.
    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        if x < 0 || y < 0 || x as usize >= self.size || y as usize >= self.size {
            return None;
        }
        Some(self.at(x as usize, y as usize))
    }

    pub fn set(&mut self, x: usize, y: usize, symbol: char) {
        debug_assert!(x < self.size && y < self.size);
        self.cells[y * self.size + x] = symbol;
    }

    /// Row-major concatenation, one char per cell, no delimiters.
    pub fn encode(&self) -> String {
        self.cells.iter().collect()
    }

    /// Cells space-separated per row, rows newline-joined. Each cell takes
    /// two display columns: the symbol and its trailing separator.
    pub fn pretty(&self) -> String {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().flat_map(|&c| [c, ' ']).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
