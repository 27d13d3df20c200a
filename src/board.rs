use bitvec::prelude::*;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::cell::Cell;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board must have at least one row and one column")]
    EmptyBoard,

    #[error("Cannot place {mines} mines on a board with {cells} cells")]
    TooManyMines { mines: usize, cells: usize },

    #[error("Invalid board layout: {0}")]
    Parse(String),
}

/// A [Minesweeper] board: the hidden mine layout plus the cells the player has flagged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Minesweeper {
    height: usize,
    width: usize,
    // One bit per cell, set if the cell holds a mine.
    // Cells are ordered by rows, first left-to-right, then top-to-bottom.
    mines: BitVec,
    mines_found: HashSet<Cell>,
}

impl Minesweeper {
    pub const DEFAULT_HEIGHT: usize = 8;
    pub const DEFAULT_WIDTH: usize = 8;
    pub const DEFAULT_MINES: usize = 8;

    /// Creates a board with exactly `mines` mines placed uniformly at random.
    pub fn new(
        height: usize,
        width: usize,
        mines: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new_empty(height, width)?;
        let cells = height * width;
        if mines > cells {
            return Err(BoardError::TooManyMines { mines, cells });
        }

        let mut placed = 0;
        while placed < mines {
            let index = rng.gen_range(0..cells);
            if !board.mines[index] {
                board.mines.set(index, true);
                placed += 1;
            }
        }
        Ok(board)
    }

    fn new_empty(height: usize, width: usize) -> Result<Self, BoardError> {
        if height == 0 || width == 0 {
            return Err(BoardError::EmptyBoard);
        }
        Ok(Self {
            height,
            width,
            mines: bitvec![0; height * width],
            mines_found: HashSet::new(),
        })
    }

    /// Parses a layout where every row is a line of whitespace separated `*` (mine) or `_` (no mine) symbols.
    pub fn from_str(layout: &str) -> Result<Self, BoardError> {
        let rows: Vec<Vec<&str>> = layout
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let mut board = Self::new_empty(height, width)?;

        for (row, symbols) in rows.iter().enumerate() {
            if symbols.len() != width {
                return Err(BoardError::Parse(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    symbols.len(),
                    width
                )));
            }
            for (col, symbol) in symbols.iter().enumerate() {
                match *symbol {
                    "*" => {
                        let index = board.index(Cell::new(row, col));
                        board.mines.set(index, true);
                    }
                    "_" => {}
                    other => {
                        return Err(BoardError::Parse(format!(
                            "unknown symbol `{}` at {}",
                            other,
                            Cell::new(row, col)
                        )))
                    }
                }
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn num_mines(&self) -> usize {
        self.mines.count_ones()
    }

    fn index(&self, cell: Cell) -> usize {
        assert!(
            cell.is_within(self.height, self.width),
            "cell {} is outside of the {}x{} board",
            cell,
            self.height,
            self.width
        );
        cell.row * self.width + cell.col
    }

    #[inline]
    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines[self.index(cell)]
    }

    /// Returns the number of mines within one row and column of `cell`, not counting the cell itself.
    pub fn nearby_mines(&self, cell: Cell) -> usize {
        cell.neighbors(self.height, self.width)
            .filter(|neighbor| self.is_mine(*neighbor))
            .count()
    }

    /// Records that the player believes `cell` to be a mine.
    pub fn flag(&mut self, cell: Cell) {
        assert!(cell.is_within(self.height, self.width));
        self.mines_found.insert(cell);
    }

    pub fn mines_found(&self) -> &HashSet<Cell> {
        &self.mines_found
    }

    /// The game is won once exactly the mine cells have been flagged.
    pub fn won(&self) -> bool {
        self.mines_found.len() == self.num_mines()
            && self.mines_found.iter().all(|cell| self.is_mine(*cell))
    }
}

impl fmt::Display for Minesweeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "--".repeat(self.width);
        for row in 0..self.height {
            writeln!(f, "{}-", rule)?;
            for col in 0..self.width {
                let symbol = if self.is_mine(Cell::new(row, col)) { "X" } else { " " };
                write!(f, "|{}", symbol)?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}-", rule)
    }
}
