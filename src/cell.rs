use std::fmt;

/// A [Cell] is a position on the board, given as `(row, col)`.
/// Cells order by row first, then by column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_within(&self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// Returns the cells within one step of this cell in any of the 8 directions that lie on a
    /// `height` x `width` board. The cell itself is never returned.
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        let rows = self.row.saturating_sub(1)..=(self.row + 1).min(height.saturating_sub(1));
        let cols = self.col.saturating_sub(1)..=(self.col + 1).min(width.saturating_sub(1));
        rows.flat_map(move |row| cols.clone().map(move |col| Cell::new(row, col)))
            .filter(move |cell| *cell != self && cell.is_within(height, width))
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
