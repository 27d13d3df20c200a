use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

use super::KnowledgeError;
use crate::cell::Cell;

/// A [Sentence] asserts that exactly `count` of its cells are mines.
///
/// Invariant: `count <= cells.len()`. Every operation that would break it fails with
/// [KnowledgeError::Inconsistent] instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    pub fn new(
        cells: impl IntoIterator<Item = Cell>,
        count: usize,
    ) -> Result<Self, KnowledgeError> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(KnowledgeError::CountOutOfRange {
                count,
                cells: cells.len(),
            });
        }
        Ok(Self { cells, count })
    }

    #[inline]
    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns all cells of this sentence if all of them must be mines.
    pub fn known_mines(&self) -> Option<&BTreeSet<Cell>> {
        (!self.is_empty() && self.count == self.len()).then_some(&self.cells)
    }

    /// Returns all cells of this sentence if none of them can be a mine.
    pub fn known_safes(&self) -> Option<&BTreeSet<Cell>> {
        (!self.is_empty() && self.count == 0).then_some(&self.cells)
    }

    /// Removes `cell`, which is known to be a mine, and lowers the count accordingly.
    /// Returns whether the sentence changed.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool, KnowledgeError> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        if self.count == 0 {
            return Err(KnowledgeError::Inconsistent(format!(
                "{} is a mine but {} says none of its cells are",
                cell, self
            )));
        }
        self.cells.remove(&cell);
        self.count -= 1;
        Ok(true)
    }

    /// Removes `cell`, which is known to be safe. The count stays the same.
    /// Returns whether the sentence changed.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<bool, KnowledgeError> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        if self.count == self.len() {
            return Err(KnowledgeError::Inconsistent(format!(
                "{} is safe but {} says all of its cells are mines",
                cell, self
            )));
        }
        self.cells.remove(&cell);
        Ok(true)
    }

    pub fn is_strict_subset_of(&self, other: &Sentence) -> bool {
        self.len() < other.len() && self.cells.is_subset(&other.cells)
    }

    /// Given that `subset` holds on some of this sentence's cells, the remaining cells
    /// hold the remaining mines.
    pub fn subtract(&self, subset: &Sentence) -> Result<Sentence, KnowledgeError> {
        debug_assert!(subset.is_strict_subset_of(self));
        let inconsistent = || {
            KnowledgeError::Inconsistent(format!("{} cannot hold inside {}", subset, self))
        };
        let count = self.count.checked_sub(subset.count).ok_or_else(inconsistent)?;
        let cells: BTreeSet<Cell> = self.cells.difference(&subset.cells).copied().collect();
        if count > cells.len() {
            return Err(inconsistent());
        }
        Ok(Sentence { cells, count })
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().join(", "), self.count)
    }
}
