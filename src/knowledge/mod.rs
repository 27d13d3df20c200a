use itertools::Itertools;
use std::collections::{BTreeSet, HashSet, VecDeque};
use thiserror::Error;

use crate::cell::Cell;

mod sentence;
pub use sentence::Sentence;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("Cell {cell} is outside of the {height}x{width} board")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("{count} mines cannot be among {cells} cells")]
    CountOutOfRange { count: usize, cells: usize },

    #[error("Cell {0} is known to be both a mine and safe")]
    MineAndSafe(Cell),

    #[error("Inconsistent knowledge: {0}")]
    Inconsistent(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fact {
    Mine,
    Safe,
}

/// What a single update to the [KnowledgeBase] found out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inference {
    /// Cells that became known mines during the update.
    pub mines: BTreeSet<Cell>,
    /// Cells that became known safe during the update.
    pub safes: BTreeSet<Cell>,
    /// Number of propagation rounds until nothing new could be derived.
    pub rounds: usize,
}

/// The [KnowledgeBase] collects [Sentence]s about a board and deduces which cells are mines and which are safe.
///
/// Invariants, holding whenever no method is running:
///  - `mines` and `safes` are disjoint.
///  - No sentence mentions a cell from `mines` or `safes`.
///  - No sentence is empty, and no sentence allows a direct inference, i.e. `0 < count < len`.
///  - Subsumption between any two sentences yields nothing that isn't already in `sentences`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeBase {
    height: usize,
    width: usize,
    sentences: HashSet<Sentence>,
    moves_made: HashSet<Cell>,
    mines: HashSet<Cell>,
    safes: HashSet<Cell>,
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            sentences: HashSet::new(),
            moves_made: HashSet::new(),
            mines: HashSet::new(),
            safes: HashSet::new(),
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter()
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    pub fn known_mines(&self) -> BTreeSet<Cell> {
        self.mines.iter().copied().collect()
    }

    pub fn known_safes(&self) -> BTreeSet<Cell> {
        self.safes.iter().copied().collect()
    }

    #[inline]
    pub fn is_known_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Returns the cells known to be safe that haven't been probed yet.
    pub fn safe_moves(&self) -> BTreeSet<Cell> {
        self.safes.difference(&self.moves_made).copied().collect()
    }

    /// Marks `cell` as a mine and propagates the consequences.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<Inference, KnowledgeError> {
        self.mark(cell, Fact::Mine)
    }

    /// Marks `cell` as safe and propagates the consequences.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<Inference, KnowledgeError> {
        self.mark(cell, Fact::Safe)
    }

    fn mark(&mut self, cell: Cell, fact: Fact) -> Result<Inference, KnowledgeError> {
        self.check_bounds(cell)?;
        self.transaction(|kb| {
            let mut inference = Inference::default();
            kb.propagate(VecDeque::from([(cell, fact)]), &mut inference)?;
            Ok(inference)
        })
    }

    /// Records that `cell` was probed, turned out safe, and has `count` mines among its neighbors.
    /// Afterwards, everything that follows from the knowledge base has been deduced.
    ///
    /// If the observation contradicts what is already known, an error is returned and the
    /// knowledge base stays unchanged.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<Inference, KnowledgeError> {
        self.check_bounds(cell)?;
        let neighbors: Vec<Cell> = cell.neighbors(self.height, self.width).collect();
        if count > neighbors.len() {
            return Err(KnowledgeError::CountOutOfRange {
                count,
                cells: neighbors.len(),
            });
        }

        self.transaction(|kb| {
            let mut inference = Inference::default();
            let mut pending = VecDeque::new();

            kb.moves_made.insert(cell);
            kb.apply(cell, Fact::Safe, &mut pending, &mut inference)?;

            let known_mines = neighbors.iter().filter(|n| kb.mines.contains(*n)).count();
            let remaining = count.checked_sub(known_mines).ok_or_else(|| {
                KnowledgeError::Inconsistent(format!(
                    "{} has {} neighboring mines but {} of its neighbors are known mines",
                    cell, count, known_mines
                ))
            })?;
            let undetermined = neighbors
                .iter()
                .filter(|n| !kb.mines.contains(*n) && !kb.safes.contains(*n))
                .copied();
            let sentence = Sentence::new(undetermined, remaining).map_err(|_| {
                KnowledgeError::Inconsistent(format!(
                    "{} has more neighboring mines than undetermined neighbors",
                    cell
                ))
            })?;
            kb.insert_sentence(sentence, &mut pending)?;

            kb.propagate(pending, &mut inference)?;
            Ok(inference)
        })
    }

    fn check_bounds(&self, cell: Cell) -> Result<(), KnowledgeError> {
        if cell.is_within(self.height, self.width) {
            Ok(())
        } else {
            Err(KnowledgeError::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// Runs `update` on a copy and only keeps the result if it succeeded.
    fn transaction<T>(
        &mut self,
        update: impl FnOnce(&mut Self) -> Result<T, KnowledgeError>,
    ) -> Result<T, KnowledgeError> {
        let mut next = self.clone();
        let result = update(&mut next)?;
        *self = next;
        Ok(result)
    }

    /// Applies the `pending` facts and derives new sentences until a fixed point is reached.
    fn propagate(
        &mut self,
        mut pending: VecDeque<(Cell, Fact)>,
        inference: &mut Inference,
    ) -> Result<(), KnowledgeError> {
        loop {
            inference.rounds += 1;

            while let Some((cell, fact)) = pending.pop_front() {
                self.apply(cell, fact, &mut pending, inference)?;
            }

            let mut found_something = false;
            for sentence in self.subsumptions()? {
                if !self.sentences.contains(&sentence) {
                    found_something |= self.insert_sentence(sentence, &mut pending)?;
                }
            }
            if !found_something {
                debug_assert!(pending.is_empty());
                return Ok(());
            }
        }
    }

    /// Records a single fact and rewrites every sentence that mentions the cell.
    /// Sentences that become decidable through the rewrite queue their cells onto `pending`.
    fn apply(
        &mut self,
        cell: Cell,
        fact: Fact,
        pending: &mut VecDeque<(Cell, Fact)>,
        inference: &mut Inference,
    ) -> Result<(), KnowledgeError> {
        let newly_known = match fact {
            Fact::Mine => {
                if self.safes.contains(&cell) {
                    return Err(KnowledgeError::MineAndSafe(cell));
                }
                self.mines.insert(cell) && inference.mines.insert(cell)
            }
            Fact::Safe => {
                if self.mines.contains(&cell) {
                    return Err(KnowledgeError::MineAndSafe(cell));
                }
                self.safes.insert(cell) && inference.safes.insert(cell)
            }
        };
        if !newly_known {
            return Ok(());
        }

        let affected: Vec<Sentence> = self
            .sentences
            .iter()
            .filter(|sentence| sentence.contains(cell))
            .cloned()
            .collect();
        for mut sentence in affected {
            self.sentences.remove(&sentence);
            match fact {
                Fact::Mine => sentence.mark_mine(cell)?,
                Fact::Safe => sentence.mark_safe(cell)?,
            };
            self.insert_sentence(sentence, pending)?;
        }
        Ok(())
    }

    /// Adds `sentence` unless it is empty or already known. Returns whether it was added.
    fn insert_sentence(
        &mut self,
        sentence: Sentence,
        pending: &mut VecDeque<(Cell, Fact)>,
    ) -> Result<bool, KnowledgeError> {
        if sentence.is_empty() {
            return Ok(false);
        }
        if let Some(mines) = sentence.known_mines() {
            pending.extend(mines.iter().map(|cell| (*cell, Fact::Mine)));
        }
        if let Some(safes) = sentence.known_safes() {
            pending.extend(safes.iter().map(|cell| (*cell, Fact::Safe)));
        }
        Ok(self.sentences.insert(sentence))
    }

    /// Derives `superset - subset` for every pair of sentences where one is a strict subset of the other.
    fn subsumptions(&self) -> Result<Vec<Sentence>, KnowledgeError> {
        let mut derived = Vec::new();
        for (first, second) in self.sentences.iter().tuple_combinations() {
            if first.cells() == second.cells() {
                // Equal sentences are deduplicated by the set, so the counts must differ.
                return Err(KnowledgeError::Inconsistent(format!(
                    "{} contradicts {}",
                    first, second
                )));
            } else if first.is_strict_subset_of(second) {
                derived.push(second.subtract(first)?);
            } else if second.is_strict_subset_of(first) {
                derived.push(first.subtract(second)?);
            }
        }
        Ok(derived)
    }
}
