use rand::seq::SliceRandom;
use rand::Rng;

use crate::cell::Cell;
use crate::knowledge::{Inference, KnowledgeBase, KnowledgeError};

/// A [MinesweeperAi] picks moves based on what its [KnowledgeBase] can prove.
#[derive(Clone, Debug)]
pub struct MinesweeperAi {
    knowledge: KnowledgeBase,
}

impl MinesweeperAi {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            knowledge: KnowledgeBase::new(height, width),
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<Inference, KnowledgeError> {
        self.knowledge.add_knowledge(cell, count)
    }

    /// Returns a cell that is known to be safe and hasn't been probed yet.
    /// Always the smallest such cell, so games replay the same way.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.knowledge.safe_moves().into_iter().next()
    }

    /// Returns a cell chosen uniformly among the cells that haven't been probed and aren't known mines.
    pub fn make_random_move(&self, rng: &mut impl Rng) -> Option<Cell> {
        let candidates: Vec<Cell> = self.unexplored_cells().collect();
        candidates.choose(rng).copied()
    }

    fn unexplored_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let knowledge = &self.knowledge;
        (0..knowledge.height())
            .flat_map(move |row| (0..knowledge.width()).map(move |col| Cell::new(row, col)))
            .filter(move |cell| {
                !knowledge.moves_made().contains(cell) && !knowledge.is_known_mine(*cell)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn no_safe_move_at_start() {
        let ai = MinesweeperAi::new(8, 8);
        assert_eq!(None, ai.make_safe_move());
    }

    #[test]
    fn safe_move_after_zero() {
        let mut ai = MinesweeperAi::new(3, 3);
        ai.add_knowledge(Cell::new(1, 1), 0).unwrap();
        assert_eq!(Some(Cell::new(0, 0)), ai.make_safe_move());
    }

    #[test]
    fn random_move_avoids_moves_and_mines() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut ai = MinesweeperAi::new(1, 3);
        ai.add_knowledge(Cell::new(0, 0), 1).unwrap();
        assert!(ai.knowledge().is_known_mine(Cell::new(0, 1)));
        for _ in 0..20 {
            assert_eq!(Some(Cell::new(0, 2)), ai.make_random_move(&mut rng));
        }
    }

    #[test]
    fn random_move_covers_all_candidates() {
        let mut rng = StdRng::seed_from_u64(0);
        let ai = MinesweeperAi::new(2, 2);
        let chosen: HashSet<Cell> = (0..200)
            .filter_map(|_| ai.make_random_move(&mut rng))
            .collect();
        assert_eq!(4, chosen.len());
    }

    #[test]
    fn no_random_move_left() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut ai = MinesweeperAi::new(1, 2);
        ai.add_knowledge(Cell::new(0, 0), 1).unwrap();
        assert_eq!(None, ai.make_random_move(&mut rng));
        assert_eq!(None, ai.make_safe_move());
    }
}
