use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use crate::agent::MinesweeperAi;
use crate::board::{BoardError, Minesweeper};
use crate::cell::Cell;
use crate::knowledge::KnowledgeError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// All mines were flagged.
    Won,

    /// A probe hit a mine.
    Lost { mine: Cell },

    /// Every cell was either probed or is a known mine, but not all mines were flagged.
    /// Only happens if the board and the AI's knowledge disagree.
    Stuck,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub result: GameResult,
    pub safe_moves: usize,
    pub random_moves: usize,
}

/// Lets the [MinesweeperAi] play on `board` until the game is decided.
///
/// Every turn the AI probes a known safe cell if it has one and guesses otherwise. Known mines
/// get flagged on the board after each turn.
pub fn play(board: &mut Minesweeper, rng: &mut impl Rng) -> Result<GameOutcome, GameError> {
    let mut ai = MinesweeperAi::new(board.height(), board.width());
    let mut safe_moves = 0;
    let mut random_moves = 0;

    let result = loop {
        if board.won() {
            break GameResult::Won;
        }

        let probe = if let Some(cell) = ai.make_safe_move() {
            safe_moves += 1;
            cell
        } else if let Some(cell) = ai.make_random_move(rng) {
            random_moves += 1;
            cell
        } else {
            break GameResult::Stuck;
        };

        if board.is_mine(probe) {
            break GameResult::Lost { mine: probe };
        }

        ai.add_knowledge(probe, board.nearby_mines(probe))?;
        for mine in ai.knowledge().known_mines() {
            board.flag(mine);
        }
    };

    Ok(GameOutcome {
        result,
        safe_moves,
        random_moves,
    })
}

/// Parameters of a batch of games.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    pub games: usize,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            height: Minesweeper::DEFAULT_HEIGHT,
            width: Minesweeper::DEFAULT_WIDTH,
            mines: Minesweeper::DEFAULT_MINES,
            games: 1000,
            seed: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub won: usize,
    pub lost: usize,
    pub stuck: usize,
    pub safe_moves: usize,
    pub random_moves: usize,
}

impl Summary {
    pub fn games(&self) -> usize {
        self.won + self.lost + self.stuck
    }

    fn add(mut self, outcome: GameOutcome) -> Self {
        match outcome.result {
            GameResult::Won => self.won += 1,
            GameResult::Lost { .. } => self.lost += 1,
            GameResult::Stuck => self.stuck += 1,
        }
        self.safe_moves += outcome.safe_moves;
        self.random_moves += outcome.random_moves;
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            won: self.won + other.won,
            lost: self.lost + other.lost,
            stuck: self.stuck + other.stuck,
            safe_moves: self.safe_moves + other.safe_moves,
            random_moves: self.random_moves + other.random_moves,
        }
    }
}

/// Plays `config.games` independent games in parallel. Game `i` uses a random generator seeded
/// with `config.seed + i` for both the mine layout and the AI's guesses, so results are reproducible.
pub fn simulate(config: &SimulationConfig) -> Result<Summary, GameError> {
    (0..config.games as u64)
        .into_par_iter()
        .map(|game| -> Result<GameOutcome, GameError> {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(game));
            let mut board = Minesweeper::new(config.height, config.width, config.mines, &mut rng)?;
            play(&mut board, &mut rng)
        })
        .try_fold(Summary::default, |summary, outcome| -> Result<Summary, GameError> {
            Ok(summary.add(outcome?))
        })
        .try_reduce(Summary::default, |a, b| Ok(a.merge(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn board_without_mines_is_won() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut board = Minesweeper::from_str("_ _ _\n_ _ _").unwrap();
        let outcome = play(&mut board, &mut rng).unwrap();
        assert_eq!(GameResult::Won, outcome.result);
        assert_eq!(0, outcome.safe_moves + outcome.random_moves);
    }

    #[test]
    fn won_games_flag_exactly_the_mines() {
        let mut wins = 0;
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Minesweeper::from_str(
                "
                _ _ _
                _ _ _
                _ _ _
                _ _ *
            ",
            )
            .unwrap();
            let outcome = play(&mut board, &mut rng).unwrap();
            match outcome.result {
                GameResult::Won => {
                    wins += 1;
                    assert_eq!(
                        &[Cell::new(3, 2)].into_iter().collect::<HashSet<_>>(),
                        board.mines_found()
                    );
                }
                GameResult::Lost { mine } => {
                    assert_eq!(Cell::new(3, 2), mine);
                    assert!(outcome.random_moves >= 1);
                }
                GameResult::Stuck => panic!("AI got stuck on a consistent board"),
            }
        }
        assert!(wins > 0);
    }

    #[test]
    fn probing_a_mine_loses() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut board = Minesweeper::from_str("* *\n* *").unwrap();
        let outcome = play(&mut board, &mut rng).unwrap();
        assert!(matches!(outcome.result, GameResult::Lost { .. }));
        assert_eq!(1, outcome.random_moves);
    }

    #[test]
    fn enclosed_mine_cannot_be_won() {
        // The corner mine is surrounded by mines, so no revealed count ever mentions it
        // and the AI has to guess it eventually.
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Minesweeper::from_str(
                "
                * * _
                * * _
                _ _ _
            ",
            )
            .unwrap();
            let outcome = play(&mut board, &mut rng).unwrap();
            assert!(matches!(outcome.result, GameResult::Lost { .. }));
            assert!(!board.mines_found().contains(&Cell::new(0, 0)));
        }
    }

    #[test]
    fn simulate_is_reproducible() {
        let config = SimulationConfig {
            games: 50,
            ..SimulationConfig::default()
        };
        let first = simulate(&config).unwrap();
        let second = simulate(&config).unwrap();
        assert_eq!(first, second);
        assert_eq!(50, first.games());
        assert!(first.won > 0);
    }

    #[test]
    fn simulate_reports_board_errors() {
        let config = SimulationConfig {
            height: 2,
            width: 2,
            mines: 5,
            games: 3,
            seed: 0,
        };
        assert_eq!(
            Err(GameError::Board(BoardError::TooManyMines { mines: 5, cells: 4 })),
            simulate(&config),
        );
    }
}
