mod agent;
mod board;
mod cell;
mod game;
mod knowledge;

pub use agent::MinesweeperAi;
pub use board::{BoardError, Minesweeper};
pub use cell::Cell;
pub use game::{play, simulate, GameError, GameOutcome, GameResult, SimulationConfig, Summary};
pub use knowledge::{Inference, KnowledgeBase, KnowledgeError, Sentence};
