pub mod book;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod history;
pub mod minimax;
pub mod ordering;
pub mod search;
pub mod session;

use chess_core::{GamePosition, Move};

/// Core trait for chess agents
pub trait Agent {
    /// Pick a move for the side to move, or `None` when there is no legal move.
    ///
    /// `history` holds the moves already played in this game.
    fn best_move(&mut self, position: &GamePosition, history: &RepetitionGuard) -> Option<Move>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use book::OpeningBook;
pub use config::{EngineConfig, MobilityMode};
pub use error::{AgentError, AgentResult};
pub use evaluation::{Evaluator, CHECKMATE_SCORE};
pub use history::{MoveHistory, RepetitionGuard};
pub use minimax::MinimaxAgent;
pub use ordering::{is_castling, move_score, order_moves, order_successors};
pub use search::*;
pub use session::{AiMoveOutcome, GameSession, MoveReport, SessionState, TurnReport};
