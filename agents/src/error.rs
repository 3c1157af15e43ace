use chess_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A move was submitted after the game ended.
    #[error("game is over ({result})")]
    GameOver { result: String },

    /// A player move was submitted while the engine is to move.
    #[error("it is not the player's turn")]
    NotPlayersTurn,

    #[error("invalid engine configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type AgentResult<T> = Result<T, AgentError>;
