use thiserror::Error;

/// Errors raised at the rules-engine boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The text is not a coordinate move like `e2e4` or `e7e8q`.
    #[error("malformed move encoding: {encoding:?}")]
    MalformedMove { encoding: String },

    /// Well-formed, but not legal in the current position.
    #[error("illegal move: {encoding}")]
    IllegalMove { encoding: String },

    #[error("invalid FEN {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
