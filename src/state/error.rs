use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },
    #[error("illegal move {0}")]
    IllegalMove(String),
}
