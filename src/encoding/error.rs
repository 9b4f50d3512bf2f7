use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("expected a tensor of shape {expected:?}, got {actual:?}")]
    TensorShape { expected: Vec<i64>, actual: Vec<i64> },
    #[error("tensor conversion failed: {0}")]
    TensorConversion(#[from] tch::TchError),
    #[error("square {square} is claimed by planes {first} and {second}")]
    SquareConflict { square: String, first: usize, second: usize },
    #[error("piece plane {plane} holds non-binary value {value} at {square}")]
    NonBinaryPlane { plane: usize, square: String, value: f32 },
    #[error("move type {0} is out of range")]
    InvalidMoveType(usize),
    #[error("coordinates ({file}, {rank}) are off the board")]
    OffBoard { file: i32, rank: i32 },
    #[error("action index {0} is out of range")]
    ActionOutOfRange(usize),
    #[error("move {0} cannot be encoded")]
    UnencodableMove(String),
    #[error("moves {first} and {second} share action index {index}")]
    ActionCollision { index: usize, first: String, second: String },
    #[error("decoded board is invalid: {0}")]
    InvalidBoard(String),
}
