use thiserror::Error;
use crate::encoding::constants::NUM_ACTIONS;
use crate::encoding::CodecError;
use crate::state::StateError;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("policy has {0} entries, expected {expected}", expected = NUM_ACTIONS)]
    PolicyShape(usize),
    #[error("value {0} is not a finite number in [-1, 1]")]
    InvalidValue(f32),
    #[error("expected an input of shape {expected:?}, got {actual:?}")]
    InputShape { expected: Vec<i64>, actual: Vec<i64> },
    #[error("could not read the input tensor: {0}")]
    Input(#[from] CodecError),
    #[error("tensor operation failed: {0}")]
    Tensor(#[from] tch::TchError),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("cannot search from a terminal position")]
    TerminalRoot,
    #[error("action {0} is not legal in the position being searched")]
    IllegalAction(usize),
    #[error("search path is empty")]
    EmptyPath,
    #[error("no child node for action {0}")]
    MissingChild(usize),
    #[error("position has no legal actions")]
    NoLegalActions,
    #[error("invalid Dirichlet concentration {0}")]
    InvalidDirichletAlpha(f32),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
}

#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("could not sample a move from the visit distribution: {0}")]
    Sampling(String),
}
