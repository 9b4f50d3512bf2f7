//! Search and self-play: evaluators, the PUCT tree and the game driver.

mod error;
mod evaluation;
pub mod evaluators;
pub mod mcts;
pub mod self_play;

pub use error::*;
pub use evaluation::*;
pub use self_play::{GameRecord, SelfPlay};
