//! Game state related code: a position with its move history, layered on top of the `chess` crate's
//! legal move generation.

mod error;
mod fen;
mod make_move;
mod state;
mod termination;

pub use error::*;
pub use fen::*;
pub use state::*;
pub use termination::*;
