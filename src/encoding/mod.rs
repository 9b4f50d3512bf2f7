//! State and action codecs between chess positions/moves and the tensors a policy/value network consumes.

pub mod constants;
mod action;
mod error;
mod move_direction;
mod planes;
mod position;

pub use action::*;
pub use error::*;
pub use move_direction::*;
pub use planes::*;
pub use position::*;
