//! AlphaZero-style chess self-play: position and move codecs, a PUCT tree search guided by a
//! policy/value evaluator, and a driver that turns finished games into training examples.

pub mod config;
pub mod dataset;
pub mod encoding;
pub mod engine;
pub mod state;
