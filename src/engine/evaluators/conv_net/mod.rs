//! Residual convolutional policy/value network on `tch`, used for inference only.

pub mod conv_net;
mod evaluator;
mod policy_head;
mod residual_block;
mod value_head;

pub use evaluator::*;
