use tch::{nn, Tensor};
use crate::encoding::constants::NUM_SQUARES;

const HIDDEN_UNITS: i64 = 64;

#[derive(Debug)]
pub struct ValueHead {
    conv: nn::Conv2D,
    bn: nn::BatchNorm,
    fc1: nn::Linear,
    fc2: nn::Linear,
}

impl ValueHead {
    pub fn new(vs: &nn::Path, num_filters: i64) -> Self {
        ValueHead {
            conv: nn::conv2d(vs / "conv", num_filters, 1, 1, Default::default()),
            bn: nn::batch_norm2d(vs / "bn", 1, Default::default()),
            fc1: nn::linear(vs / "fc1", NUM_SQUARES as i64, HIDDEN_UNITS, Default::default()),
            fc2: nn::linear(vs / "fc2", HIDDEN_UNITS, 1, Default::default()),
        }
    }

    /// Returns `[N, 1]` values in `[-1, 1]`.
    pub fn forward_t(&self, x: &Tensor, train: bool) -> Tensor {
        x.apply(&self.conv)
            .apply_t(&self.bn, train)
            .relu()
            .flatten(1, -1)
            .apply(&self.fc1)
            .relu()
            .apply(&self.fc2)
            .tanh()
    }
}
