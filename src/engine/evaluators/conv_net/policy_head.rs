use tch::{nn, Tensor};
use crate::encoding::constants::{NUM_ACTIONS, NUM_SQUARES};

const POLICY_CHANNELS: i64 = 2;

/// 1×1 convolution down to two planes, then a linear map onto the 4672 action logits.
#[derive(Debug)]
pub struct PolicyHead {
    conv: nn::Conv2D,
    bn: nn::BatchNorm,
    fc: nn::Linear,
}

impl PolicyHead {
    pub fn new(vs: &nn::Path, num_filters: i64) -> Self {
        PolicyHead {
            conv: nn::conv2d(vs / "conv", num_filters, POLICY_CHANNELS, 1, Default::default()),
            bn: nn::batch_norm2d(vs / "bn", POLICY_CHANNELS, Default::default()),
            fc: nn::linear(vs / "fc", POLICY_CHANNELS * NUM_SQUARES as i64, NUM_ACTIONS as i64, Default::default()),
        }
    }

    /// Returns `[N, 4672]` logits.
    pub fn forward_t(&self, x: &Tensor, train: bool) -> Tensor {
        x.apply(&self.conv)
            .apply_t(&self.bn, train)
            .relu()
            .flatten(1, -1)
            .apply(&self.fc)
    }
}
