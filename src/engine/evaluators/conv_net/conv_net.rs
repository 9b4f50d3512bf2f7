use std::path::Path;
use tch::{nn, Device, Tensor};
use crate::encoding::constants::NUM_POSITION_PLANES;
use crate::engine::evaluators::conv_net::policy_head::PolicyHead;
use crate::engine::evaluators::conv_net::residual_block::ResidualBlock;
use crate::engine::evaluators::conv_net::value_head::ValueHead;

pub trait CombinedPolicyValueNetwork {
    /// Maps a `[N, 8, 8, 119]` batch to `([N, 4672] policy logits, [N, 1] values)`.
    fn forward(&self, input: &Tensor, train: bool) -> (Tensor, Tensor);
}

/// Residual tower with a policy and a value head.
#[derive(Debug)]
pub struct ConvNet {
    pub vs: nn::VarStore,
    pub num_filters: i64,
    pub conv1: nn::Conv2D,
    pub bn1: nn::BatchNorm,
    pub residual_blocks: Vec<ResidualBlock>,
    pub policy_head: PolicyHead,
    pub value_head: ValueHead,
}

impl ConvNet {
    pub fn new(device: Device, num_residual_blocks: usize, num_filters: i64) -> ConvNet {
        let vs = nn::VarStore::new(device);
        let root = &vs.root();

        let conv1 = nn::conv2d(root / "conv1", NUM_POSITION_PLANES as i64, num_filters, 3, nn::ConvConfig { padding: 1, ..Default::default() });
        let bn1 = nn::batch_norm2d(root / "bn1", num_filters, Default::default());

        let residual_blocks = (0..num_residual_blocks)
            .map(|i| ResidualBlock::new(&(root / "residual" / i), num_filters))
            .collect();

        let policy_head = PolicyHead::new(&(root / "policy"), num_filters);
        let value_head = ValueHead::new(&(root / "value"), num_filters);

        ConvNet {
            vs,
            num_filters,
            conv1,
            bn1,
            residual_blocks,
            policy_head,
            value_head,
        }
    }

    /// Loads weights saved by a trainer with the same layout.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), tch::TchError> {
        self.vs.load(path)
    }

    pub fn device(&self) -> Device {
        self.vs.device()
    }
}

impl CombinedPolicyValueNetwork for ConvNet {
    fn forward(&self, x: &Tensor, train: bool) -> (Tensor, Tensor) {
        // [N, file, rank, plane] -> [N, plane, file, rank]
        let mut x = x.permute([0, 3, 1, 2]).apply(&self.conv1);
        x = x.apply_t(&self.bn1, train).relu();

        for block in &self.residual_blocks {
            x = block.forward_t(&x, train);
        }

        let policy = self.policy_head.forward_t(&x, train);
        let value = self.value_head.forward_t(&x, train);
        (policy, value)
    }
}
