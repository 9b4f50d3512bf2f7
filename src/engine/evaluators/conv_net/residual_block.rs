use tch::{nn, Tensor};
use tch::nn::ModuleT;

#[derive(Debug)]
pub struct ResidualBlock {
    conv1: nn::Conv2D,
    bn1: nn::BatchNorm,
    conv2: nn::Conv2D,
    bn2: nn::BatchNorm,
}

impl ResidualBlock {
    pub fn new(root: &nn::Path, channels: i64) -> Self {
        let conv_config = nn::ConvConfig {
            padding: 1,
            ..Default::default()
        };

        ResidualBlock {
            conv1: nn::conv2d(root / "conv1", channels, channels, 3, conv_config),
            bn1: nn::batch_norm2d(root / "bn1", channels, Default::default()),
            conv2: nn::conv2d(root / "conv2", channels, channels, 3, conv_config),
            bn2: nn::batch_norm2d(root / "bn2", channels, Default::default()),
        }
    }

    pub fn forward_t(&self, x: &Tensor, train: bool) -> Tensor {
        let residual = x;

        let mut out = self.conv1.forward_t(x, train);
        out = self.bn1.forward_t(&out, train).relu();
        out = self.conv2.forward_t(&out, train);
        out = self.bn2.forward_t(&out, train);

        (out + residual).relu()
    }
}
