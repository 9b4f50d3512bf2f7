use lazy_static::lazy_static;
use tch::{Device, Kind, Tensor};
use crate::config::NetworkConfig;
use crate::engine::evaluation::check_input_shape;
use crate::engine::evaluators::conv_net::conv_net::{CombinedPolicyValueNetwork, ConvNet};
use crate::engine::{Evaluation, EvaluationError, Evaluator};

lazy_static! {
    pub static ref DEVICE: Device = Device::cuda_if_available();
}

/// Inference-only evaluator backed by a [`ConvNet`].
#[derive(Debug)]
pub struct ConvNetEvaluator {
    pub model: ConvNet,
}

impl ConvNetEvaluator {
    pub fn new(num_residual_blocks: usize, num_filters: i64) -> ConvNetEvaluator {
        ConvNetEvaluator {
            model: ConvNet::new(*DEVICE, num_residual_blocks, num_filters),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Result<ConvNetEvaluator, EvaluationError> {
        let mut evaluator = ConvNetEvaluator::new(config.num_residual_blocks, config.num_filters);
        if let Some(weights) = &config.weights {
            evaluator.model.load(weights)?;
        }
        Ok(evaluator)
    }

    fn run(&self, batch: &Tensor) -> Result<Vec<Evaluation>, EvaluationError> {
        let input = batch.to_kind(Kind::Float).to_device(self.model.device());
        let (policy_logits, values) = tch::no_grad(|| self.model.forward(&input, false));

        let policies = policy_logits.softmax(-1, Kind::Float).to_device(Device::Cpu);
        let values = values.to_device(Device::Cpu);

        (0..policies.size()[0])
            .map(|row| {
                let policy = Vec::<f32>::try_from(policies.get(row))?;
                let value = values.double_value(&[row, 0]) as f32;
                Evaluation { policy, value }.validated()
            })
            .collect()
    }
}

impl Evaluator for ConvNetEvaluator {
    fn evaluate(&self, state_tensor: &Tensor) -> Result<Evaluation, EvaluationError> {
        check_input_shape(state_tensor, false)?;
        let mut evaluations = self.run(&state_tensor.unsqueeze(0))?;
        evaluations.pop().ok_or(EvaluationError::InputShape {
            expected: vec![1],
            actual: vec![0],
        })
    }

    fn evaluate_batch(&self, batch: &Tensor) -> Result<Vec<Evaluation>, EvaluationError> {
        check_input_shape(batch, true)?;
        self.run(batch)
    }
}
