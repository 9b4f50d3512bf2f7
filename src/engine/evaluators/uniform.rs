use tch::Tensor;
use crate::encoding::constants::NUM_ACTIONS;
use crate::engine::evaluation::check_input_shape;
use crate::engine::{Evaluation, EvaluationError, Evaluator};

/// Spreads the policy evenly over all actions and calls every position even.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformEvaluator;

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, state_tensor: &Tensor) -> Result<Evaluation, EvaluationError> {
        check_input_shape(state_tensor, false)?;
        Ok(Evaluation {
            policy: vec![1. / NUM_ACTIONS as f32; NUM_ACTIONS],
            value: 0.,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::encoding::encode;
    use crate::state::State;
    use super::*;

    #[test]
    fn test_uniform() {
        let evaluation = UniformEvaluator.evaluate(&encode(&State::initial()).unwrap()).unwrap();
        assert_eq!(evaluation.policy.len(), NUM_ACTIONS);
        assert_eq!(evaluation.value, 0.);
        assert!(UniformEvaluator.evaluate(&Tensor::zeros([8, 8, 3], (tch::Kind::Float, tch::Device::Cpu))).is_err());
    }
}
