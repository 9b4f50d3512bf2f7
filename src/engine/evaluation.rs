use tch::Tensor;
use crate::encoding::constants::{BOARD_SIZE, NUM_ACTIONS, NUM_POSITION_PLANES};
use crate::engine::EvaluationError;

/// Output of an evaluator for one position: a probability for each of the 4672 actions and a
/// value in `[-1, 1]` from the point of view of the side to move.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub policy: Vec<f32>,
    pub value: f32,
}

impl Evaluation {
    pub fn validated(self) -> Result<Evaluation, EvaluationError> {
        if self.policy.len() != NUM_ACTIONS {
            return Err(EvaluationError::PolicyShape(self.policy.len()));
        }
        if !self.value.is_finite() || !(-1.0..=1.0).contains(&self.value) {
            return Err(EvaluationError::InvalidValue(self.value));
        }
        Ok(self)
    }
}

pub(crate) fn check_input_shape(tensor: &Tensor, batched: bool) -> Result<(), EvaluationError> {
    let board = BOARD_SIZE as i64;
    let planes = NUM_POSITION_PLANES as i64;
    let actual = tensor.size();
    let matches = if batched {
        actual.len() == 4 && actual[1..] == [board, board, planes]
    } else {
        actual == [board, board, planes]
    };
    if matches {
        Ok(())
    } else {
        let mut expected = vec![board, board, planes];
        if batched {
            expected.insert(0, -1);
        }
        Err(EvaluationError::InputShape { expected, actual })
    }
}

pub trait Evaluator {
    /// Evaluates one `[8, 8, 119]` position tensor.
    fn evaluate(&self, state_tensor: &Tensor) -> Result<Evaluation, EvaluationError>;

    /// Evaluates a `[N, 8, 8, 119]` batch, one row at a time unless overridden.
    fn evaluate_batch(&self, batch: &Tensor) -> Result<Vec<Evaluation>, EvaluationError> {
        check_input_shape(batch, true)?;
        (0..batch.size()[0])
            .map(|row| self.evaluate(&batch.get(row)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_policy() -> Vec<f32> {
        vec![1. / NUM_ACTIONS as f32; NUM_ACTIONS]
    }

    #[test]
    fn test_validated_accepts_bounds() {
        for value in [-1., 0., 1.] {
            assert!(Evaluation { policy: uniform_policy(), value }.validated().is_ok());
        }
    }

    #[test]
    fn test_validated_rejects_bad_values() {
        for value in [f32::NAN, f32::INFINITY, 1.5, -1.01] {
            let result = Evaluation { policy: uniform_policy(), value }.validated();
            assert!(matches!(result, Err(EvaluationError::InvalidValue(_))));
        }
        let result = Evaluation { policy: vec![0.; 3], value: 0. }.validated();
        assert!(matches!(result, Err(EvaluationError::PolicyShape(3))));
    }
}
