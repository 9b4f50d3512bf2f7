use tch::Tensor;
use crate::encoding::constants::{NUM_ACTIONS, NUM_PIECE_TYPES, NUM_POSITION_PLANES, BOARD_SIZE};
use crate::encoding::Planes;
use crate::engine::evaluation::check_input_shape;
use crate::engine::{Evaluation, EvaluationError, Evaluator};

/// Scores the material balance of the most recent snapshot and squashes it into `[-1, 1]`.
/// The policy is uniform.
#[derive(Clone, Debug)]
pub struct MaterialEvaluator {
    pub steepness: f32,
}

impl Default for MaterialEvaluator {
    fn default() -> Self {
        MaterialEvaluator { steepness: 0.5 }
    }
}

impl MaterialEvaluator {
    /// Material of the side to move minus that of its opponent, in pawns.
    pub fn material_balance(planes: &Planes) -> f32 {
        let mut balance = 0.;
        for file in 0..BOARD_SIZE {
            for rank in 0..BOARD_SIZE {
                for (piece_index, piece_value) in PIECE_VALUES.iter().enumerate() {
                    balance += piece_value * planes.get(file, rank, piece_index);
                    balance -= piece_value * planes.get(file, rank, NUM_PIECE_TYPES + piece_index);
                }
            }
        }
        balance
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, state_tensor: &Tensor) -> Result<Evaluation, EvaluationError> {
        check_input_shape(state_tensor, false)?;
        let planes = Planes::from_tensor(state_tensor, NUM_POSITION_PLANES)?;
        let score_diff = MaterialEvaluator::material_balance(&planes);

        let value = 2. * sigmoid(score_diff, self.steepness) - 1.; // Normalize to [-1, 1]

        Ok(Evaluation {
            policy: vec![1. / NUM_ACTIONS as f32; NUM_ACTIONS],
            value,
        })
    }
}

fn sigmoid(x: f32, a: f32) -> f32 {
    1.0 / (1.0 + (-a * x).exp())
}

const PIECE_VALUES: [f32; NUM_PIECE_TYPES] = [
    1.0,  // Pawn
    3.0,  // Knight
    3.0,  // Bishop
    5.0,  // Rook
    9.0,  // Queen
    0.0,  // King
];

#[cfg(test)]
mod tests {
    use crate::encoding::encode;
    use crate::state::State;
    use super::*;

    fn evaluate_fen(fen: &str) -> f32 {
        let tensor = encode(&State::from_fen(fen).unwrap()).unwrap();
        MaterialEvaluator::default().evaluate(&tensor).unwrap().value
    }

    #[test]
    fn test_initial() {
        assert_eq!(evaluate_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"), 0.);
    }

    #[test]
    fn test_value_is_relative_to_side_to_move() {
        // white is a queen up
        let white_to_move = evaluate_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        let black_to_move = evaluate_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1");
        assert!(white_to_move > 0.9);
        assert!((white_to_move + black_to_move).abs() < 1e-6);
    }
}
