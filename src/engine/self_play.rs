//! Plays complete games with a fresh search per move and turns them into training examples.

use chess::{ChessMove, Color};
use log::{debug, info, warn};
use rand::distributions::WeightedIndex;
use rand::distributions::Distribution;
use rand::Rng;
use crate::config::{MoveSelection, SearchConfig, SelfPlayConfig};
use crate::dataset::TrainingExample;
use crate::encoding::{decode_move, position_planes, EncodedMove};
use crate::engine::mcts::MCTS;
use crate::engine::{Evaluator, SelfPlayError};
use crate::state::{Outcome, State, Termination};

/// A finished self-play game.
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub examples: Vec<TrainingExample>,
    pub moves: Vec<ChessMove>,
    /// `None` when the game was stopped at the ply cap.
    pub termination: Option<Termination>,
    pub outcome: Outcome,
}

impl GameRecord {
    pub fn num_plies(&self) -> usize {
        self.moves.len()
    }
}

struct PendingExample {
    state: Vec<f32>,
    policy: Vec<f32>,
    mover: Color,
}

pub struct SelfPlay<'a, R: Rng> {
    evaluator: &'a dyn Evaluator,
    search_config: SearchConfig,
    config: SelfPlayConfig,
    rng: R,
}

impl<'a, R: Rng> SelfPlay<'a, R> {
    pub fn new(evaluator: &'a dyn Evaluator, search_config: SearchConfig, config: SelfPlayConfig, rng: R) -> Self {
        SelfPlay {
            evaluator,
            search_config,
            config,
            rng,
        }
    }

    pub fn play_game(&mut self, start: State) -> Result<GameRecord, SelfPlayError> {
        let mut state = start;
        let mut pending = Vec::new();
        let mut moves = Vec::new();

        while !state.is_terminal() && moves.len() < self.config.max_plies {
            let (best_action, policy) = {
                let mut tree = MCTS::new(state.clone(), self.evaluator, &self.search_config, &mut self.rng)?;
                let (best_action, _) = tree.run(self.search_config.iterations_per_move)?;
                debug!("searched {} nodes", tree.num_nodes());
                (best_action, tree.visit_policy())
            };

            let action = match self.config.move_selection {
                MoveSelection::Sample if moves.len() < self.config.temperature_moves => {
                    self.sample_action(&policy)?.unwrap_or(best_action)
                }
                _ => best_action,
            };
            let mv = decode_move(EncodedMove::from_index(action)?, &state.board)?;
            debug!("ply {}: {:?} plays {} ({:.3} of visits)", state.ply, state.side_to_move(), mv, policy[action]);

            pending.push(PendingExample {
                state: position_planes(&state).into_vec(),
                policy,
                mover: state.side_to_move(),
            });
            state.make_move(mv)?;
            moves.push(mv);
        }

        let termination = state.termination();
        let outcome = match state.outcome() {
            Some(outcome) => outcome,
            None => {
                warn!("game reached the {} ply cap, scoring it as a draw", self.config.max_plies);
                Outcome::Draw
            }
        };
        info!("game over after {} plies: {:?} ({:?})", moves.len(), outcome, termination);

        let examples = pending
            .into_iter()
            .map(|example| TrainingExample {
                state: example.state,
                policy: example.policy,
                value: outcome.value_for(example.mover),
            })
            .collect();

        Ok(GameRecord {
            examples,
            moves,
            termination,
            outcome,
        })
    }

    /// Plays `num_games` games from `start` and collects every example.
    pub fn play_games(&mut self, num_games: usize, start: &State) -> Result<Vec<TrainingExample>, SelfPlayError> {
        let mut examples = Vec::new();
        for game in 0..num_games {
            let record = self.play_game(start.clone())?;
            info!("game {}/{}: {} examples", game + 1, num_games, record.examples.len());
            examples.extend(record.examples);
        }
        Ok(examples)
    }

    /// Samples an action with probability proportional to `visit share ^ (1 / temperature)`.
    /// Returns `None` when that is greedy play: a temperature of zero, or one so small that every
    /// weight underflows.
    fn sample_action(&mut self, policy: &[f32]) -> Result<Option<usize>, SelfPlayError> {
        if self.config.temperature <= 0. {
            return Ok(None);
        }
        let exponent = 1. / self.config.temperature;
        let weights: Vec<f32> = policy.iter().map(|&p| if p > 0. { p.powf(exponent) } else { 0. }).collect();
        let total: f32 = weights.iter().sum();
        if !(total > 0. && total.is_finite()) {
            debug!("temperature {} leaves no sampling weight, playing the most visited move", self.config.temperature);
            return Ok(None);
        }
        let distribution = WeightedIndex::new(&weights).map_err(|err| SelfPlayError::Sampling(err.to_string()))?;
        Ok(Some(distribution.sample(&mut self.rng)))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::encoding::constants::NUM_ACTIONS;
    use crate::engine::evaluators::UniformEvaluator;
    use super::*;

    fn self_play(iterations_per_move: usize, config: SelfPlayConfig) -> SelfPlay<'static, StdRng> {
        let search_config = SearchConfig {
            iterations_per_move,
            ..SearchConfig::default()
        };
        SelfPlay::new(&UniformEvaluator, search_config, config, StdRng::seed_from_u64(17))
    }

    #[test]
    fn test_white_wins() {
        // black must play Kg8, then Ra8 mates
        let start = State::from_fen("7k/8/6K1/8/8/8/8/R7 b - - 0 1").unwrap();
        let record = self_play(100, SelfPlayConfig::default()).play_game(start).unwrap();

        assert_eq!(record.termination, Some(Termination::Checkmate));
        assert_eq!(record.outcome, Outcome::Win(Color::White));
        assert_eq!(record.num_plies(), 2);
        assert_eq!(record.moves[1].to_string(), "a1a8");

        let values: Vec<f32> = record.examples.iter().map(|example| example.value).collect();
        assert_eq!(values, vec![-1., 1.]);
        for example in &record.examples {
            assert_eq!(example.state.len(), 8 * 8 * 119);
            assert_eq!(example.policy.len(), NUM_ACTIONS);
            assert!((example.policy.iter().sum::<f32>() - 1.).abs() < 1e-4);
        }
    }

    #[test]
    fn test_draw_is_labeled_zero() {
        // Kxg2 is forced and leaves bare kings
        let start = State::from_fen("7k/8/8/8/8/8/6r1/7K w - - 0 1").unwrap();
        let record = self_play(10, SelfPlayConfig::default()).play_game(start).unwrap();

        assert_eq!(record.termination, Some(Termination::InsufficientMaterial));
        assert_eq!(record.outcome, Outcome::Draw);
        assert_eq!(record.examples.len(), 1);
        assert_eq!(record.examples[0].value, 0.);
    }

    #[test]
    fn test_ply_cap_is_a_draw() {
        let config = SelfPlayConfig { max_plies: 3, ..SelfPlayConfig::default() };
        let record = self_play(4, config).play_game(State::initial()).unwrap();

        assert_eq!(record.termination, None);
        assert_eq!(record.outcome, Outcome::Draw);
        assert_eq!(record.num_plies(), 3);
        assert!(record.examples.iter().all(|example| example.value == 0.));
    }

    #[test]
    fn test_sampled_games() {
        let config = SelfPlayConfig {
            max_plies: 4,
            move_selection: MoveSelection::Sample,
            temperature_moves: 2,
            ..SelfPlayConfig::default()
        };
        let examples = self_play(8, config).play_games(2, &State::initial()).unwrap();
        assert_eq!(examples.len(), 8);
    }

    #[test]
    fn test_zero_temperature_plays_most_visited_move() {
        let config = SelfPlayConfig {
            max_plies: 4,
            move_selection: MoveSelection::Sample,
            temperature: 0.,
            ..SelfPlayConfig::default()
        };
        let record = self_play(8, config).play_game(State::initial()).unwrap();
        assert_eq!(record.num_plies(), 4);

        let mut greedy = self_play(8, SelfPlayConfig { temperature: 1e-6, ..SelfPlayConfig::default() });
        let mut policy = vec![0.; NUM_ACTIONS];
        policy[3] = 0.5;
        policy[9] = 0.5;
        assert_eq!(greedy.sample_action(&policy).unwrap(), None);
        greedy.config.temperature = 0.;
        assert_eq!(greedy.sample_action(&policy).unwrap(), None);
        greedy.config.temperature = 1.;
        assert!(matches!(greedy.sample_action(&policy).unwrap(), Some(3) | Some(9)));
    }

    #[test]
    fn test_terminal_start_produces_no_examples() {
        let start = State::from_fen("R6k/6pp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        let record = self_play(4, SelfPlayConfig::default()).play_game(start).unwrap();
        assert!(record.examples.is_empty());
        assert_eq!(record.outcome, Outcome::Win(Color::White));
    }
}
