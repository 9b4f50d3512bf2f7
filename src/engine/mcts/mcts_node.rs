use std::fmt;
use std::fmt::{Display, Formatter};
use indexmap::IndexMap;
use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use crate::config::SearchConfig;
use crate::encoding::constants::NUM_ACTIONS;
use crate::encoding::{decode_move, encode, legal_actions, EncodedMove};
use crate::engine::mcts::generate_dirichlet_noise;
use crate::engine::{Evaluator, SearchError};
use crate::state::{State, Termination};

/// Statistics of the edge from a node to one of its actions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeStats {
    pub visits: u32,
    /// Sum of backed-up values, from the point of view of the player choosing the action.
    pub total_value: f32,
    pub prior: f32,
}

/// Visit count and total value of the root itself, from the point of view of the player who
/// moved into the root.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sentinel {
    pub visits: u32,
    pub total_value: f32,
}

#[derive(Debug)]
pub struct MCTSNode {
    pub state: State,
    pub edges: Box<[EdgeStats]>,
    /// Sorted action indices of the legal moves; empty for terminal nodes.
    pub legal_actions: Vec<usize>,
    pub children: IndexMap<usize, MCTSNode>,
    pub termination: Option<Termination>,
}

impl MCTSNode {
    pub fn new(state: State) -> Result<MCTSNode, SearchError> {
        let termination = state.termination();
        let legal_actions = match termination {
            Some(_) => Vec::new(),
            None => legal_actions(&state.calc_legal_moves())?,
        };
        Ok(MCTSNode {
            state,
            edges: vec![EdgeStats::default(); NUM_ACTIONS].into_boxed_slice(),
            legal_actions,
            children: IndexMap::new(),
            termination,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.termination.is_some()
    }

    /// Exact result of a finished game for the side to move: -1 if it is mated, 0 for any draw.
    pub fn terminal_value(&self) -> Option<f32> {
        self.termination.map(|termination| if termination.is_decisive() { -1. } else { 0. })
    }

    pub fn is_legal_action(&self, action: usize) -> bool {
        self.legal_actions.binary_search(&action).is_ok()
    }

    pub fn child_q(&self, action: usize) -> f32 {
        let edge = &self.edges[action];
        edge.total_value / (edge.visits as f32 + 1.)
    }

    pub fn child_u(&self, action: usize, node_visits: u32, c_puct: f32) -> f32 {
        let edge = &self.edges[action];
        c_puct * (node_visits as f32).sqrt() * edge.prior / (1. + edge.visits as f32)
    }

    /// Legal action maximizing `Q + U`; exact ties are broken uniformly at random.
    pub fn best_child<R: Rng + ?Sized>(&self, node_visits: u32, c_puct: f32, rng: &mut R) -> Result<usize, SearchError> {
        let mut best_score = f32::NEG_INFINITY;
        let mut best_actions = Vec::new();
        for &action in &self.legal_actions {
            let score = self.child_q(action) + self.child_u(action, node_visits, c_puct);
            if score > best_score {
                best_score = score;
                best_actions.clear();
                best_actions.push(action);
            } else if score == best_score {
                best_actions.push(action);
            }
        }
        best_actions.choose(rng).copied().ok_or(SearchError::NoLegalActions)
    }

    /// Stores `policy` restricted to the legal actions and renormalized.
    pub fn set_priors(&mut self, policy: &[f32]) {
        let mass: f32 = self.legal_actions.iter().map(|&action| policy[action].max(0.)).sum();
        if mass > 0. && mass.is_finite() {
            for &action in &self.legal_actions {
                self.edges[action].prior = policy[action].max(0.) / mass;
            }
        } else {
            warn!("policy has no mass on the {} legal actions, using uniform priors", self.legal_actions.len());
            let uniform = 1. / self.legal_actions.len() as f32;
            for &action in &self.legal_actions {
                self.edges[action].prior = uniform;
            }
        }
    }

    /// Blends `noise` (one entry per legal action, in order) into the priors.
    pub fn mix_noise(&mut self, noise: &[f32], epsilon: f32) {
        for (&action, &eta) in self.legal_actions.iter().zip(noise) {
            let edge = &mut self.edges[action];
            edge.prior = (1. - epsilon) * edge.prior + epsilon * eta;
        }
    }

    /// Creates the child reached through `action` and returns its value for its own side to move:
    /// the exact result if the game is over there, the evaluator's estimate otherwise.
    pub(crate) fn expand_child<R: Rng + ?Sized>(
        &mut self,
        action: usize,
        evaluator: &dyn Evaluator,
        config: &SearchConfig,
        add_noise: bool,
        rng: &mut R,
    ) -> Result<f32, SearchError> {
        if !self.is_legal_action(action) {
            return Err(SearchError::IllegalAction(action));
        }
        let mv = decode_move(EncodedMove::from_index(action)?, &self.state.board)?;
        if !self.state.is_legal(mv) {
            return Err(SearchError::IllegalAction(action));
        }

        let mut child = MCTSNode::new(self.state.apply_move(mv)?)?;
        let value = match child.terminal_value() {
            Some(value) => value,
            None => {
                let evaluation = evaluator.evaluate(&encode(&child.state)?)?.validated()?;
                child.set_priors(&evaluation.policy);
                if add_noise {
                    let noise = generate_dirichlet_noise(child.legal_actions.len(), config.dirichlet_alpha, rng)?;
                    child.mix_noise(&noise, config.dirichlet_epsilon);
                }
                evaluation.value
            }
        };

        self.children.insert(action, child);
        Ok(value)
    }

    pub fn num_nodes(&self) -> usize {
        1 + self.children.values().map(MCTSNode::num_nodes).sum::<usize>()
    }

    fn metadata(&self, action: usize) -> String {
        let edge = &self.edges[action];
        let mv = EncodedMove::from_index(action)
            .and_then(|encoded| decode_move(encoded, &self.state.board))
            .map(|mv| mv.to_string())
            .unwrap_or_else(|_| format!("#{}", action));
        format!("MCTSNode(move: {}, prior: {:.4}, visits: {}, q: {:.4})", mv, edge.prior, edge.visits, self.child_q(action))
    }

    fn fmt_helper(&self, depth: usize, depth_limit: usize) -> String {
        let mut s = String::new();
        for (&action, child) in &self.children {
            s += &format!("{}{}\n", "| ".repeat(depth), self.metadata(action));
            if depth < depth_limit {
                s += &child.fmt_helper(depth + 1, depth_limit);
            }
        }
        s
    }
}

impl Display for MCTSNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fmt_helper(0, 1))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use chess::ChessMove;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::encoding::encode_move;
    use super::*;

    fn action(uci: &str) -> usize {
        encode_move(ChessMove::from_str(uci).unwrap()).unwrap().index()
    }

    #[test]
    fn test_q_smoothing() {
        let mut node = MCTSNode::new(State::initial()).unwrap();
        let e2e4 = action("e2e4");
        node.edges[e2e4].visits = 1;
        node.edges[e2e4].total_value = 0.5;
        assert_eq!(node.child_q(e2e4), 0.25);
        assert_eq!(node.child_q(action("d2d4")), 0.);
    }

    #[test]
    fn test_child_u() {
        let mut node = MCTSNode::new(State::initial()).unwrap();
        let e2e4 = action("e2e4");
        node.edges[e2e4].prior = 0.5;
        node.edges[e2e4].visits = 1;
        assert_eq!(node.child_u(e2e4, 4, 1.), 0.5);
        assert_eq!(node.child_u(e2e4, 0, 1.), 0.);
    }

    #[test]
    fn test_set_priors_masks_illegal_actions() {
        let mut node = MCTSNode::new(State::initial()).unwrap();
        let mut policy = vec![0.; NUM_ACTIONS];
        policy[action("e2e4")] = 0.3;
        policy[action("g1f3")] = 0.1;
        policy[action("e2e5")] = 0.6;
        node.set_priors(&policy);

        assert!((node.edges[action("e2e4")].prior - 0.75).abs() < 1e-6);
        assert!((node.edges[action("g1f3")].prior - 0.25).abs() < 1e-6);
        assert_eq!(node.edges[action("e2e5")].prior, 0.);
    }

    #[test]
    fn test_set_priors_falls_back_to_uniform() {
        let mut node = MCTSNode::new(State::initial()).unwrap();
        let mut policy = vec![0.; NUM_ACTIONS];
        policy[action("e2e5")] = 1.;
        node.set_priors(&policy);
        for &legal in &node.legal_actions {
            assert_eq!(node.edges[legal].prior, 1. / 20.);
        }
    }

    #[test]
    fn test_best_child_prefers_prior_and_breaks_ties_randomly() {
        let mut node = MCTSNode::new(State::initial()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let mut policy = vec![0.; NUM_ACTIONS];
        policy[action("d2d4")] = 1.;
        node.set_priors(&policy);
        assert_eq!(node.best_child(1, 1., &mut rng).unwrap(), action("d2d4"));

        // all scores are zero without visits, so every legal action can come up
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            seen.insert(node.best_child(0, 1., &mut rng).unwrap());
        }
        assert_eq!(seen.len(), node.legal_actions.len());
    }

    #[test]
    fn test_terminal_node() {
        let node = MCTSNode::new(State::from_fen("R6k/6pp/8/8/8/8/8/6K1 b - - 0 1").unwrap()).unwrap();
        assert_eq!(node.termination, Some(Termination::Checkmate));
        assert_eq!(node.terminal_value(), Some(-1.));
        assert!(node.legal_actions.is_empty());
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(node.best_child(1, 1., &mut rng), Err(SearchError::NoLegalActions)));
    }
}
