use std::fmt;
use std::fmt::{Display, Formatter};
use log::trace;
use rand::distributions::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::Gamma;
use crate::config::SearchConfig;
use crate::encoding::constants::NUM_ACTIONS;
use crate::encoding::encode;
use crate::engine::mcts::mcts_node::{MCTSNode, Sentinel};
use crate::engine::{Evaluator, SearchError};
use crate::state::State;

/// Samples Dirichlet(alpha, ..., alpha) noise over `num_actions` entries.
pub fn generate_dirichlet_noise<R: Rng + ?Sized>(num_actions: usize, alpha: f32, rng: &mut R) -> Result<Vec<f32>, SearchError> {
    let gamma = Gamma::new(alpha, 1.0).map_err(|_| SearchError::InvalidDirichletAlpha(alpha))?;
    let mut noise: Vec<f32> = (0..num_actions).map(|_| gamma.sample(rng)).collect();

    // Normalize the noise to sum to 1
    let sum: f32 = noise.iter().sum();
    if sum > 0. && sum.is_finite() {
        noise.iter_mut().for_each(|n| *n /= sum);
    } else {
        noise.iter_mut().for_each(|n| *n = 1. / num_actions as f32);
    }
    Ok(noise)
}

/// PUCT search over a tree that is rebuilt for every move played.
pub struct MCTS<'a, R: Rng> {
    root: MCTSNode,
    sentinel: Sentinel,
    evaluator: &'a dyn Evaluator,
    config: &'a SearchConfig,
    rng: &'a mut R,
}

impl<'a, R: Rng> MCTS<'a, R> {
    /// Evaluates `state` and records that evaluation as the root's first visit.
    pub fn new(
        state: State,
        evaluator: &'a dyn Evaluator,
        config: &'a SearchConfig,
        rng: &'a mut R,
    ) -> Result<Self, SearchError> {
        let mut root = MCTSNode::new(state)?;
        if root.is_terminal() {
            return Err(SearchError::TerminalRoot);
        }

        let evaluation = evaluator.evaluate(&encode(&root.state)?)?.validated()?;
        root.set_priors(&evaluation.policy);

        Ok(MCTS {
            root,
            sentinel: Sentinel {
                visits: 1,
                total_value: -evaluation.value,
            },
            evaluator,
            config,
            rng,
        })
    }

    /// Descends from the root to the first unexpanded or terminal edge. Returns the actions taken
    /// and the leaf value from the point of view of the player who chose the last action.
    pub fn search(&mut self) -> Result<(Vec<usize>, f32), SearchError> {
        let mut path = Vec::new();
        let mut node = &mut self.root;
        let mut node_visits = self.sentinel.visits;

        loop {
            let action = node.best_child(node_visits, self.config.c_puct, &mut *self.rng)?;
            path.push(action);

            if !node.children.contains_key(&action) {
                let add_noise = path.len() == 1;
                let value = node.expand_child(action, self.evaluator, self.config, add_noise, &mut *self.rng)?;
                return Ok((path, -value));
            }

            node_visits = node.edges[action].visits;
            node = match node.children.get_mut(&action) {
                Some(child) => child,
                None => return Err(SearchError::MissingChild(action)),
            };
            if let Some(value) = node.terminal_value() {
                return Ok((path, -value));
            }
        }
    }

    /// Checks that `path` is a non-empty chain of legal actions whose every step but the last
    /// leads to an existing child.
    fn check_path(&self, path: &[usize]) -> Result<(), SearchError> {
        let (&last, inner) = path.split_last().ok_or(SearchError::EmptyPath)?;
        let mut node = &self.root;
        for &action in inner {
            if !node.is_legal_action(action) {
                return Err(SearchError::IllegalAction(action));
            }
            node = node.children.get(&action).ok_or(SearchError::MissingChild(action))?;
        }
        if !node.is_legal_action(last) {
            return Err(SearchError::IllegalAction(last));
        }
        Ok(())
    }

    /// Adds one visit and `(-1)^i * value` to the edge `i` steps above the leaf, then updates the
    /// root's own statistics on the sentinel. A path that does not exist in the tree is rejected
    /// before anything is updated.
    pub fn backpropagate(&mut self, path: &[usize], value: f32) -> Result<(), SearchError> {
        self.check_path(path)?;

        let depth = path.len();
        let mut node = &mut self.root;
        for (level, &action) in path.iter().enumerate() {
            let sign = if (depth - 1 - level) % 2 == 0 { 1. } else { -1. };
            let edge = &mut node.edges[action];
            edge.visits += 1;
            edge.total_value += sign * value;

            if level + 1 < depth {
                node = match node.children.get_mut(&action) {
                    Some(child) => child,
                    None => return Err(SearchError::MissingChild(action)),
                };
            }
        }

        let sign = if depth % 2 == 0 { 1. } else { -1. };
        self.sentinel.visits += 1;
        self.sentinel.total_value += sign * value;
        Ok(())
    }

    /// Runs `iterations` rounds of search and backpropagation. Returns the most visited root
    /// action, ties broken at random, along with the root.
    pub fn run(&mut self, iterations: usize) -> Result<(usize, &MCTSNode), SearchError> {
        for iteration in 0..iterations {
            let (path, value) = self.search()?;
            trace!("iteration {}: depth {}, value {:.4}", iteration, path.len(), value);
            self.backpropagate(&path, value)?;
        }

        let best_action = self.best_action()?;
        Ok((best_action, &self.root))
    }

    pub fn best_action(&mut self) -> Result<usize, SearchError> {
        let max_visits = self.root.legal_actions
            .iter()
            .map(|&action| self.root.edges[action].visits)
            .max()
            .ok_or(SearchError::NoLegalActions)?;
        let candidates: Vec<usize> = self.root.legal_actions
            .iter()
            .copied()
            .filter(|&action| self.root.edges[action].visits == max_visits)
            .collect();
        candidates.choose(&mut *self.rng).copied().ok_or(SearchError::NoLegalActions)
    }

    /// Root visit counts normalized to a distribution over all 4672 actions.
    pub fn visit_policy(&self) -> Vec<f32> {
        let mut policy = vec![0.; NUM_ACTIONS];
        let total: u32 = self.root.legal_actions.iter().map(|&action| self.root.edges[action].visits).sum();
        if total > 0 {
            for &action in &self.root.legal_actions {
                policy[action] = self.root.edges[action].visits as f32 / total as f32;
            }
        }
        policy
    }

    pub fn root(&self) -> &MCTSNode {
        &self.root
    }

    pub fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }

    pub fn num_nodes(&self) -> usize {
        self.root.num_nodes()
    }
}

impl<'a, R: Rng> Display for MCTS<'a, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "root(visits: {}, value: {:.4})", self.sentinel.visits, self.sentinel.total_value)?;
        write!(f, "{}", self.root)
    }
}
