//! Monte Carlo Tree Search with UCT selection and random-rollout evaluation.
//!
//! The tree is a map from state to visit statistics, keyed by the state
//! itself, so transpositions share one node. Each episode selects a path down
//! from the root, expands the leaf, scores it with one random depth charge,
//! and backpropagates the reward along the whole path.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::deadline::Deadline;
use crate::interface::*;

/// Visit statistics for one state in the tree.
#[derive(Clone, Debug, Default)]
struct SearchNode {
    visits: u32,
    total_reward: u64,
}

impl SearchNode {
    fn mean(&self) -> f64 {
        self.total_reward as f64 / self.visits as f64
    }

    // Never called with zero visits; selection takes unvisited nodes
    // unconditionally before scoring any sibling.
    fn uct(&self, exploration: f64, log_parent_visits: f64) -> f64 {
        self.mean() + exploration * (log_parent_visits / self.visits as f64).sqrt()
    }
}

/// Tuning knobs for [`MonteCarloTreeSearch`].
#[derive(Clone, Debug)]
pub struct MctsOptions {
    exploration: f64,
    max_rollout_depth: u32,
    max_episodes: Option<u64>,
    retain_tree: bool,
    seed: Option<u64>,
}

impl Default for MctsOptions {
    fn default() -> MctsOptions {
        MctsOptions {
            exploration: 4.0,
            max_rollout_depth: 100,
            max_episodes: None,
            retain_tree: false,
            seed: None,
        }
    }
}

impl MctsOptions {
    /// Set the exploration constant C in the UCT formula. Rewards span 0 to
    /// 100, so useful values sit far above the textbook sqrt(2); the default
    /// is 4.
    pub fn with_exploration(mut self, exploration: f64) -> MctsOptions {
        self.exploration = exploration;
        self
    }

    /// Set a maximum depth for rollouts. Rollouts that reach this depth are
    /// stopped and scored as the neutral midpoint.
    pub fn with_max_rollout_depth(mut self, depth: u32) -> MctsOptions {
        self.max_rollout_depth = depth;
        self
    }

    /// Stop after this many completed episodes even if time remains. Useful
    /// for reproducible searches and benchmarks; the default is no cap.
    pub fn with_max_episodes(mut self, episodes: u64) -> MctsOptions {
        self.max_episodes = Some(episodes);
        self
    }

    /// Keep the tree across decisions, so later turns start from earlier
    /// statistics. Off by default: the tree is rebuilt for every decision.
    pub fn with_tree_retention(mut self, retain: bool) -> MctsOptions {
        self.retain_tree = retain;
        self
    }

    /// Seed the rollout RNG for reproducible searches. Entropy-seeded when
    /// unset.
    pub fn with_seed(mut self, seed: u64) -> MctsOptions {
        self.seed = Some(seed);
        self
    }
}

/// Counters from the most recent [`MonteCarloTreeSearch`] decision.
#[derive(Clone, Debug, Default)]
pub struct MctsStats {
    /// Episodes that ran to backpropagation.
    pub episodes: u64,
    /// States in the tree after the call.
    pub nodes: usize,
    /// Longest depth charge among this call's episodes.
    pub deepest_charge: u32,
    /// Wall time spent in the call.
    pub elapsed: Duration,
}

impl std::fmt::Display for MctsStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} episodes over {} nodes, deepest charge {}, {}ms",
            self.episodes,
            self.nodes,
            self.deepest_charge,
            self.elapsed.as_millis()
        )
    }
}

/// A strategy that explores the game tree with random playouts. Needs nothing
/// from the game beyond the oracle itself.
pub struct MonteCarloTreeSearch<O: Oracle> {
    oracle: O,
    opts: MctsOptions,
    nodes: FxHashMap<O::State, SearchNode>,
    rng: StdRng,
    role: Option<O::Role>,
    stats: MctsStats,
}

impl<O: Oracle> MonteCarloTreeSearch<O> {
    pub fn new(oracle: O) -> MonteCarloTreeSearch<O> {
        MonteCarloTreeSearch::with_options(oracle, MctsOptions::default())
    }

    pub fn with_options(oracle: O, opts: MctsOptions) -> MonteCarloTreeSearch<O> {
        let rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        MonteCarloTreeSearch {
            oracle,
            opts,
            nodes: FxHashMap::default(),
            rng,
            role: None,
            stats: MctsStats::default(),
        }
    }

    /// Counters from the most recent decision.
    pub fn stats(&self) -> &MctsStats {
        &self.stats
    }

    /// Number of states in the tree.
    pub fn tree_len(&self) -> usize {
        self.nodes.len()
    }

    /// Successors of `state` in a stable order: the searched role's moves,
    /// then the joint moves consistent with each.
    fn successors(
        &self, state: &O::State, role: &O::Role,
    ) -> Result<Vec<(O::Move, O::State)>, SearchError> {
        let my_moves = self.oracle.legal_moves(state, role)?;
        if my_moves.is_empty() {
            return Err(SearchError::EmptyMoveSet);
        }
        let mut successors = Vec::new();
        for m in my_moves {
            for joint in self.oracle.legal_joint_moves_fixing(state, role, &m)? {
                let successor = self.oracle.next_state(state, &joint)?;
                successors.push((m.clone(), successor));
            }
        }
        if successors.is_empty() {
            return Err(SearchError::EmptyMoveSet);
        }
        Ok(successors)
    }

    /// Descend from the root to an unvisited or terminal state, returning the
    /// traversed path, root first. Unvisited successors are taken before UCT
    /// is consulted on any sibling.
    fn select(
        &mut self, root: &O::State, role: &O::Role, deadline: Deadline,
    ) -> Result<Vec<O::State>, SearchError> {
        let mut path = vec![root.clone()];
        let mut current = root.clone();
        loop {
            if deadline.expired() || self.oracle.is_terminal(&current) {
                return Ok(path);
            }
            let successors = self.successors(&current, role)?;
            if let Some((_, fresh)) =
                successors.iter().find(|(_, s)| self.nodes.get(s).map_or(true, |n| n.visits == 0))
            {
                self.nodes.entry(fresh.clone()).or_default();
                path.push(fresh.clone());
                return Ok(path);
            }
            let parent_visits = self.nodes.get(&current).map_or(1, |n| n.visits.max(1));
            let log_parent_visits = (parent_visits as f64).ln();
            let mut next: Option<O::State> = None;
            let mut best_score = f64::NEG_INFINITY;
            for (_, successor) in &successors {
                if let Some(node) = self.nodes.get(successor) {
                    let score = node.uct(self.opts.exploration, log_parent_visits);
                    if next.is_none() || score > best_score {
                        best_score = score;
                        next = Some(successor.clone());
                    }
                }
            }
            let next = match next {
                Some(next) => next,
                None => successors[0].1.clone(),
            };
            path.push(next.clone());
            current = next;
        }
    }

    /// Register the leaf's successors with zero statistics. Absent entries
    /// count as unvisited in selection, so this only front-loads discovery.
    fn expand(&mut self, leaf: &O::State, role: &O::Role) -> Result<(), SearchError> {
        if self.oracle.is_terminal(leaf) {
            return Ok(());
        }
        for (_, successor) in self.successors(leaf, role)? {
            self.nodes.entry(successor).or_default();
        }
        Ok(())
    }

    /// Score the leaf with one random depth charge. A terminal leaf is its
    /// own zero-length rollout; a charge cut off at the depth cap scores the
    /// neutral midpoint.
    fn simulate(&mut self, leaf: &O::State, role: &O::Role) -> Result<u64, SearchError> {
        if self.oracle.is_terminal(leaf) {
            let goal = self.oracle.goal(leaf, role)?;
            return Ok(goal.clamp(MIN_GOAL, MAX_GOAL) as u64);
        }
        let (end, depth) =
            self.oracle.random_depth_charge(leaf, self.opts.max_rollout_depth, &mut self.rng)?;
        self.stats.deepest_charge = self.stats.deepest_charge.max(depth);
        let goal = if self.oracle.is_terminal(&end) {
            self.oracle.goal(&end, role)?
        } else {
            (MIN_GOAL + MAX_GOAL) / 2
        };
        Ok(goal.clamp(MIN_GOAL, MAX_GOAL) as u64)
    }

    /// One Select, Expand, Simulate, Backpropagate pass. `Ok(true)` when the
    /// episode completed and was recorded; `Ok(false)` when the deadline cut
    /// it off first, in which case nothing was counted.
    fn episode(
        &mut self, root: &O::State, role: &O::Role, deadline: Deadline,
    ) -> Result<bool, SearchError> {
        let path = self.select(root, role, deadline)?;
        if deadline.expired() {
            return Ok(false);
        }
        let leaf = match path.last() {
            Some(leaf) => leaf.clone(),
            None => return Ok(false),
        };
        self.expand(&leaf, role)?;
        let reward = self.simulate(&leaf, role)?;
        for state in &path {
            let node = self.nodes.entry(state.clone()).or_default();
            node.visits += 1;
            node.total_reward += reward;
        }
        self.stats.episodes += 1;
        trace!(depth = path.len(), reward, "episode");
        Ok(true)
    }
}

impl<O: Oracle> Strategy<O> for MonteCarloTreeSearch<O> {
    fn select_move(
        &mut self, state: &O::State, role: &O::Role, deadline: Deadline,
    ) -> Result<Decision<O::Move>, SearchError> {
        let start = Instant::now();
        if !self.opts.retain_tree || self.role.as_ref() != Some(role) {
            self.nodes.clear();
        }
        self.role = Some(role.clone());
        self.stats = MctsStats::default();
        self.nodes.entry(state.clone()).or_default();

        let moves = self.oracle.legal_moves(state, role)?;
        let mut chosen = moves.first().cloned().ok_or(SearchError::EmptyMoveSet)?;

        let cap = self.opts.max_episodes.unwrap_or(u64::MAX);
        while self.stats.episodes < cap && !deadline.expired() {
            match self.episode(state, role, deadline) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err @ SearchError::EmptyMoveSet) => return Err(err),
                // The oracle is deterministic; a failing episode would fail
                // again. Decide from the statistics gathered so far.
                Err(_) => break,
            }
        }

        // Pick among visited root children by mean reward. When no episode
        // finished, the first legal move stands.
        let mut best_mean = f64::NEG_INFINITY;
        for m in &moves {
            let joints = match self.oracle.legal_joint_moves_fixing(state, role, m) {
                Ok(joints) => joints,
                Err(_) => continue,
            };
            for joint in &joints {
                let successor = match self.oracle.next_state(state, joint) {
                    Ok(successor) => successor,
                    Err(_) => continue,
                };
                if let Some(node) = self.nodes.get(&successor) {
                    if node.visits > 0 && node.mean() > best_mean {
                        best_mean = node.mean();
                        chosen = m.clone();
                    }
                }
            }
        }

        self.stats.nodes = self.nodes.len();
        self.stats.elapsed = start.elapsed();
        debug!(
            candidates = moves.len(),
            episodes = self.stats.episodes,
            nodes = self.stats.nodes,
            best_mean,
            deepest_charge = self.stats.deepest_charge,
            elapsed_ms = self.stats.elapsed.as_millis() as u64,
            "mcts decision"
        );
        Ok(Decision { chosen, candidates: moves, elapsed: self.stats.elapsed })
    }
}
