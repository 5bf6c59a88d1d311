//! Memoized minimax with alpha-beta pruning over joint moves.
//!
//! Whether a ply maximizes or minimizes is inferred from the searched role's
//! own legal moves: more than one means the role is choosing here, exactly one
//! means the opposition is. That matches how alternating games are encoded as
//! general games (the idle role's only legal move is a no-op), and makes the
//! engine usable without any explicit turn marker in the rules.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::ScoreCache;
use crate::deadline::Deadline;
use crate::interface::*;

/// Tuning knobs for [`AlphaBeta`].
#[derive(Clone, Debug)]
pub struct AlphaBetaOptions {
    max_depth: u32,
}

impl Default for AlphaBetaOptions {
    fn default() -> AlphaBetaOptions {
        AlphaBetaOptions { max_depth: 1000 }
    }
}

impl AlphaBetaOptions {
    /// Cap the recursion depth. A branch that reaches the cap is abandoned
    /// exactly like a timed-out branch: nothing is cached for it. The default
    /// of 1000 exceeds any reasonable game length.
    pub fn with_max_depth(mut self, depth: u32) -> AlphaBetaOptions {
        self.max_depth = depth;
        self
    }
}

/// Counters from the most recent [`AlphaBeta`] decision.
#[derive(Clone, Debug, Default)]
pub struct AlphaBetaStats {
    /// States whose value was computed rather than found in the cache.
    pub explored: u64,
    /// Lookups answered by the transposition cache.
    pub cache_hits: u64,
    /// Value of the chosen move, when at least one move finished evaluating.
    pub root_value: Option<GoalValue>,
    /// Wall time spent in the call.
    pub elapsed: Duration,
}

impl std::fmt::Display for AlphaBetaStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "explored {} states, {} cache hits, root value {:?}, {}ms",
            self.explored,
            self.cache_hits,
            self.root_value,
            self.elapsed.as_millis()
        )
    }
}

/// Depth-first game-tree search with branch-and-bound pruning and a
/// write-once transposition cache.
///
/// The cache persists across calls within one engine instance, so successive
/// decisions in the same match reuse earlier work. Cached values are relative
/// to the searched role; searching for a different role flushes them.
pub struct AlphaBeta<O: Oracle> {
    oracle: O,
    opts: AlphaBetaOptions,
    cache: ScoreCache<O::State>,
    role: Option<O::Role>,
    stats: AlphaBetaStats,
}

impl<O: Oracle> AlphaBeta<O> {
    pub fn new(oracle: O) -> AlphaBeta<O> {
        AlphaBeta::with_options(oracle, AlphaBetaOptions::default())
    }

    pub fn with_options(oracle: O, opts: AlphaBetaOptions) -> AlphaBeta<O> {
        AlphaBeta {
            oracle,
            opts,
            cache: ScoreCache::new(),
            role: None,
            stats: AlphaBetaStats::default(),
        }
    }

    /// Counters from the most recent decision.
    pub fn stats(&self) -> &AlphaBetaStats {
        &self.stats
    }

    /// Value of the last chosen move, when a move finished evaluating.
    pub fn root_value(&self) -> Option<GoalValue> {
        self.stats.root_value
    }

    /// Number of finalized states in the transposition cache.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    fn rebind_role(&mut self, role: &O::Role) {
        if self.role.as_ref() != Some(role) {
            self.cache.clear();
            self.role = Some(role.clone());
        }
    }

    /// The minimax value of `state` for `role` within the `(alpha, beta)`
    /// window. Interrupts (deadline, depth guard, oracle failure) propagate
    /// as errors and leave no trace in the cache.
    fn state_value(
        &mut self, state: &O::State, role: &O::Role, mut alpha: GoalValue, mut beta: GoalValue,
        depth: u32, deadline: Deadline,
    ) -> Result<GoalValue, SearchError> {
        if deadline.expired() || depth >= self.opts.max_depth {
            return Err(SearchError::TimeExhausted);
        }
        if let Some(value) = self.cache.get(state) {
            self.stats.cache_hits += 1;
            return Ok(value);
        }
        self.stats.explored += 1;
        if self.oracle.is_terminal(state) {
            let value = self.oracle.goal(state, role)?;
            self.cache.insert(state.clone(), value);
            return Ok(value);
        }

        let my_moves = self.oracle.legal_moves(state, role)?;
        if my_moves.is_empty() {
            return Err(SearchError::EmptyMoveSet);
        }
        let joints = self.oracle.legal_joint_moves(state)?;
        if joints.is_empty() {
            return Err(SearchError::EmptyMoveSet);
        }
        let maximizing = my_moves.len() > 1;

        let mut min_score = MAX_GOAL;
        let mut max_score = MIN_GOAL;
        for joint in &joints {
            if deadline.expired() {
                return Err(SearchError::TimeExhausted);
            }
            let successor = self.oracle.next_state(state, joint)?;
            let value = self.state_value(&successor, role, alpha, beta, depth + 1, deadline)?;
            min_score = min_score.min(value);
            max_score = max_score.max(value);
            if maximizing {
                if max_score >= beta {
                    self.cache.insert(state.clone(), beta);
                    return Ok(beta);
                }
                alpha = alpha.max(max_score);
            } else {
                if min_score <= alpha {
                    self.cache.insert(state.clone(), alpha);
                    return Ok(alpha);
                }
                beta = beta.min(min_score);
            }
        }

        let value = if maximizing { max_score } else { min_score };
        self.cache.insert(state.clone(), value);
        Ok(value)
    }
}

impl<O: Oracle> Strategy<O> for AlphaBeta<O> {
    fn select_move(
        &mut self, state: &O::State, role: &O::Role, deadline: Deadline,
    ) -> Result<Decision<O::Move>, SearchError> {
        let start = Instant::now();
        self.rebind_role(role);
        self.stats = AlphaBetaStats::default();

        let moves = self.oracle.legal_moves(state, role)?;
        let mut best = moves.first().cloned().ok_or(SearchError::EmptyMoveSet)?;
        let mut best_value: Option<GoalValue> = None;

        'moves: for (index, m) in moves.iter().enumerate() {
            if deadline.expired() {
                break;
            }
            let joints = match self.oracle.legal_joint_moves_fixing(state, role, m) {
                Ok(joints) => joints,
                Err(_) => continue,
            };
            if joints.is_empty() {
                continue;
            }
            // The opposition settles which consistent joint move happens, so
            // a move is worth the least of its outcomes.
            let mut move_value = MAX_GOAL;
            for joint in &joints {
                let successor = match self.oracle.next_state(state, joint) {
                    Ok(successor) => successor,
                    Err(_) => continue 'moves,
                };
                match self.state_value(&successor, role, MIN_GOAL, MAX_GOAL, 0, deadline) {
                    Ok(value) => move_value = move_value.min(value),
                    Err(SearchError::TimeExhausted) => break 'moves,
                    Err(SearchError::Oracle(_)) => continue 'moves,
                    Err(err @ SearchError::EmptyMoveSet) => return Err(err),
                }
            }
            trace!(candidate = index, value = move_value, "root move evaluated");
            if best_value.map_or(true, |current| move_value > current) {
                best_value = Some(move_value);
                best = m.clone();
            }
        }

        self.stats.root_value = best_value;
        self.stats.elapsed = start.elapsed();
        debug!(
            candidates = moves.len(),
            root_value = ?best_value,
            explored = self.stats.explored,
            cache_hits = self.stats.cache_hits,
            cache_size = self.cache.len(),
            elapsed_ms = self.stats.elapsed.as_millis() as u64,
            "alpha-beta decision"
        );
        Ok(Decision { chosen: best, candidates: moves, elapsed: self.stats.elapsed })
    }
}
