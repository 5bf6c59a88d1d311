//! Time-bounded adversarial search for general games.
//!
//! A general game exposes its rules through the [`Oracle`] trait: legal moves
//! per role, legal joint moves, successor states, terminality, and goal
//! values in 0 to 100. On top of that, two interchangeable strategies choose
//! moves under a wall-clock [`Deadline`]:
//!
//! * [`AlphaBeta`], depth-first minimax with alpha-beta pruning and a
//!   write-once transposition cache;
//! * [`MonteCarloTreeSearch`], UCT selection over a state-keyed tree with
//!   random-rollout evaluation.
//!
//! Both implement [`Strategy`] and return a [`Decision`] carrying the chosen
//! move and per-call diagnostics. [`Random`] provides a baseline opponent,
//! [`CachedOracle`] memoizes a slow rules engine, and [`util::play_match`]
//! drives a full game.

pub mod adapter;
pub mod cache;
pub mod deadline;
pub mod interface;
pub mod strategies;
pub mod ttt;
pub mod util;

pub use adapter::CachedOracle;
pub use cache::ScoreCache;
pub use deadline::Deadline;
pub use interface::{
    Decision, GoalValue, JointMove, Oracle, OracleError, SearchError, Strategy, MAX_GOAL, MIN_GOAL,
};
pub use strategies::alpha_beta::{AlphaBeta, AlphaBetaOptions, AlphaBetaStats};
pub use strategies::mcts::{MctsOptions, MctsStats, MonteCarloTreeSearch};
pub use strategies::random::Random;
