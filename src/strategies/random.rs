//! A strategy that picks uniformly among legal moves, for use in tests and as
//! a baseline opponent.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::deadline::Deadline;
use crate::interface::{Decision, Oracle, SearchError, Strategy};

pub struct Random<O: Oracle> {
    oracle: O,
    rng: StdRng,
}

impl<O: Oracle> Random<O> {
    pub fn new(oracle: O) -> Random<O> {
        Random { oracle, rng: StdRng::from_entropy() }
    }

    /// Deterministic variant for reproducible matches.
    pub fn with_seed(oracle: O, seed: u64) -> Random<O> {
        Random { oracle, rng: StdRng::seed_from_u64(seed) }
    }
}

impl<O: Oracle> Strategy<O> for Random<O> {
    fn select_move(
        &mut self, state: &O::State, role: &O::Role, _deadline: Deadline,
    ) -> Result<Decision<O::Move>, SearchError> {
        let start = Instant::now();
        let candidates = self.oracle.legal_moves(state, role)?;
        let chosen = candidates.choose(&mut self.rng).cloned().ok_or(SearchError::EmptyMoveSet)?;
        Ok(Decision { chosen, candidates, elapsed: start.elapsed() })
    }
}
