//! Utility functions for driving matches, for use in tests and benchmarks.

use std::time::Duration;

use crate::deadline::Deadline;
use crate::interface::{GoalValue, Oracle, SearchError, Strategy};

/// Play a complete game from `start`, one strategy per role in
/// [`Oracle::roles`] order, arming a fresh `budget` deadline for every
/// decision.
///
/// Returns the terminal state and each role's goal value, in role order.
pub fn play_match<O: Oracle>(
    oracle: O, start: &O::State, strategies: &mut [&mut dyn Strategy<O>], budget: Duration,
) -> Result<(O::State, Vec<GoalValue>), SearchError> {
    let roles = oracle.roles().to_vec();
    assert_eq!(strategies.len(), roles.len());

    let mut state = start.clone();
    while !oracle.is_terminal(&state) {
        let mut joint = Vec::with_capacity(roles.len());
        for (role, strategy) in roles.iter().zip(strategies.iter_mut()) {
            let decision = strategy.select_move(&state, role, Deadline::from_now(budget))?;
            joint.push(decision.chosen);
        }
        state = oracle.next_state(&state, &joint)?;
    }

    let mut goals = Vec::with_capacity(roles.len());
    for role in &roles {
        goals.push(oracle.goal(&state, role)?);
    }
    Ok((state, goals))
}
