//! Wall-clock budget for a single decision.

use std::time::{Duration, Instant};

/// An absolute cutoff that search loops poll between oracle calls.
///
/// Checks are cooperative: a step already in flight runs to completion, so
/// callers should arm the cutoff early enough to absorb one full branch
/// evaluation or rollout. [`Deadline::with_margin`] does that adjustment.
#[derive(Copy, Clone, Debug)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A cutoff at an absolute instant.
    pub fn at(instant: Instant) -> Deadline {
        Deadline { at: Some(instant) }
    }

    /// A cutoff `budget` from now.
    pub fn from_now(budget: Duration) -> Deadline {
        Deadline { at: Some(Instant::now() + budget) }
    }

    /// A cutoff that never passes. Searches run until the game tree is
    /// exhausted, so outside of tests this suits only small games.
    pub fn unlimited() -> Deadline {
        Deadline { at: None }
    }

    /// The same cutoff pulled `margin` earlier.
    pub fn with_margin(self, margin: Duration) -> Deadline {
        Deadline { at: self.at.map(|at| at.checked_sub(margin).unwrap_or(at)) }
    }

    /// Whether the cutoff has passed.
    pub fn expired(&self) -> bool {
        match self.at {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }

    /// Time left before the cutoff; `Duration::MAX` when unlimited.
    pub fn remaining(&self) -> Duration {
        match self.at {
            Some(at) => at.saturating_duration_since(Instant::now()),
            None => Duration::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_expires() {
        let deadline = Deadline::unlimited();
        assert!(!deadline.expired());
        assert_eq!(deadline.remaining(), Duration::MAX);
    }

    #[test]
    fn zero_budget_expires_immediately() {
        let deadline = Deadline::from_now(Duration::ZERO);
        assert!(deadline.expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[test]
    fn margin_moves_the_cutoff_earlier() {
        let deadline = Deadline::from_now(Duration::from_secs(60));
        assert!(!deadline.expired());
        assert!(deadline.with_margin(Duration::from_secs(60)).expired());
        assert!(!deadline.with_margin(Duration::from_secs(1)).expired());
    }

    #[test]
    fn remaining_counts_down() {
        let deadline = Deadline::from_now(Duration::from_secs(60));
        let first = deadline.remaining();
        assert!(first <= Duration::from_secs(60));
        assert!(deadline.remaining() <= first);
    }
}
