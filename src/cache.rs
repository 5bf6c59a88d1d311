//! Transposition cache for finalized state values.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::interface::GoalValue;

/// Maps fully resolved states to their search value.
///
/// Entries are write-once: the first finalized value for a state sticks, and
/// interrupted searches never insert at all, so a hit always matches what a
/// completed search of the same state returned. Values are relative to the
/// searched role; the owning engine clears the cache when that role changes.
#[derive(Clone, Debug)]
pub struct ScoreCache<S> {
    scores: FxHashMap<S, GoalValue>,
}

impl<S: Eq + Hash> ScoreCache<S> {
    pub fn new() -> ScoreCache<S> {
        ScoreCache { scores: FxHashMap::default() }
    }

    /// The finalized value for a state, if one has been recorded.
    pub fn get(&self, state: &S) -> Option<GoalValue> {
        self.scores.get(state).copied()
    }

    /// Record a finalized value. The first write for a state wins.
    pub fn insert(&mut self, state: S, value: GoalValue) {
        self.scores.entry(state).or_insert(value);
    }

    /// Number of finalized states.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.scores.clear();
    }
}

impl<S: Eq + Hash> Default for ScoreCache<S> {
    fn default() -> ScoreCache<S> {
        ScoreCache::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_write_wins() {
        let mut cache = ScoreCache::new();
        cache.insert("state", 80);
        cache.insert("state", 20);
        assert_eq!(cache.get(&"state"), Some(80));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = ScoreCache::new();
        cache.insert(1u32, 50);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
    }
}
