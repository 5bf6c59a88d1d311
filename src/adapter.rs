//! A memoizing wrapper around a game oracle.

use std::cell::RefCell;

use rand::RngCore;
use rustc_hash::FxHashMap;

use crate::interface::{GoalValue, JointMove, Oracle, OracleError};

// Everything the oracle has answered about one state.
struct StateMemo<O: Oracle> {
    legal: FxHashMap<O::Role, Vec<O::Move>>,
    joints: Option<Vec<JointMove<O::Move>>>,
    next: FxHashMap<JointMove<O::Move>, O::State>,
    terminal: Option<bool>,
    goals: FxHashMap<O::Role, GoalValue>,
}

impl<O: Oracle> Default for StateMemo<O> {
    fn default() -> StateMemo<O> {
        StateMemo {
            legal: FxHashMap::default(),
            joints: None,
            next: FxHashMap::default(),
            terminal: None,
            goals: FxHashMap::default(),
        }
    }
}

/// Memoizes successful oracle answers per state.
///
/// Search revisits states constantly (alpha-beta through transpositions, MCTS
/// through repeated descents), so a rules engine that evaluates its rulesheet
/// per query gains a lot from answering out of a map instead. Failed queries
/// are not recorded and will be asked again.
///
/// Depth charges pass through uncached: rollouts rarely revisit a state, and
/// recording every random position would only grow the memo.
pub struct CachedOracle<O: Oracle> {
    inner: O,
    memo: RefCell<FxHashMap<O::State, StateMemo<O>>>,
}

impl<O: Oracle> CachedOracle<O> {
    pub fn new(inner: O) -> CachedOracle<O> {
        CachedOracle { inner, memo: RefCell::new(FxHashMap::default()) }
    }

    /// The wrapped oracle.
    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Number of states with at least one memoized answer.
    pub fn len(&self) -> usize {
        self.memo.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.borrow().is_empty()
    }

    /// Forget every memoized answer.
    pub fn clear(&self) {
        self.memo.borrow_mut().clear();
    }
}

impl<O: Oracle> Oracle for CachedOracle<O> {
    type State = O::State;
    type Role = O::Role;
    type Move = O::Move;

    fn roles(&self) -> &[O::Role] {
        self.inner.roles()
    }

    fn legal_moves(&self, state: &O::State, role: &O::Role) -> Result<Vec<O::Move>, OracleError> {
        let cached = self.memo.borrow().get(state).and_then(|m| m.legal.get(role).cloned());
        if let Some(moves) = cached {
            return Ok(moves);
        }
        let moves = self.inner.legal_moves(state, role)?;
        self.memo
            .borrow_mut()
            .entry(state.clone())
            .or_default()
            .legal
            .insert(role.clone(), moves.clone());
        Ok(moves)
    }

    fn legal_joint_moves(&self, state: &O::State) -> Result<Vec<JointMove<O::Move>>, OracleError> {
        let cached = self.memo.borrow().get(state).and_then(|m| m.joints.clone());
        if let Some(joints) = cached {
            return Ok(joints);
        }
        let joints = self.inner.legal_joint_moves(state)?;
        self.memo.borrow_mut().entry(state.clone()).or_default().joints = Some(joints.clone());
        Ok(joints)
    }

    fn next_state(
        &self, state: &O::State, joint: &JointMove<O::Move>,
    ) -> Result<O::State, OracleError> {
        let cached = self.memo.borrow().get(state).and_then(|m| m.next.get(joint).cloned());
        if let Some(next) = cached {
            return Ok(next);
        }
        let next = self.inner.next_state(state, joint)?;
        self.memo
            .borrow_mut()
            .entry(state.clone())
            .or_default()
            .next
            .insert(joint.clone(), next.clone());
        Ok(next)
    }

    fn is_terminal(&self, state: &O::State) -> bool {
        let cached = self.memo.borrow().get(state).and_then(|m| m.terminal);
        if let Some(terminal) = cached {
            return terminal;
        }
        let terminal = self.inner.is_terminal(state);
        self.memo.borrow_mut().entry(state.clone()).or_default().terminal = Some(terminal);
        terminal
    }

    fn goal(&self, state: &O::State, role: &O::Role) -> Result<GoalValue, OracleError> {
        let cached = self.memo.borrow().get(state).and_then(|m| m.goals.get(role).copied());
        if let Some(goal) = cached {
            return Ok(goal);
        }
        let goal = self.inner.goal(state, role)?;
        self.memo.borrow_mut().entry(state.clone()).or_default().goals.insert(role.clone(), goal);
        Ok(goal)
    }

    fn role_index(&self, role: &O::Role) -> usize {
        self.inner.role_index(role)
    }

    fn random_depth_charge(
        &self, state: &O::State, limit: u32, rng: &mut dyn RngCore,
    ) -> Result<(O::State, u32), OracleError> {
        self.inner.random_depth_charge(state, limit, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ttt;
    use std::cell::Cell;

    struct Counting {
        game: ttt::Game,
        queries: Cell<u32>,
    }

    impl Counting {
        fn new() -> Counting {
            Counting { game: ttt::Game::new(), queries: Cell::new(0) }
        }

        fn bump(&self) {
            self.queries.set(self.queries.get() + 1);
        }
    }

    impl Oracle for Counting {
        type State = ttt::Board;
        type Role = ttt::Player;
        type Move = ttt::Move;

        fn roles(&self) -> &[ttt::Player] {
            self.game.roles()
        }

        fn legal_moves(
            &self, state: &ttt::Board, role: &ttt::Player,
        ) -> Result<Vec<ttt::Move>, OracleError> {
            self.bump();
            self.game.legal_moves(state, role)
        }

        fn legal_joint_moves(
            &self, state: &ttt::Board,
        ) -> Result<Vec<JointMove<ttt::Move>>, OracleError> {
            self.bump();
            self.game.legal_joint_moves(state)
        }

        fn next_state(
            &self, state: &ttt::Board, joint: &JointMove<ttt::Move>,
        ) -> Result<ttt::Board, OracleError> {
            self.bump();
            self.game.next_state(state, joint)
        }

        fn is_terminal(&self, state: &ttt::Board) -> bool {
            self.bump();
            self.game.is_terminal(state)
        }

        fn goal(&self, state: &ttt::Board, role: &ttt::Player) -> Result<GoalValue, OracleError> {
            self.bump();
            self.game.goal(state, role)
        }
    }

    #[test]
    fn repeat_queries_are_answered_from_the_memo() {
        let oracle = CachedOracle::new(Counting::new());
        let board = ttt::Board::default();

        let first = oracle.legal_moves(&board, &ttt::Player::X).unwrap();
        let asked = oracle.inner().queries.get();
        let second = oracle.legal_moves(&board, &ttt::Player::X).unwrap();
        assert_eq!(first, second);
        assert_eq!(oracle.inner().queries.get(), asked);

        assert!(!oracle.is_terminal(&board));
        let asked = oracle.inner().queries.get();
        assert!(!oracle.is_terminal(&board));
        assert_eq!(oracle.inner().queries.get(), asked);
        assert_eq!(oracle.len(), 1);
    }

    #[test]
    fn clear_forgets_answers() {
        let oracle = CachedOracle::new(Counting::new());
        let board = ttt::Board::default();

        oracle.legal_joint_moves(&board).unwrap();
        let asked = oracle.inner().queries.get();
        oracle.clear();
        assert!(oracle.is_empty());
        oracle.legal_joint_moves(&board).unwrap();
        assert!(oracle.inner().queries.get() > asked);
    }
}
