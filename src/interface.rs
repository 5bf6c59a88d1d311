//! The common structures and traits.

use std::hash::Hash;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::RngCore;
use thiserror::Error;

use crate::deadline::Deadline;

/// A terminal-state payoff from the perspective of one role.
///
/// Goal values range from 0 (total loss) to 100 (total win); 50 is a draw.
/// They are defined only at terminal states.
pub type GoalValue = i32;

/// The lowest goal value a game can assign.
pub const MIN_GOAL: GoalValue = 0;
/// The highest goal value a game can assign.
pub const MAX_GOAL: GoalValue = 100;

/// One move per role, in [`Oracle::roles`] order, forming a single transition.
pub type JointMove<M> = Vec<M>;

/// A failure reported by the rules engine itself.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The rules define no legal moves for the queried role at this state.
    #[error("no move definition for the queried role at this state")]
    MoveDefinition,
    /// The rules define no successor for the applied joint move.
    #[error("no transition definition for the applied joint move")]
    TransitionDefinition,
    /// The rules define no goal for the queried role at this terminal state.
    #[error("no goal definition for the queried role at this state")]
    GoalDefinition,
}

/// Why a search, or one branch of it, stopped without producing a value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The deadline passed or a depth guard tripped. Recoverable: the best
    /// answer found so far stands, and this never escapes the root call.
    #[error("search deadline exhausted")]
    TimeExhausted,
    /// The oracle failed on a query, so the branch is abandoned.
    #[error("oracle query failed: {0}")]
    Oracle(#[from] OracleError),
    /// The oracle reported zero legal moves at a non-terminal state.
    #[error("no legal moves at a non-terminal state")]
    EmptyMoveSet,
}

/// The rules engine for a general game, queried but never mutated by search.
///
/// States are value-comparable snapshots: every transition produces a new
/// state, and both search strategies key maps by state, hence the `Eq + Hash`
/// bounds. Queries that can fail on an ill-defined rulesheet return
/// [`OracleError`] instead of panicking.
pub trait Oracle {
    /// The type of the game state.
    type State: Clone + Eq + Hash;
    /// The type identifying one participant.
    type Role: Clone + Eq + Hash;
    /// The type of a single role's move.
    type Move: Clone + Eq + Hash;

    /// All roles in the game, in the fixed order joint moves use.
    fn roles(&self) -> &[Self::Role];

    /// The legal moves for one role at a state.
    fn legal_moves(
        &self, state: &Self::State, role: &Self::Role,
    ) -> Result<Vec<Self::Move>, OracleError>;

    /// Every legal combination of one move per role.
    fn legal_joint_moves(
        &self, state: &Self::State,
    ) -> Result<Vec<JointMove<Self::Move>>, OracleError>;

    /// The joint moves consistent with `role` playing `m`.
    fn legal_joint_moves_fixing(
        &self, state: &Self::State, role: &Self::Role, m: &Self::Move,
    ) -> Result<Vec<JointMove<Self::Move>>, OracleError> {
        let index = self.role_index(role);
        Ok(self
            .legal_joint_moves(state)?
            .into_iter()
            .filter(|joint| joint.get(index) == Some(m))
            .collect())
    }

    /// The successor reached by applying one joint move.
    fn next_state(
        &self, state: &Self::State, joint: &JointMove<Self::Move>,
    ) -> Result<Self::State, OracleError>;

    /// Whether the game is over at this state.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// The payoff for `role`, defined only where [`Oracle::is_terminal`] holds.
    fn goal(&self, state: &Self::State, role: &Self::Role) -> Result<GoalValue, OracleError>;

    /// Position of `role` within [`Oracle::roles`]; the first seat when unknown.
    fn role_index(&self, role: &Self::Role) -> usize {
        self.roles().iter().position(|r| r == role).unwrap_or(0)
    }

    /// Play uniformly random joint moves from `state` until a terminal state
    /// is reached or `limit` steps have been taken. Returns the end state and
    /// the depth reached; the end state is only terminal if the limit wasn't
    /// hit first.
    fn random_depth_charge(
        &self, state: &Self::State, limit: u32, rng: &mut dyn RngCore,
    ) -> Result<(Self::State, u32), OracleError> {
        let mut state = state.clone();
        let mut depth = 0;
        while depth < limit && !self.is_terminal(&state) {
            let joints = self.legal_joint_moves(&state)?;
            let joint = joints.choose(rng).ok_or(OracleError::MoveDefinition)?;
            state = self.next_state(&state, joint)?;
            depth += 1;
        }
        Ok((state, depth))
    }
}

// Lets one oracle be shared by several strategies.
impl<O: Oracle + ?Sized> Oracle for &O {
    type State = O::State;
    type Role = O::Role;
    type Move = O::Move;

    fn roles(&self) -> &[Self::Role] {
        (**self).roles()
    }

    fn legal_moves(
        &self, state: &Self::State, role: &Self::Role,
    ) -> Result<Vec<Self::Move>, OracleError> {
        (**self).legal_moves(state, role)
    }

    fn legal_joint_moves(
        &self, state: &Self::State,
    ) -> Result<Vec<JointMove<Self::Move>>, OracleError> {
        (**self).legal_joint_moves(state)
    }

    fn legal_joint_moves_fixing(
        &self, state: &Self::State, role: &Self::Role, m: &Self::Move,
    ) -> Result<Vec<JointMove<Self::Move>>, OracleError> {
        (**self).legal_joint_moves_fixing(state, role, m)
    }

    fn next_state(
        &self, state: &Self::State, joint: &JointMove<Self::Move>,
    ) -> Result<Self::State, OracleError> {
        (**self).next_state(state, joint)
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        (**self).is_terminal(state)
    }

    fn goal(&self, state: &Self::State, role: &Self::Role) -> Result<GoalValue, OracleError> {
        (**self).goal(state, role)
    }

    fn role_index(&self, role: &Self::Role) -> usize {
        (**self).role_index(role)
    }

    fn random_depth_charge(
        &self, state: &Self::State, limit: u32, rng: &mut dyn RngCore,
    ) -> Result<(Self::State, u32), OracleError> {
        (**self).random_depth_charge(state, limit, rng)
    }
}

/// What a strategy decided and what it was deciding between, returned from
/// every [`Strategy::select_move`] call.
#[derive(Clone, Debug)]
pub struct Decision<M> {
    /// The move to play.
    pub chosen: M,
    /// The legal moves that were on the table.
    pub candidates: Vec<M>,
    /// Wall time spent deciding.
    pub elapsed: Duration,
}

/// Defines a method of choosing a move for one role under a deadline.
pub trait Strategy<O: Oracle> {
    /// Pick a move for `role` at `state`, finishing by `deadline`.
    ///
    /// Yields a decision whenever at least one legal move exists, even when
    /// the deadline has already passed at call time. Fails only when the
    /// oracle cannot enumerate the root moves, or reports none at a
    /// non-terminal state.
    fn select_move(
        &mut self, state: &O::State, role: &O::Role, deadline: Deadline,
    ) -> Result<Decision<O::Move>, SearchError>;
}
