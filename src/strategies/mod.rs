//! Strategy implementations.

pub mod alpha_beta;
pub mod mcts;
pub mod random;
