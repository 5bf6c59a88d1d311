//! A definition of the game Tic-Tac-Toe using the library, for use in tests.
//!
//! The game is written the way general-game rulesheets express alternation:
//! both roles submit a move every turn, and the role whose turn it is not has
//! exactly one legal move, a no-op. A correctly-implemented strategy playing
//! both seats should always draw, and should never lose to one that picks
//! moves randomly.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::interface::{GoalValue, JointMove, Oracle, OracleError, MAX_GOAL, MIN_GOAL};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    fn square(self) -> Square {
        match self {
            Player::X => Square::X,
            Player::O => Square::O,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Square {
    #[default]
    Empty,
    X,
    O,
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let c = match self {
            Square::Empty => ' ',
            Square::X => 'X',
            Square::O => 'O',
        };
        write!(f, "{}", c)
    }
}

/// One role's action: claim a square, or pass while the other role plays.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Place(u8),
    Noop,
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Move::Place(i) => write!(f, "place@{}", i),
            Move::Noop => write!(f, "noop"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Square; 9],
    to_move: Player,
}

impl Default for Board {
    fn default() -> Board {
        Board { squares: [Square::Empty; 9], to_move: Player::X }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "{} | {} | {}", self.squares[0], self.squares[1], self.squares[2])?;
        writeln!(f, "{} | {} | {}", self.squares[3], self.squares[4], self.squares[5])?;
        writeln!(f, "{} | {} | {}", self.squares[6], self.squares[7], self.squares[8])?;
        Ok(())
    }
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

fn winner(board: &Board) -> Option<Square> {
    LINES.iter().find_map(|line| {
        let first = board.squares[line[0]];
        if first != Square::Empty && line.iter().all(|&i| board.squares[i] == first) {
            Some(first)
        } else {
            None
        }
    })
}

pub struct Game {
    roles: [Player; 2],
}

impl Game {
    pub fn new() -> Game {
        Game { roles: [Player::X, Player::O] }
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

impl Oracle for Game {
    type State = Board;
    type Role = Player;
    type Move = Move;

    fn roles(&self) -> &[Player] {
        &self.roles
    }

    fn legal_moves(&self, board: &Board, role: &Player) -> Result<Vec<Move>, OracleError> {
        if self.is_terminal(board) {
            return Ok(Vec::new());
        }
        if *role != board.to_move {
            return Ok(vec![Move::Noop]);
        }
        Ok(board
            .squares
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Square::Empty)
            .map(|(i, _)| Move::Place(i as u8))
            .collect())
    }

    fn legal_joint_moves(&self, board: &Board) -> Result<Vec<JointMove<Move>>, OracleError> {
        if self.is_terminal(board) {
            return Ok(Vec::new());
        }
        let x_moves = self.legal_moves(board, &Player::X)?;
        let o_moves = self.legal_moves(board, &Player::O)?;
        let mut joints = Vec::with_capacity(x_moves.len() * o_moves.len());
        for x in &x_moves {
            for o in &o_moves {
                joints.push(vec![*x, *o]);
            }
        }
        Ok(joints)
    }

    fn next_state(&self, board: &Board, joint: &JointMove<Move>) -> Result<Board, OracleError> {
        if self.is_terminal(board) || joint.len() != 2 {
            return Err(OracleError::TransitionDefinition);
        }
        let (mover_move, idle_move) = match board.to_move {
            Player::X => (joint[0], joint[1]),
            Player::O => (joint[1], joint[0]),
        };
        let i = match (mover_move, idle_move) {
            (Move::Place(i), Move::Noop) => i as usize,
            _ => return Err(OracleError::TransitionDefinition),
        };
        if i >= 9 || board.squares[i] != Square::Empty {
            return Err(OracleError::TransitionDefinition);
        }
        let mut next = board.clone();
        next.squares[i] = board.to_move.square();
        next.to_move = board.to_move.opponent();
        Ok(next)
    }

    fn is_terminal(&self, board: &Board) -> bool {
        winner(board).is_some() || board.squares.iter().all(|s| *s != Square::Empty)
    }

    fn goal(&self, board: &Board, role: &Player) -> Result<GoalValue, OracleError> {
        if !self.is_terminal(board) {
            return Err(OracleError::GoalDefinition);
        }
        Ok(match winner(board) {
            Some(s) if s == role.square() => MAX_GOAL,
            Some(_) => MIN_GOAL,
            None => 50,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &Game, joints: &[JointMove<Move>]) -> Board {
        let mut board = Board::default();
        for joint in joints {
            board = game.next_state(&board, joint).unwrap();
        }
        board
    }

    #[test]
    fn the_idle_role_only_noops() {
        let game = Game::new();
        let board = Board::default();
        assert_eq!(game.legal_moves(&board, &Player::O).unwrap(), vec![Move::Noop]);
        assert_eq!(game.legal_moves(&board, &Player::X).unwrap().len(), 9);
        assert_eq!(game.legal_joint_moves(&board).unwrap().len(), 9);
    }

    #[test]
    fn a_completed_row_ends_the_game() {
        let game = Game::new();
        let board = play(
            &game,
            &[
                vec![Move::Place(0), Move::Noop],
                vec![Move::Noop, Move::Place(3)],
                vec![Move::Place(1), Move::Noop],
                vec![Move::Noop, Move::Place(4)],
                vec![Move::Place(2), Move::Noop],
            ],
        );
        assert!(game.is_terminal(&board));
        assert_eq!(game.goal(&board, &Player::X).unwrap(), MAX_GOAL);
        assert_eq!(game.goal(&board, &Player::O).unwrap(), MIN_GOAL);
        assert!(game.legal_moves(&board, &Player::X).unwrap().is_empty());
    }

    #[test]
    fn goals_are_undefined_before_the_end() {
        let game = Game::new();
        let board = Board::default();
        assert_eq!(game.goal(&board, &Player::X), Err(OracleError::GoalDefinition));
    }

    #[test]
    fn occupied_squares_reject_transitions() {
        let game = Game::new();
        let board = play(&game, &[vec![Move::Place(4), Move::Noop]]);
        let result = game.next_state(&board, &vec![Move::Noop, Move::Place(4)]);
        assert_eq!(result, Err(OracleError::TransitionDefinition));
    }
}
