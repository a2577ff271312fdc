//! The move-selection contract shared by every strategy.

use crate::board::{Board, Player};
use crate::constants::NAME_RANDOM;
use crate::error::{GameError, Result};

/// A player that picks columns.
///
/// Implementations never mutate the board they are given; searches work on
/// clones. Agents that carry a random generator take `&mut self`, so a single
/// instance must not serve two move requests at the same time.
pub trait Agent {
    /// Display name.
    fn name(&self) -> &str;

    /// Choose a legal column for `player` to play on `board`.
    ///
    /// # Errors
    /// [`GameError::NoLegalMoves`] if every column is full.
    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize>;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize> {
        (**self).select_move(board, player)
    }
}

/// Picks a uniformly random legal column.
pub struct RandomAgent {
    name: String,
    rng: fastrand::Rng,
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            name: NAME_RANDOM.to_string(),
            rng: fastrand::Rng::new(),
        }
    }

    /// Reproducible agent.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: NAME_RANDOM.to_string(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, board: &Board, _player: Player) -> Result<usize> {
        let legal = board.legal_columns();
        self.rng
            .choice(legal.iter().copied())
            .ok_or(GameError::NoLegalMoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_agent_selects_legal_column() {
        let mut agent = RandomAgent::with_seed(7);
        let mut board = Board::new(3, 3, 3).unwrap();
        for p in [1, 2, 1] {
            board.drop(1, p).unwrap();
        }
        for _ in 0..100 {
            let col = agent.select_move(&board, Player::Two).unwrap();
            assert!(board.is_legal(col), "column {col} is not legal");
        }
    }

    #[test]
    fn test_random_agent_no_legal_moves() {
        let mut board = Board::new(3, 3, 3).unwrap();
        for (col, players) in [(0, [1, 2, 1]), (1, [1, 2, 1]), (2, [2, 1, 2])] {
            for p in players {
                board.drop(col, p).unwrap();
            }
        }
        assert!(board.is_full());
        let mut agent = RandomAgent::with_seed(1);
        assert_eq!(
            agent.select_move(&board, Player::One),
            Err(GameError::NoLegalMoves)
        );
    }

    #[test]
    fn test_random_agent_name() {
        assert_eq!(RandomAgent::new().name(), NAME_RANDOM);
        assert_eq!(RandomAgent::new().named("Rando").name(), "Rando");
    }
}
