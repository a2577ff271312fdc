//! Error types shared by the board, the agents, and the game controller.

use thiserror::Error;

/// Everything that can go wrong while building a board or playing on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid board {rows}x{cols} with connect {connect}: {reason}")]
    Configuration {
        rows: usize,
        cols: usize,
        connect: usize,
        reason: &'static str,
    },

    #[error("invalid player {0}, player must be 1 or 2")]
    InvalidPlayer(u8),

    #[error("column {column} is out of range (0-{})", .cols.saturating_sub(1))]
    ColumnRange { column: usize, cols: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("the game is already over")]
    GameOver,
}

/// Result alias used throughout the crate.
pub type Result<T, E = GameError> = std::result::Result<T, E>;
