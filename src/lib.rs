//! connectn: Connect-N game engine with heuristic, minimax and MCTS players.
//!
//! The board has any size from 3x3 to 30x30 and any winning run length that
//! fits on it. Tokens fall to the lowest empty row of a column; the first
//! player to line up `connect` tokens horizontally, vertically or diagonally
//! wins, and a full board without a winner is a draw.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, evaluation weights, search defaults
//! - [`error`] - The library error type
//! - [`board`] - Grid, gravity, win detection
//! - [`patterns`] - Window scans used by the evaluator
//! - [`agent`] - The `Agent` trait and the random player
//! - [`heuristic`] - Weighted evaluation and the rule-based players
//! - [`minimax`] - Alpha-beta search
//! - [`playout`] - Rollout policy for tree search
//! - [`mcts`] - Monte Carlo Tree Search with UCT
//! - [`game`] - Turn handling and the match loop
//!
//! ## Example
//!
//! ```
//! use connectn::agent::Agent;
//! use connectn::board::{Board, Player};
//! use connectn::mcts::{MctsAgent, MctsConfig};
//! use connectn::minimax::MinimaxAgent;
//!
//! let mut board = Board::new(6, 7, 4).unwrap();
//! board.play(3, Player::One).unwrap();
//!
//! // Answer with a depth-4 alpha-beta search
//! let mut minimax = MinimaxAgent::new(4);
//! let col = minimax.select_move(&board, Player::Two).unwrap();
//! assert!(board.is_legal(col));
//!
//! // Or with 200 UCT simulations
//! let mut mcts = MctsAgent::with_seed(MctsConfig::default().with_simulations(200), 7);
//! let col = mcts.select_move(&board, Player::Two).unwrap();
//! println!("Monte Carlo reply: {col}");
//! ```

pub mod agent;
pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod heuristic;
pub mod mcts;
pub mod minimax;
pub mod patterns;
pub mod playout;

pub use error::{GameError, Result};
