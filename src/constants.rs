//! Constants for board limits, evaluator weights, and search parameters.
//!
//! This module collects every tunable default of the engine. Values that a
//! caller may want to change per game (board size, search depth, simulation
//! budget) are only *defaults* here; the CLI and the config builders override
//! them at runtime.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest allowed number of rows or columns.
pub const MIN_DIM: usize = 3;

/// Largest allowed number of rows or columns.
pub const MAX_DIM: usize = 30;

/// Shortest allowed winning run.
pub const MIN_CONNECT: usize = 3;

/// Default number of rows (classic Connect-Four).
pub const DEFAULT_ROWS: usize = 6;

/// Default number of columns (classic Connect-Four).
pub const DEFAULT_COLS: usize = 7;

/// Default run length needed to win.
pub const DEFAULT_CONNECT: usize = 4;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Weight for a position already won by the evaluated player.
pub const W_WIN: i64 = 1_000_000;

/// Penalty when the opponent has an immediate winning column.
pub const W_BLOCK: i64 = 200_000;

/// Multiplier for the squared potential-line score.
pub const W_POTENTIAL: i64 = 200;

/// Multiplier for the center bias of the last played column.
pub const W_CENTER: i64 = 20;

/// Own double-threat bonus, offensive profile.
pub const W_OWN_FORK_OFFENSIVE: i64 = 450_000;

/// Opponent double-threat penalty, offensive profile.
pub const W_OPP_FORK_OFFENSIVE: i64 = 500_000;

/// Own double-threat bonus, defensive profile.
pub const W_OWN_FORK_DEFENSIVE: i64 = 350_000;

/// Opponent double-threat penalty, defensive profile.
pub const W_OPP_FORK_DEFENSIVE: i64 = 600_000;

/// Fixed bonus for an own open fork template `[., X * (k-2), .]`.
pub const FORK_BONUS: i64 = 80_000;

/// Fixed penalty for an opponent open fork template.
pub const FORK_PENALTY: i64 = 100_000;

// =============================================================================
// Minimax Parameters
// =============================================================================

/// Default search depth in plies.
pub const MINIMAX_DEPTH: usize = 6;

/// Score bound. Decided positions score around `SEARCH_INF / 2`.
pub const SEARCH_INF: i64 = 1_000_000_000_000;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of simulations per move.
pub const N_SIMS: u32 = 5000;

/// Default UCT exploration constant.
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

// =============================================================================
// Agent Names
// =============================================================================

/// Default name of the random agent.
pub const NAME_RANDOM: &str = "Marlon Random";
/// Default name of the offensive heuristic agent.
pub const NAME_OFFENSIVE: &str = "Rowan Attackinson";
/// Default name of the defensive heuristic agent.
pub const NAME_DEFENSIVE: &str = "Samuel L. Blockson";
/// Default name of the alpha-beta agent.
pub const NAME_MINIMAX: &str = "Minnie Maxus";
/// Default name of the Monte Carlo agent.
pub const NAME_MCTS: &str = "Monty Carlton";
