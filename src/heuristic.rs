//! Rule-weighted position evaluation and the standalone heuristic agent.
//!
//! The composite score of a position combines:
//! - potential lines (see [`patterns::potential_lines`]), times the potential weight
//! - center bias of the last played column, times the center weight
//! - fork templates (fixed bonus/penalty, see [`patterns::fork_patterns`])
//! - the win weight if the position is already won by the evaluated player
//! - the block weight, subtracted if the opponent can win immediately
//! - double-threat weights for either side having two or more winning columns
//!
//! "Offensive" and "defensive" play differ only in their [`WeightProfile`].

use tracing::trace;

use crate::agent::Agent;
use crate::board::{Board, Player};
use crate::constants::{
    NAME_DEFENSIVE, NAME_OFFENSIVE, W_BLOCK, W_CENTER, W_OPP_FORK_DEFENSIVE,
    W_OPP_FORK_OFFENSIVE, W_OWN_FORK_DEFENSIVE, W_OWN_FORK_OFFENSIVE, W_POTENTIAL, W_WIN,
};
use crate::error::{GameError, Result};
use crate::patterns::{center_bonus, fork_patterns, potential_lines};

/// The six weights of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightProfile {
    /// Added when the evaluated player has already won.
    pub win: i64,
    /// Subtracted when the opponent has an immediate winning column.
    pub block: i64,
    /// Multiplier for the potential-line score.
    pub potential: i64,
    /// Multiplier for the center bias.
    pub center: i64,
    /// Added when the evaluated player has a double threat.
    pub own_fork: i64,
    /// Subtracted when the opponent has a double threat.
    pub opp_fork: i64,
}

impl WeightProfile {
    pub const OFFENSIVE: WeightProfile = WeightProfile {
        win: W_WIN,
        block: W_BLOCK,
        potential: W_POTENTIAL,
        center: W_CENTER,
        own_fork: W_OWN_FORK_OFFENSIVE,
        opp_fork: W_OPP_FORK_OFFENSIVE,
    };

    pub const DEFENSIVE: WeightProfile = WeightProfile {
        win: W_WIN,
        block: W_BLOCK,
        potential: W_POTENTIAL,
        center: W_CENTER,
        own_fork: W_OWN_FORK_DEFENSIVE,
        opp_fork: W_OPP_FORK_DEFENSIVE,
    };
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self::OFFENSIVE
    }
}

/// Scores positions under a fixed weight profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
    weights: WeightProfile,
}

impl Evaluator {
    pub fn new(weights: WeightProfile) -> Self {
        Self { weights }
    }

    pub fn offensive() -> Self {
        Self::new(WeightProfile::OFFENSIVE)
    }

    pub fn defensive() -> Self {
        Self::new(WeightProfile::DEFENSIVE)
    }

    pub fn weights(&self) -> &WeightProfile {
        &self.weights
    }

    /// Composite score of `board` for `player`, where `last_col` is the
    /// column that was just played (used for the center term).
    pub fn score(&self, board: &Board, last_col: usize, player: Player) -> i64 {
        let w = &self.weights;
        let opp = player.opponent();

        let mut score = w.potential * potential_lines(board, player);
        score += w.center * center_bonus(board, last_col);
        score += fork_patterns(board, player);

        if board.winner() == Some(player) {
            score += w.win;
        }

        let opp_wins = board.winning_columns(opp);
        if !opp_wins.is_empty() {
            score -= w.block;
        }
        if board.winning_columns(player).len() >= 2 {
            score += w.own_fork;
        }
        if opp_wins.len() >= 2 {
            score -= w.opp_fork;
        }

        score
    }
}

// =============================================================================
// Threat primitives
// =============================================================================

/// Legal columns that win on the spot for `player`.
#[inline]
pub fn immediate_wins(board: &Board, player: Player) -> Vec<usize> {
    board.winning_columns(player)
}

/// Whether playing `col` leaves `player` with two or more winning columns.
pub fn creates_double_threat(board: &Board, col: usize, player: Player) -> Result<bool> {
    let next = board.with_move(col, player)?;
    Ok(next.winning_columns(player).len() >= 2)
}

/// Legal columns on which `player` would create a double threat.
pub fn double_threat_columns(board: &Board, player: Player) -> Result<Vec<usize>> {
    let mut cols = Vec::new();
    for col in board.legal_columns() {
        if creates_double_threat(board, col, player)? {
            cols.push(col);
        }
    }
    Ok(cols)
}

// =============================================================================
// Heuristic agent
// =============================================================================

/// Rule-based agent: win, block, fork, block forks, then best score.
pub struct HeuristicAgent {
    name: String,
    evaluator: Evaluator,
}

impl HeuristicAgent {
    pub fn new(name: impl Into<String>, evaluator: Evaluator) -> Self {
        Self {
            name: name.into(),
            evaluator,
        }
    }

    pub fn offensive() -> Self {
        Self::new(NAME_OFFENSIVE, Evaluator::offensive())
    }

    pub fn defensive() -> Self {
        Self::new(NAME_DEFENSIVE, Evaluator::defensive())
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Candidate with the highest score after `player` plays it; the first
    /// candidate wins ties.
    fn best_by_score(
        &self,
        board: &Board,
        candidates: &[usize],
        player: Player,
    ) -> Result<Option<usize>> {
        let mut best: Option<(usize, i64)> = None;
        for &col in candidates {
            let next = board.with_move(col, player)?;
            let score = self.evaluator.score(&next, col, player);
            trace!(col, score, "heuristic candidate");
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((col, score));
            }
        }
        Ok(best.map(|(col, _)| col))
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize> {
        let legal = board.legal_columns();
        if legal.is_empty() {
            return Err(GameError::NoLegalMoves);
        }
        let opp = player.opponent();

        // 1. Win now.
        if let Some(&col) = immediate_wins(board, player).first() {
            return Ok(col);
        }

        // 2. Forced block; pick the best of the blocking columns.
        let opp_wins = immediate_wins(board, opp);
        if let Some(col) = self.best_by_score(board, &opp_wins, player)? {
            return Ok(col);
        }

        // 3. Create a double threat, nearest the center.
        let mut forks = double_threat_columns(board, player)?;
        let mid = (board.cols() as f64 - 1.0) / 2.0;
        forks.sort_by(|&a, &b| {
            let da = (a as f64 - mid).abs();
            let db = (b as f64 - mid).abs();
            da.total_cmp(&db)
        });
        if let Some(&col) = forks.first() {
            return Ok(col);
        }

        // 4. Occupy the square where the opponent would fork.
        let opp_forks = double_threat_columns(board, opp)?;
        if let Some(col) = self.best_by_score(board, &opp_forks, player)? {
            return Ok(col);
        }

        // 5. Best composite score.
        self.best_by_score(board, &legal, player)?
            .ok_or(GameError::NoLegalMoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FORK_BONUS;

    fn board_with(moves: &[(usize, u8)]) -> Board {
        let mut board = Board::default();
        for &(col, p) in moves {
            board.drop(col, p).unwrap();
        }
        board
    }

    #[test]
    fn test_presets_differ_only_in_fork_weights() {
        let off = WeightProfile::OFFENSIVE;
        let def = WeightProfile::DEFENSIVE;
        assert_eq!(off.win, def.win);
        assert_eq!(off.block, def.block);
        assert_eq!(off.potential, def.potential);
        assert_eq!(off.center, def.center);
        assert!(def.opp_fork > off.opp_fork);
        assert!(def.own_fork < off.own_fork);

        assert_eq!(Evaluator::offensive().weights(), &off);
        assert_eq!(Evaluator::defensive().weights(), &def);
        assert_eq!(HeuristicAgent::offensive().evaluator().weights(), &off);
        assert_eq!(HeuristicAgent::defensive().evaluator().weights(), &def);
    }

    #[test]
    fn test_score_rewards_win() {
        let board = board_with(&[(0, 1), (1, 1), (2, 1), (3, 1)]);
        let eval = Evaluator::offensive();
        assert!(eval.score(&board, 3, Player::One) >= W_WIN);
        assert!(eval.score(&board, 3, Player::Two) < 0);
    }

    #[test]
    fn test_score_penalizes_open_threat() {
        // Player two threatens to complete the bottom row at column 3.
        let board = board_with(&[(0, 2), (1, 2), (2, 2), (6, 1)]);
        let eval = Evaluator::offensive();
        assert!(eval.score(&board, 6, Player::One) < -W_BLOCK / 2);
    }

    #[test]
    fn test_zero_profile_scores_fork_templates_only() {
        let zero = Evaluator::new(WeightProfile {
            win: 0,
            block: 0,
            potential: 0,
            center: 0,
            own_fork: 0,
            opp_fork: 0,
        });
        let board = board_with(&[(2, 1), (3, 1), (0, 2), (6, 2)]);
        // Bottom row: O . X X . . O
        assert_eq!(zero.score(&board, 3, Player::One), FORK_BONUS);
    }

    #[test]
    fn test_double_threat_detection() {
        // Bottom row: . . X X . . .
        let board = board_with(&[(2, 1), (3, 1), (2, 2), (3, 2)]);
        assert!(creates_double_threat(&board, 4, Player::One).unwrap());
        assert!(creates_double_threat(&board, 1, Player::One).unwrap());
        assert!(!creates_double_threat(&board, 6, Player::One).unwrap());
        assert_eq!(double_threat_columns(&board, Player::One).unwrap(), vec![1, 4]);
    }

    #[test]
    fn test_agent_takes_win() {
        let board = board_with(&[(0, 1), (0, 2), (1, 1), (1, 2), (2, 1), (2, 2)]);
        let mut agent = HeuristicAgent::offensive();
        assert_eq!(agent.select_move(&board, Player::One).unwrap(), 3);
    }

    #[test]
    fn test_agent_blocks() {
        let board = board_with(&[(0, 2), (1, 2), (2, 2), (6, 1), (6, 1)]);
        let mut agent = HeuristicAgent::defensive();
        assert_eq!(agent.select_move(&board, Player::One).unwrap(), 3);
    }

    #[test]
    fn test_agent_creates_fork_near_center() {
        // X X on the bottom with the neighbours open on both sides;
        // columns 1 and 4 both fork, 4 is closer to the center.
        let board = board_with(&[(2, 1), (3, 1), (2, 2), (3, 2)]);
        let mut agent = HeuristicAgent::offensive();
        assert_eq!(agent.select_move(&board, Player::One).unwrap(), 4);
    }

    #[test]
    fn test_agent_prevents_opponent_fork() {
        // Player two has O O on the bottom; player one must take a fork square.
        let board = board_with(&[(2, 2), (3, 2), (2, 1), (3, 1)]);
        let mut agent = HeuristicAgent::defensive();
        let col = agent.select_move(&board, Player::One).unwrap();
        assert!(col == 1 || col == 4, "expected a fork square, got {col}");
    }

    #[test]
    fn test_agent_no_legal_moves() {
        let mut board = Board::new(3, 3, 3).unwrap();
        for (col, players) in [(0, [1, 2, 1]), (1, [1, 2, 1]), (2, [2, 1, 2])] {
            for p in players {
                board.drop(col, p).unwrap();
            }
        }
        let mut agent = HeuristicAgent::offensive();
        assert_eq!(
            agent.select_move(&board, Player::One),
            Err(GameError::NoLegalMoves)
        );
    }
}
