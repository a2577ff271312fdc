//! Depth-limited minimax with alpha-beta pruning.
//!
//! The search alternates maximizing layers (the root player moves) and
//! minimizing layers (the opponent moves) over cloned boards. Positions that
//! are already decided score `±SEARCH_INF / 2` adjusted by the remaining
//! depth, so faster wins and slower losses are preferred. At the horizon the
//! [`Evaluator`] scores the position for the root player.
//!
//! Columns are explored nearest-to-center first. The ordering only changes
//! how much gets pruned, never the value found.

use tracing::debug;

use crate::agent::Agent;
use crate::board::{Board, Player};
use crate::constants::{MINIMAX_DEPTH, NAME_MINIMAX, SEARCH_INF};
use crate::error::{GameError, Result};
use crate::heuristic::Evaluator;

/// Legal columns sorted by distance from `cols / 2`; the sort is stable so
/// equally distant columns keep ascending order.
pub fn ordered_moves(board: &Board) -> Vec<usize> {
    let center = board.cols() / 2;
    let mut cols = board.legal_columns();
    cols.sort_by_key(|&c| c.abs_diff(center));
    cols
}

/// Counters collected during one search.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    /// Positions visited below the root.
    pub nodes: u64,
    /// Branches abandoned because alpha met beta.
    pub cutoffs: u64,
}

/// One alpha-beta search for a fixed root player.
struct Search<'a> {
    evaluator: &'a Evaluator,
    root: Player,
    stats: SearchStats,
}

impl Search<'_> {
    fn minimax(
        &mut self,
        node: &Board,
        depth: usize,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
        last_col: usize,
    ) -> Result<i64> {
        self.stats.nodes += 1;
        let depth_bonus = depth as i64;

        match node.winner() {
            Some(p) if p == self.root => return Ok(SEARCH_INF / 2 + depth_bonus),
            Some(_) => return Ok(-SEARCH_INF / 2 - depth_bonus),
            None => {}
        }

        let moves = ordered_moves(node);
        if depth == 0 || moves.is_empty() {
            return Ok(self.evaluator.score(node, last_col, self.root));
        }

        if maximizing {
            let mut value = -SEARCH_INF;
            for col in moves {
                let child = node.with_move(col, self.root)?;
                let v = self.minimax(&child, depth - 1, alpha, beta, false, col)?;
                value = value.max(v);
                alpha = alpha.max(value);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            Ok(value)
        } else {
            let mut value = SEARCH_INF;
            let opp = self.root.opponent();
            for col in moves {
                let child = node.with_move(col, opp)?;
                let v = self.minimax(&child, depth - 1, alpha, beta, true, col)?;
                value = value.min(v);
                beta = beta.min(value);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            Ok(value)
        }
    }
}

/// Minimax agent backed by a heuristic evaluator.
pub struct MinimaxAgent {
    name: String,
    depth: usize,
    evaluator: Evaluator,
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new(MINIMAX_DEPTH)
    }
}

impl MinimaxAgent {
    /// Search `depth` plies (at least one) with the offensive evaluator.
    pub fn new(depth: usize) -> Self {
        Self::with_evaluator(depth, Evaluator::offensive())
    }

    pub fn with_evaluator(depth: usize, evaluator: Evaluator) -> Self {
        Self {
            name: NAME_MINIMAX.to_string(),
            depth: depth.max(1),
            evaluator,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Best root column and its value for `player`, plus search counters.
    ///
    /// # Errors
    /// [`GameError::NoLegalMoves`] if every column is full.
    pub fn search(&self, board: &Board, player: Player) -> Result<(usize, i64, SearchStats)> {
        let moves = ordered_moves(board);
        let Some(&first) = moves.first() else {
            return Err(GameError::NoLegalMoves);
        };

        let mut search = Search {
            evaluator: &self.evaluator,
            root: player,
            stats: SearchStats::default(),
        };
        let mut alpha = -SEARCH_INF;
        let beta = SEARCH_INF;
        let (mut best_col, mut best_value) = (first, -SEARCH_INF);

        for col in moves {
            let child = board.with_move(col, player)?;
            let value = search.minimax(&child, self.depth - 1, alpha, beta, false, col)?;
            if value > best_value {
                best_value = value;
                best_col = col;
            }
            alpha = alpha.max(value);
        }

        Ok((best_col, best_value, search.stats))
    }
}

impl Agent for MinimaxAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize> {
        let (col, value, stats) = self.search(board, player)?;
        debug!(
            depth = self.depth,
            col,
            value,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            "minimax search finished"
        );
        Ok(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(moves: &[(usize, u8)]) -> Board {
        let mut board = Board::default();
        for &(col, p) in moves {
            board.drop(col, p).unwrap();
        }
        board
    }

    /// Exhaustive minimax without pruning, same scoring rules.
    fn plain_minimax(
        eval: &Evaluator,
        node: &Board,
        depth: usize,
        maximizing: bool,
        root: Player,
        last_col: usize,
    ) -> i64 {
        match node.winner() {
            Some(p) if p == root => return SEARCH_INF / 2 + depth as i64,
            Some(_) => return -SEARCH_INF / 2 - depth as i64,
            None => {}
        }
        let moves = ordered_moves(node);
        if depth == 0 || moves.is_empty() {
            return eval.score(node, last_col, root);
        }
        let mover = if maximizing { root } else { root.opponent() };
        let values = moves.iter().map(|&col| {
            let child = node.with_move(col, mover).unwrap();
            plain_minimax(eval, &child, depth - 1, !maximizing, root, col)
        });
        if maximizing {
            values.max().unwrap()
        } else {
            values.min().unwrap()
        }
    }

    fn plain_root(eval: &Evaluator, board: &Board, depth: usize, player: Player) -> (usize, i64) {
        let mut best = (usize::MAX, -SEARCH_INF);
        for col in ordered_moves(board) {
            let child = board.with_move(col, player).unwrap();
            let v = plain_minimax(eval, &child, depth - 1, false, player, col);
            if v > best.1 {
                best = (col, v);
            }
        }
        best
    }

    #[test]
    fn test_ordered_moves_center_first() {
        let board = Board::default();
        assert_eq!(ordered_moves(&board), vec![3, 2, 4, 1, 5, 0, 6]);

        let even = Board::new(6, 6, 4).unwrap();
        assert_eq!(ordered_moves(&even), vec![3, 2, 4, 1, 5, 0]);
    }

    #[test]
    fn test_depth_clamped_to_one() {
        assert_eq!(MinimaxAgent::new(0).depth(), 1);
    }

    #[test]
    fn test_named_keeps_depth() {
        let agent = MinimaxAgent::new(2).named("Shallow");
        assert_eq!(agent.name(), "Shallow");
        assert_eq!(agent.depth(), 2);
        assert_eq!(MinimaxAgent::default().name(), NAME_MINIMAX);
    }

    #[test]
    fn test_takes_immediate_win() {
        let board = board_with(&[(0, 1), (0, 2), (1, 1), (1, 2), (2, 1), (2, 2)]);
        let mut agent = MinimaxAgent::new(3);
        assert_eq!(agent.select_move(&board, Player::One).unwrap(), 3);
    }

    #[test]
    fn test_prefers_faster_win() {
        let board = board_with(&[(0, 1), (0, 2), (1, 1), (1, 2), (2, 1), (2, 2)]);
        let (col, value, _) = MinimaxAgent::new(4).search(&board, Player::One).unwrap();
        assert_eq!(col, 3);
        assert_eq!(value, SEARCH_INF / 2 + 3);
    }

    #[test]
    fn test_blocks_at_depth_two() {
        let board = board_with(&[(0, 2), (1, 2), (2, 2), (6, 1), (6, 1)]);
        let mut agent = MinimaxAgent::new(2);
        assert_eq!(agent.select_move(&board, Player::One).unwrap(), 3);
    }

    #[test]
    fn test_pruning_matches_plain_minimax() {
        let eval = Evaluator::offensive();
        let positions = [
            board_with(&[]),
            board_with(&[(3, 1), (3, 2), (2, 1)]),
            board_with(&[(3, 1), (4, 2), (2, 1), (1, 2), (3, 1), (3, 2)]),
            board_with(&[(0, 2), (1, 2), (5, 1), (6, 1)]),
        ];
        for board in &positions {
            for depth in 1..=3 {
                let (col, value, stats) = MinimaxAgent::with_evaluator(depth, eval)
                    .search(board, Player::One)
                    .unwrap();
                let (plain_col, plain_value) = plain_root(&eval, board, depth, Player::One);
                assert_eq!(value, plain_value, "value differs at depth {depth}\n{board}");
                assert_eq!(col, plain_col, "move differs at depth {depth}\n{board}");
                assert!(stats.nodes > 0);
            }
        }
    }

    #[test]
    fn test_pruning_cuts_branches() {
        let (_, _, stats) = MinimaxAgent::new(4)
            .search(&Board::default(), Player::One)
            .unwrap();
        // 7 + 49 + 343 + 2401 nodes without pruning.
        assert!(stats.nodes < 2800, "visited {} nodes", stats.nodes);
        assert!(stats.cutoffs > 0);
    }

    #[test]
    fn test_no_legal_moves() {
        let mut board = Board::new(3, 3, 3).unwrap();
        for (col, players) in [(0, [1, 2, 1]), (1, [1, 2, 1]), (2, [2, 1, 2])] {
            for p in players {
                board.drop(col, p).unwrap();
            }
        }
        let mut agent = MinimaxAgent::new(3);
        assert_eq!(
            agent.select_move(&board, Player::Two),
            Err(GameError::NoLegalMoves)
        );
    }
}
