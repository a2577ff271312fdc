//! Window-based pattern scans for position evaluation.
//!
//! ## Potential lines
//! Every window of `k` cells that the opponent has not touched yet can still
//! become a winning run. Each such window scores the *square* of the number
//! of own tokens in it, so concentrated windows outweigh scattered ones.
//!
//! ## Fork templates
//! A window of exactly `k` cells shaped `[., X * (k-2), .]` whose two empty
//! ends are both playable right now: completing either end yields a run of
//! `k-1` with an open extension, i.e. a latent double threat. Only the
//! horizontal and diagonal axes are scanned; under gravity a vertical run
//! never has two open ends at once. Broken shapes such as `X.XX` are not
//! recognised.
//!
//! ## Center bias
//! Columns near the middle take part in more windows than edge columns.

use crate::board::{Axis, Board, Player};
use crate::constants::{FORK_BONUS, FORK_PENALTY};

/// Axes scanned for fork templates.
const FORK_AXES: [Axis; 3] = [Axis::Horizontal, Axis::DiagonalDown, Axis::DiagonalUp];

/// Sum of squared own-token counts over all opponent-free windows.
pub fn potential_lines(board: &Board, player: Player) -> i64 {
    let k = board.connect();
    let opp = player.opponent();
    let mut total = 0i64;

    for axis in Axis::ALL {
        for start in board.window_starts(axis, k) {
            let mut own = 0i64;
            let mut blocked = false;
            for cell in board.window(axis, start, k) {
                match cell {
                    Some(p) if p == opp => {
                        blocked = true;
                        break;
                    }
                    Some(_) => own += 1,
                    None => {}
                }
            }
            if !blocked {
                total += own * own;
            }
        }
    }

    total
}

/// Owner of the fork template in a window, if the window matches one.
///
/// The template is `[., P * (k-2), .]` for a single player `P`.
fn fork_owner(board: &Board, axis: Axis, start: (usize, usize), k: usize) -> Option<Player> {
    let cells: Vec<Option<Player>> = board.window(axis, start, k).collect();
    let (first, rest) = cells.split_first()?;
    let (last, middle) = rest.split_last()?;
    if first.is_some() || last.is_some() {
        return None;
    }
    let owner = (*middle.first()?)?;
    middle
        .iter()
        .all(|&cell| cell == Some(owner))
        .then_some(owner)
}

/// Fork-template score from `player`'s point of view.
///
/// Adds [`FORK_BONUS`] for each own open template and subtracts
/// [`FORK_PENALTY`] for each opponent one.
pub fn fork_patterns(board: &Board, player: Player) -> i64 {
    let k = board.connect();
    let mut score = 0i64;

    for axis in FORK_AXES {
        for start in board.window_starts(axis, k) {
            let Some(owner) = fork_owner(board, axis, start, k) else {
                continue;
            };
            let (r0, c0) = start;
            let (r1, c1) = axis.step(start, k - 1);
            if !(board.is_playable(r0, c0) && board.is_playable(r1, c1)) {
                continue;
            }
            if owner == player {
                score += FORK_BONUS;
            } else {
                score -= FORK_PENALTY;
            }
        }
    }

    score
}

/// Negative distance of `col` from the board's horizontal midpoint.
///
/// The midpoint is `(cols - 1) / 2` as a real number; the distance is
/// truncated toward zero, so on even-width boards the two middle columns
/// both score 0.
pub fn center_bonus(board: &Board, col: usize) -> i64 {
    let mid = (board.cols() as f64 - 1.0) / 2.0;
    -((col as f64 - mid).abs() as i64)
}

/// Rollout weight for `col`: `1 / (1 + |col - mid|)`.
pub fn center_weight(board: &Board, col: usize) -> f64 {
    let mid = (board.cols() as f64 - 1.0) / 2.0;
    1.0 / (1.0 + (col as f64 - mid).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_potential_lines_empty_board() {
        let board = Board::default();
        assert_eq!(potential_lines(&board, Player::One), 0);
    }

    #[test]
    fn test_potential_lines_corner_token() {
        // A bottom-left token sits in one vertical, one horizontal and one
        // "/" window of length 4.
        let mut board = Board::default();
        board.drop(0, 1).unwrap();
        assert_eq!(potential_lines(&board, Player::One), 3);
        assert_eq!(potential_lines(&board, Player::Two), 0);
    }

    #[test]
    fn test_potential_lines_rewards_concentration() {
        let mut pair = Board::default();
        pair.drop(2, 1).unwrap();
        pair.drop(3, 1).unwrap();

        let mut apart = Board::default();
        apart.drop(0, 1).unwrap();
        apart.drop(6, 1).unwrap();

        assert!(potential_lines(&pair, Player::One) > potential_lines(&apart, Player::One));
    }

    #[test]
    fn test_fork_template_both_ends_playable() {
        // Bottom row: . X X . . . .  (k = 4)
        let mut board = Board::default();
        board.drop(1, 1).unwrap();
        board.drop(2, 1).unwrap();
        assert_eq!(fork_patterns(&board, Player::One), FORK_BONUS);
        assert_eq!(fork_patterns(&board, Player::Two), -FORK_PENALTY);
    }

    #[test]
    fn test_fork_template_needs_support() {
        // Row 4 reads . X X . with nothing under the right end.
        let mut board = Board::default();
        for col in 0..3 {
            board.drop(col, 2).unwrap();
        }
        board.drop(1, 1).unwrap();
        board.drop(2, 1).unwrap();
        assert_eq!(fork_patterns(&board, Player::One), 0);

        // Supporting the right end makes it playable.
        board.drop(3, 1).unwrap();
        assert_eq!(fork_patterns(&board, Player::One), FORK_BONUS);
    }

    #[test]
    fn test_fork_template_ignores_vertical() {
        let mut board = Board::default();
        board.drop(0, 1).unwrap();
        board.drop(0, 1).unwrap();
        assert_eq!(fork_patterns(&board, Player::One), 0);
    }

    #[test]
    fn test_center_bonus() {
        let board = Board::default();
        assert_eq!(center_bonus(&board, 3), 0);
        assert_eq!(center_bonus(&board, 0), -3);
        assert_eq!(center_bonus(&board, 6), -3);

        let even = Board::new(6, 6, 4).unwrap();
        assert_eq!(center_bonus(&even, 2), 0);
        assert_eq!(center_bonus(&even, 3), 0);
        assert_eq!(center_bonus(&even, 0), -2);
    }

    #[test]
    fn test_center_weight() {
        let board = Board::default();
        assert!((center_weight(&board, 3) - 1.0).abs() < 1e-12);
        assert!((center_weight(&board, 0) - 0.25).abs() < 1e-12);
    }
}
