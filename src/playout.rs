//! Rollouts (light game simulation) for the tree search.
//!
//! A rollout plays policy moves until the game ends and reports the winner.
//! The policy per ply:
//! 1. take an immediate win if there is one;
//! 2. otherwise prefer columns that do not hand the opponent a win on the
//!    next move ("safe" columns), falling back to every legal column;
//! 3. sample among the candidates, weighted toward the center when center
//!    bias is on, uniformly otherwise.

use crate::board::{Board, Player};
use crate::error::{GameError, Result};
use crate::patterns::center_weight;

/// Pick a rollout move for `player`.
///
/// # Errors
/// [`GameError::NoLegalMoves`] if every column is full.
pub fn policy_move(
    state: &Board,
    player: Player,
    rng: &mut fastrand::Rng,
    center_bias: bool,
) -> Result<usize> {
    let legal = state.legal_columns();
    if legal.is_empty() {
        return Err(GameError::NoLegalMoves);
    }

    if let Some(&col) = state.winning_columns(player).first() {
        return Ok(col);
    }

    let opp = player.opponent();
    let mut safe = Vec::with_capacity(legal.len());
    for &col in &legal {
        if !state.with_move(col, player)?.has_winning_move(opp) {
            safe.push(col);
        }
    }
    let pool = if safe.is_empty() { legal } else { safe };

    if center_bias && pool.len() > 1 {
        let weights: Vec<f64> = pool.iter().map(|&c| center_weight(state, c)).collect();
        let total: f64 = weights.iter().sum();
        let r = rng.f64() * total;
        let mut acc = 0.0;
        for (&col, w) in pool.iter().zip(&weights) {
            acc += w;
            if r <= acc {
                return Ok(col);
            }
        }
    }

    rng.choice(pool.iter().copied()).ok_or(GameError::NoLegalMoves)
}

/// Play `state` out with `to_play` moving first.
///
/// Returns the winner, or `None` for a draw. With `max_len` set, a rollout
/// that reaches that many plies is scored as a draw.
pub fn rollout(
    state: &mut Board,
    mut to_play: Player,
    rng: &mut fastrand::Rng,
    center_bias: bool,
    max_len: Option<usize>,
) -> Result<Option<Player>> {
    let cap = max_len.filter(|&n| n > 0);
    let mut steps = 0usize;

    loop {
        if let Some(w) = state.winner() {
            return Ok(Some(w));
        }
        if state.is_full() {
            return Ok(None);
        }

        let col = policy_move(state, to_play, rng, center_bias)?;
        state.play(col, to_play)?;
        to_play = to_play.opponent();

        steps += 1;
        if cap.is_some_and(|n| steps >= n) {
            return Ok(None);
        }
    }
}
