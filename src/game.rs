//! Turn bookkeeping and the match loop between two agents.

use std::fmt;

use tracing::{debug, info};

use crate::agent::Agent;
use crate::board::{Board, Player};
use crate::error::{GameError, Result};

/// State of a game after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Won(Player),
    Draw,
    InProgress { next: Player },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Won(p) => write!(f, "Winner: {p}"),
            Status::Draw => write!(f, "Draw"),
            Status::InProgress { next } => write!(f, "Next: {next}"),
        }
    }
}

/// A board plus whose turn it is. Player one always starts.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Player,
    winner: Option<Player>,
    history: Vec<(Player, usize)>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

impl Game {
    /// Start a game on `board` (normally empty).
    pub fn new(board: Board) -> Self {
        let winner = board.winner();
        Self {
            board,
            turn: Player::One,
            winner,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.turn
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Moves played so far as (player, column).
    pub fn history(&self) -> &[(Player, usize)] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.board.is_full()
    }

    /// Current status without playing.
    pub fn status(&self) -> Status {
        match self.winner {
            Some(p) => Status::Won(p),
            None if self.board.is_full() => Status::Draw,
            None => Status::InProgress { next: self.turn },
        }
    }

    /// Play `column` for the player to move.
    ///
    /// # Errors
    /// [`GameError::GameOver`] once the game has ended, otherwise whatever
    /// the board rejects; a rejected move leaves the game unchanged.
    pub fn play(&mut self, column: usize) -> Result<Status> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        self.board.play(column, self.turn)?;
        self.history.push((self.turn, column));

        self.winner = self.board.winner();
        if self.winner.is_none() && !self.board.is_full() {
            self.turn = self.turn.opponent();
        }
        Ok(self.status())
    }

    /// Clear the board and hand the first move back to player one.
    pub fn reset(&mut self) {
        self.board.reset();
        self.turn = Player::One;
        self.winner = None;
        self.history.clear();
    }
}

/// Alternate `one` and `two` on `game` until it ends.
///
/// Returns the winner, or `None` for a draw. An agent error or an illegal
/// move aborts the match.
pub fn play_match<'a>(
    game: &mut Game,
    one: &'a mut dyn Agent,
    two: &'a mut dyn Agent,
) -> Result<Option<Player>> {
    info!(
        one = one.name(),
        two = two.name(),
        rows = game.board().rows(),
        cols = game.board().cols(),
        connect = game.board().connect(),
        "match started"
    );

    loop {
        if game.is_over() {
            return Ok(game.winner());
        }
        let player = game.current_player();
        let agent = match player {
            Player::One => &mut *one,
            Player::Two => &mut *two,
        };

        let col = agent.select_move(game.board(), player)?;
        let status = game.play(col)?;
        info!("{} ({player}) -> col {col} | {status}", agent.name());
        debug!(moves = game.history().len(), "board after move\n{}", game.board());

        match status {
            Status::Won(p) => return Ok(Some(p)),
            Status::Draw => return Ok(None),
            Status::InProgress { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::RandomAgent;

    /// Plays a fixed list of columns.
    struct Scripted {
        cols: Vec<usize>,
        next: usize,
    }

    impl Agent for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn select_move(&mut self, _board: &Board, _player: Player) -> Result<usize> {
            let col = *self.cols.get(self.next).ok_or(GameError::NoLegalMoves)?;
            self.next += 1;
            Ok(col)
        }
    }

    fn scripted(cols: &[usize]) -> Scripted {
        Scripted {
            cols: cols.to_vec(),
            next: 0,
        }
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::default();
        assert_eq!(game.current_player(), Player::One);
        assert_eq!(game.play(3).unwrap(), Status::InProgress { next: Player::Two });
        assert_eq!(game.play(3).unwrap(), Status::InProgress { next: Player::One });
        assert_eq!(game.history(), &[(Player::One, 3), (Player::Two, 3)]);
    }

    #[test]
    fn test_win_ends_game() {
        let mut game = Game::default();
        for col in [0, 0, 1, 1, 2, 2] {
            game.play(col).unwrap();
        }
        assert_eq!(game.play(3).unwrap(), Status::Won(Player::One));
        assert_eq!(game.winner(), Some(Player::One));
        assert_eq!(game.current_player(), Player::One);
        assert_eq!(game.play(4), Err(GameError::GameOver));
        assert_eq!(game.history().len(), 7);
    }

    #[test]
    fn test_draw() {
        let mut game = Game::new(Board::new(3, 3, 3).unwrap());
        // Final position, no three in a row:
        //   X O X
        //   X O O
        //   O X X
        let mut last = None;
        for col in [1, 0, 2, 2, 0, 1, 0, 1, 2] {
            last = Some(game.play(col).unwrap());
        }
        assert_eq!(last, Some(Status::Draw));
        assert!(game.is_over());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_rejected_move_keeps_turn() {
        let mut game = Game::new(Board::new(3, 3, 3).unwrap());
        for col in [0, 0, 0] {
            game.play(col).unwrap();
        }
        assert_eq!(game.current_player(), Player::Two);
        assert_eq!(game.play(0), Err(GameError::ColumnFull(0)));
        assert_eq!(game.play(5), Err(GameError::ColumnRange { column: 5, cols: 3 }));
        assert_eq!(game.current_player(), Player::Two);
        assert_eq!(game.history().len(), 3);
    }

    #[test]
    fn test_reset() {
        let mut game = Game::default();
        for col in [0, 0, 1, 1, 2, 2, 3] {
            game.play(col).unwrap();
        }
        game.reset();
        assert_eq!(game.status(), Status::InProgress { next: Player::One });
        assert_eq!(game.board().move_count(), 0);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_match_scripted_win() {
        let mut game = Game::default();
        let mut one = scripted(&[3, 3, 3, 3]);
        let mut two = scripted(&[0, 1, 2]);
        let result = play_match(&mut game, &mut one, &mut two).unwrap();
        assert_eq!(result, Some(Player::One));
        assert_eq!(game.history().len(), 7);
    }

    #[test]
    fn test_match_aborts_on_illegal_move() {
        let mut game = Game::new(Board::new(3, 3, 3).unwrap());
        let mut one = scripted(&[0, 0]);
        let mut two = scripted(&[0, 0]);
        let err = play_match(&mut game, &mut one, &mut two).unwrap_err();
        assert_eq!(err, GameError::ColumnFull(0));
    }

    #[test]
    fn test_random_match_finishes() {
        let mut game = Game::default();
        let mut one = RandomAgent::with_seed(1);
        let mut two = RandomAgent::with_seed(2);
        let result = play_match(&mut game, &mut one, &mut two).unwrap();
        assert!(game.is_over());
        assert_eq!(result, game.winner());
    }

    #[test]
    fn test_match_between_different_agent_types() {
        let mut game = Game::default();
        let mut one = scripted(&[3, 3, 3, 3]);
        let mut two: Box<dyn Agent> = Box::new(scripted(&[0, 1, 2]));
        let result = play_match(&mut game, &mut one, &mut two).unwrap();
        assert_eq!(result, Some(Player::One));

        game.reset();
        let mut one: Box<dyn Agent> = Box::new(RandomAgent::with_seed(3));
        let mut two = RandomAgent::with_seed(4);
        let result = play_match(&mut game, &mut one, &mut two).unwrap();
        assert_eq!(result, game.winner());
        assert_eq!(one.name(), two.name());
    }
}
