//! Connect-N board: grid state, gravity, legality, and win detection.
//!
//! The grid is stored row-major in a flat `Vec`, with row 0 at the *top*.
//! Tokens fall to the lowest empty cell of a column, so a column is full
//! exactly when its top cell is occupied.
//!
//! Besides the mutation API (`drop`/`play`/`reset`) this module exposes the
//! line geometry used by the evaluator: every window of a given length along
//! one of the four [`Axis`] directions.

use std::fmt;

use crate::constants::{DEFAULT_COLS, DEFAULT_CONNECT, DEFAULT_ROWS, MAX_DIM, MIN_CONNECT, MIN_DIM};
use crate::error::{GameError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    /// Numeric id (1 or 2).
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    fn symbol(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(GameError::InvalidPlayer(other)),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.id())
    }
}

/// The four line families of the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Top to bottom.
    Vertical,
    /// Left to right.
    Horizontal,
    /// Diagonal "\": down and to the right.
    DiagonalDown,
    /// Diagonal "/": up and to the right.
    DiagonalUp,
}

impl Axis {
    /// Win-scan order.
    pub const ALL: [Axis; 4] = [
        Axis::Vertical,
        Axis::Horizontal,
        Axis::DiagonalDown,
        Axis::DiagonalUp,
    ];

    /// Row and column step for one cell along the axis.
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Axis::Vertical => (1, 0),
            Axis::Horizontal => (0, 1),
            Axis::DiagonalDown => (1, 1),
            Axis::DiagonalUp => (-1, 1),
        }
    }

    /// The cell `i` steps away from `start` along the axis.
    ///
    /// Callers only step inside windows produced by [`Board::window_starts`],
    /// so the result never leaves the grid.
    #[inline]
    pub fn step(self, start: (usize, usize), i: usize) -> (usize, usize) {
        let (dr, dc) = self.delta();
        let row = start.0 as isize + dr * i as isize;
        let col = start.1 as isize + dc * i as isize;
        (row as usize, col as usize)
    }
}

/// A Connect-N board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    connect: usize,
    cells: Vec<Option<Player>>,
    moves: usize,
}

impl Default for Board {
    /// Classic 6x7 Connect-Four.
    fn default() -> Self {
        Self::empty(DEFAULT_ROWS, DEFAULT_COLS, DEFAULT_CONNECT)
    }
}

impl Board {
    /// Create an empty board after validating its dimensions.
    ///
    /// # Errors
    /// [`GameError::Configuration`] if `rows` or `cols` is outside
    /// `[MIN_DIM, MAX_DIM]`, `connect < MIN_CONNECT`, or `connect` is longer
    /// than both sides of the board.
    pub fn new(rows: usize, cols: usize, connect: usize) -> Result<Self> {
        let reject = |reason| GameError::Configuration {
            rows,
            cols,
            connect,
            reason,
        };
        let dims = MIN_DIM..=MAX_DIM;
        if !dims.contains(&rows) || !dims.contains(&cols) {
            return Err(reject("rows and cols must be in [3, 30]"));
        }
        if connect < MIN_CONNECT {
            return Err(reject("connect must be at least 3"));
        }
        if rows.max(cols) < connect {
            return Err(reject("connect is longer than both board sides"));
        }
        Ok(Self::empty(rows, cols, connect))
    }

    fn empty(rows: usize, cols: usize, connect: usize) -> Self {
        Self {
            rows,
            cols,
            connect,
            cells: vec![None; rows * cols],
            moves: 0,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Run length needed to win.
    #[inline]
    pub fn connect(&self) -> usize {
        self.connect
    }

    /// Number of tokens on the board.
    #[inline]
    pub fn move_count(&self) -> usize {
        self.moves
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Cell contents, `None` for empty or out-of-range cells.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[self.idx(row, col)]
    }

    /// Clear every cell and the move counter.
    pub fn reset(&mut self) {
        self.cells.fill(None);
        self.moves = 0;
    }

    /// One flag per column, `true` if the column still accepts a token.
    pub fn legal_moves(&self) -> Vec<bool> {
        (0..self.cols).map(|col| self.is_legal(col)).collect()
    }

    /// Indices of the columns that still accept a token, in ascending order.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.cols).filter(|&col| self.is_legal(col)).collect()
    }

    #[inline]
    pub fn is_legal(&self, col: usize) -> bool {
        col < self.cols && self.cells[col].is_none()
    }

    /// Row a token dropped into `col` would land on.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows).rev().find(|&row| self.get(row, col).is_none())
    }

    /// Empty and either on the bottom row or resting on a token.
    pub fn is_playable(&self, row: usize, col: usize) -> bool {
        row < self.rows
            && col < self.cols
            && self.get(row, col).is_none()
            && (row == self.rows - 1 || self.get(row + 1, col).is_some())
    }

    /// Drop a token for a raw player id (1 or 2).
    ///
    /// Returns the row the token landed on.
    ///
    /// # Errors
    /// - [`GameError::InvalidPlayer`] if `player` is not 1 or 2
    /// - [`GameError::ColumnRange`] if `column >= cols`
    /// - [`GameError::ColumnFull`] if the column has no empty cell
    pub fn drop(&mut self, column: usize, player: u8) -> Result<usize> {
        let player = Player::try_from(player)?;
        self.play(column, player)
    }

    /// Drop a token for `player`. Same checks as [`Board::drop`] minus the id check.
    pub fn play(&mut self, column: usize, player: Player) -> Result<usize> {
        if column >= self.cols {
            return Err(GameError::ColumnRange {
                column,
                cols: self.cols,
            });
        }
        let row = self
            .landing_row(column)
            .ok_or(GameError::ColumnFull(column))?;
        self.place(row, column, player);
        Ok(row)
    }

    /// Copy of the board with one more token in `column`.
    pub fn with_move(&self, column: usize, player: Player) -> Result<Board> {
        let mut next = self.clone();
        next.play(column, player)?;
        Ok(next)
    }

    fn place(&mut self, row: usize, col: usize, player: Player) {
        let idx = self.idx(row, col);
        self.cells[idx] = Some(player);
        self.moves += 1;
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.moves >= self.rows * self.cols
    }

    /// Won by someone or full.
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    /// Starting cells of every window of `len` cells along `axis`.
    ///
    /// Vertical windows are listed column by column, all other axes row by
    /// row; this is also the order in which [`Board::winner`] reports runs.
    pub fn window_starts(&self, axis: Axis, len: usize) -> Vec<(usize, usize)> {
        let (rows, cols) = (self.rows, self.cols);
        // Start offsets along one side that leave room for `len` cells.
        let span = |extent: usize| 0..(extent + 1).saturating_sub(len.max(1));
        match axis {
            Axis::Vertical => (0..cols)
                .flat_map(|c| span(rows).map(move |r| (r, c)))
                .collect(),
            Axis::Horizontal => (0..rows)
                .flat_map(|r| span(cols).map(move |c| (r, c)))
                .collect(),
            Axis::DiagonalDown => span(rows)
                .flat_map(|r| span(cols).map(move |c| (r, c)))
                .collect(),
            Axis::DiagonalUp => (len.saturating_sub(1)..rows)
                .flat_map(|r| span(cols).map(move |c| (r, c)))
                .collect(),
        }
    }

    /// Contents of the window of `len` cells starting at `start`.
    pub fn window(
        &self,
        axis: Axis,
        start: (usize, usize),
        len: usize,
    ) -> impl Iterator<Item = Option<Player>> + '_ {
        (0..len).map(move |i| {
            let (row, col) = axis.step(start, i);
            self.get(row, col)
        })
    }

    /// First player owning a run of `connect` tokens, scanning the axes in
    /// [`Axis::ALL`] order.
    pub fn winner(&self) -> Option<Player> {
        let k = self.connect;
        for axis in Axis::ALL {
            for start in self.window_starts(axis, k) {
                let Some(owner) = self.get(start.0, start.1) else {
                    continue;
                };
                if self.window(axis, start, k).all(|cell| cell == Some(owner)) {
                    return Some(owner);
                }
            }
        }
        None
    }

    /// Length of the run `player` would own through `(row, col)` along `axis`
    /// if that cell held one of their tokens.
    fn run_through(&self, row: usize, col: usize, axis: Axis, player: Player) -> usize {
        let (dr, dc) = axis.delta();
        let mut run = 1;
        for sign in [1isize, -1] {
            let (mut r, mut c) = (row as isize, col as isize);
            loop {
                r += dr * sign;
                c += dc * sign;
                if r < 0 || c < 0 || self.get(r as usize, c as usize) != Some(player) {
                    break;
                }
                run += 1;
            }
        }
        run
    }

    /// Legal columns where dropping a token makes `player` the winner.
    ///
    /// On an undecided board a new run must pass through the landing cell, so
    /// only the four lines through it are checked. If the board already has
    /// a winner the full scan decides, exactly as a real drop would.
    pub fn winning_columns(&self, player: Player) -> Vec<usize> {
        let decided = self.winner().is_some();
        let mut wins = Vec::new();
        for col in 0..self.cols {
            let Some(row) = self.landing_row(col) else {
                continue;
            };
            let wins_here = if decided {
                let mut next = self.clone();
                next.place(row, col, player);
                next.winner() == Some(player)
            } else {
                Axis::ALL
                    .iter()
                    .any(|&axis| self.run_through(row, col, axis, player) >= self.connect)
            };
            if wins_here {
                wins.push(col);
            }
        }
        wins
    }

    /// Whether `player` has at least one immediately winning column.
    pub fn has_winning_move(&self, player: Player) -> bool {
        !self.winning_columns(player).is_empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ch = self.get(row, col).map_or('.', Player::symbol);
                write!(f, "{ch:>3}")?;
            }
            writeln!(f)?;
        }
        for col in 0..self.cols {
            write!(f, "{col:>3}")?;
        }
        writeln!(f)
    }
}
