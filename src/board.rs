use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::types::{Cell, Position, Token};

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_CELLS: usize = BOARD_WIDTH * BOARD_WIDTH;
pub const PLAYABLE_CELLS: usize = 64;
/// Ray offsets in the flattened 10-wide index space.
pub const DIRECTIONS: [isize; 8] = [1, -1, 10, -10, 11, -11, 9, -9];
pub const CORNERS: [usize; 4] = [11, 18, 81, 88];

/// Interior square indices in ascending order.
static INTERIOR: Lazy<Vec<usize>> = Lazy::new(|| {
    (1..=8)
        .flat_map(|row| (1..=8).map(move |col| row * BOARD_WIDTH + col))
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board must have {expected} cells, got {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("unknown cell character {found:?} at index {index}")]
    InvalidCell { index: usize, found: char },
    #[error("border cell expected at index {index}")]
    MissingBorder { index: usize },
    #[error("border character inside the playing area at index {index}")]
    MisplacedBorder { index: usize },
    #[error("unknown token {0:?}")]
    InvalidToken(String),
}

/// Othello board padded with a one-cell border ring.
///
/// Rays walked from an interior square always stop on a border cell before
/// leaving the array, so no bounds checks are needed during move generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// Creates the initial board: 44 and 55 White, 45 and 54 Black.
    pub fn new() -> Self {
        Self::from_discs(&[45, 54], &[44, 55])
    }

    /// Empty board with the given discs placed. Indices must be interior.
    pub fn from_discs(black: &[usize], white: &[usize]) -> Self {
        let mut cells = [Cell::Border; BOARD_CELLS];
        for &index in INTERIOR.iter() {
            cells[index] = Cell::Empty;
        }
        for (discs, cell) in [(black, Cell::Black), (white, Cell::White)] {
            for &index in discs {
                debug_assert!(is_interior(index), "disc outside the board: {index}");
                cells[index] = cell;
            }
        }
        Self { cells }
    }

    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Yields the 64 playable indices with their coordinates.
    pub fn interior() -> impl Iterator<Item = (usize, Position)> {
        INTERIOR.iter().map(|&index| (index, position(index)))
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        INTERIOR
            .iter()
            .fold((0, 0), |(black, white), &index| match self.cells[index] {
                Cell::Black => (black + 1, white),
                Cell::White => (black, white + 1),
                _ => (black, white),
            })
    }

    pub fn empty_count(&self) -> u8 {
        let (black, white) = self.count();
        PLAYABLE_CELLS as u8 - black - white
    }

    /// Legal squares for `token` in ascending index order.
    pub fn legal_moves(&self, token: Token) -> Vec<usize> {
        INTERIOR
            .iter()
            .copied()
            .filter(|&pos| self.is_legal(pos, token))
            .collect()
    }

    /// Number of legal moves, without collecting them.
    pub fn mobility(&self, token: Token) -> usize {
        INTERIOR
            .iter()
            .filter(|&&pos| self.is_legal(pos, token))
            .count()
    }

    pub fn has_legal_move(&self, token: Token) -> bool {
        INTERIOR.iter().any(|&pos| self.is_legal(pos, token))
    }

    pub fn is_legal(&self, pos: usize, token: Token) -> bool {
        self.cells[pos] == Cell::Empty
            && DIRECTIONS
                .iter()
                .any(|&dir| self.bracket_end(pos, dir, token).is_some())
    }

    /// Returns a new board with `token` played at `pos` and the number of
    /// discs flipped. `pos` must come from [`Board::legal_moves`].
    pub fn apply_move(&self, token: Token, pos: usize) -> (Self, u32) {
        let mut next = *self;
        let flipped = next.place(token, pos);
        (next, flipped)
    }

    /// Plays `token` at `pos` in place and returns the number of flipped
    /// discs. Every ray is walked on the pre-move board.
    pub fn place(&mut self, token: Token, pos: usize) -> u32 {
        debug_assert!(
            self.is_legal(pos, token),
            "illegal move {pos} for {token}"
        );

        let before = *self;
        let me = token.cell();
        let mut flipped = 0;

        for dir in DIRECTIONS {
            let Some(end) = before.bracket_end(pos, dir, token) else {
                continue;
            };
            let mut index = step(pos, dir);
            while index != end {
                self.cells[index] = me;
                flipped += 1;
                index = step(index, dir);
            }
        }
        self.cells[pos] = me;

        flipped
    }

    /// Who moves after `player` is handed the turn: `player` if they can
    /// move, otherwise their opponent if they can, otherwise `None`.
    pub fn next_player(&self, player: Token) -> Option<Token> {
        if self.has_legal_move(player) {
            Some(player)
        } else if self.has_legal_move(player.opponent()) {
            Some(player.opponent())
        } else {
            None
        }
    }

    /// Neither side has a legal move.
    pub fn is_terminal(&self) -> bool {
        self.next_player(Token::Black).is_none()
    }

    /// Encodes the board as its 100-character text form.
    pub fn to_text(&self) -> String {
        self.cells.iter().map(|cell| cell.to_char()).collect()
    }

    /// Index of the square the ray from `pos` along `dir` closes on, when
    /// at least one opponent disc lies in between.
    fn bracket_end(&self, pos: usize, dir: isize, token: Token) -> Option<usize> {
        let opp = token.opponent().cell();
        let mut index = step(pos, dir);
        if self.cells[index] != opp {
            return None;
        }
        while self.cells[index] == opp {
            index = step(index, dir);
        }
        (self.cells[index] == token.cell()).then_some(index)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = text.trim().chars().collect();
        if chars.len() != BOARD_CELLS {
            return Err(BoardError::InvalidLength {
                expected: BOARD_CELLS,
                found: chars.len(),
            });
        }

        let mut cells = [Cell::Border; BOARD_CELLS];
        for (index, &c) in chars.iter().enumerate() {
            let cell = Cell::from_char(c).ok_or(BoardError::InvalidCell { index, found: c })?;
            match (is_interior(index), cell) {
                (false, Cell::Border) => {}
                (false, _) => return Err(BoardError::MissingBorder { index }),
                (true, Cell::Border) => return Err(BoardError::MisplacedBorder { index }),
                (true, _) => cells[index] = cell,
            }
        }

        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(BOARD_WIDTH) {
            let line: String = row.iter().map(|cell| cell.to_char()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Index for 1-based interior coordinates.
pub fn index_of(row: u8, col: u8) -> Option<usize> {
    ((1..=8).contains(&row) && (1..=8).contains(&col))
        .then(|| row as usize * BOARD_WIDTH + col as usize)
}

/// Coordinates of an interior index.
pub fn row_col(index: usize) -> Option<Position> {
    is_interior(index).then(|| position(index))
}

fn position(index: usize) -> Position {
    Position {
        row: (index / BOARD_WIDTH) as u8,
        col: (index % BOARD_WIDTH) as u8,
    }
}

pub fn is_interior(index: usize) -> bool {
    let (row, col) = (index / BOARD_WIDTH, index % BOARD_WIDTH);
    index < BOARD_CELLS && (1..=8).contains(&row) && (1..=8).contains(&col)
}

/// Square on the outer ring of the playing area, corners included.
pub fn on_edge(index: usize) -> bool {
    let (row, col) = (index / BOARD_WIDTH, index % BOARD_WIDTH);
    is_interior(index) && (row == 1 || row == 8 || col == 1 || col == 8)
}

pub(crate) fn step(index: usize, dir: isize) -> usize {
    index.wrapping_add_signed(dir)
}
