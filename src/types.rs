use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::board::BoardError;

pub const BORDER_CHAR: char = '?';
pub const EMPTY_CHAR: char = '.';
pub const BLACK_CHAR: char = '@';
pub const WHITE_CHAR: char = 'o';

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Token {
    Black,
    White,
}

impl Token {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Self::Black => Cell::Black,
            Self::White => Cell::White,
        }
    }

    /// `+1` for Black, `-1` for White. Scores are always from Black's side.
    pub fn sign(self) -> i32 {
        match self {
            Self::Black => 1,
            Self::White => -1,
        }
    }

    pub fn to_char(self) -> char {
        self.cell().to_char()
    }
}

impl FromStr for Token {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "@" | "x" | "X" | "black" | "Black" => Ok(Self::Black),
            "o" | "O" | "white" | "White" => Ok(Self::White),
            _ => Err(BoardError::InvalidToken(s.to_string())),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("Black"),
            Self::White => f.write_str("White"),
        }
    }
}

/// Contents of a single square of the padded board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
    Border,
}

impl Cell {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            EMPTY_CHAR => Some(Self::Empty),
            BLACK_CHAR => Some(Self::Black),
            WHITE_CHAR => Some(Self::White),
            BORDER_CHAR => Some(Self::Border),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Empty => EMPTY_CHAR,
            Self::Black => BLACK_CHAR,
            Self::White => WHITE_CHAR,
            Self::Border => BORDER_CHAR,
        }
    }

    /// The player owning a disc on this square, if any.
    pub fn token(self) -> Option<Token> {
        match self {
            Self::Black => Some(Token::Black),
            Self::White => Some(Token::White),
            Self::Empty | Self::Border => None,
        }
    }
}

/// A board coordinate. Interior rows and columns run from 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

/// Result of one completed iterative-deepening iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthReport {
    /// `0` for the immediate fallback move reported before any search.
    pub depth: u32,
    pub best_move: usize,
    pub position: Position,
    /// Black-perspective value of the line; `None` for the depth-0 fallback.
    pub value: Option<f64>,
    /// Nodes visited by this depth's search alone; `0` for the fallback.
    pub nodes: u64,
    pub elapsed_ms: u64,
}

/// Final result after a double pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Option<Token>,
    pub black_count: u8,
    pub white_count: u8,
}

impl GameResult {
    pub fn black_share(&self) -> f64 {
        share(self.black_count, self.white_count)
    }

    pub fn white_share(&self) -> f64 {
        share(self.white_count, self.black_count)
    }
}

fn share(mine: u8, theirs: u8) -> f64 {
    let total = mine as u32 + theirs as u32;
    if total == 0 {
        0.0
    } else {
        mine as f64 / total as f64
    }
}
