use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, info};

use crate::ai::search::Searcher;
use crate::board::{Board, CORNERS, on_edge};
use crate::types::{GameResult, Token};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{player} selected {pos}, which is not a legal move")]
    IllegalMove { player: Token, pos: usize },
    #[error("{player} has legal moves but the selector returned none")]
    NoSelection { player: Token },
    #[error("unknown strategy {0:?} (expected random, max-flips, min-flips, heuristic or search)")]
    UnknownStrategy(String),
}

/// Picks a move for `token`. Only called when `token` has a legal move.
pub trait MoveSelector {
    fn select_move(&self, board: &Board, token: Token, rng: &mut dyn RngCore) -> Option<usize>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl MoveSelector for RandomSelector {
    fn select_move(&self, board: &Board, token: Token, rng: &mut dyn RngCore) -> Option<usize> {
        board.legal_moves(token).choose(rng).copied()
    }
}

/// Greedy: the move flipping the most discs, earliest square on ties.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxFlipsSelector;

impl MoveSelector for MaxFlipsSelector {
    fn select_move(&self, board: &Board, token: Token, _rng: &mut dyn RngCore) -> Option<usize> {
        most_flips(board, token, &board.legal_moves(token))
    }
}

/// The move flipping the fewest discs, earliest square on ties. Grabbing
/// little leaves the opponent fewer discs to take back.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinFlipsSelector;

impl MoveSelector for MinFlipsSelector {
    fn select_move(&self, board: &Board, token: Token, _rng: &mut dyn RngCore) -> Option<usize> {
        board
            .legal_moves(token)
            .into_iter()
            .min_by_key(|&pos| board.apply_move(token, pos).1)
    }
}

/// Corners first, then the edge move flipping the most, then the interior
/// move flipping the most.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicSelector;

impl MoveSelector for HeuristicSelector {
    fn select_move(&self, board: &Board, token: Token, _rng: &mut dyn RngCore) -> Option<usize> {
        let moves = board.legal_moves(token);
        if let Some(&corner) = moves.iter().find(|&&pos| CORNERS.contains(&pos)) {
            return Some(corner);
        }

        let edges: Vec<usize> = moves.iter().copied().filter(|&pos| on_edge(pos)).collect();
        if edges.is_empty() {
            most_flips(board, token, &moves)
        } else {
            most_flips(board, token, &edges)
        }
    }
}

/// Fixed-depth alpha-beta search.
#[derive(Debug, Clone, Copy)]
pub struct SearchSelector {
    pub depth: u32,
}

impl MoveSelector for SearchSelector {
    fn select_move(&self, board: &Board, token: Token, _rng: &mut dyn RngCore) -> Option<usize> {
        Searcher::new()
            .search_depth(board, token, self.depth)
            .best_move
            .or_else(|| board.legal_moves(token).first().copied())
    }
}

fn most_flips(board: &Board, token: Token, moves: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for &pos in moves {
        let flipped = board.apply_move(token, pos).1;
        if best.is_none_or(|(_, most)| flipped > most) {
            best = Some((pos, flipped));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Named selector, as chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Random,
    MaxFlips,
    MinFlips,
    Heuristic,
    Search,
}

impl Strategy {
    pub fn selector(self, depth: u32) -> Box<dyn MoveSelector> {
        match self {
            Self::Random => Box::new(RandomSelector),
            Self::MaxFlips => Box::new(MaxFlipsSelector),
            Self::MinFlips => Box::new(MinFlipsSelector),
            Self::Heuristic => Box::new(HeuristicSelector),
            Self::Search => Box::new(SearchSelector { depth }),
        }
    }
}

impl FromStr for Strategy {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "max-flips" => Ok(Self::MaxFlips),
            "min-flips" => Ok(Self::MinFlips),
            "heuristic" => Ok(Self::Heuristic),
            "search" => Ok(Self::Search),
            _ => Err(GameError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "random",
            Self::MaxFlips => "max-flips",
            Self::MinFlips => "min-flips",
            Self::Heuristic => "heuristic",
            Self::Search => "search",
        })
    }
}

/// Progress notifications emitted while a game is played.
#[derive(Debug, Clone, Copy)]
pub enum GameEvent<'a> {
    Turn {
        board: &'a Board,
        player: Token,
        legal: &'a [usize],
    },
    Moved {
        player: Token,
        pos: usize,
        flipped: u32,
    },
    Passed {
        player: Token,
    },
}

/// Every move of a finished game, `None` for a pass. The last two entries
/// are always the passes that ended it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub moves: Vec<Option<usize>>,
    pub board: Board,
    pub result: GameResult,
}

/// Two selectors playing a full game from the starting position.
pub struct SelfPlay {
    black: Box<dyn MoveSelector>,
    white: Box<dyn MoveSelector>,
}

impl SelfPlay {
    pub fn new(black: Box<dyn MoveSelector>, white: Box<dyn MoveSelector>) -> Self {
        Self { black, white }
    }

    pub fn play(
        &self,
        rng: &mut dyn RngCore,
        observer: impl FnMut(GameEvent<'_>),
    ) -> Result<GameRecord, GameError> {
        self.play_from(Board::new(), Token::Black, rng, observer)
    }

    /// Plays until a double pass.
    pub fn play_from(
        &self,
        mut board: Board,
        mut player: Token,
        rng: &mut dyn RngCore,
        mut observer: impl FnMut(GameEvent<'_>),
    ) -> Result<GameRecord, GameError> {
        let mut moves = Vec::new();
        let mut passed = false;

        loop {
            let legal = board.legal_moves(player);
            observer(GameEvent::Turn {
                board: &board,
                player,
                legal: &legal,
            });

            if legal.is_empty() {
                moves.push(None);
                observer(GameEvent::Passed { player });
                if passed {
                    break;
                }
                passed = true;
            } else {
                let selector = match player {
                    Token::Black => &self.black,
                    Token::White => &self.white,
                };
                let pos = selector
                    .select_move(&board, player, rng)
                    .ok_or(GameError::NoSelection { player })?;
                if !legal.contains(&pos) {
                    return Err(GameError::IllegalMove { player, pos });
                }

                let flipped = board.place(player, pos);
                debug!(%player, pos, flipped, "move");
                moves.push(Some(pos));
                observer(GameEvent::Moved {
                    player,
                    pos,
                    flipped,
                });
                passed = false;
            }

            player = player.opponent();
        }

        let result = game_result(&board);
        info!(
            black = result.black_count,
            white = result.white_count,
            plies = moves.len(),
            "game over"
        );

        Ok(GameRecord {
            moves,
            board,
            result,
        })
    }
}

pub fn game_result(board: &Board) -> GameResult {
    let (black_count, white_count) = board.count();
    GameResult {
        winner: match black_count.cmp(&white_count) {
            std::cmp::Ordering::Greater => Some(Token::Black),
            std::cmp::Ordering::Less => Some(Token::White),
            std::cmp::Ordering::Equal => None,
        },
        black_count,
        white_count,
    }
}
