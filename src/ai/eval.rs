use crate::board::{BOARD_CELLS, Board, CORNERS, DIRECTIONS, on_edge, step};
use crate::types::{Cell, Token};

/// Offset applied to finished games so a win outranks any heuristic score.
pub const WIN_SCORE: f64 = 10_000.0;
pub const CORNER_WEIGHT: i32 = 1000;
pub const EDGE_WEIGHT: i32 = 100;
pub const INTERIOR_WEIGHT: i32 = 25;
/// Charged against a side that has to pass while the other can move.
pub const PASS_PENALTY: i32 = 1000;

const MOBILITY_WEIGHT: f64 = 0.5;
const DISC_WEIGHT: f64 = 0.1;
const LATE_GAME_DISCS: u32 = 60;
const MID_GAME_DISCS: u32 = 32;

/// Scores `board` from Black's point of view.
pub fn evaluate(board: &Board) -> f64 {
    let black_mobility = board.mobility(Token::Black) as i32;
    let white_mobility = board.mobility(Token::White) as i32;
    let (black, white) = board.count();
    let disc_diff = black as i32 - white as i32;

    if black_mobility == 0 && white_mobility == 0 {
        return final_score(disc_diff);
    }

    let mut board_score = Stability::analyze(board).score;
    if black_mobility == 0 {
        board_score -= PASS_PENALTY;
    } else if white_mobility == 0 {
        board_score += PASS_PENALTY;
    }

    let board_score = board_score as f64;
    let mobility = MOBILITY_WEIGHT * (black_mobility - white_mobility) as f64;
    let discs = DISC_WEIGHT * disc_diff as f64;

    // In the opening more discs means fewer options later, so count is a mild liability.
    match black as u32 + white as u32 {
        total if total > LATE_GAME_DISCS => board_score + discs,
        total if total > MID_GAME_DISCS => board_score + mobility + discs,
        _ => board_score + mobility - discs,
    }
}

fn final_score(disc_diff: i32) -> f64 {
    let diff = disc_diff as f64;
    match disc_diff.signum() {
        1 => WIN_SCORE + diff,
        -1 => -WIN_SCORE + diff,
        _ => 0.0,
    }
}

/// Discs that can never be flipped again, found by fixed-point propagation
/// from the corners. Built fresh for every board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stability {
    stable: [bool; BOARD_CELLS],
    /// Signed sum of the weights of every stable disc.
    pub score: i32,
}

impl Stability {
    pub fn analyze(board: &Board) -> Self {
        let mut stability = Self {
            stable: [false; BOARD_CELLS],
            score: 0,
        };

        loop {
            let mut changed = 0;
            for (index, _) in Board::interior() {
                if stability.stable[index] {
                    continue;
                }
                let Some(owner) = board.cell(index).token() else {
                    continue;
                };
                if let Some(weight) = stability.classify(board, index, owner) {
                    stability.stable[index] = true;
                    stability.score += weight * owner.sign();
                    changed += 1;
                }
            }
            if changed == 0 {
                break;
            }
        }

        stability
    }

    pub fn is_stable(&self, index: usize) -> bool {
        self.stable.get(index).copied().unwrap_or(false)
    }

    /// Stable squares in ascending order.
    pub fn squares(&self) -> Vec<usize> {
        (0..BOARD_CELLS).filter(|&index| self.stable[index]).collect()
    }

    fn classify(&self, board: &Board, index: usize, owner: Token) -> Option<i32> {
        if CORNERS.contains(&index) {
            return Some(CORNER_WEIGHT);
        }

        let neighbours = DIRECTIONS.map(|dir| step(index, dir));
        let anchored = |n: usize| self.stable[n] && board.cell(n) == owner.cell();

        if on_edge(index) && neighbours.iter().any(|&n| anchored(n)) {
            Some(EDGE_WEIGHT)
        } else if neighbours
            .iter()
            .all(|&n| board.cell(n) == Cell::Border || anchored(n))
        {
            Some(INTERIOR_WEIGHT)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fills every interior square, Black on the first `black` of them in
    /// index order and White on the rest.
    fn full_board(black: usize) -> Board {
        let squares: Vec<usize> = Board::interior().map(|(index, _)| index).collect();
        Board::from_discs(&squares[..black], &squares[black..])
    }

    #[test]
    fn finished_game_scores_past_the_win_offset() {
        let board = full_board(40);

        assert!(board.is_terminal());
        assert_eq!(evaluate(&board), 10_016.0);
    }

    #[test]
    fn finished_game_lost_by_black_is_negative() {
        let board = full_board(20);

        assert_eq!(evaluate(&board), -10_000.0 - 24.0);
    }

    #[test]
    fn drawn_game_scores_zero() {
        assert_eq!(evaluate(&full_board(32)), 0.0);
    }

    #[test]
    fn unfinished_board_without_discs_for_one_side_is_terminal() {
        // White wiped out with empties left: nobody can move.
        let board = Board::from_discs(&[44, 45], &[]);

        assert_eq!(evaluate(&board), 10_002.0);
    }

    #[test]
    fn opening_position_is_balanced() {
        assert_eq!(evaluate(&Board::new()), 0.0);
    }

    #[test]
    fn opening_counts_extra_discs_against_the_owner() {
        // After one Black move: 4 vs 1 discs, both sides have 3 replies.
        let (board, _) = Board::new().apply_move(Token::Black, 34);
        let mobility = board.mobility(Token::Black) as f64 - board.mobility(Token::White) as f64;

        assert_eq!(evaluate(&board), 0.5 * mobility - 0.1 * 3.0);
    }

    /// Fills the first `total` interior squares in index order, every third
    /// one (starting with the second) White and the rest Black.
    fn phase_board(total: usize) -> Board {
        let (white, black): (Vec<(usize, usize)>, Vec<(usize, usize)>) = Board::interior()
            .map(|(index, _)| index)
            .take(total)
            .enumerate()
            .partition(|&(k, _)| k % 3 == 1);
        let squares = |discs: Vec<(usize, usize)>| -> Vec<usize> {
            discs.into_iter().map(|(_, index)| index).collect()
        };
        Board::from_discs(&squares(black), &squares(white))
    }

    #[test]
    fn thirty_two_discs_still_count_against_the_owner() {
        let board = phase_board(32);

        assert_eq!(board.count(), (21, 11));
        assert_eq!((board.mobility(Token::Black), board.mobility(Token::White)), (5, 7));
        assert_eq!(Stability::analyze(&board).score, 100);
        // 100 + 0.5 * (5 - 7) - 0.1 * 10
        assert_eq!(evaluate(&board), 98.0);
    }

    #[test]
    fn thirty_three_discs_count_for_the_owner() {
        let board = phase_board(33);

        assert_eq!(board.count(), (22, 11));
        assert_eq!((board.mobility(Token::Black), board.mobility(Token::White)), (4, 7));
        assert_eq!(Stability::analyze(&board).score, 100);
        // 100 + 0.5 * (4 - 7) + 0.1 * 11
        assert_eq!(evaluate(&board), 99.6);
    }

    #[test]
    fn sixty_discs_still_weigh_mobility() {
        let board = phase_board(60);

        assert_eq!(board.count(), (40, 20));
        assert_eq!((board.mobility(Token::Black), board.mobility(Token::White)), (2, 3));
        assert_eq!(Stability::analyze(&board).score, 1300);
        // 1300 + 0.5 * (2 - 3) + 0.1 * 20
        assert_eq!(evaluate(&board), 1301.5);
    }

    #[test]
    fn sixty_one_discs_ignore_mobility() {
        let board = phase_board(61);

        assert_eq!(board.count(), (41, 20));
        assert_eq!((board.mobility(Token::Black), board.mobility(Token::White)), (1, 2));
        assert_eq!(Stability::analyze(&board).score, 1300);
        // 1300 + 0.1 * 21; the -0.5 mobility term is gone.
        assert_eq!(evaluate(&board), 1302.1);
        assert_ne!(evaluate(&board), 1300.0 - 0.5 + 0.1 * 21.0);
    }

    #[test]
    fn corner_is_stable_and_extends_along_the_edge() {
        let board = Board::from_discs(&[11, 12, 13, 44], &[14, 45, 55]);
        let stability = Stability::analyze(&board);

        assert_eq!(stability.squares(), vec![11, 12, 13]);
        assert_eq!(stability.score, CORNER_WEIGHT + 2 * EDGE_WEIGHT);
    }

    #[test]
    fn edge_chain_stops_at_an_opponent_disc() {
        let board = Board::from_discs(&[11], &[12, 13, 44, 45]);
        let stability = Stability::analyze(&board);

        assert!(stability.is_stable(11));
        assert!(!stability.is_stable(12));
        assert_eq!(stability.score, CORNER_WEIGHT);
    }

    #[test]
    fn white_stability_counts_negative() {
        let board = Board::from_discs(&[44], &[88, 87, 78]);
        let stability = Stability::analyze(&board);

        assert_eq!(stability.squares(), vec![78, 87, 88]);
        assert_eq!(stability.score, -(CORNER_WEIGHT + 2 * EDGE_WEIGHT));
    }

    #[test]
    fn interior_disc_with_an_unstable_neighbour_is_not_stable() {
        // A solid Black 3x3 block in the corner. The edge squares chain off
        // the corner, but 22 still touches 23, 32 and 33, which border empties.
        let block = [11, 12, 13, 21, 22, 23, 31, 32, 33];
        let board = Board::from_discs(&block, &[44]);
        let stability = Stability::analyze(&board);

        assert_eq!(stability.squares(), vec![11, 12, 13, 21, 31]);
        assert!(!stability.is_stable(22));
        assert_eq!(stability.score, CORNER_WEIGHT + 4 * EDGE_WEIGHT);
    }

    #[test]
    fn evaluation_does_not_remember_earlier_boards() {
        let cornered = Board::from_discs(&[11, 12, 44], &[45]);
        let fresh = Board::from_discs(&[44], &[11, 12, 45]);

        let first = Stability::analyze(&cornered);
        let second = Stability::analyze(&fresh);

        assert_eq!(first.score, CORNER_WEIGHT + EDGE_WEIGHT);
        assert_eq!(second.score, -(CORNER_WEIGHT + EDGE_WEIGHT));
        assert_eq!(evaluate(&Board::new()), 0.0);
    }

    #[test]
    fn pass_penalty_applies_to_the_side_without_moves() {
        // White can play 13 over 12; Black cannot move.
        let board = Board::from_discs(&[12], &[11]);
        let stability = Stability::analyze(&board).score;

        let expected = (stability - PASS_PENALTY) as f64 + 0.5 * (0.0 - 1.0) - 0.1 * 0.0;
        assert_eq!(evaluate(&board), expected);
    }
}
