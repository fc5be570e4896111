use tracing::{debug, trace};
use web_time::{Duration, Instant};

use crate::ai::eval::evaluate;
use crate::board::{Board, row_col};
use crate::types::{DepthReport, Position, Token};

const MIN_SCORE: f64 = f64::NEG_INFINITY;
const MAX_SCORE: f64 = f64::INFINITY;

/// Value of a searched node and the move that reaches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    /// `None` at leaves, terminal positions and forced passes.
    pub best_move: Option<usize>,
    pub value: f64,
}

/// Limits for [`best_move_within`]. Both unset means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Wall-clock budget, checked between completed depths.
    pub time_limit: Option<Duration>,
    pub max_depth: Option<u32>,
}

/// Depth-limited minimax with alpha-beta pruning. Black maximises, White
/// minimises, and every value is on [`evaluate`]'s Black-positive scale.
#[derive(Debug, Default)]
pub struct Searcher {
    nodes: u64,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes visited since the searcher was created.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn search(
        &mut self,
        board: &Board,
        player: Token,
        depth: u32,
        alpha: f64,
        beta: f64,
    ) -> SearchOutcome {
        self.nodes += 1;

        if depth == 0 {
            return leaf(board);
        }

        let moves = board.legal_moves(player);
        if moves.is_empty() {
            if !board.has_legal_move(player.opponent()) {
                return leaf(board);
            }
            trace!(%player, depth, "forced pass");
            let passed = self.search(board, player.opponent(), depth, alpha, beta);
            return SearchOutcome {
                best_move: None,
                value: passed.value,
            };
        }

        let maximizing = player == Token::Black;
        let mut alpha = alpha;
        let mut beta = beta;
        let mut best_move = None;
        let mut best_value = if maximizing { MIN_SCORE } else { MAX_SCORE };

        for mv in moves {
            let (next, _) = board.apply_move(player, mv);
            let value = match next.next_player(player.opponent()) {
                None => {
                    self.nodes += 1;
                    evaluate(&next)
                }
                Some(next_player) => {
                    self.search(&next, next_player, depth - 1, alpha, beta)
                        .value
                }
            };

            if best_move.is_none() || is_better(value, best_value, maximizing) {
                best_value = value;
                best_move = Some(mv);
            }
            if maximizing {
                alpha = alpha.max(best_value);
            } else {
                beta = beta.min(best_value);
            }
            if alpha >= beta {
                break;
            }
        }

        SearchOutcome {
            best_move,
            value: best_value,
        }
    }

    /// Full-window search from the root.
    pub fn search_depth(&mut self, board: &Board, player: Token, depth: u32) -> SearchOutcome {
        self.search(board, player, depth, MIN_SCORE, MAX_SCORE)
    }
}

/// Runs iterative deepening until `config` says stop and returns the
/// last completed report. `None` when `player` has no legal move.
pub fn best_move_within(
    board: &Board,
    player: Token,
    config: SearchConfig,
) -> Option<DepthReport> {
    let started = Instant::now();
    let mut best = None;

    for report in IterativeDeepening::new(*board, player) {
        let depth = report.depth;
        best = Some(report);

        if config.max_depth.is_some_and(|max| depth >= max) {
            break;
        }
        if config
            .time_limit
            .is_some_and(|limit| started.elapsed() >= limit)
        {
            debug!(depth, "time budget spent");
            break;
        }
    }

    best
}

fn leaf(board: &Board) -> SearchOutcome {
    SearchOutcome {
        best_move: None,
        value: evaluate(board),
    }
}

fn is_better(value: f64, best: f64, maximizing: bool) -> bool {
    if maximizing { value > best } else { value < best }
}

/// Reissues the search at depth 1, 2, 3, … forever.
///
/// The first item is a depth-0 report carrying the first legal move, so a
/// caller always has an answer. Every later item is produced only once its
/// depth has been searched completely; dropping the iterator between items
/// is the cancellation point.
#[derive(Debug)]
pub struct IterativeDeepening {
    board: Board,
    player: Token,
    searcher: Searcher,
    next_depth: u32,
    fallback: Option<usize>,
}

impl IterativeDeepening {
    pub fn new(board: Board, player: Token) -> Self {
        let fallback = board.legal_moves(player).first().copied();
        Self {
            board,
            player,
            searcher: Searcher::new(),
            next_depth: 0,
            fallback,
        }
    }

    fn report(
        &self,
        depth: u32,
        best_move: usize,
        value: Option<f64>,
        nodes: u64,
        started: Instant,
    ) -> DepthReport {
        DepthReport {
            depth,
            best_move,
            position: row_col(best_move).unwrap_or(Position { row: 0, col: 0 }),
            value,
            nodes,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}

impl Iterator for IterativeDeepening {
    type Item = DepthReport;

    fn next(&mut self) -> Option<Self::Item> {
        let fallback = self.fallback?;
        let started = Instant::now();
        let depth = self.next_depth;
        self.next_depth += 1;

        if depth == 0 {
            return Some(self.report(0, fallback, None, 0, started));
        }

        let before = self.searcher.nodes();
        let outcome = self.searcher.search_depth(&self.board, self.player, depth);
        let nodes = self.searcher.nodes() - before;
        let best_move = outcome.best_move.unwrap_or(fallback);
        let report = self.report(depth, best_move, Some(outcome.value), nodes, started);
        debug!(
            depth,
            best_move,
            value = outcome.value,
            nodes = report.nodes,
            elapsed_ms = report.elapsed_ms,
            "depth complete"
        );

        Some(report)
    }
}
