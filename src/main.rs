//! Othello strategy CLI
//!
//! Commands:
//! - search: stream the best move for a position as the search deepens
//! - self-play: play a full game between two move selectors

use std::io::{self, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use web_time::{Duration, Instant};

use othello_strategy::ai::search::IterativeDeepening;
use othello_strategy::game::{GameEvent, SelfPlay, Strategy};
use othello_strategy::{Board, Token};

#[derive(Parser)]
#[command(name = "othello-strategy")]
#[command(about = "Alpha-beta Othello move search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the best move after every completed depth
    Search {
        /// 100-character board: `?` border, `.` empty, `@` black, `o` white
        board: String,
        /// Side to move (`@` or `o`)
        token: String,
        /// Stop after this many milliseconds (checked between depths)
        #[arg(long, env = "OTHELLO_TIME_LIMIT_MS")]
        time_limit_ms: Option<u64>,
        /// Stop after this depth
        #[arg(long, env = "OTHELLO_MAX_DEPTH")]
        max_depth: Option<u32>,
        /// Print each depth report as a JSON line instead of a bare index
        #[arg(long)]
        json: bool,
    },
    /// Play a full game and print its progress
    SelfPlay {
        #[arg(long, default_value = "heuristic")]
        black: Strategy,
        #[arg(long, default_value = "random")]
        white: Strategy,
        /// Depth for the `search` strategy
        #[arg(long, default_value = "3")]
        depth: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Only print the final result
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            board,
            token,
            time_limit_ms,
            max_depth,
            json,
        } => {
            let board: Board = board.parse().context("invalid board")?;
            let token: Token = token.parse().context("invalid token")?;
            run_search(board, token, time_limit_ms.map(Duration::from_millis), max_depth, json)
        }
        Commands::SelfPlay {
            black,
            white,
            depth,
            seed,
            quiet,
        } => run_self_play(black, white, depth, seed, quiet),
    }
}

fn run_search(
    board: Board,
    token: Token,
    time_limit: Option<Duration>,
    max_depth: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut stdout = io::stdout().lock();

    for report in IterativeDeepening::new(board, token) {
        if json {
            writeln!(stdout, "{}", serde_json::to_string(&report)?)?;
        } else {
            writeln!(stdout, "{}", report.best_move)?;
        }
        stdout.flush()?;

        if max_depth.is_some_and(|max| report.depth >= max)
            || time_limit.is_some_and(|limit| started.elapsed() >= limit)
        {
            break;
        }
    }

    Ok(())
}

fn run_self_play(
    black: Strategy,
    white: Strategy,
    depth: u32,
    seed: Option<u64>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = SelfPlay::new(black.selector(depth), white.selector(depth));

    let record = game.play(&mut rng, |event| {
        if quiet {
            return;
        }
        match event {
            GameEvent::Turn {
                board,
                player: _,
                legal,
            } => {
                let (black, white) = board.count();
                print!("{board}");
                println!("White's Score: {white}");
                println!("Black's Score: {black}");
                println!("List of valid moves: {legal:?}");
            }
            GameEvent::Moved { player, pos, .. } => {
                println!("{player} places a token at index {pos}");
                println!();
            }
            GameEvent::Passed { player } => {
                println!("{player} passes");
                println!();
            }
        }
    })?;

    let result = record.result;
    println!("White's Final Score: {}", result.white_count);
    println!("Black's Final Score: {}", result.black_count);
    println!("Percentage of White Tokens: {}", result.white_share());
    println!("Percentage of Black Tokens: {}", result.black_share());
    let indices: Vec<i32> = record
        .moves
        .iter()
        .map(|mv| mv.map_or(-1, |pos| pos as i32))
        .collect();
    println!("Every index chosen:");
    println!("{indices:?}");

    Ok(())
}
