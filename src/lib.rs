use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod game;
pub mod types;
pub mod wasm;

pub use board::{Board, BoardError};
pub use types::{Cell, DepthReport, GameResult, Position, Token};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
