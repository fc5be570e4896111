#![cfg(target_arch = "wasm32")]

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use othello_strategy::Board;
use othello_strategy::wasm::{best_move, legal_moves};

#[wasm_bindgen_test]
fn legal_moves_for_the_opening() {
    let board = Board::new().to_text();

    assert_eq!(legal_moves(&board, "@").unwrap(), vec![34, 43, 56, 65]);
}

#[wasm_bindgen_test]
fn malformed_board_is_rejected() {
    let err = legal_moves("???", "@").unwrap_err();

    assert_eq!(
        err.as_string().unwrap(),
        "board must have 100 cells, got 3"
    );
}

#[wasm_bindgen_test]
fn best_move_reports_the_requested_depth() {
    let board = Board::new().to_text();

    let report = best_move(&board, "@", 5000, 2).unwrap();
    let depth = Reflect::get(&report, &JsValue::from_str("depth")).unwrap();
    let best = Reflect::get(&report, &JsValue::from_str("best_move")).unwrap();

    assert_eq!(depth.as_f64(), Some(2.0));
    assert!([34.0, 43.0, 56.0, 65.0].contains(&best.as_f64().unwrap()));
}

#[wasm_bindgen_test]
fn best_move_is_null_without_legal_moves() {
    let board = Board::from_discs(&[11, 12], &[]).to_text();

    assert!(best_move(&board, "o", 100, 1).unwrap().is_null());
}
