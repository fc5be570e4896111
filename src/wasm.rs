use wasm_bindgen::prelude::*;
use web_time::Duration;

use crate::ai::search::{SearchConfig, best_move_within};
use crate::board::{Board, BoardError};
use crate::types::Token;

/// Budget used when the caller passes `0` for the time limit.
pub const DEFAULT_TIME_LIMIT_MS: u32 = 1000;

/// Legal squares for `token` on a 100-character board.
#[wasm_bindgen(js_name = legalMoves)]
pub fn legal_moves(board: &str, token: &str) -> Result<Vec<u8>, JsValue> {
    let (board, token) = parse_request(board, token).map_err(to_js_error)?;
    Ok(board
        .legal_moves(token)
        .into_iter()
        .map(|pos| pos as u8)
        .collect())
}

/// Runs iterative deepening within the budget and returns the last completed
/// depth report, or `null` when `token` has no legal move. A `max_depth` of
/// `0` leaves the depth unbounded.
#[wasm_bindgen(js_name = bestMove)]
pub fn best_move(
    board: &str,
    token: &str,
    time_limit_ms: u32,
    max_depth: u32,
) -> Result<JsValue, JsValue> {
    let (board, token) = parse_request(board, token).map_err(to_js_error)?;
    let config = request_config(time_limit_ms, max_depth);

    match best_move_within(&board, token, config) {
        Some(report) => serde_wasm_bindgen::to_value(&report).map_err(JsValue::from),
        None => Ok(JsValue::NULL),
    }
}

fn parse_request(board: &str, token: &str) -> Result<(Board, Token), BoardError> {
    Ok((board.parse()?, token.parse()?))
}

fn request_config(time_limit_ms: u32, max_depth: u32) -> SearchConfig {
    let time_limit_ms = if time_limit_ms == 0 {
        DEFAULT_TIME_LIMIT_MS
    } else {
        time_limit_ms
    };
    SearchConfig {
        time_limit: Some(Duration::from_millis(time_limit_ms as u64)),
        max_depth: (max_depth > 0).then_some(max_depth),
    }
}

fn to_js_error(err: BoardError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parses_board_and_token() {
        let text = Board::new().to_text();

        let (board, token) = parse_request(&text, "o").unwrap();

        assert_eq!(board, Board::new());
        assert_eq!(token, Token::White);
        assert_eq!(
            parse_request(&text, "?"),
            Err(BoardError::InvalidToken("?".to_string()))
        );
    }

    #[test]
    fn zero_limits_fall_back_to_defaults() {
        let config = request_config(0, 0);

        assert_eq!(
            config.time_limit,
            Some(Duration::from_millis(DEFAULT_TIME_LIMIT_MS as u64))
        );
        assert_eq!(config.max_depth, None);
        assert_eq!(request_config(250, 6).max_depth, Some(6));
    }
}
