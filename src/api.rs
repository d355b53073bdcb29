//! Wire layer for wasm callers.
//!
//! Requests look like `{"Board": {"Pieces": [[0, 1, 2, ...], ...], "Next": 1}, "config": {...}}`
//! with `Pieces[y-1][x-1]`. The short reply is `[x,y]` or `PASS`.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::ai::eval::Evaluator;
use crate::board::{Board, IllegalMove};
use crate::engine::{self, EngineConfig};
use crate::log::{self, console_log};
use crate::moves::Move;
use crate::types::{Decision, Position};

#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "Board", alias = "board")]
    pub board: Board,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReply {
    /// `[x,y]` or `PASS`.
    pub reply: String,
    pub decision: Decision,
    pub score: i32,
    pub nodes: u64,
    pub timed_out: bool,
}

pub fn handle(request: &MoveRequest) -> Result<MoveReply, IllegalMove> {
    let board = &request.board;
    let config = &request.config;

    if config.verbose {
        let evaluator = Evaluator::from_mode(config.evaluation);
        log::board(board);
        console_log!("{}", evaluator.evaluate(board));

        let mut candidates = board.valid_moves();
        candidates.generate_successors(board, &evaluator)?;
        log::moves(&candidates);
    }

    let outcome = engine::decide(board, config)?;
    if config.verbose {
        console_log!(
            "Move to: {} ({}) after {} nodes",
            outcome.decision,
            outcome.score,
            outcome.nodes
        );
    }

    Ok(MoveReply {
        reply: outcome.decision.to_string(),
        decision: outcome.decision,
        score: outcome.score,
        nodes: outcome.nodes,
        timed_out: outcome.timed_out,
    })
}

fn decode<T: for<'de> Deserialize<'de>>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("invalid {what}: {e}")))
}

fn encode<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn rule_error(err: IllegalMove) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Returns `[x,y]` or `PASS` for the request's board.
#[wasm_bindgen]
pub fn get_move(request: JsValue) -> Result<String, JsValue> {
    let request: MoveRequest = decode(request, "request")?;
    handle(&request).map(|reply| reply.reply).map_err(rule_error)
}

/// Like [`get_move`], but returns the whole [`MoveReply`].
#[wasm_bindgen]
pub fn get_move_detail(request: JsValue) -> Result<JsValue, JsValue> {
    let request: MoveRequest = decode(request, "request")?;
    let reply = handle(&request).map_err(rule_error)?;
    encode(&reply)
}

/// Legal placements for the side to move, as `[{x, y}, ...]` in row-major order.
#[wasm_bindgen]
pub fn legal_moves(board: JsValue) -> Result<JsValue, JsValue> {
    let board: Board = decode(board, "board")?;
    encode(&board.valid_moves().positions())
}

/// Plays `(x, y)` for the side to move and returns the new board.
/// An off-board coordinate such as `(0, 0)` is a pass.
#[wasm_bindgen]
pub fn apply_move(board: JsValue, x: i8, y: i8) -> Result<JsValue, JsValue> {
    let board: Board = decode(board, "board")?;
    let next = board
        .apply(&Move::new(Position::new(x, y), board.next()))
        .map_err(rule_error)?;
    encode(&next)
}
