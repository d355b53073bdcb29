//! Console diagnostics. On `wasm32` lines go to the host's `console.log`;
//! elsewhere logging compiles to nothing.

use crate::board::Board;
use crate::moves::MoveList;

pub fn info(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

macro_rules! console_log {
    ($($arg:tt)*) => {
        $crate::log::info(&format!($($arg)*))
    };
}
pub(crate) use console_log;

pub fn board(board: &Board) {
    for line in board.to_string().lines() {
        info(line);
    }
}

/// One line per scored move: `[x,y] (score)`.
pub fn moves(moves: &MoveList) {
    info("moves:");
    for mv in moves {
        match mv.score() {
            Some(score) => console_log!("{} ({score})", mv.at),
            None => console_log!("{}", mv.at),
        }
    }
}
