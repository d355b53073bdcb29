//! Move selection for Othello/Reversi.
//!
//! Given any position and the side to move, the engine runs a fixed-depth
//! minimax search (dark maximizes, light minimizes) and answers with a
//! placement or a pass. [`api`] wraps the engine for wasm callers.

use wasm_bindgen::prelude::*;

pub mod ai;
pub mod api;
pub mod board;
pub mod engine;
pub mod log;
pub mod moves;
pub mod types;

pub use ai::eval::{EvalMode, Evaluator, WeightTable};
pub use ai::search::{SearchOutcome, Searcher};
pub use board::{Board, IllegalMove};
pub use engine::{EngineConfig, MoveSelector, Strategy, decide};
pub use moves::{Move, MoveList};
pub use types::{Decision, Piece, Position};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
