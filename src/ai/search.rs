use std::time::Duration;

use serde::Serialize;
use web_time::Instant;

use crate::ai::eval::Evaluator;
use crate::board::Board;
use crate::moves::Successor;
use crate::types::{Decision, Piece};

pub const DEFAULT_DEPTH: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchResult {
    Complete(i32),
    TimedOut,
}

/// Result of a root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub decision: Decision,
    /// Minimax value of the chosen line (static value for a pass or a fallback move).
    pub score: i32,
    pub nodes: u64,
    pub timed_out: bool,
}

/// Fixed-depth minimax over the full move tree. Dark maximizes, light minimizes.
pub struct Searcher<'a> {
    evaluator: &'a Evaluator,
    max_depth: u8,
    start_time: Instant,
    timeout: Option<Duration>,
    timed_out: bool,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(evaluator: &'a Evaluator, max_depth: u8) -> Self {
        Self {
            evaluator,
            max_depth,
            start_time: Instant::now(),
            timeout: None,
            timed_out: false,
            nodes: 0,
        }
    }

    /// Like [`Searcher::new`], but gives up once `timeout` has elapsed and
    /// answers with the best fully searched top-level move.
    pub fn with_timeout(evaluator: &'a Evaluator, max_depth: u8, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::new(evaluator, max_depth)
        }
    }

    /// Chooses a move for `board.next()`.
    ///
    /// The root always expands one ply, so `max_depth` 0 and 1 both pick the
    /// move with the best static score.
    pub fn search(&mut self, board: &Board) -> SearchOutcome {
        self.start_time = Instant::now();
        self.timed_out = false;
        self.nodes = 1;

        let mut moves = board.valid_moves();
        if moves.is_empty() {
            return self.outcome(Decision::Pass, self.evaluator.evaluate(board));
        }

        let child_depth = self.max_depth.saturating_sub(1);
        for mv in moves.iter_mut() {
            let child = board.place(mv);
            match self.minimax(&child, child_depth) {
                SearchResult::Complete(score) => {
                    mv.successor = Some(Successor {
                        board: child,
                        score,
                    });
                }
                SearchResult::TimedOut => break,
            }
        }

        if let Some(best) = moves.best(board.next())
            && let Some(score) = best.score()
        {
            return self.outcome(Decision::Place(best.at), score);
        }

        // Deadline hit before any top-level move finished.
        match moves.iter().next() {
            Some(first) => {
                let score = self.evaluator.evaluate(&board.place(first));
                self.outcome(Decision::Place(first.at), score)
            }
            None => self.outcome(Decision::Pass, self.evaluator.evaluate(board)),
        }
    }

    /// Minimax value of `board` searched `depth` plies deep, ignoring any timeout.
    pub fn value(&mut self, board: &Board, depth: u8) -> i32 {
        let timeout = self.timeout.take();
        let result = self.minimax(board, depth);
        self.timeout = timeout;
        match result {
            SearchResult::Complete(score) => score,
            SearchResult::TimedOut => self.evaluator.evaluate(board),
        }
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn minimax(&mut self, board: &Board, depth: u8) -> SearchResult {
        if self.deadline_passed() {
            self.timed_out = true;
            return SearchResult::TimedOut;
        }
        self.nodes += 1;

        if depth == 0 {
            return SearchResult::Complete(self.evaluator.evaluate(board));
        }

        let moves = board.valid_moves();
        if moves.is_empty() {
            // No extra ply for the opponent, even if it could still move.
            return SearchResult::Complete(self.evaluator.evaluate(board));
        }

        let side = board.next();
        let mut best: Option<i32> = None;
        for mv in &moves {
            let child = board.place(mv);
            match self.minimax(&child, depth - 1) {
                SearchResult::TimedOut => return SearchResult::TimedOut,
                SearchResult::Complete(score) => {
                    if best.is_none_or(|best| is_better(side, score, best)) {
                        best = Some(score);
                    }
                }
            }
        }

        match best {
            Some(score) => SearchResult::Complete(score),
            None => SearchResult::Complete(self.evaluator.evaluate(board)),
        }
    }

    fn deadline_passed(&self) -> bool {
        self.timeout
            .is_some_and(|timeout| self.start_time.elapsed() >= timeout)
    }

    fn outcome(&self, decision: Decision, score: i32) -> SearchOutcome {
        SearchOutcome {
            decision,
            score,
            nodes: self.nodes,
            timed_out: self.timed_out,
        }
    }
}

/// Strictly better only: equal scores keep the earlier move.
fn is_better(side: Piece, score: i32, best: i32) -> bool {
    match side {
        Piece::Dark => score > best,
        Piece::Light => score < best,
        Piece::Empty => false,
    }
}
