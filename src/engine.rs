use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::eval::{EvalMode, Evaluator};
use crate::ai::search::{DEFAULT_DEPTH, SearchOutcome, Searcher};
use crate::board::{Board, IllegalMove};
use crate::types::Decision;

/// How the engine picks among legal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Full minimax to `depth` plies.
    #[default]
    Minimax,
    /// Best static score one ply ahead.
    Greedy,
}

/// Engine settings; every field has a default so a request may omit any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub depth: u8,
    pub evaluation: EvalMode,
    pub strategy: Strategy,
    /// Search deadline in milliseconds. `None` searches exhaustively.
    pub timeout_ms: Option<u64>,
    /// Log the board and candidate moves to the console.
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            evaluation: EvalMode::default(),
            strategy: Strategy::default(),
            timeout_ms: None,
            verbose: false,
        }
    }
}

pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board) -> Result<SearchOutcome, IllegalMove>;
}

/// Scores each legal move by the board it produces and keeps the best one.
#[derive(Debug, Clone, Default)]
pub struct GreedySelector {
    evaluator: Evaluator,
}

impl GreedySelector {
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }
}

impl MoveSelector for GreedySelector {
    fn select_move(&self, board: &Board) -> Result<SearchOutcome, IllegalMove> {
        let mut moves = board.valid_moves();
        let nodes = 1 + moves.len() as u64;
        moves.generate_successors(board, &self.evaluator)?;

        let (decision, score) = match moves.best(board.next()) {
            Some(best) => (
                Decision::Place(best.at),
                best.score().unwrap_or_else(|| self.evaluator.evaluate(board)),
            ),
            None => (Decision::Pass, self.evaluator.evaluate(board)),
        };

        Ok(SearchOutcome {
            decision,
            score,
            nodes,
            timed_out: false,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MinimaxSelector {
    evaluator: Evaluator,
    depth: u8,
    timeout: Option<Duration>,
}

impl MinimaxSelector {
    pub fn new(evaluator: Evaluator, depth: u8) -> Self {
        Self {
            evaluator,
            depth,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl MoveSelector for MinimaxSelector {
    fn select_move(&self, board: &Board) -> Result<SearchOutcome, IllegalMove> {
        let mut searcher = match self.timeout {
            Some(timeout) => Searcher::with_timeout(&self.evaluator, self.depth, timeout),
            None => Searcher::new(&self.evaluator, self.depth),
        };
        Ok(searcher.search(board))
    }
}

/// Builds the selector described by `config`.
pub fn selector(config: &EngineConfig) -> Box<dyn MoveSelector> {
    let evaluator = Evaluator::from_mode(config.evaluation);
    match config.strategy {
        Strategy::Greedy => Box::new(GreedySelector::new(evaluator)),
        Strategy::Minimax => {
            let minimax = MinimaxSelector::new(evaluator, config.depth);
            match config.timeout_ms {
                Some(ms) => Box::new(minimax.with_timeout(Duration::from_millis(ms))),
                None => Box::new(minimax),
            }
        }
    }
}

/// Chooses a move for the side to play on `board`.
pub fn decide(board: &Board, config: &EngineConfig) -> Result<SearchOutcome, IllegalMove> {
    selector(config).select_move(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;
    use crate::types::{Piece, Position};

    struct FixedMoveSelector {
        at: Position,
    }

    impl MoveSelector for FixedMoveSelector {
        fn select_move(&self, board: &Board) -> Result<SearchOutcome, IllegalMove> {
            let after = board.apply(&Move::new(self.at, board.next()))?;
            Ok(SearchOutcome {
                decision: Decision::Place(self.at),
                score: Evaluator::DiscCount.evaluate(&after),
                nodes: 1,
                timed_out: false,
            })
        }
    }

    fn full_board_light_stuck() -> Board {
        let mut board = Board::empty(Piece::Light);
        for pos in Position::all().skip(1) {
            board.set(pos, Piece::Dark);
        }
        board
    }

    #[test]
    fn default_config_is_depth_five_positional_minimax() {
        let config = EngineConfig::default();

        assert_eq!(config.depth, 5);
        assert_eq!(config.evaluation, EvalMode::Positional);
        assert_eq!(config.strategy, Strategy::Minimax);
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn greedy_selects_single_capture_scenario() {
        let mut board = Board::empty(Piece::Dark);
        board.set(Position::new(4, 4), Piece::Dark);
        board.set(Position::new(5, 4), Piece::Light);

        let outcome = GreedySelector::new(Evaluator::DiscCount)
            .select_move(&board)
            .unwrap();

        assert_eq!(outcome.decision, Decision::Place(Position::new(6, 4)));
        assert_eq!(outcome.score, 3);
    }

    #[test]
    fn greedy_and_minimax_pass_when_stuck() {
        let board = full_board_light_stuck();

        for strategy in [Strategy::Greedy, Strategy::Minimax] {
            let config = EngineConfig {
                strategy,
                ..EngineConfig::default()
            };
            assert_eq!(decide(&board, &config).unwrap().decision, Decision::Pass);
        }
    }

    #[test]
    fn minimax_depth_one_agrees_with_greedy() {
        let board = Board::new()
            .apply(&Move::new(Position::new(4, 3), Piece::Dark))
            .unwrap();
        let greedy = GreedySelector::new(Evaluator::positional());
        let minimax = MinimaxSelector::new(Evaluator::positional(), 1);

        let g = greedy.select_move(&board).unwrap();
        let m = minimax.select_move(&board).unwrap();

        assert_eq!(g.decision, m.decision);
        assert_eq!(g.score, m.score);
    }

    #[test]
    fn selector_trait_objects_are_interchangeable() {
        let selectors: Vec<Box<dyn MoveSelector>> = vec![
            Box::new(FixedMoveSelector {
                at: Position::new(5, 6),
            }),
            selector(&EngineConfig {
                depth: 2,
                ..EngineConfig::default()
            }),
        ];

        for s in &selectors {
            let outcome = s.select_move(&Board::new()).unwrap();
            let at = outcome.decision.position().unwrap();
            assert!(Board::new().valid_moves().positions().contains(&at));
        }
    }

    #[test]
    fn fixed_selector_surfaces_illegal_move() {
        let err = FixedMoveSelector {
            at: Position::new(1, 1),
        }
        .select_move(&Board::new())
        .unwrap_err();

        assert_eq!(err, IllegalMove::NoCaptures { at: Position::new(1, 1) });
    }

    #[test]
    fn timeout_config_builds_deadline_search() {
        let config = EngineConfig {
            timeout_ms: Some(0),
            depth: 8,
            ..EngineConfig::default()
        };

        let outcome = decide(&Board::new(), &config).unwrap();

        assert!(outcome.timed_out);
        assert_eq!(outcome.decision, Decision::Place(Position::new(4, 3)));
    }
}
