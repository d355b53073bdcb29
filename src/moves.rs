use crate::ai::eval::Evaluator;
use crate::board::{Board, IllegalMove};
use crate::types::{Piece, Position};

/// Board reached by a move, with its static score attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Successor {
    pub board: Board,
    pub score: i32,
}

/// A placement (or a pass, when `at` is off the board) by `piece`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub at: Position,
    pub piece: Piece,
    pub successor: Option<Successor>,
}

impl Move {
    pub fn new(at: Position, piece: Piece) -> Self {
        Self {
            at,
            piece,
            successor: None,
        }
    }

    pub fn pass(piece: Piece) -> Self {
        Self::new(Position::PASS, piece)
    }

    pub fn is_pass(&self) -> bool {
        self.at.is_pass()
    }

    pub fn score(&self) -> Option<i32> {
        self.successor.map(|s| s.score)
    }
}

/// Candidate moves in discovery order (row-major for generated lists).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveList(Vec<Move>);

impl MoveList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, mv: Move) {
        self.0.push(mv);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Move> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Move> {
        self.0.iter_mut()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.0.iter().map(|mv| mv.at).collect()
    }

    /// Applies every move to `base` and attaches the resulting board and its score.
    ///
    /// Stops at the first move `base` rejects; moves before it keep their successors.
    pub fn generate_successors(
        &mut self,
        base: &Board,
        evaluator: &Evaluator,
    ) -> Result<(), IllegalMove> {
        for mv in &mut self.0 {
            let board = base.apply(mv)?;
            let score = evaluator.evaluate(&board);
            mv.successor = Some(Successor { board, score });
        }
        Ok(())
    }

    /// Index of the move whose score is best for `for_side`: highest for dark,
    /// lowest for light. Equal scores keep the earlier move. Moves without a
    /// successor are skipped.
    pub fn select_best(&self, for_side: Piece) -> Option<usize> {
        let better: fn(i32, i32) -> bool = match for_side {
            Piece::Dark => |score, best| score > best,
            Piece::Light => |score, best| score < best,
            Piece::Empty => return None,
        };

        let mut best: Option<(usize, i32)> = None;
        for (index, score) in self
            .0
            .iter()
            .enumerate()
            .filter_map(|(index, mv)| mv.score().map(|score| (index, score)))
        {
            match best {
                Some((_, best_score)) if !better(score, best_score) => {}
                _ => best = Some((index, score)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// The move picked by [`MoveList::select_best`].
    pub fn best(&self, for_side: Piece) -> Option<&Move> {
        self.select_best(for_side).and_then(|index| self.get(index))
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
