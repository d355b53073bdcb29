use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ai::eval::Evaluator;
use crate::moves::{Move, MoveList};
use crate::types::{DIRECTIONS, Direction, Piece, Position};

const BOARD_SIZE: usize = 8;

/// Reasons a move is rejected by [`Board::try_move`] / [`Board::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    /// Target cell already holds a disc.
    Occupied { at: Position, by: Piece },
    /// No straight line from the target sandwiches an opponent run.
    NoCaptures { at: Position },
    /// Pass attempted while placements are available.
    IllegalPass { available: usize },
    /// Move is placed by the side that is not to play.
    OutOfTurn { expected: Piece, got: Piece },
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalMove::Occupied { at, by } => {
                write!(f, "illegal move: {at} is occupied by {by}")
            }
            IllegalMove::NoCaptures { at } => {
                write!(f, "illegal move: {at} captures no pieces")
            }
            IllegalMove::IllegalPass { available } => {
                write!(f, "illegal move: cannot pass with {available} valid moves available")
            }
            IllegalMove::OutOfTurn { expected, got } => {
                write!(f, "illegal move: {got} played but {expected} is next")
            }
        }
    }
}

impl std::error::Error for IllegalMove {}

/// An 8x8 Othello position plus the side that must play next.
///
/// `Board` is `Copy`: applying a move always yields an independent value,
/// so sibling search branches can never observe each other's changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireBoard", into = "WireBoard")]
pub struct Board {
    pieces: [[Piece; BOARD_SIZE]; BOARD_SIZE],
    next: Piece,
}

/// Request layout: `Pieces[y-1][x-1]`, cells and `Next` encoded as 0/1/2.
#[derive(Serialize, Deserialize)]
struct WireBoard {
    #[serde(rename = "Pieces", alias = "pieces")]
    pieces: [[Piece; BOARD_SIZE]; BOARD_SIZE],
    #[serde(rename = "Next", alias = "next")]
    next: Piece,
}

impl TryFrom<WireBoard> for Board {
    type Error = String;

    fn try_from(wire: WireBoard) -> Result<Self, Self::Error> {
        Board::from_pieces(wire.pieces, wire.next)
    }
}

impl From<Board> for WireBoard {
    fn from(board: Board) -> Self {
        WireBoard {
            pieces: board.pieces,
            next: board.next,
        }
    }
}

impl Board {
    /// Creates the standard starting position, dark to move:
    /// (4,4)=light, (5,4)=dark, (4,5)=dark, (5,5)=light.
    pub fn new() -> Self {
        let mut board = Self::empty(Piece::Dark);
        board.set(Position::new(4, 4), Piece::Light);
        board.set(Position::new(5, 4), Piece::Dark);
        board.set(Position::new(4, 5), Piece::Dark);
        board.set(Position::new(5, 5), Piece::Light);
        board
    }

    /// Creates an empty grid. An empty `next` falls back to dark.
    pub fn empty(next: Piece) -> Self {
        Self {
            pieces: [[Piece::Empty; BOARD_SIZE]; BOARD_SIZE],
            next: if next.is_side() { next } else { Piece::Dark },
        }
    }

    pub fn from_pieces(
        pieces: [[Piece; BOARD_SIZE]; BOARD_SIZE],
        next: Piece,
    ) -> Result<Self, String> {
        if !next.is_side() {
            return Err("next player must be dark (1) or light (2), got empty".to_string());
        }
        Ok(Self { pieces, next })
    }

    /// Parses eight rows of eight cells, top row (y=1) first.
    /// `X`/`B` is dark, `O`/`W` is light, `.`/`-` is empty. Whitespace is ignored.
    pub fn parse(rows: &[&str; BOARD_SIZE], next: Piece) -> Result<Self, String> {
        let mut pieces = [[Piece::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (y, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != BOARD_SIZE {
                return Err(format!(
                    "row {} has {} cells, expected {BOARD_SIZE}",
                    y + 1,
                    cells.len()
                ));
            }
            for (x, c) in cells.into_iter().enumerate() {
                pieces[y][x] = match c.to_ascii_uppercase() {
                    'X' | 'B' => Piece::Dark,
                    'O' | 'W' => Piece::Light,
                    '.' | '-' => Piece::Empty,
                    other => {
                        return Err(format!("row {} has unknown cell {other:?}", y + 1));
                    }
                };
            }
        }
        Self::from_pieces(pieces, next)
    }

    /// Returns the piece at `pos`, or `None` when `pos` is off the board.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        let (row, col) = pos.index();
        Some(self.pieces[row][col])
    }

    /// Overwrites a cell. Off-board positions are ignored.
    pub fn set(&mut self, pos: Position, piece: Piece) {
        if pos.is_valid() {
            let (row, col) = pos.index();
            self.pieces[row][col] = piece;
        }
    }

    pub fn next(&self) -> Piece {
        self.next
    }

    /// Returns `(dark_count, light_count)`.
    pub fn count(&self) -> (u8, u8) {
        self.pieces
            .iter()
            .flatten()
            .fold((0, 0), |(dark, light), piece| match piece {
                Piece::Dark => (dark + 1, light),
                Piece::Light => (dark, light + 1),
                Piece::Empty => (dark, light),
            })
    }

    pub fn disc_count(&self) -> u8 {
        let (dark, light) = self.count();
        dark + light
    }

    pub fn empty_count(&self) -> u8 {
        (BOARD_SIZE * BOARD_SIZE) as u8 - self.disc_count()
    }

    pub(crate) fn rows(&self) -> &[[Piece; BOARD_SIZE]; BOARD_SIZE] {
        &self.pieces
    }

    /// All legal placements for the side to move, in row-major order.
    pub fn valid_moves(&self) -> MoveList {
        Position::all()
            .map(|at| Move::new(at, self.next))
            .filter(|mv| self.try_move(mv).is_ok())
            .collect()
    }

    /// Checks a move without executing it and returns the positions it captures.
    ///
    /// A legal pass captures nothing and yields an empty list.
    pub fn try_move(&self, mv: &Move) -> Result<Vec<Position>, IllegalMove> {
        if mv.piece != self.next {
            return Err(IllegalMove::OutOfTurn {
                expected: self.next,
                got: mv.piece,
            });
        }

        if mv.is_pass() {
            let available = self.valid_moves().len();
            if available > 0 {
                return Err(IllegalMove::IllegalPass { available });
            }
            return Ok(Vec::new());
        }

        let at = mv.at;
        match self.get(at) {
            Some(Piece::Empty) => {}
            Some(by) => return Err(IllegalMove::Occupied { at, by }),
            None => return Err(IllegalMove::NoCaptures { at }),
        }

        let captures = self.captures(at, mv.piece);
        if captures.is_empty() {
            return Err(IllegalMove::NoCaptures { at });
        }
        Ok(captures)
    }

    /// Plays `mv` and returns the resulting board; `self` is left untouched.
    pub fn apply(&self, mv: &Move) -> Result<Board, IllegalMove> {
        let captures = self.try_move(mv)?;
        Ok(self.flipped(mv, captures))
    }

    /// Plays a placement taken from [`Board::valid_moves`] without re-validating it.
    pub(crate) fn place(&self, mv: &Move) -> Board {
        let captures = self.captures(mv.at, mv.piece);
        self.flipped(mv, captures)
    }

    fn flipped(&self, mv: &Move, captures: Vec<Position>) -> Board {
        let mut next = *self;
        if !mv.is_pass() {
            for pos in captures.into_iter().chain(std::iter::once(mv.at)) {
                next.set(pos, mv.piece);
            }
        }
        next.next = self.next.opposite();
        next
    }

    /// Plays a pass for the side to move.
    pub fn pass(&self) -> Result<Board, IllegalMove> {
        self.apply(&Move::pass(self.next))
    }

    pub fn evaluate(&self, evaluator: &Evaluator) -> i32 {
        evaluator.evaluate(self)
    }

    /// Union of the runs captured in every direction, in [`DIRECTIONS`] order.
    fn captures(&self, at: Position, side: Piece) -> Vec<Position> {
        if at.is_pass() {
            return Vec::new();
        }
        DIRECTIONS
            .iter()
            .flat_map(|&dir| self.find_captures(at, side, dir))
            .collect()
    }

    fn find_captures(&self, from: Position, side: Piece, dir: Direction) -> Vec<Position> {
        let opponent = side.opposite();
        let mut run = Vec::new();
        let mut pos = from.step(dir);

        loop {
            match self.get(pos) {
                Some(piece) if piece == opponent => run.push(pos),
                // Only a non-empty run closed by our own disc captures.
                Some(piece) if piece == side => return run,
                _ => return Vec::new(),
            }
            pos = pos.step(dir);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.pieces {
            for piece in row {
                let cell = match piece {
                    Piece::Dark => "b ",
                    Piece::Light => "w ",
                    Piece::Empty => "  ",
                };
                f.write_str(cell)?;
            }
            writeln!(f)?;
        }
        write!(f, "next: {}", self.next)
    }
}
