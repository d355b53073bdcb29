use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: i8 = 8;

/// Contents of a single board cell, also used to name a side.
///
/// Wire encoding: 0 = empty, 1 = dark (black/red), 2 = light (white/blue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Piece {
    #[default]
    Empty,
    Dark,
    Light,
}

impl Piece {
    pub fn opposite(self) -> Self {
        match self {
            Piece::Dark => Piece::Light,
            Piece::Light => Piece::Dark,
            Piece::Empty => Piece::Empty,
        }
    }

    pub fn is_side(self) -> bool {
        self != Piece::Empty
    }
}

impl TryFrom<u8> for Piece {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Piece::Empty),
            1 => Ok(Piece::Dark),
            2 => Ok(Piece::Light),
            other => Err(format!("invalid piece value: {other} (expected 0, 1 or 2)")),
        }
    }
}

impl From<Piece> for u8 {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::Empty => 0,
            Piece::Dark => 1,
            Piece::Light => 2,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Piece::Empty => "empty",
            Piece::Dark => "dark",
            Piece::Light => "light",
        };
        f.write_str(name)
    }
}

/// A board coordinate. Valid coordinates are 1-8 on both axes (not 0-7);
/// anything else denotes a pass when used as a move target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const PASS: Position = Position { x: 0, y: 0 };

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn is_valid(self) -> bool {
        let ok = |i: i8| (1..=BOARD_SIZE).contains(&i);
        ok(self.x) && ok(self.y)
    }

    pub fn is_pass(self) -> bool {
        !self.is_valid()
    }

    pub fn step(self, dir: Direction) -> Self {
        Self {
            x: self.x + dir.dx,
            y: self.y + dir.dy,
        }
    }

    /// Row-major scan order: y outer, x inner, both 1..=8.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=BOARD_SIZE).flat_map(|y| (1..=BOARD_SIZE).map(move |x| Position::new(x, y)))
    }

    /// Zero-based `(row, col)` into a `[[_; 8]; 8]` grid. Caller checks validity.
    pub(crate) fn index(self) -> (usize, usize) {
        ((self.y - 1) as usize, (self.x - 1) as usize)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// What the engine chose for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Place(Position),
    Pass,
}

impl Decision {
    pub fn position(self) -> Option<Position> {
        match self {
            Decision::Place(pos) => Some(pos),
            Decision::Pass => None,
        }
    }
}

/// Reply text: `[x,y]` for a placement, `PASS` otherwise.
impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Place(pos) => write!(f, "{pos}"),
            Decision::Pass => f.write_str("PASS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub dx: i8,
    pub dy: i8,
}

pub const DIRECTIONS: [Direction; 8] = [
    Direction { dx: -1, dy: -1 },
    Direction { dx: -1, dy: 0 },
    Direction { dx: -1, dy: 1 },
    Direction { dx: 0, dy: -1 },
    Direction { dx: 0, dy: 1 },
    Direction { dx: 1, dy: -1 },
    Direction { dx: 1, dy: 0 },
    Direction { dx: 1, dy: 1 },
];
