use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::Piece;

const MAGIC: &[u8; 4] = b"OTWT";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 16;
const BOARD_SIZE: usize = 8;
const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

const CORNER_WEIGHT: i32 = 100;
const CORNER_ADJACENT_WEIGHT: i32 = -25;
const EDGE_WEIGHT: i32 = 10;
const INTERIOR_WEIGHT: i32 = 1;

static STANDARD_WEIGHTS: Lazy<WeightTable> = Lazy::new(WeightTable::build_standard);

/// Per-cell weights, indexed `[y-1][x-1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable {
    weights: [[i32; BOARD_SIZE]; BOARD_SIZE],
}

impl WeightTable {
    pub fn new(weights: [[i32; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { weights }
    }

    /// Corners high, the edge cells next to a corner lowest, other edge cells
    /// medium, everything else baseline.
    pub fn standard() -> &'static WeightTable {
        &STANDARD_WEIGHTS
    }

    /// Every cell weighs `weight`; `uniform(1)` scores like disc counting.
    pub fn uniform(weight: i32) -> Self {
        Self::new([[weight; BOARD_SIZE]; BOARD_SIZE])
    }

    pub fn weight(&self, row: usize, col: usize) -> i32 {
        self.weights[row][col]
    }

    fn build_standard() -> Self {
        let last = BOARD_SIZE - 1;
        let is_edge = |i: usize| i == 0 || i == last;
        let mut weights = [[INTERIOR_WEIGHT; BOARD_SIZE]; BOARD_SIZE];

        for (row, cells) in weights.iter_mut().enumerate() {
            for (col, weight) in cells.iter_mut().enumerate() {
                *weight = if is_edge(row) && is_edge(col) {
                    CORNER_WEIGHT
                } else if (is_edge(row) && (col == 1 || col == last - 1))
                    || (is_edge(col) && (row == 1 || row == last - 1))
                {
                    CORNER_ADJACENT_WEIGHT
                } else if is_edge(row) || is_edge(col) {
                    EDGE_WEIGHT
                } else {
                    INTERIOR_WEIGHT
                };
            }
        }

        Self { weights }
    }

    /// Deserialize a table from the binary weights format:
    /// magic `OTWT`, u32 version, u32 CRC32 of the payload, u32 reserved,
    /// then 64 little-endian i32 weights in row-major order.
    pub fn from_bytes(data: &[u8]) -> Result<Self, String> {
        if data.len() < HEADER_SIZE {
            return Err(format!(
                "weights data too short: expected at least {HEADER_SIZE} bytes, got {}",
                data.len()
            ));
        }

        if &data[0..4] != MAGIC {
            return Err("invalid weights magic (expected OTWT)".to_string());
        }

        let version = read_u32_le(data, 4)?;
        if version != VERSION {
            return Err(format!(
                "unsupported weights version: expected {VERSION}, got {version}"
            ));
        }

        let expected_crc = read_u32_le(data, 8)?;
        let payload = &data[HEADER_SIZE..];

        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(format!(
                "CRC32 mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"
            ));
        }

        let expected_len = BOARD_CELLS * 4;
        if payload.len() < expected_len {
            return Err(format!(
                "unexpected EOF while reading weights: expected {expected_len} bytes, got {}",
                payload.len()
            ));
        }
        if payload.len() > expected_len {
            return Err("weights payload has trailing bytes".to_string());
        }

        let mut weights = [[0i32; BOARD_SIZE]; BOARD_SIZE];
        for (i, chunk) in payload.chunks_exact(4).enumerate() {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(chunk);
            weights[i / BOARD_SIZE][i % BOARD_SIZE] = i32::from_le_bytes(bytes);
        }

        Ok(Self { weights })
    }

    /// Inverse of [`WeightTable::from_bytes`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload: Vec<u8> = self
            .weights
            .iter()
            .flatten()
            .flat_map(|w| w.to_le_bytes())
            .collect();

        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Which static evaluation the engine uses, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalMode {
    DiscCount,
    #[default]
    Positional,
}

/// Static evaluation. Positive favors dark, negative favors light.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluator {
    /// Dark discs minus light discs.
    DiscCount,
    /// Sum of cell weights, added for dark and subtracted for light.
    Positional(WeightTable),
}

impl Evaluator {
    pub fn positional() -> Self {
        Evaluator::Positional(WeightTable::standard().clone())
    }

    pub fn from_mode(mode: EvalMode) -> Self {
        match mode {
            EvalMode::DiscCount => Evaluator::DiscCount,
            EvalMode::Positional => Self::positional(),
        }
    }

    pub fn evaluate(&self, board: &Board) -> i32 {
        match self {
            Evaluator::DiscCount => {
                let (dark, light) = board.count();
                dark as i32 - light as i32
            }
            Evaluator::Positional(table) => board
                .rows()
                .iter()
                .enumerate()
                .flat_map(|(row, cells)| {
                    cells
                        .iter()
                        .enumerate()
                        .map(move |(col, piece)| (row, col, *piece))
                })
                .map(|(row, col, piece)| match piece {
                    Piece::Dark => table.weight(row, col),
                    Piece::Light => -table.weight(row, col),
                    Piece::Empty => 0,
                })
                .sum(),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::positional()
    }
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, String> {
    let end = offset
        .checked_add(4)
        .ok_or_else(|| "offset overflow".to_string())?;
    let slice = data
        .get(offset..end)
        .ok_or_else(|| format!("unexpected EOF while reading u32 at offset {offset}"))?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(slice);
    Ok(u32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    #[test]
    fn initial_position_is_balanced() {
        let board = Board::new();

        assert_eq!(Evaluator::DiscCount.evaluate(&board), 0);
        assert_eq!(Evaluator::positional().evaluate(&board), 0);
    }

    #[test]
    fn disc_count_is_dark_minus_light() {
        let mut board = Board::new();
        board.set(Position::new(1, 1), Piece::Dark);
        board.set(Position::new(2, 1), Piece::Dark);

        assert_eq!(Evaluator::DiscCount.evaluate(&board), 2);
    }

    #[test]
    fn standard_table_shape() {
        let table = WeightTable::standard();

        for &(row, col) in &[(0, 0), (0, 7), (7, 0), (7, 7)] {
            assert_eq!(table.weight(row, col), CORNER_WEIGHT);
        }
        for &(row, col) in &[(0, 1), (1, 0), (0, 6), (6, 0), (7, 1), (1, 7), (7, 6), (6, 7)] {
            assert_eq!(table.weight(row, col), CORNER_ADJACENT_WEIGHT);
        }
        assert_eq!(table.weight(0, 3), EDGE_WEIGHT);
        assert_eq!(table.weight(4, 7), EDGE_WEIGHT);
        assert_eq!(table.weight(1, 1), INTERIOR_WEIGHT);
        assert_eq!(table.weight(3, 4), INTERIOR_WEIGHT);
    }

    #[test]
    fn positional_rewards_corners_and_mirrors_for_light() {
        let eval = Evaluator::positional();
        let mut dark = Board::empty(Piece::Dark);
        dark.set(Position::new(1, 1), Piece::Dark);
        let mut light = Board::empty(Piece::Dark);
        light.set(Position::new(1, 1), Piece::Light);

        assert_eq!(eval.evaluate(&dark), CORNER_WEIGHT);
        assert_eq!(eval.evaluate(&light), -CORNER_WEIGHT);
    }

    #[test]
    fn uniform_table_matches_disc_count() {
        let board = Board::new()
            .apply(&crate::moves::Move::new(Position::new(4, 3), Piece::Dark))
            .unwrap();

        assert_eq!(
            Evaluator::Positional(WeightTable::uniform(1)).evaluate(&board),
            Evaluator::DiscCount.evaluate(&board)
        );
    }

    #[test]
    fn from_bytes_accepts_serialized_table() {
        let table = WeightTable::standard();

        let loaded = WeightTable::from_bytes(&table.to_bytes()).unwrap();

        assert_eq!(&loaded, table);
    }

    #[test]
    fn from_bytes_rejects_corrupted_data() {
        let bytes = WeightTable::uniform(3).to_bytes();

        let err = WeightTable::from_bytes(&bytes[..10]).unwrap_err();
        assert!(err.contains("too short"));

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(WeightTable::from_bytes(&bad_magic).unwrap_err().contains("magic"));

        let mut bad_version = bytes.clone();
        bad_version[4] = 9;
        assert!(WeightTable::from_bytes(&bad_version).unwrap_err().contains("version"));

        let mut flipped = bytes.clone();
        let last = flipped.len() - 1;
        flipped[last] ^= 0xff;
        assert!(WeightTable::from_bytes(&flipped).unwrap_err().contains("CRC32"));
    }

    #[test]
    fn from_bytes_rejects_wrong_payload_length() {
        let mut bytes = WeightTable::uniform(1).to_bytes();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        let crc = crc32fast::hash(&bytes[HEADER_SIZE..]);
        bytes[8..12].copy_from_slice(&crc.to_le_bytes());

        assert!(WeightTable::from_bytes(&bytes).unwrap_err().contains("trailing"));

        let mut short = WeightTable::uniform(1).to_bytes();
        short.truncate(HEADER_SIZE + 8);
        let crc = crc32fast::hash(&short[HEADER_SIZE..]);
        short[8..12].copy_from_slice(&crc.to_le_bytes());

        assert!(WeightTable::from_bytes(&short).unwrap_err().contains("EOF"));
    }
}
