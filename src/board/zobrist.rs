use super::line::{Cell, EMPTY, MAX_DIMENSION, PLAYER_ONE, PLAYER_TWO};
use crate::game::Player;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CELLS: usize = MAX_DIMENSION * MAX_DIMENSION;

/// Zobrist hashing keys for board positions.
///
/// One random 64-bit key per (cell, cell state), where the state is empty,
/// player one or player two, plus a key toggled when player two is to move.
/// Cells are addressed as `x * MAX_DIMENSION + y` so every board width shares
/// the same keys.
pub struct ZobristKeys {
    /// [cell][state]
    pub cells: [[u64; 3]; CELLS],
    pub side_to_move: u64,
}

impl ZobristKeys {
    /// Generate keys from a fixed seed so hashes are reproducible across runs.
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(0xb0a2_d5e1_7f3c_4a69);

        let mut cells = [[0u64; 3]; CELLS];
        for cell in &mut cells {
            for state in cell {
                *state = rng.gen();
            }
        }

        Self {
            cells,
            side_to_move: rng.gen(),
        }
    }

    #[inline]
    fn state_index(cell: Cell) -> usize {
        match cell {
            PLAYER_ONE => 1,
            PLAYER_TWO => 2,
            _ => 0,
        }
    }

    /// Key for `cell` holding `state` at board coordinate (x, y).
    #[inline]
    pub fn cell(&self, x: usize, y: usize, state: Cell) -> u64 {
        self.cells[x * MAX_DIMENSION + y][Self::state_index(state)]
    }

    /// XOR delta for a cell changing from `from` to `to`.
    #[inline]
    pub fn change(&self, x: usize, y: usize, from: Cell, to: Cell) -> u64 {
        self.cell(x, y, from) ^ self.cell(x, y, to)
    }

    #[inline]
    pub fn mover(&self, mover: Player) -> u64 {
        match mover {
            Player::One => 0,
            Player::Two => self.side_to_move,
        }
    }

    /// Hash a whole board from scratch.
    ///
    /// `cell_at(x, y)` must return the cell value for every on-board coordinate.
    pub fn hash_board(&self, width: usize, mover: Player, cell_at: impl Fn(usize, usize) -> Cell) -> u64 {
        let mut hash = self.mover(mover);
        for x in 0..width {
            for y in 0..width {
                hash ^= self.cell(x, y, cell_at(x, y));
            }
        }
        hash
    }
}

/// Process-wide keys, generated on first use.
pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::generate);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_reproducible() {
        let a = ZobristKeys::generate();
        let b = ZobristKeys::generate();
        assert_eq!(a.cells[0], b.cells[0]);
        assert_eq!(a.side_to_move, b.side_to_move);
    }

    #[test]
    fn test_keys_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for cell in ZOBRIST.cells.iter() {
            for &key in cell {
                assert!(seen.insert(key), "duplicate zobrist key");
            }
        }
        assert!(seen.insert(ZOBRIST.side_to_move));
    }

    #[test]
    fn test_incremental_change_matches_full_hash() {
        let before = ZOBRIST.hash_board(4, Player::One, |_, _| EMPTY);
        let after = ZOBRIST.hash_board(4, Player::Two, |x, y| {
            if (x, y) == (1, 2) {
                PLAYER_ONE
            } else {
                EMPTY
            }
        });
        let incremental =
            before ^ ZOBRIST.change(1, 2, EMPTY, PLAYER_ONE) ^ ZOBRIST.side_to_move;
        assert_eq!(incremental, after);
    }
}
