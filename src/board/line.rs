//! Packed line encoding.
//!
//! A line is one row, column or diagonal of the board packed into a `u16`,
//! two bits per cell, cell `i` at bits `2i..2i+2`:
//!
//! ```text
//! 00 = empty   01 = wall (off-board padding)   10 = player one   11 = player two
//! ```
//!
//! Walls only ever appear as padding at the two ends of a line (short
//! diagonals); a line with a wall between two playable cells is unreachable.
//! Player one and player two differ only in the low bit, so a flip is a single
//! XOR.

use crate::game::Player;

pub type Line = u16;
pub type Cell = u8;

pub const EMPTY: Cell = 0;
pub const WALL: Cell = 1;
pub const PLAYER_ONE: Cell = 2;
pub const PLAYER_TWO: Cell = 3;

/// Widest line that fits in a `u16`.
pub const MAX_DIMENSION: usize = 8;

/// Cell value of `player`'s pieces.
#[inline]
pub fn piece(player: Player) -> Cell {
    match player {
        Player::One => PLAYER_ONE,
        Player::Two => PLAYER_TWO,
    }
}

/// Owner of a cell value, if it holds a piece.
#[inline]
pub fn owner(cell: Cell) -> Option<Player> {
    match cell {
        PLAYER_ONE => Some(Player::One),
        PLAYER_TWO => Some(Player::Two),
        _ => None,
    }
}

/// Value at `index`. Indices at or past `width` read as wall.
#[inline]
pub fn spot(line: Line, index: usize, width: usize) -> Cell {
    if index >= width {
        return WALL;
    }
    ((line >> (index * 2)) & 3) as Cell
}

#[inline]
pub fn set_spot(line: Line, index: usize, cell: Cell) -> Line {
    let mask: Line = 3 << (index * 2);
    (line & !mask) | ((cell as Line) << (index * 2))
}

/// Swap the owner of the piece at `index`.
#[inline]
pub fn flip_spot(line: Line, index: usize) -> Line {
    line ^ (1 << (index * 2))
}

/// Cells that differ between `old` and `new`, ignoring the cell at `index`
/// (the one that was just played).
#[inline]
pub fn flipped_spots(old: Line, new: Line, index: usize) -> Line {
    (old ^ new) & !(3 << (index * 2))
}

/// Indices of non-zero cells in a difference mask.
pub fn changed_indices(mask: Line, width: usize) -> impl Iterator<Item = usize> {
    (0..width).filter(move |&i| (mask >> (i * 2)) & 3 != 0)
}

/// A fully-walled line of `width` cells.
pub fn wall_line(width: usize) -> Line {
    (0..width).fold(0, |line, i| set_spot(line, i, WALL))
}

/// Whether a line is physically possible: at least one playable cell, walls
/// only as a prefix and/or suffix.
pub fn is_reachable(line: Line, width: usize) -> bool {
    let mut i = 0;
    while i < width && spot(line, i, width) == WALL {
        i += 1;
    }
    if i == width {
        return false;
    }
    while i < width && spot(line, i, width) != WALL {
        i += 1;
    }
    while i < width && spot(line, i, width) == WALL {
        i += 1;
    }
    i == width
}

/// Debug rendering, lowest index first (`0123` digits per cell).
pub fn line_to_string(line: Line, width: usize) -> String {
    (0..width)
        .map(|i| char::from(b'0' + spot(line, i, width)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_of(cells: &[Cell]) -> Line {
        cells
            .iter()
            .enumerate()
            .fold(0, |line, (i, &c)| set_spot(line, i, c))
    }

    #[test]
    fn test_spot_roundtrip_and_wall_past_width() {
        let line = line_of(&[EMPTY, PLAYER_ONE, PLAYER_TWO, WALL]);
        assert_eq!(spot(line, 0, 4), EMPTY);
        assert_eq!(spot(line, 1, 4), PLAYER_ONE);
        assert_eq!(spot(line, 2, 4), PLAYER_TWO);
        assert_eq!(spot(line, 3, 4), WALL);
        assert_eq!(spot(line, 4, 4), WALL);
        assert_eq!(line_to_string(line, 4), "0231");
    }

    #[test]
    fn test_flip_spot_swaps_owner() {
        let line = line_of(&[PLAYER_ONE, PLAYER_TWO]);
        let flipped = flip_spot(flip_spot(line, 0), 1);
        assert_eq!(spot(flipped, 0, 2), PLAYER_TWO);
        assert_eq!(spot(flipped, 1, 2), PLAYER_ONE);
    }

    #[test]
    fn test_flipped_spots_ignores_played_index() {
        let old = line_of(&[EMPTY, PLAYER_TWO, PLAYER_ONE]);
        let new = line_of(&[PLAYER_ONE, PLAYER_ONE, PLAYER_ONE]);
        let mask = flipped_spots(old, new, 0);
        assert_eq!(changed_indices(mask, 3).collect::<Vec<_>>(), vec![1]);
        assert_eq!(flipped_spots(old, set_spot(old, 0, PLAYER_ONE), 0), 0);
    }

    #[test]
    fn test_reachability() {
        assert!(is_reachable(line_of(&[EMPTY, EMPTY, EMPTY, EMPTY]), 4));
        assert!(is_reachable(line_of(&[WALL, EMPTY, PLAYER_ONE, WALL]), 4));
        assert!(is_reachable(line_of(&[WALL, WALL, WALL, EMPTY]), 4));
        assert!(!is_reachable(line_of(&[EMPTY, WALL, EMPTY, EMPTY]), 4));
        assert!(!is_reachable(wall_line(4), 4));
    }

    #[test]
    fn test_piece_and_owner() {
        assert_eq!(owner(piece(Player::One)), Some(Player::One));
        assert_eq!(owner(piece(Player::Two)), Some(Player::Two));
        assert_eq!(owner(EMPTY), None);
        assert_eq!(owner(WALL), None);
    }
}
