//! Per-line lookup tables.
//!
//! Every question the board asks about a single row, column or diagonal is
//! answered by a table indexed by the packed line value:
//!
//! - `point(line)`: piece differential along the line (player one minus player two)
//! - `transition(line, index, mover)`: the line after `mover` plays at `index`,
//!   with every flip along that line applied
//! - `stability(line)`: exposed-run contribution used by the heuristic
//! - `moves(line, mover)`: bitmask of indices where `mover` flips something
//!
//! Tables are built once per board width by exhaustive enumeration of the
//! 2-bit alphabet and are read-only afterwards. [`LineTables::global`] is the
//! explicit one-time initialisation entry point; [`LineTables::build`] is the
//! pure constructor for callers that want their own copy.

use super::line::{
    flipped_spots, is_reachable, piece, set_spot, spot, Line, EMPTY, MAX_DIMENSION, PLAYER_ONE,
    PLAYER_TWO, WALL,
};
use crate::error::GameError;
use crate::game::Player;
use once_cell::sync::OnceCell;

pub struct LineTables {
    width: usize,
    points: Vec<i8>,
    /// Indexed by `(line * width + index) * 2 + mover`
    transitions: Vec<Line>,
    stability: Vec<i16>,
    /// Indexed by `line * 2 + mover`
    moves: Vec<u8>,
    reachable: usize,
}

#[allow(clippy::declare_interior_mutable_const)]
const UNBUILT: OnceCell<LineTables> = OnceCell::new();

/// One slot per supported width.
static REGISTRY: [OnceCell<LineTables>; MAX_DIMENSION + 1] = [UNBUILT; MAX_DIMENSION + 1];

impl LineTables {
    /// Tables for `width`, building them on first use.
    ///
    /// Call this at process start for every width you intend to play; later
    /// calls return the same tables.
    pub fn global(width: usize) -> Result<&'static LineTables, GameError> {
        check_width(width)?;
        REGISTRY[width].get_or_try_init(|| LineTables::build(width))
    }

    /// Build all tables for lines of `width` cells.
    ///
    /// Runs in O(4^width * width).
    pub fn build(width: usize) -> Result<Self, GameError> {
        check_width(width)?;
        let size = 1usize << (2 * width);
        let mut tables = Self {
            width,
            points: vec![0; size],
            transitions: vec![0; size * width * 2],
            stability: vec![0; size],
            moves: vec![0; size * 2],
            reachable: 0,
        };
        tables.enumerate(0, 0, 0);
        log::debug!(
            "built line tables for width {}: {} reachable of {} lines",
            width,
            tables.reachable,
            size
        );
        Ok(tables)
    }

    /// Recursively assign every cell value, then fill the tables for the
    /// completed line.
    fn enumerate(&mut self, line: Line, points: i8, depth: usize) {
        if depth == self.width {
            if is_reachable(line, self.width) {
                self.fill_line(line, points);
            }
            return;
        }
        self.enumerate(set_spot(line, depth, EMPTY), points, depth + 1);
        self.enumerate(set_spot(line, depth, WALL), points, depth + 1);
        self.enumerate(set_spot(line, depth, PLAYER_ONE), points + 1, depth + 1);
        self.enumerate(set_spot(line, depth, PLAYER_TWO), points - 1, depth + 1);
    }

    fn fill_line(&mut self, line: Line, points: i8) {
        let l = line as usize;
        self.reachable += 1;
        self.points[l] = points;
        self.stability[l] = stability_of(line, self.width);

        for mover in [Player::One, Player::Two] {
            let mut legal = 0u8;
            for index in 0..self.width {
                let result = transition_of(line, index, mover, self.width);
                self.transitions[(l * self.width + index) * 2 + mover.index()] = result;
                if flipped_spots(line, result, index) != 0 {
                    legal |= 1 << index;
                }
            }
            self.moves[l * 2 + mover.index()] = legal;
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of physically possible line values.
    pub fn reachable_lines(&self) -> usize {
        self.reachable
    }

    #[inline]
    pub fn point(&self, line: Line) -> i32 {
        self.points[line as usize] as i32
    }

    #[inline]
    pub fn transition(&self, line: Line, index: usize, mover: Player) -> Line {
        self.transitions[(line as usize * self.width + index) * 2 + mover.index()]
    }

    #[inline]
    pub fn stability(&self, line: Line) -> i32 {
        self.stability[line as usize] as i32
    }

    #[inline]
    pub fn moves(&self, line: Line, mover: Player) -> u8 {
        self.moves[line as usize * 2 + mover.index()]
    }
}

fn check_width(width: usize) -> Result<(), GameError> {
    if width == 0 || width > MAX_DIMENSION {
        return Err(GameError::UnsupportedDimension(width));
    }
    Ok(())
}

/// Place `mover` at `index` and flip every bracketed opposing run.
///
/// An occupied index resolves to the line itself. An empty index always
/// receives the piece, flips or not; legality is decided by the caller from
/// the flipped cells.
fn transition_of(line: Line, index: usize, mover: Player, width: usize) -> Line {
    if spot(line, index, width) != EMPTY {
        return line;
    }
    let own = piece(mover);
    let opponent = piece(mover.opposite());
    let mut result = set_spot(line, index, own);

    for step in [-1isize, 1] {
        let mut j = index as isize + step;
        let mut run = 0;
        while j >= 0 && spot(line, j as usize, width) == opponent {
            j += step;
            run += 1;
        }
        if run == 0 || j < 0 || spot(line, j as usize, width) != own {
            continue;
        }
        let mut k = index as isize + step;
        while k != j {
            result = set_spot(result, k as usize, own);
            k += step;
        }
    }
    result
}

/// Exposed runs: a run of one side's pieces with the other side on one end
/// and an empty cell on the other can be captured along this line. Such runs
/// count against their owner, one point per piece. Runs touching a wall are
/// never counted.
fn stability_of(line: Line, width: usize) -> i16 {
    let mut value = 0i16;
    let mut index = 0;
    let mut cell = spot(line, index, width);
    while cell == WALL && index < width {
        index += 1;
        cell = spot(line, index, width);
    }

    let mut last = WALL;
    let mut current = cell;
    let mut seen = 0i16;
    while cell != WALL {
        if cell == current {
            seen += 1;
        } else {
            if cell == EMPTY {
                if last == PLAYER_ONE && current == PLAYER_TWO {
                    value += seen;
                } else if last == PLAYER_TWO && current == PLAYER_ONE {
                    value -= seen;
                }
            } else if last == EMPTY {
                if cell == PLAYER_ONE && current == PLAYER_TWO {
                    value += seen;
                } else if cell == PLAYER_TWO && current == PLAYER_ONE {
                    value -= seen;
                }
            }
            last = current;
            seen = 1;
            current = cell;
        }
        index += 1;
        cell = spot(line, index, width);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::line::line_to_string;

    /// Parse `.` `#` `O` `X` into a line, lowest index first.
    fn line(s: &str) -> Line {
        s.chars().enumerate().fold(0, |line, (i, c)| {
            let cell = match c {
                '.' => EMPTY,
                '#' => WALL,
                'O' => PLAYER_ONE,
                'X' => PLAYER_TWO,
                _ => panic!("bad cell {c}"),
            };
            set_spot(line, i, cell)
        })
    }

    #[test]
    fn test_rejects_unsupported_widths() {
        assert_eq!(LineTables::build(0).err(), Some(GameError::UnsupportedDimension(0)));
        assert_eq!(LineTables::build(9).err(), Some(GameError::UnsupportedDimension(9)));
    }

    #[test]
    fn test_global_tables_are_built_once() {
        let a = LineTables::global(4).unwrap();
        let b = LineTables::global(4).unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.width(), 4);
    }

    #[test]
    fn test_reachable_line_count() {
        // Width 4: sum over prefix/suffix wall splits of 3^playable.
        // playable = 4: 81; 3: 2*27; 2: 3*9; 1: 4*3 => 81 + 54 + 27 + 12
        let tables = LineTables::build(4).unwrap();
        assert_eq!(tables.reachable_lines(), 174);
    }

    #[test]
    fn test_point_table() {
        let tables = LineTables::build(4).unwrap();
        assert_eq!(tables.point(line("OOX.")), 1);
        assert_eq!(tables.point(line("XX#.")), 0); // unreachable, left at zero
        assert_eq!(tables.point(line("#XX#")), -2);
        assert_eq!(tables.point(line("....")), 0);
    }

    #[test]
    fn test_transition_flips_bracketed_run() {
        let tables = LineTables::build(8).unwrap();
        let before = line(".XXO....");
        let after = tables.transition(before, 0, Player::One);
        assert_eq!(line_to_string(after, 8), line_to_string(line("OOOO...."), 8));
        assert_eq!(tables.moves(before, Player::One) & 1, 1);
    }

    #[test]
    fn test_transition_flips_both_directions() {
        let tables = LineTables::build(8).unwrap();
        let before = line("OX.XXO..");
        let after = tables.transition(before, 2, Player::One);
        assert_eq!(after, line("OOOOOO.."));
    }

    #[test]
    fn test_transition_without_bracket_places_but_is_not_legal() {
        let tables = LineTables::build(8).unwrap();
        let before = line(".XX.....");
        let after = tables.transition(before, 0, Player::One);
        assert_eq!(after, line("OXX....."));
        assert_eq!(tables.moves(before, Player::One), 0);
    }

    #[test]
    fn test_wall_does_not_bracket() {
        let tables = LineTables::build(4).unwrap();
        let before = line(".XX#");
        assert_eq!(tables.moves(before, Player::One), 0);
        assert_eq!(tables.transition(before, 0, Player::One), line("OXX#"));
    }

    #[test]
    fn test_occupied_index_resolves_to_itself() {
        let tables = LineTables::build(4).unwrap();
        let before = line("OX..");
        assert_eq!(tables.transition(before, 0, Player::Two), before);
        assert_eq!(tables.transition(before, 1, Player::One), before);
    }

    #[test]
    fn test_moves_table_per_mover() {
        let tables = LineTables::build(4).unwrap();
        let before = line(".OX.");
        assert_eq!(tables.moves(before, Player::One), 0b1000);
        assert_eq!(tables.moves(before, Player::Two), 0b0001);
    }

    #[test]
    fn test_stability_exposed_runs() {
        let tables = LineTables::build(8).unwrap();
        // Two X pieces between O and an empty cell: exposed, good for player one.
        assert_eq!(tables.stability(line("OXX.....")), 2);
        // Mirror image for player two.
        assert_eq!(tables.stability(line("XOO.....")), -2);
        // The O run is exposed from the left, the single X from the right.
        assert_eq!(tables.stability(line(".OOX....")), -1);
        // Anchored at the edge: not counted.
        assert_eq!(tables.stability(line("XXXX....")), 0);
        assert_eq!(tables.stability(line("#OX.")), 0);
        assert_eq!(tables.stability(line("........")), 0);
    }
}
