//! Board position as packed lines.
//!
//! The same physical cell is stored four times: in its row, its column and
//! both of its diagonals. Each orientation indexes cells as follows:
//!
//! ```text
//! rows[x]               index y
//! cols[y]               index x
//! diag1[x + y]          index x
//! diag2[x - y + w - 1]  index x
//! ```
//!
//! Diagonals are padded with walls where they leave the board. Every write
//! goes through all four orientations so they never disagree, and the
//! legal-move bitmaps are recomputed before a new state is handed out.

use super::action::{Move, Target};
use super::line::{
    changed_indices, flip_spot, flipped_spots, owner, piece, set_spot, spot, Cell, Line, EMPTY,
    MAX_DIMENSION, PLAYER_ONE, PLAYER_TWO, WALL,
};
use super::tables::LineTables;
use super::zobrist::ZOBRIST;
use crate::error::GameError;
use crate::game::{ActionList, GameState, Player, Status};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

const DIAGONALS: usize = 2 * MAX_DIMENSION - 1;

const MOBILITY_WEIGHT: i32 = 8;
const CORNER_WEIGHT: i32 = 300;
const WIN_BONUS: i32 = 5000;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Row,
    Column,
    Diagonal,
    AntiDiagonal,
}

#[derive(Clone, Copy)]
pub struct BoardState {
    tables: &'static LineTables,
    width: usize,
    rows: [Line; MAX_DIMENSION],
    cols: [Line; MAX_DIMENSION],
    diag1: [Line; DIAGONALS],
    diag2: [Line; DIAGONALS],
    /// Legal targets per player, bit `x * width + y`.
    moves: [u64; 2],
    mover: Player,
    hash: u64,
}

impl BoardState {
    /// Standard start position on a `width` x `width` board, player one to move.
    pub fn new(width: usize) -> Result<Self, GameError> {
        check_width(width)?;
        Self::with_tables(LineTables::global(width)?)
    }

    /// Standard start position using explicitly supplied tables.
    pub fn with_tables(tables: &'static LineTables) -> Result<Self, GameError> {
        let width = tables.width();
        check_width(width)?;
        let mut state = Self::empty(tables, Player::One);
        let c = width / 2;
        state.put(c - 1, c - 1, PLAYER_TWO);
        state.put(c, c, PLAYER_TWO);
        state.put(c - 1, c, PLAYER_ONE);
        state.put(c, c - 1, PLAYER_ONE);
        state.refresh();
        Ok(state)
    }

    /// Build an arbitrary position from a diagram: one row per line, `O` for
    /// player one, `X` for player two, `.` for empty. Whitespace inside a row
    /// is ignored and the width is the number of rows.
    ///
    /// Cells are placed without flipping anything, so the position does not
    /// have to be reachable from the start.
    pub fn from_diagram(diagram: &str, mover: Player) -> Result<Self, GameError> {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|row| row.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        let width = rows.len();
        check_width(width)?;
        let mut state = Self::empty(LineTables::global(width)?, mover);

        for (x, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GameError::ParseBoard(format!(
                    "row {} has {} cells, expected {}",
                    x + 1,
                    row.len(),
                    width
                )));
            }
            for (y, &c) in row.iter().enumerate() {
                let cell = match c {
                    'O' | 'o' => PLAYER_ONE,
                    'X' | 'x' => PLAYER_TWO,
                    '.' | '-' => EMPTY,
                    other => {
                        return Err(GameError::ParseBoard(format!(
                            "unexpected {other:?} in row {}",
                            x + 1
                        )))
                    }
                };
                state.put(x, y, cell);
            }
        }

        state.refresh();
        Ok(state)
    }

    fn empty(tables: &'static LineTables, mover: Player) -> Self {
        let width = tables.width();
        let mut diag1 = [0; DIAGONALS];
        let mut diag2 = [0; DIAGONALS];
        for d in 0..2 * width - 1 {
            for i in 0..width {
                // diag1[d] holds (i, d - i); diag2[d] holds (i, i + w - 1 - d)
                if d < i || d - i >= width {
                    diag1[d] = set_spot(diag1[d], i, WALL);
                }
                if i + width - 1 < d || i + width - 1 - d >= width {
                    diag2[d] = set_spot(diag2[d], i, WALL);
                }
            }
        }

        Self {
            tables,
            width,
            rows: [0; MAX_DIMENSION],
            cols: [0; MAX_DIMENSION],
            diag1,
            diag2,
            moves: [0; 2],
            mover,
            hash: 0,
        }
    }

    #[inline]
    fn anti_diagonal(&self, x: usize, y: usize) -> usize {
        x + self.width - 1 - y
    }

    /// Write a cell through all four orientations. Bitmaps and hash are left
    /// stale until [`Self::refresh`].
    fn put(&mut self, x: usize, y: usize, cell: Cell) {
        let d2 = self.anti_diagonal(x, y);
        self.rows[x] = set_spot(self.rows[x], y, cell);
        self.cols[y] = set_spot(self.cols[y], x, cell);
        self.diag1[x + y] = set_spot(self.diag1[x + y], x, cell);
        self.diag2[d2] = set_spot(self.diag2[d2], x, cell);
    }

    fn flip_except(&mut self, x: usize, y: usize, skip: Orientation) {
        if skip != Orientation::Row {
            self.rows[x] = flip_spot(self.rows[x], y);
        }
        if skip != Orientation::Column {
            self.cols[y] = flip_spot(self.cols[y], x);
        }
        if skip != Orientation::Diagonal {
            self.diag1[x + y] = flip_spot(self.diag1[x + y], x);
        }
        if skip != Orientation::AntiDiagonal {
            let d2 = self.anti_diagonal(x, y);
            self.diag2[d2] = flip_spot(self.diag2[d2], x);
        }
    }

    fn refresh(&mut self) {
        self.refresh_moves();
        let state = *self;
        self.hash = ZOBRIST.hash_board(self.width, self.mover, |x, y| state.cell(x, y));
    }

    fn refresh_moves(&mut self) {
        for mover in [Player::One, Player::Two] {
            let mut bits = 0u64;
            for x in 0..self.width {
                for y in 0..self.width {
                    if self.flips_any(x, y, mover) {
                        bits |= 1 << (x * self.width + y);
                    }
                }
            }
            self.moves[mover.index()] = bits;
        }
    }

    /// The four lines through (x, y), each paired with the cell's index in it.
    #[inline]
    fn lines_through(&self, x: usize, y: usize) -> [(Line, usize); 4] {
        [
            (self.rows[x], y),
            (self.cols[y], x),
            (self.diag1[x + y], x),
            (self.diag2[self.anti_diagonal(x, y)], x),
        ]
    }

    #[inline]
    fn flips_any(&self, x: usize, y: usize, mover: Player) -> bool {
        self.lines_through(x, y)
            .iter()
            .any(|&(line, index)| (self.tables.moves(line, mover) >> index) & 1 != 0)
    }

    /// Can `mover` play `target` here, ignoring whose turn it is?
    ///
    /// A pass is valid only when `mover` has no capturing move. A square is
    /// valid when playing it changes at least one of its four lines beyond
    /// the played cell.
    pub fn move_is_valid(&self, target: Target, mover: Player) -> bool {
        match target {
            Target::Pass => self.moves[mover.index()] == 0,
            Target::Square(x, y) => {
                let (x, y) = (x as usize, y as usize);
                if x >= self.width || y >= self.width {
                    return false;
                }
                self.lines_through(x, y).iter().any(|&(line, index)| {
                    flipped_spots(line, self.tables.transition(line, index, mover), index) != 0
                })
            }
        }
    }

    /// Play at (x, y) for the side to move. The move must be valid.
    fn apply_move(&self, x: usize, y: usize) -> Self {
        let tables = self.tables;
        let width = self.width;
        let me = self.mover;
        let own = piece(me);
        let opponent = piece(me.opposite());
        let d1 = x + y;
        let d2 = self.anti_diagonal(x, y);

        let row = tables.transition(self.rows[x], y, me);
        let col = tables.transition(self.cols[y], x, me);
        let diag = tables.transition(self.diag1[d1], x, me);
        let anti = tables.transition(self.diag2[d2], x, me);

        let mut next = *self;
        next.rows[x] = row;
        next.cols[y] = col;
        next.diag1[d1] = diag;
        next.diag2[d2] = anti;

        let mut flipped: [(usize, usize, Orientation); 4 * MAX_DIMENSION] =
            [(0, 0, Orientation::Row); 4 * MAX_DIMENSION];
        let mut count = 0;
        let mut record = |cx: usize, cy: usize, orientation: Orientation| {
            flipped[count] = (cx, cy, orientation);
            count += 1;
        };
        for i in changed_indices(flipped_spots(self.rows[x], row, y), width) {
            record(x, i, Orientation::Row);
        }
        for i in changed_indices(flipped_spots(self.cols[y], col, x), width) {
            record(i, y, Orientation::Column);
        }
        for i in changed_indices(flipped_spots(self.diag1[d1], diag, x), width) {
            record(i, d1 - i, Orientation::Diagonal);
        }
        for i in changed_indices(flipped_spots(self.diag2[d2], anti, x), width) {
            record(i, i + y - x, Orientation::AntiDiagonal);
        }

        let mut hash = self.hash ^ ZOBRIST.change(x, y, EMPTY, own) ^ ZOBRIST.side_to_move;
        for &(cx, cy, orientation) in &flipped[..count] {
            next.flip_except(cx, cy, orientation);
            hash ^= ZOBRIST.change(cx, cy, opponent, own);
        }

        next.mover = me.opposite();
        next.hash = hash;
        next.refresh_moves();
        next
    }

    /// Same board, other side to move. Bitmaps stay valid because no cell changed.
    fn apply_pass(&self) -> Self {
        let mut next = *self;
        next.mover = self.mover.opposite();
        next.hash ^= ZOBRIST.side_to_move;
        next
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell value at row `x`, column `y`.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        spot(self.rows[x], y, self.width)
    }

    pub fn owner_at(&self, x: usize, y: usize) -> Option<Player> {
        owner(self.cell(x, y))
    }

    /// Legal-move bitmap for `player`, bit `x * width + y`.
    #[inline]
    pub fn move_bitmap(&self, player: Player) -> u64 {
        self.moves[player.index()]
    }

    /// Piece count for player one and player two.
    pub fn scores(&self) -> (u32, u32) {
        let mut one = 0;
        let mut two = 0;
        for x in 0..self.width {
            for y in 0..self.width {
                match self.cell(x, y) {
                    PLAYER_ONE => one += 1,
                    PLAYER_TWO => two += 1,
                    _ => {}
                }
            }
        }
        (one, two)
    }

    pub fn piece_differential(&self) -> i32 {
        self.rows[..self.width]
            .iter()
            .map(|&line| self.tables.point(line))
            .sum()
    }

    fn mobility_differential(&self) -> i32 {
        self.moves[0].count_ones() as i32 - self.moves[1].count_ones() as i32
    }

    fn corner_differential(&self) -> i32 {
        let last = self.width - 1;
        [(0, 0), (0, last), (last, 0), (last, last)]
            .iter()
            .map(|&(x, y)| match self.owner_at(x, y) {
                Some(player) => player.sign(),
                None => 0,
            })
            .sum()
    }

    fn stability_differential(&self) -> i32 {
        let diagonals = 2 * self.width - 1;
        self.rows[..self.width]
            .iter()
            .chain(&self.cols[..self.width])
            .chain(&self.diag1[..diagonals])
            .chain(&self.diag2[..diagonals])
            .map(|&line| self.tables.stability(line))
            .sum()
    }
}

fn check_width(width: usize) -> Result<(), GameError> {
    if !(2..=MAX_DIMENSION).contains(&width) || width % 2 != 0 {
        return Err(GameError::UnsupportedDimension(width));
    }
    Ok(())
}

impl GameState for BoardState {
    type Action = Move;

    /// Terminal positions are offset by the win bonus; no non-terminal
    /// position comes near this.
    const DECISIVE_SCORE: i32 = 3000;

    #[inline]
    fn to_move(&self) -> Player {
        self.mover
    }

    fn actions(&self) -> ActionList<Move> {
        let mut actions = ActionList::new();
        let mut bits = self.moves[self.mover.index()];
        if bits == 0 {
            actions.push(Move::pass(self.mover));
            return actions;
        }
        while bits != 0 {
            let bit = bits.trailing_zeros() as usize;
            let (x, y) = (bit / self.width, bit % self.width);
            actions.push(Move::place(self.mover, x as u8, y as u8));
            bits &= bits - 1;
        }
        actions
    }

    fn is_legal(&self, action: &Move) -> bool {
        action.player == self.mover && self.move_is_valid(action.target, action.player)
    }

    fn apply(&self, action: &Move) -> Result<Self, GameError> {
        if action.player != self.mover {
            return Err(GameError::invalid_action(
                action,
                format!("it is {}'s turn", self.mover.name()),
            ));
        }
        if !self.move_is_valid(action.target, action.player) {
            let reason = match action.target {
                Target::Pass => "a capturing move is available",
                Target::Square(x, y) if x as usize >= self.width || y as usize >= self.width => {
                    "off the board"
                }
                Target::Square(x, y) if self.cell(x as usize, y as usize) != EMPTY => {
                    "cell is occupied"
                }
                Target::Square(..) => "no pieces would be flipped",
            };
            return Err(GameError::invalid_action(action, reason));
        }

        Ok(match action.target {
            Target::Pass => self.apply_pass(),
            Target::Square(x, y) => self.apply_move(x as usize, y as usize),
        })
    }

    fn heuristic(&self) -> i32 {
        let bonus = match self.status() {
            Status::PlayerOneWon => WIN_BONUS,
            Status::PlayerTwoWon => -WIN_BONUS,
            Status::Ongoing | Status::Draw => 0,
        };
        self.piece_differential()
            + MOBILITY_WEIGHT * self.mobility_differential()
            + CORNER_WEIGHT * self.corner_differential()
            + self.stability_differential()
            + bonus
    }

    fn status(&self) -> Status {
        if self.moves[0] != 0 || self.moves[1] != 0 {
            return Status::Ongoing;
        }
        match self.piece_differential().cmp(&0) {
            Ordering::Greater => Status::PlayerOneWon,
            Ordering::Less => Status::PlayerTwoWon,
            Ordering::Equal => Status::Draw,
        }
    }

    #[inline]
    fn zobrist(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.mover == other.mover
            && self.rows[..self.width] == other.rows[..other.width]
    }
}

impl Eq for BoardState {}

impl Hash for BoardState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.width {
            for y in 0..self.width {
                let c = match self.cell(x, y) {
                    PLAYER_ONE => 'O',
                    PLAYER_TWO => 'X',
                    _ => '.',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.to_string();
        f.debug_struct("BoardState")
            .field("mover", &self.mover)
            .field("hash", &format_args!("{:#018x}", self.hash))
            .field("board", &board.lines().collect::<Vec<_>>())
            .finish()
    }
}
