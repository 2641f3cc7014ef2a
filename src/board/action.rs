use crate::error::GameError;
use crate::game::Player;
use std::fmt;
use std::str::FromStr;

/// Where a move lands: a board cell or the forced pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Pass,
    /// Row `x`, column `y`, both zero-based.
    Square(u8, u8),
}

impl fmt::Display for Target {
    /// Algebraic form: column letter then 1-based row (`d3`), or `pass`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Target::Pass => write!(f, "pass"),
            Target::Square(x, y) => {
                let column = char::from_u32(u32::from(b'a') + u32::from(y))
                    .filter(char::is_ascii_lowercase)
                    .unwrap_or('?');
                write!(f, "{}{}", column, u32::from(x) + 1)
            }
        }
    }
}

impl FromStr for Target {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pass") {
            return Ok(Target::Pass);
        }

        let mut chars = s.chars();
        let column = chars
            .next()
            .map(|c| c.to_ascii_lowercase())
            .filter(char::is_ascii_lowercase)
            .ok_or_else(|| GameError::ParseMove(format!("expected a column letter in {s:?}")))?;
        let row: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| GameError::ParseMove(format!("expected a row number in {s:?}")))?;
        if row == 0 {
            return Err(GameError::ParseMove(format!("rows start at 1 in {s:?}")));
        }

        Ok(Target::Square(row - 1, column as u8 - b'a'))
    }
}

/// A move by one side. Immutable value; legality is decided by the state it
/// is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub player: Player,
    pub target: Target,
}

impl Move {
    pub fn place(player: Player, x: u8, y: u8) -> Self {
        Self {
            player,
            target: Target::Square(x, y),
        }
    }

    pub fn pass(player: Player) -> Self {
        Self {
            player,
            target: Target::Pass,
        }
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        self.target == Target::Pass
    }

    /// Parse algebraic notation for `player`.
    pub fn parse(text: &str, player: Player) -> Result<Self, GameError> {
        Ok(Self {
            player,
            target: text.parse()?,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.target.fmt(f)
    }
}
