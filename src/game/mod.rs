//! Generic two-player, zero-sum, perfect-information game contract.
//!
//! Search and the game driver only ever talk to a game through [`GameState`].
//! A concrete game implements the trait once; everything in `agent` works on
//! any implementor.
//!
//! # Conventions
//!
//! - `heuristic()` is always from [`Player::One`]'s point of view: higher is
//!   better for player one, lower is better for player two. Searchers multiply
//!   by [`Player::sign`] to get the side-to-move perspective.
//! - `actions()` is never empty while the status is [`Status::Ongoing`]. A game
//!   where the mover can be stuck must hand out an explicit pass action.
//! - States are values. `apply` never touches `self`.

pub mod driver;

pub use driver::Game;

use crate::error::GameError;
use smallvec::SmallVec;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Inline-allocated list of actions, sized for a typical flip-capture position.
pub type ActionList<A> = SmallVec<[A; 32]>;

/// The two sides of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Moves first from the standard start; maximizes the heuristic.
    One,
    /// Minimizes the heuristic.
    Two,
}

impl Player {
    #[inline]
    pub fn opposite(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Negamax colour: `1` for player one, `-1` for player two.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Player::One => 1,
            Player::Two => -1,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::One => "player one",
            Player::Two => "player two",
        }
    }
}

/// Status of a game at a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ongoing,
    PlayerOneWon,
    PlayerTwoWon,
    Draw,
}

impl Status {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Status::Ongoing
    }

    /// The winning side, if the game has been decided.
    pub fn winner(self) -> Option<Player> {
        match self {
            Status::PlayerOneWon => Some(Player::One),
            Status::PlayerTwoWon => Some(Player::Two),
            Status::Ongoing | Status::Draw => None,
        }
    }

    pub fn from_winner(winner: Player) -> Self {
        match winner {
            Player::One => Status::PlayerOneWon,
            Player::Two => Status::PlayerTwoWon,
        }
    }
}

/// Capability contract for a game position.
pub trait GameState: Clone + Eq + Hash + Debug + Send + Sync {
    /// A move by one side. Immutable value; `Display` is used in logs and traces.
    type Action: Clone + Eq + Debug + Display + Send + Sync;

    /// Heuristic magnitude at or above which a value means the game is decided
    /// (a terminal position was reached somewhere along the line).
    const DECISIVE_SCORE: i32;

    /// Side whose turn it is.
    fn to_move(&self) -> Player;

    /// Legal actions for the side to move. Non-empty while ongoing.
    fn actions(&self) -> ActionList<Self::Action>;

    /// Can `action` be applied to this state? Pure.
    fn is_legal(&self, action: &Self::Action) -> bool;

    /// The state that results from `action`.
    ///
    /// Fails with [`GameError::InvalidAction`] only when `action` is not legal here.
    fn apply(&self, action: &Self::Action) -> Result<Self, GameError>;

    /// Static evaluation from player one's point of view.
    fn heuristic(&self) -> i32;

    fn status(&self) -> Status;

    /// Position key for caches. Equal states have equal keys; the converse is
    /// not guaranteed.
    fn zobrist(&self) -> u64;
}

/// Evaluation from the point of view of `color` (`1` or `-1`).
#[inline]
pub fn signed_heuristic<S: GameState>(state: &S, color: i32) -> i32 {
    color * state.heuristic()
}

/// Apply an action that was generated by `state.actions()`.
///
/// Such actions are legal by construction, so a failure here is a bug in the
/// game implementation rather than a recoverable condition.
#[inline]
pub fn successor<S: GameState>(state: &S, action: &S::Action) -> S {
    match state.apply(action) {
        Ok(child) => child,
        Err(err) => unreachable!("generated action rejected by its own state: {err}"),
    }
}
