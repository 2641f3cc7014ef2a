//! Deterministic two-player, zero-sum game engine.
//!
//! - [`game`]: the [`GameState`] contract and the [`Game`] driver
//! - [`board`]: a square flip-capture board built on precomputed line tables
//! - [`agent`]: deciders, from uniform random play to iterative-deepening MTD(f)

pub mod agent;
pub mod board;
pub mod error;
pub mod game;

pub use agent::{Decider, Difficulty, MinimaxDecider, MtdDecider, RandomDecider, SearchConfig};
pub use board::{BoardState, Move};
pub use error::GameError;
pub use game::{Game, GameState, Player, Status};
