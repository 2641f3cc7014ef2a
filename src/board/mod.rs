//! Square-board flip-capture game built on packed line tables.

pub mod action;
pub mod line;
pub mod state;
pub mod tables;
pub mod zobrist;

pub use action::{Move, Target};
pub use state::BoardState;
pub use tables::LineTables;
