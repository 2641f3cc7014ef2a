pub mod decider;
pub use decider::*;

pub mod ai;
pub use ai::{Difficulty, MinimaxDecider, MtdDecider, SearchConfig, SearchResult};
