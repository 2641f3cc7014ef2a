// Search-based deciders
//
// Two interchangeable strategies behind the `Decider` trait:
// - `MinimaxDecider`: fixed-depth alpha-beta negamax, random tie-break,
//   optional rayon root parallelism
// - `MtdDecider`: iterative-deepening MTD(f) with a transposition table and
//   a cooperative time budget
//
// Both work on any `GameState`; nothing here knows about boards or lines.

pub mod config;
pub mod minimax;
pub mod mtd;
pub mod ordering;
pub mod search;
pub mod transposition_table;

pub use config::{Difficulty, InterruptPolicy, SearchConfig};
pub use minimax::{negamax, MinimaxDecider};
pub use mtd::{MtdDecider, MtdSearch};
pub use search::{Deadline, SearchCancelled, SearchResult, SearchStats, SearchSummary, LOSE, WIN};
pub use transposition_table::{Bound, TranspositionEntry, TranspositionTable};
