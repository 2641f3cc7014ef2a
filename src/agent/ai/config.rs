//! Search configuration.
//!
//! # Difficulty Levels
//!
//! - **Easy**: depth 2, 100 ms
//! - **Medium**: depth 4, 500 ms
//! - **Hard**: depth 8, 2 s
//! - **Expert**: depth 64 (effectively unbounded), 5 s

use std::time::Duration;

/// AI difficulty levels that map to search depth and time controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    /// Sees its own reply and little else.
    Easy,
    #[default]
    Medium,
    Hard,
    /// Deepens until the time budget runs out.
    Expert,
}

impl Difficulty {
    /// Maximum iterative-deepening depth in plies.
    pub fn max_depth(&self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 8,
            Difficulty::Expert => 64,
        }
    }

    pub fn time_budget(&self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(100),
            Difficulty::Medium => Duration::from_millis(500),
            Difficulty::Hard => Duration::from_millis(2000),
            Difficulty::Expert => Duration::from_millis(5000),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }
}

/// What to keep from a depth whose pass over the root actions was cut short.
///
/// Values from an interrupted pass are speculative: the actions that were not
/// reached still carry the previous depth's values, and mixing the two is a
/// heuristic, not a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptPolicy {
    /// Throw away every value from the interrupted pass.
    DiscardAll,
    /// Keep a value from the interrupted pass only when it proves a forced
    /// win or loss for the side to move.
    #[default]
    KeepForcedOutcomes,
    /// If the previous best action now scores below another action reached
    /// in the interrupted pass, keep only its new (fallen) value so it sorts
    /// down, and restore every other value. Otherwise restore everything.
    DemoteFallenBest,
}

/// Parameters for one decider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Deepest iterative-deepening pass (or the fixed depth for minimax).
    pub max_depth: u32,
    /// Soft wall-clock budget per decision. `None` searches to `max_depth`.
    pub time_budget: Option<Duration>,
    /// Evaluate root actions with MTD(f) rather than a full-window search.
    pub use_mtdf: bool,
    /// The clock is polled only at nodes with more remaining depth than this.
    pub poll_depth: u32,
    /// Nodes with more remaining depth than this get a shallow ordering pass.
    pub reorder_depth: u32,
    /// How much shallower the ordering pass searches.
    pub reorder_reduction: u32,
    pub interrupt_policy: InterruptPolicy,
    /// Transposition table entry bound.
    pub table_capacity: usize,
    /// Score root actions on the rayon pool (minimax only).
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            time_budget: Some(Duration::from_millis(1000)),
            use_mtdf: true,
            poll_depth: 4,
            reorder_depth: 4,
            reorder_reduction: 2,
            interrupt_policy: InterruptPolicy::default(),
            table_capacity: 1_000_000,
            parallel: false,
        }
    }
}

impl SearchConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            max_depth: difficulty.max_depth(),
            time_budget: Some(difficulty.time_budget()),
            ..Self::default()
        }
    }

    /// Fixed-depth search with no clock.
    pub fn fixed_depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            time_budget: None,
            ..Self::default()
        }
    }

    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_mtdf(mut self, use_mtdf: bool) -> Self {
        self.use_mtdf = use_mtdf;
        self
    }

    pub fn with_interrupt_policy(mut self, policy: InterruptPolicy) -> Self {
        self.interrupt_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
