// Shared search vocabulary
//
// Score bounds, the cooperative time check, and the bookkeeping every
// decider reports after a decision.

use std::fmt;
use std::time::{Duration, Instant};

/// Theoretical loss bound. Every heuristic value lies strictly inside
/// `LOSE..WIN`, so these double as the full search window.
pub const LOSE: i32 = -100_000;
pub const WIN: i32 = 100_000;

/// The time budget ran out mid-search.
///
/// Threaded through the recursion as `Result<i32, SearchCancelled>` and
/// consumed at the iterative-deepening boundary. Not a failure of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search cancelled: time budget exhausted")]
pub struct SearchCancelled;

/// Soft wall-clock deadline for one decision.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        match self.budget {
            Some(budget) => self.start.elapsed() >= budget,
            None => false,
        }
    }

    /// `Err(SearchCancelled)` once the budget is spent.
    #[inline]
    pub fn check(&self) -> Result<(), SearchCancelled> {
        if self.is_expired() {
            Err(SearchCancelled)
        } else {
            Ok(())
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Counters for one decision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    /// Deepest iteration that completed
    pub depth_reached: u32,
    /// Every node entered, leaves included
    pub nodes: u64,
    /// Nodes evaluated with the heuristic
    pub leaves: u64,
    pub cache_hits: u64,
    pub elapsed: Duration,
}

impl SearchStats {
    /// Leaves evaluated per second.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.leaves as f64 / secs
        } else {
            self.leaves as f64
        }
    }

    /// `b` such that `b^depth` equals the number of leaves evaluated.
    pub fn effective_branching_factor(&self) -> f64 {
        if self.depth_reached == 0 || self.leaves == 0 {
            return 0.0;
        }
        (self.leaves as f64).powf(1.0 / self.depth_reached as f64)
    }

    /// Share of visited nodes that were leaves.
    pub fn leaf_ratio(&self) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            self.leaves as f64 / self.nodes as f64
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth {} nodes {} leaves {} hits {} time {}ms nps {:.0} ebf {:.2}",
            self.depth_reached,
            self.nodes,
            self.leaves,
            self.cache_hits,
            self.elapsed.as_millis(),
            self.nodes_per_second(),
            self.effective_branching_factor()
        )
    }
}

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    pub best_action: Option<A>,
    /// Value of `best_action` for the side to move
    pub value: i32,
    /// Root actions with their final values, best first
    pub root_values: Vec<(A, i32)>,
    pub stats: SearchStats,
}

impl<A> SearchResult<A> {
    pub fn empty() -> Self {
        Self {
            best_action: None,
            value: 0,
            root_values: Vec::new(),
            stats: SearchStats::default(),
        }
    }
}

/// Averages over every decision a decider has made.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchSummary {
    pub decisions: usize,
    pub average_depth: f64,
    pub average_nodes_per_second: f64,
    pub average_branching_factor: f64,
}

impl SearchSummary {
    pub fn from_history(history: &[SearchStats]) -> Self {
        if history.is_empty() {
            return Self::default();
        }
        let n = history.len() as f64;
        Self {
            decisions: history.len(),
            average_depth: history.iter().map(|s| s.depth_reached as f64).sum::<f64>() / n,
            average_nodes_per_second: history.iter().map(SearchStats::nodes_per_second).sum::<f64>() / n,
            average_branching_factor: history
                .iter()
                .map(SearchStats::effective_branching_factor)
                .sum::<f64>()
                / n,
        }
    }
}

impl fmt::Display for SearchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} decisions, avg depth {:.2}, avg nps {:.0}, avg ebf {:.2}",
            self.decisions,
            self.average_depth,
            self.average_nodes_per_second,
            self.average_branching_factor
        )
    }
}

/// Log one completed iterative-deepening depth.
pub(crate) fn log_depth<A: fmt::Display>(depth: u32, best: Option<(&A, i32)>, stats: &SearchStats) {
    match best {
        Some((action, value)) => log::debug!(
            "info depth {} value {} best {} nodes {} time {}ms",
            depth,
            value,
            action,
            stats.nodes,
            stats.elapsed.as_millis()
        ),
        None => log::debug!("info depth {} (no actions)", depth),
    }
}
