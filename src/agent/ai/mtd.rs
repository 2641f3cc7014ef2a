//! MTD(f) with iterative deepening and a transposition table.
//!
//! # Architecture
//!
//! [`MtdSearch`] owns the state of one decision: the table, the deadline and
//! the counters. It provides the two recursive procedures:
//!
//! - [`MtdSearch::alpha_beta_with_memory`]: fail-soft negamax that consults the
//!   table before searching and stores its result afterwards
//! - [`MtdSearch::mtdf`]: converges on a node's exact value through a series of
//!   null-window calls to the former
//!
//! [`MtdDecider`] runs iterative deepening over the root actions, ordering them
//! best-first from the previous depth and seeding each action's MTD(f) guess
//! with its previous value.
//!
//! # Time control
//!
//! The clock is read only at nodes with more than `poll_depth` plies left. An
//! expired clock surfaces as `Err(SearchCancelled)`, which unwinds through
//! `?` to the iterative-deepening loop. Nothing below that loop catches it,
//! and nothing is stored for a node whose search was cut short. Cancellation
//! is cooperative: a subtree with no polling node below it runs to completion
//! even if the budget expires inside it.

use super::config::{Difficulty, SearchConfig};
use super::ordering::{apply_interrupt_policy, best_ties, build_pairs, commit, sort_descending};
use super::search::{
    log_depth, Deadline, SearchCancelled, SearchResult, SearchStats, SearchSummary, LOSE, WIN,
};
use super::transposition_table::{Bound, TranspositionEntry, TranspositionTable};
use crate::agent::decider::Decider;
use crate::game::{signed_heuristic, successor, GameState};

/// One decision's worth of search state.
pub struct MtdSearch {
    table: TranspositionTable,
    deadline: Deadline,
    poll_depth: u32,
    reorder_depth: u32,
    reorder_reduction: u32,
    stats: SearchStats,
}

impl MtdSearch {
    /// Fresh table and a deadline starting now.
    pub fn new(config: &SearchConfig) -> Self {
        Self::with_table(
            config,
            TranspositionTable::with_capacity(config.table_capacity),
            Deadline::new(config.time_budget),
        )
    }

    /// Search with an existing (possibly pre-populated) table.
    pub fn with_table(config: &SearchConfig, table: TranspositionTable, deadline: Deadline) -> Self {
        Self {
            table,
            deadline,
            poll_depth: config.poll_depth,
            reorder_depth: config.reorder_depth,
            reorder_reduction: config.reorder_reduction,
            stats: SearchStats::default(),
        }
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    pub fn into_table(self) -> TranspositionTable {
        self.table
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    /// Exact value of `state` to `depth` plies for colour `color`, found by
    /// null-window searches around `first_guess`.
    pub fn mtdf<S: GameState>(
        &mut self,
        state: &S,
        first_guess: i32,
        depth: u32,
        color: i32,
    ) -> Result<i32, SearchCancelled> {
        let mut g = first_guess;
        let mut lower = LOSE;
        let mut upper = WIN;

        while lower < upper {
            let beta = if g == lower { g + 1 } else { g };
            g = self.alpha_beta_with_memory(state, beta - 1, beta, depth, color)?;
            if g < beta {
                upper = g;
            } else {
                lower = g;
            }
        }
        Ok(g)
    }

    /// Fail-soft negamax with transposition table lookups.
    ///
    /// Only `Exact` entries at least `depth` deep short-circuit the search;
    /// bound entries never narrow the window.
    pub fn alpha_beta_with_memory<S: GameState>(
        &mut self,
        state: &S,
        alpha: i32,
        beta: i32,
        depth: u32,
        color: i32,
    ) -> Result<i32, SearchCancelled> {
        if depth > self.poll_depth {
            self.deadline.check()?;
        }
        self.stats.nodes += 1;

        let key = state.zobrist();
        if let Some(entry) = self.table.probe(key, depth) {
            if entry.bound == Bound::Exact {
                self.stats.cache_hits += 1;
                return Ok(entry.value);
            }
        }

        if depth == 0 || state.status().is_terminal() {
            self.stats.leaves += 1;
            let value = signed_heuristic(state, color);
            self.table.store(TranspositionEntry {
                key,
                depth,
                value,
                bound: Bound::Exact,
            });
            return Ok(value);
        }

        let mut children = build_pairs(state.actions());

        // Shallow pass, used only to order the children for the full pass.
        if depth > self.reorder_depth {
            let shallow = depth.saturating_sub(self.reorder_reduction).max(1);
            let mut a = alpha;
            let mut best = LOSE;
            for pair in children.iter_mut() {
                let child = successor(state, &pair.action);
                pair.value = -self.alpha_beta_with_memory(&child, -beta, -a, shallow - 1, -color)?;
                best = best.max(pair.value);
                a = a.max(best);
                if best >= beta {
                    break;
                }
            }
            sort_descending(&mut children);
        }

        let mut a = alpha;
        let mut best = LOSE;
        for pair in &children {
            let child = successor(state, &pair.action);
            let value = -self.alpha_beta_with_memory(&child, -beta, -a, depth - 1, -color)?;
            if value > best {
                best = value;
            }
            if best > a {
                a = best;
            }
            if best >= beta {
                break;
            }
        }

        self.table.store(TranspositionEntry {
            key,
            depth,
            value: best,
            bound: Bound::classify(best, alpha, beta),
        });
        Ok(best)
    }

    fn finish_stats(&mut self, depth_reached: u32) -> SearchStats {
        self.stats.depth_reached = depth_reached;
        self.stats.elapsed = self.deadline.elapsed();
        self.stats
    }
}

/// Iterative-deepening MTD(f) decider.
pub struct MtdDecider {
    config: SearchConfig,
    name: String,
    history: Vec<SearchStats>,
}

impl MtdDecider {
    pub fn new(config: SearchConfig) -> Self {
        let name = if config.use_mtdf {
            "MTD(f)".to_string()
        } else {
            "Alpha-beta (memory)".to_string()
        };
        Self {
            config,
            name,
            history: Vec::new(),
        }
    }

    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        let mut decider = Self::new(SearchConfig::from_difficulty(difficulty));
        decider.name = format!("MTD(f) ({})", difficulty.name());
        decider
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Per-decision statistics, oldest first.
    pub fn history(&self) -> &[SearchStats] {
        &self.history
    }

    /// Averages over every decision made so far.
    pub fn summary(&self) -> SearchSummary {
        SearchSummary::from_history(&self.history)
    }

    /// Search `state` and rank its actions.
    ///
    /// Depths run from 1 up to `max_depth`; after the depth in progress when
    /// the budget runs out, the search stops. The returned best action is the
    /// first of the actions tied for the best value after the final sort.
    pub fn search<S: GameState>(&mut self, state: &S) -> SearchResult<S::Action> {
        let mut engine = MtdSearch::new(&self.config);
        let color = state.to_move().sign();
        let mut pairs = build_pairs(state.actions());

        if pairs.is_empty() {
            return SearchResult::empty();
        }
        if pairs.len() == 1 {
            let action = pairs[0].action.clone();
            let value = -signed_heuristic(&successor(state, &action), -color);
            let stats = engine.finish_stats(0);
            log::debug!("{}: only {} available", self.name, action);
            self.history.push(stats);
            return SearchResult {
                best_action: Some(action.clone()),
                value,
                root_values: vec![(action, value)],
                stats,
            };
        }

        let mut completed = 0;
        for depth in 1..=self.config.max_depth.max(1) {
            let mut explored = 0;
            let mut cancelled = false;

            for pair in pairs.iter_mut() {
                let child = successor(state, &pair.action);
                let outcome = if self.config.use_mtdf {
                    engine.mtdf(&child, -pair.value, depth - 1, -color)
                } else {
                    engine.alpha_beta_with_memory(&child, LOSE, WIN, depth - 1, -color)
                };
                match outcome {
                    Ok(value) => {
                        pair.value = -value;
                        explored += 1;
                    }
                    Err(SearchCancelled) => {
                        cancelled = true;
                        break;
                    }
                }
            }

            if cancelled {
                log::warn!(
                    "{}: depth {} cancelled after {} of {} actions",
                    self.name,
                    depth,
                    explored,
                    pairs.len()
                );
                apply_interrupt_policy(
                    &mut pairs,
                    explored,
                    self.config.interrupt_policy,
                    S::DECISIVE_SCORE,
                );
            } else {
                completed = depth;
            }

            sort_descending(&mut pairs);
            commit(&mut pairs);

            let stats = engine.finish_stats(completed);
            log_depth(depth, pairs.first().map(|p| (&p.action, p.value)), &stats);

            if cancelled || engine.deadline().is_expired() {
                break;
            }
        }

        let stats = engine.finish_stats(completed);
        let best = &best_ties(&pairs)[0];
        let best_action = best.action.clone();
        let value = best.value;
        log::info!(
            "{}: {} value {} ({}, table {} entries ~{} KiB, hit rate {:.2})",
            self.name,
            best_action,
            value,
            stats,
            engine.table().len(),
            engine.table().memory_usage() / 1024,
            engine.table().hit_rate()
        );
        self.history.push(stats);

        SearchResult {
            best_action: Some(best_action),
            value,
            root_values: pairs.into_iter().map(|p| (p.action, p.value)).collect(),
            stats,
        }
    }
}

impl<S: GameState> Decider<S> for MtdDecider {
    fn decide(&mut self, state: &S) -> Option<S::Action> {
        self.search(state).best_action
    }

    fn name(&self) -> &str {
        &self.name
    }
}
