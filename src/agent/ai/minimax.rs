//! Depth-limited alpha-beta minimax.
//!
//! [`MinimaxDecider`] scores every root action with a full-window negamax
//! search to a fixed depth and picks uniformly at random among the actions
//! tied for the best value. There is no transposition table and no clock:
//! the decision takes as long as the depth requires.
//!
//! Root actions are independent, so with `parallel` set they are scored on
//! the rayon pool. Every action gets the same full window either way, so the
//! parallel and sequential runs compute identical values.

use super::config::{Difficulty, SearchConfig};
use super::search::{SearchResult, SearchStats, SearchSummary, LOSE, WIN};
use crate::agent::decider::Decider;
use crate::game::{signed_heuristic, successor, GameState};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

/// Fail-soft negamax with alpha-beta pruning.
///
/// Returns the value of `state` for the side whose colour is `color`
/// (`1` for player one, `-1` for player two), searching `depth` plies.
pub fn negamax<S: GameState>(
    state: &S,
    depth: u32,
    mut alpha: i32,
    beta: i32,
    color: i32,
    stats: &mut SearchStats,
) -> i32 {
    stats.nodes += 1;
    if depth == 0 || state.status().is_terminal() {
        stats.leaves += 1;
        return signed_heuristic(state, color);
    }

    let mut best = LOSE;
    for action in state.actions() {
        let child = successor(state, &action);
        let value = -negamax(&child, depth - 1, -beta, -alpha, -color, stats);
        if value > best {
            best = value;
        }
        if best > alpha {
            alpha = best;
        }
        if best >= beta {
            break;
        }
    }
    best
}

pub struct MinimaxDecider {
    config: SearchConfig,
    rng: StdRng,
    name: String,
    history: Vec<SearchStats>,
}

impl MinimaxDecider {
    /// Create a decider searching to `config.max_depth`, breaking ties with
    /// an RNG seeded from `seed`.
    pub fn new(config: SearchConfig, seed: u64) -> Self {
        let name = format!("Minimax (depth {})", config.max_depth);
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            name,
            history: Vec::new(),
        }
    }

    pub fn with_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        let mut decider = Self::new(SearchConfig::from_difficulty(difficulty), seed);
        decider.name = format!("Minimax ({})", difficulty.name());
        decider
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn history(&self) -> &[SearchStats] {
        &self.history
    }

    pub fn summary(&self) -> SearchSummary {
        SearchSummary::from_history(&self.history)
    }

    /// Score every root action and pick one of the best.
    pub fn search<S: GameState>(&mut self, state: &S) -> SearchResult<S::Action> {
        let start = Instant::now();
        let depth = self.config.max_depth.max(1);
        let color = state.to_move().sign();
        let actions = state.actions();
        if actions.is_empty() {
            return SearchResult::empty();
        }

        let score = |action: &S::Action| {
            let mut stats = SearchStats::default();
            let child = successor(state, action);
            let value = -negamax(&child, depth - 1, -WIN, -LOSE, -color, &mut stats);
            (action.clone(), value, stats)
        };
        let scored: Vec<(S::Action, i32, SearchStats)> = if self.config.parallel {
            actions.as_slice().par_iter().map(score).collect()
        } else {
            actions.iter().map(score).collect()
        };

        let mut stats = SearchStats {
            depth_reached: depth,
            ..SearchStats::default()
        };
        for (_, _, s) in &scored {
            stats.nodes += s.nodes;
            stats.leaves += s.leaves;
        }
        stats.elapsed = start.elapsed();

        let mut root_values: Vec<(S::Action, i32)> =
            scored.into_iter().map(|(action, value, _)| (action, value)).collect();
        root_values.sort_by(|a, b| b.1.cmp(&a.1));

        let value = root_values[0].1;
        let ties: Vec<&S::Action> = root_values
            .iter()
            .take_while(|(_, v)| *v == value)
            .map(|(action, _)| action)
            .collect();
        let best_action = ties.choose(&mut self.rng).map(|action| (*action).clone());

        if let Some(action) = &best_action {
            log::info!(
                "{}: {} value {} among {} tied ({})",
                self.name,
                action,
                value,
                ties.len(),
                stats
            );
        }
        self.history.push(stats);

        SearchResult {
            best_action,
            value,
            root_values,
            stats,
        }
    }
}

impl<S: GameState> Decider<S> for MinimaxDecider {
    fn decide(&mut self, state: &S) -> Option<S::Action> {
        self.search(state).best_action
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::game::Player;

    /// Plain minimax without pruning.
    fn brute_force<S: GameState>(state: &S, depth: u32, color: i32) -> i32 {
        if depth == 0 || state.status().is_terminal() {
            return signed_heuristic(state, color);
        }
        state
            .actions()
            .iter()
            .map(|a| -brute_force(&successor(state, a), depth - 1, -color))
            .max()
            .unwrap_or(LOSE)
    }

    #[test]
    fn test_negamax_matches_brute_force() {
        let state = BoardState::new(4).unwrap();
        for depth in 0..=5 {
            let mut stats = SearchStats::default();
            let value = negamax(&state, depth, LOSE, WIN, 1, &mut stats);
            assert_eq!(value, brute_force(&state, depth, 1), "depth {depth}");
        }
    }

    #[test]
    fn test_depth_zero_is_signed_heuristic() {
        let state = BoardState::new(8).unwrap();
        let mut stats = SearchStats::default();
        assert_eq!(negamax(&state, 0, LOSE, WIN, -1, &mut stats), -state.heuristic());
        assert_eq!(stats.leaves, 1);
    }

    #[test]
    fn test_decider_picks_a_best_action() {
        let state = BoardState::new(6).unwrap();
        let mut decider = MinimaxDecider::new(SearchConfig::fixed_depth(3), 5);
        let result = decider.search(&state);
        let best = result.best_action.unwrap();
        assert!(state.is_legal(&best));

        let expected = brute_force(&successor(&state, &best), 2, -1);
        assert_eq!(-expected, result.value);
        assert!(result.root_values.iter().all(|(_, v)| *v <= result.value));
        assert_eq!(result.stats.depth_reached, 3);
        assert_eq!(decider.history().len(), 1);
    }

    #[test]
    fn test_parallel_root_matches_sequential() {
        let state = BoardState::new(6).unwrap();
        let mut sequential = MinimaxDecider::new(SearchConfig::fixed_depth(3), 1);
        let mut parallel =
            MinimaxDecider::new(SearchConfig::fixed_depth(3).with_parallel(true), 1);
        let a = sequential.search(&state);
        let b = parallel.search(&state);
        assert_eq!(a.value, b.value);
        let mut av: Vec<i32> = a.root_values.iter().map(|(_, v)| *v).collect();
        let mut bv: Vec<i32> = b.root_values.iter().map(|(_, v)| *v).collect();
        av.sort_unstable();
        bv.sort_unstable();
        assert_eq!(av, bv);
    }

    #[test]
    fn test_random_tie_break_covers_all_ties() {
        // Symmetric start: all four openings score the same at depth 1.
        let state = BoardState::new(8).unwrap();
        let mut decider = MinimaxDecider::new(SearchConfig::fixed_depth(1), 99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            seen.insert(decider.decide(&state).unwrap());
        }
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|m| m.player == Player::One));
    }
}
