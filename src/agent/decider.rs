//! Decision-maker trait for game agents.
//!
//! A [`Decider`] is anything that can pick an action for the side to move:
//! a search engine, a random mover, a scripted replay. The [`Game`] driver
//! only talks to agents through this trait.
//!
//! The trait does not define a constructor. Search deciders need a
//! [`SearchConfig`], random deciders a seed, and each implementation provides
//! its own constructor for that.
//!
//! `decide()` is synchronous. A search decider blocks for up to its time
//! budget (plus whatever the deepest branch without a clock check takes).
//!
//! [`Game`]: crate::game::Game
//! [`SearchConfig`]: crate::agent::ai::SearchConfig

use crate::game::{GameState, Status};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub trait Decider<S: GameState> {
    /// Pick an action for `state.to_move()`.
    ///
    /// Called only while `state.status()` is `Ongoing`. Returns `None` if the
    /// decider cannot or will not produce an action; the driver treats that
    /// as fatal.
    fn decide(&mut self, state: &S) -> Option<S::Action>;

    /// Display name used in logs.
    fn name(&self) -> &str {
        "Decider"
    }

    /// Notify this decider that the game is over.
    ///
    /// Default: does nothing.
    fn game_ended(&mut self, _status: Status) {}
}

impl<S: GameState, D: Decider<S> + ?Sized> Decider<S> for Box<D> {
    fn decide(&mut self, state: &S) -> Option<S::Action> {
        (**self).decide(state)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn game_ended(&mut self, status: Status) {
        (**self).game_ended(status)
    }
}

/// Picks uniformly among the legal actions.
pub struct RandomDecider {
    rng: StdRng,
    name: String,
}

impl RandomDecider {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            name: "Random".to_string(),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            name: "Random".to_string(),
        }
    }
}

impl<S: GameState> Decider<S> for RandomDecider {
    fn decide(&mut self, state: &S) -> Option<S::Action> {
        state.actions().choose(&mut self.rng).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
