//! Turn loop between two deciders.
//!
//! ```text
//! [decide] -> [apply] -> [record] -> [switch turn] -> [decide] ... until status != Ongoing
//! ```

use super::{GameState, Player, Status};
use crate::agent::decider::Decider;
use crate::error::GameError;

/// Runs a game between two deciders over a shared state.
///
/// Deciders alternate strictly, one per ply. Passing is an explicit action,
/// so the decider whose turn it is always matches the state's side to move
/// unless [`Game::set_starting_player`] says otherwise.
pub struct Game<S: GameState> {
    state: S,
    /// Indexed by [`Player::index`]
    deciders: [Box<dyn Decider<S>>; 2],
    /// Which decider acts next
    turn: Player,
    history: Vec<S::Action>,
}

impl<S: GameState> Game<S> {
    pub fn new(
        state: S,
        player_one: Box<dyn Decider<S>>,
        player_two: Box<dyn Decider<S>>,
    ) -> Self {
        Self {
            state,
            deciders: [player_one, player_two],
            turn: Player::One,
            history: Vec::new(),
        }
    }

    /// Choose which decider makes the first move. Defaults to `player_one`.
    pub fn set_starting_player(&mut self, player: Player) {
        self.turn = player;
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    /// Decider that acts next.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Actions played so far, oldest first.
    pub fn history(&self) -> &[S::Action] {
        &self.history
    }

    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn decider(&self, player: Player) -> &dyn Decider<S> {
        self.deciders[player.index()].as_ref()
    }

    /// Play one ply. Returns the status afterwards; a finished game is left
    /// untouched.
    ///
    /// An action the state rejects, or no action at all, is an error: the
    /// game cannot continue from it.
    pub fn step(&mut self) -> Result<Status, GameError> {
        let status = self.state.status();
        if status.is_terminal() {
            return Ok(status);
        }

        let decider = &mut self.deciders[self.turn.index()];
        let action = decider
            .decide(&self.state)
            .ok_or_else(|| GameError::NoAction(decider.name().to_string()))?;

        let next = self.state.apply(&action).map_err(|err| {
            log::error!("{} chose an illegal action: {}", decider.name(), err);
            err
        })?;
        log::trace!(
            "ply {}: {} ({}) plays {}",
            self.history.len() + 1,
            decider.name(),
            self.state.to_move().name(),
            action
        );

        self.state = next;
        self.history.push(action);
        self.turn = self.turn.opposite();
        Ok(self.state.status())
    }

    /// Play until the game is decided.
    pub fn run(&mut self) -> Result<Status, GameError> {
        loop {
            let status = self.step()?;
            if status.is_terminal() {
                for decider in &mut self.deciders {
                    decider.game_ended(status);
                }
                log::info!("game over after {} plies: {:?}", self.ply(), status);
                return Ok(status);
            }
        }
    }
}
