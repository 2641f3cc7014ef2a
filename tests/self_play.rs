//! Whole games through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reversi_engine::{
    BoardState, Decider, Game, GameState, MtdDecider, Player, RandomDecider, SearchConfig, Status,
};

/// Wraps a decider and counts end-of-game notifications.
struct Counting<D> {
    inner: D,
    ended: Arc<AtomicUsize>,
}

impl<D: Decider<BoardState>> Decider<BoardState> for Counting<D> {
    fn decide(&mut self, state: &BoardState) -> Option<reversi_engine::Move> {
        self.inner.decide(state)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn game_ended(&mut self, status: Status) {
        assert!(status.is_terminal());
        self.ended.fetch_add(1, Ordering::SeqCst);
    }
}

fn check_position(state: &BoardState) {
    let actions = state.actions();
    match state.status() {
        Status::Ongoing => {
            assert!(!actions.is_empty(), "ongoing position without actions:\n{state}");
            if actions.iter().any(|action| action.is_pass()) {
                assert_eq!(actions.len(), 1, "pass offered beside a capture:\n{state}");
                assert_eq!(state.move_bitmap(state.to_move()), 0);
            }
            for action in &actions {
                assert!(state.is_legal(action), "{action} generated but illegal");
                assert_eq!(action.player, state.to_move());
            }
        }
        _ => {
            assert_eq!(state.move_bitmap(Player::One), 0);
            assert_eq!(state.move_bitmap(Player::Two), 0);
        }
    }

    let reparsed = BoardState::from_diagram(&state.to_string(), state.to_move()).unwrap();
    assert_eq!(&reparsed, state);
    assert_eq!(reparsed.zobrist(), state.zobrist());
}

#[test]
fn test_random_playouts_keep_positions_consistent() {
    for width in [4, 6, 8] {
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = BoardState::new(width).unwrap();
            let mut plies = 0;
            loop {
                check_position(&state);
                if state.status().is_terminal() {
                    break;
                }
                let actions = state.actions();
                let action = *actions.choose(&mut rng).unwrap();
                let next = state.apply(&action).unwrap();
                assert_ne!(next.to_move(), state.to_move());
                state = next;
                plies += 1;
                assert!(plies <= 2 * width * width, "game did not end");
            }

            let (one, two) = state.scores();
            let expected = match one.cmp(&two) {
                std::cmp::Ordering::Greater => Status::PlayerOneWon,
                std::cmp::Ordering::Less => Status::PlayerTwoWon,
                std::cmp::Ordering::Equal => Status::Draw,
            };
            assert_eq!(state.status(), expected);
        }
    }
}

#[test]
fn test_driver_plays_search_against_random() {
    let ended = Arc::new(AtomicUsize::new(0));
    let mtd = Counting {
        inner: MtdDecider::new(SearchConfig::fixed_depth(2)),
        ended: Arc::clone(&ended),
    };
    let random = Counting {
        inner: RandomDecider::new(21),
        ended: Arc::clone(&ended),
    };

    let mut game = Game::new(BoardState::new(6).unwrap(), Box::new(mtd), Box::new(random));
    let status = game.run().unwrap();

    assert!(status.is_terminal());
    assert_eq!(ended.load(Ordering::SeqCst), 2);
    assert_eq!(game.history().len(), game.ply());

    // Replaying the history reproduces the final position.
    let mut replay = BoardState::new(6).unwrap();
    for action in game.history() {
        replay = replay.apply(action).unwrap();
    }
    assert_eq!(&replay, game.state());
}

#[test]
fn test_swapped_seats_still_finish() {
    let mut game = Game::new(
        BoardState::new(4).unwrap(),
        Box::new(RandomDecider::new(5)),
        Box::new(MtdDecider::new(SearchConfig::fixed_depth(3))),
    );
    game.set_starting_player(Player::Two);
    let status = game.run().unwrap();
    assert!(status.is_terminal());
    assert_eq!(game.turn() == Player::Two, game.ply() % 2 == 0);
}
