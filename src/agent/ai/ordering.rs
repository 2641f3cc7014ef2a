// Action ordering for iterative deepening and the shallow re-order pass

use super::config::InterruptPolicy;
use smallvec::SmallVec;

/// An action with its value from the current and the previous pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionValuePair<A> {
    pub action: A,
    pub value: i32,
    pub previous: i32,
}

pub type PairList<A> = SmallVec<[ActionValuePair<A>; 32]>;

/// Pair every action with a zero value, in generation order.
pub fn build_pairs<A>(actions: impl IntoIterator<Item = A>) -> PairList<A> {
    actions
        .into_iter()
        .map(|action| ActionValuePair {
            action,
            value: 0,
            previous: 0,
        })
        .collect()
}

/// Best value first. Stable, so equal values keep their relative order.
pub fn sort_descending<A>(pairs: &mut [ActionValuePair<A>]) {
    pairs.sort_by(|a, b| b.value.cmp(&a.value));
}

/// Make the current values the baseline for the next pass.
pub fn commit<A>(pairs: &mut [ActionValuePair<A>]) {
    for pair in pairs {
        pair.previous = pair.value;
    }
}

/// Decide what survives from a pass that was cancelled after `explored`
/// actions. Entries past `explored` still hold their previous values.
///
/// `decisive` is the score magnitude at or above which a value proves a
/// forced outcome.
pub fn apply_interrupt_policy<A>(
    pairs: &mut [ActionValuePair<A>],
    explored: usize,
    policy: InterruptPolicy,
    decisive: i32,
) {
    let explored = explored.min(pairs.len());
    match policy {
        InterruptPolicy::DiscardAll => revert(pairs),
        InterruptPolicy::KeepForcedOutcomes => {
            for pair in &mut pairs[..explored] {
                if pair.value.abs() < decisive {
                    pair.value = pair.previous;
                }
            }
        }
        InterruptPolicy::DemoteFallenBest => {
            let fallen = explored > 1
                && pairs[..explored]
                    .iter()
                    .any(|pair| pair.value > pairs[0].value);
            if fallen {
                revert(&mut pairs[1..explored]);
            } else {
                revert(pairs);
            }
        }
    }
}

fn revert<A>(pairs: &mut [ActionValuePair<A>]) {
    for pair in pairs {
        pair.value = pair.previous;
    }
}

/// The leading run of pairs sharing the best value. Expects a sorted slice.
pub fn best_ties<A>(pairs: &[ActionValuePair<A>]) -> &[ActionValuePair<A>] {
    let Some(first) = pairs.first() else {
        return pairs;
    };
    let ties = pairs.iter().take_while(|p| p.value == first.value).count();
    &pairs[..ties]
}
