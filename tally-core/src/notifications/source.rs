use tally_utils::notification::CounterEvent;

use super::bus::{Observer, SubscriptionId};

/// Anything exposing a score-like value and its change notifications.
///
/// Implemented by `Counter` and by displays that mirror one (the trickle
/// animator), so dependents such as a level tracker can follow either.
pub trait ScoreSource {
    /// Current value
    fn current(&self) -> i64;

    /// Receive every `CounterEvent` published after this call
    fn subscribe(&mut self, observer: Observer<CounterEvent>) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}
