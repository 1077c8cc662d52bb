// Tally Notification Bus
// STORY-003: Typed observer dispatch
//
// Each component owns one bus for its own event type. Publishing with no
// subscribers is fine; delivery is fire-and-forget.

use std::fmt::Debug;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Callback receiving published events
pub type Observer<E> = Box<dyn FnMut(&E)>;

/// Synchronous fan-out of events to subscribed observers
pub struct NotificationBus<E> {
    /// Observers in subscription order
    observers: Vec<(SubscriptionId, Observer<E>)>,
    next_id: u64,
}

impl<E: Debug> NotificationBus<E> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register an observer; it sees every event published after this call
    pub fn subscribe(&mut self, observer: impl FnMut(&E) + 'static) -> SubscriptionId {
        self.subscribe_boxed(Box::new(observer))
    }

    pub fn subscribe_boxed(&mut self, observer: Observer<E>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Deliver `event` to every observer in subscription order
    pub fn publish(&mut self, event: E) {
        if self.observers.is_empty() {
            log::trace!("No receiver for {:?}", event);
            return;
        }
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    pub fn has_subscribers(&self) -> bool {
        !self.observers.is_empty()
    }
}

impl<E: Debug> Default for NotificationBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Debug for NotificationBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.observers.len())
            .finish()
    }
}
