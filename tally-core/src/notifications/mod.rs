// Tally notifications
// STORY-003: Typed observer dispatch

mod bus;
mod source;

pub use bus::{NotificationBus, Observer, SubscriptionId};
pub use source::ScoreSource;
