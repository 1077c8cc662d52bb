pub mod counter;
pub mod levels;
pub mod notifications;
pub mod sound;

pub use counter::Counter;
pub use levels::{LevelThresholds, LevelTracker};
pub use notifications::{NotificationBus, ScoreSource, SubscriptionId};
