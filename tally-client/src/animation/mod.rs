// Tally STORY-002: Trickling score animation
// Scheduler abstraction plus the animator that uses it

pub mod engine;
pub mod trickle;

pub use engine::{ManualScheduler, ScheduledTask, Scheduler};
pub use trickle::{next_step, Step, TrickleAnimator, TrickleState};
