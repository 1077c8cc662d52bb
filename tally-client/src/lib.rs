pub mod animation;
pub mod display;

pub use animation::{ManualScheduler, Scheduler, TrickleAnimator, TrickleState};
pub use display::{ScoreDisplay, ScoreLabels};

#[cfg(test)]
#[path = "./unit/scoring_tests.rs"]
mod scoring_tests;
