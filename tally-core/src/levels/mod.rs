// Tally Levels
// STORY-004: Level progression

mod thresholds;
mod tracker;

pub use thresholds::LevelThresholds;
pub use tracker::LevelTracker;
