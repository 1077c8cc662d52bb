// Tally STORY-007: Score display surface
// Score on the left, level on the right, both thousands-grouped.

use tally_core::levels::LevelTracker;
use tally_core::notifications::ScoreSource;
use tally_utils::format::group_thousands;

/// Rendered labels; `None` where the data source is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLabels {
    pub score: Option<String>,
    pub level: Option<String>,
}

impl ScoreLabels {
    pub fn new(score: Option<i64>, level: Option<u32>) -> Self {
        Self {
            score: score.map(|score| format!("Score: {}", group_thousands(score))),
            level: level.map(|level| format!("Level: {}", group_thousands(level as i64))),
        }
    }
}

/// Single-line text display of a score and a level
#[derive(Debug, Clone, Copy)]
pub struct ScoreDisplay {
    /// Line width in characters
    width: usize,
}

impl ScoreDisplay {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn labels(
        &self,
        score: Option<&dyn ScoreSource>,
        level: Option<&LevelTracker>,
    ) -> ScoreLabels {
        ScoreLabels::new(
            score.map(|source| source.current()),
            level.map(|tracker| tracker.level()),
        )
    }

    /// Lay the labels out on one line, padded to the display width
    pub fn render_line(
        &self,
        score: Option<&dyn ScoreSource>,
        level: Option<&LevelTracker>,
    ) -> String {
        self.layout(&self.labels(score, level))
    }

    pub fn layout(&self, labels: &ScoreLabels) -> String {
        let left = labels.score.as_deref().unwrap_or("");
        let right = labels.level.as_deref().unwrap_or("");
        let used = left.chars().count() + right.chars().count();
        let minimum_gap = if left.is_empty() || right.is_empty() {
            0
        } else {
            1
        };
        let gap = self.width.saturating_sub(used).max(minimum_gap);
        format!("{}{}{}", left, " ".repeat(gap), right)
    }
}

impl Default for ScoreDisplay {
    fn default() -> Self {
        Self::new(40)
    }
}
