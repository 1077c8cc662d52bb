// Tally Notification Types
// STORY-003: Typed change notifications
//
// Payloads published by counters, the trickle animator and the level tracker.
// Each event also knows the engine-style message name it replaces
// (`ScoreAdjustedTo`, `ExperienceReachedMaximum`, `LevelledUp`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which quantity a counter tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    Score,
    Experience,
}

impl CounterKind {
    /// Prefix used for message names ("Score", "Experience")
    pub fn label(&self) -> &'static str {
        match self {
            CounterKind::Score => "Score",
            CounterKind::Experience => "Experience",
        }
    }

    /// Parse a counter name as given to `--counter`; accepts "xp"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "score" => Some(CounterKind::Score),
            "experience" | "xp" => Some(CounterKind::Experience),
            _ => None,
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterKind::Score => write!(f, "score"),
            CounterKind::Experience => write!(f, "experience"),
        }
    }
}

/// The value moved to `value` by `delta`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjusted {
    pub value: i64,
    pub delta: i64,
}

/// The value crossed a configured bound.
///
/// `excess` is how far past the bound the value landed; it is zero when the
/// counter clamps to that bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryReached {
    pub previous: i64,
    pub current: i64,
    pub excess: i64,
}

/// Notification published by a counter (or anything mirroring one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterEvent {
    Adjusted(Adjusted),
    ReachedMinimum(BoundaryReached),
    ReachedMaximum(BoundaryReached),
    Reset { value: i64 },
}

impl CounterEvent {
    pub fn adjusted(value: i64, delta: i64) -> Self {
        CounterEvent::Adjusted(Adjusted { value, delta })
    }

    /// Current value carried by the event
    pub fn value(&self) -> i64 {
        match self {
            CounterEvent::Adjusted(adjusted) => adjusted.value,
            CounterEvent::ReachedMinimum(reached) | CounterEvent::ReachedMaximum(reached) => {
                reached.current
            },
            CounterEvent::Reset { value } => *value,
        }
    }

    /// Engine-style message names for this event.
    ///
    /// An adjustment maps to two messages (`...AdjustedTo` and `...AdjustedBy`).
    pub fn message_names(&self, kind: CounterKind) -> Vec<String> {
        let label = kind.label();
        match self {
            CounterEvent::Adjusted(_) => vec![
                format!("{}AdjustedTo", label),
                format!("{}AdjustedBy", label),
            ],
            CounterEvent::ReachedMinimum(_) => vec![format!("{}ReachedMinimum", label)],
            CounterEvent::ReachedMaximum(_) => vec![format!("{}ReachedMaximum", label)],
            CounterEvent::Reset { .. } => vec![format!("{}WasReset", label)],
        }
    }
}

impl fmt::Display for CounterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterEvent::Adjusted(Adjusted { value, delta }) => {
                write!(f, "adjusted to {} by {}", value, delta)
            },
            CounterEvent::ReachedMinimum(reached) => write!(
                f,
                "reached minimum ({} -> {}, underage {})",
                reached.previous, reached.current, reached.excess
            ),
            CounterEvent::ReachedMaximum(reached) => write!(
                f,
                "reached maximum ({} -> {}, overage {})",
                reached.previous, reached.current, reached.excess
            ),
            CounterEvent::Reset { value } => write!(f, "reset to {}", value),
        }
    }
}

/// Notification published by a level tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelEvent {
    /// Threshold met, level advanced by one
    LevelledUp { level: u32 },
    /// Level set or adjusted directly
    LevelChanged { level: u32 },
    MinimumLevelChanged { previous: u32, current: u32 },
    MaximumLevelChanged { previous: u32, current: u32 },
    Reset { level: u32 },
}

impl LevelEvent {
    pub fn message_name(&self) -> &'static str {
        match self {
            LevelEvent::LevelledUp { .. } => "LevelledUp",
            LevelEvent::LevelChanged { .. } => "LevelChanged",
            LevelEvent::MinimumLevelChanged { .. } => "MinimumLevelChanged",
            LevelEvent::MaximumLevelChanged { .. } => "MaximumLevelChanged",
            LevelEvent::Reset { .. } => "LevelWasReset",
        }
    }
}

impl fmt::Display for LevelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelEvent::LevelledUp { level } => write!(f, "levelled up to {}", level),
            LevelEvent::LevelChanged { level } => write!(f, "level changed to {}", level),
            LevelEvent::MinimumLevelChanged { previous, current } => {
                write!(f, "minimum level {} -> {}", previous, current)
            },
            LevelEvent::MaximumLevelChanged { previous, current } => {
                write!(f, "maximum level {} -> {}", previous, current)
            },
            LevelEvent::Reset { level } => write!(f, "level reset to {}", level),
        }
    }
}
