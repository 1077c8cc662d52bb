// Tally Sound Cues - Mock Player
// STORY-005: Sound cues
//
// Records cues so tests can verify what would have been played.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::player::{SoundCue, SoundCuePlayer};

/// Recording `SoundCuePlayer` for tests.
///
/// Clones share their recordings, so a test can hand one clone to a
/// component and inspect the other.
///
/// # Example
///
/// ```ignore
/// let mock = MockCuePlayer::new();
/// tracker.set_cue_player(Box::new(mock.clone()));
/// tracker.check_for_level_up(900);
/// assert_eq!(mock.played(), vec![SoundCue::LevelUp { index: 3 }]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCuePlayer {
    /// Cues in the order they were played
    played: Arc<Mutex<Vec<SoundCue>>>,

    /// Count of `play()` invocations
    play_count: Arc<AtomicUsize>,
}

impl MockCuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get every cue played so far.
    pub fn played(&self) -> Vec<SoundCue> {
        self.played.lock().unwrap().clone()
    }

    /// Get the number of times `play()` was invoked.
    pub fn play_count(&self) -> usize {
        self.play_count.load(Ordering::Relaxed)
    }

    /// Get the most recent cue.
    pub fn last_cue(&self) -> Option<SoundCue> {
        self.played.lock().unwrap().last().copied()
    }

    /// Reset the counter and recorded cues.
    pub fn reset(&self) {
        self.play_count.store(0, Ordering::Relaxed);
        self.played.lock().unwrap().clear();
    }
}

impl SoundCuePlayer for MockCuePlayer {
    fn play(&mut self, cue: SoundCue) {
        self.play_count.fetch_add(1, Ordering::Relaxed);
        self.played.lock().unwrap().push(cue);
    }
}
