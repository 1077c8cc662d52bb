// Tally Sound Cues
// STORY-005: Sound cues
//
// Level-ups and trickle steps request cues by key. What is actually played
// is up to the `SoundCuePlayer` handed to the component:
//
// - `ClipBank` looks clips up in `SoundConfig` and forwards them to a
//   `ClipOutput` (`LogOutput` writes them to the log)
// - `SilentPlayer` ignores everything
// - `MockCuePlayer` records cues for tests

mod mock;
mod player;

pub use mock::MockCuePlayer;
pub use player::{ClipBank, ClipOutput, LogOutput, SilentPlayer, SoundCue, SoundCuePlayer};
