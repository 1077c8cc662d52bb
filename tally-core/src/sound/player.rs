// Tally Sound Cues - Player Trait
// STORY-005: Sound cues
//
// Components ask for a cue; the player decides whether anything is heard.
// A missing clip or an out-of-range index is never an error.

use log::{info, trace};
use tally_utils::config::SoundConfig;

/// Something worth a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Level advanced past the threshold at `index`
    LevelUp { index: usize },
    /// One trickle step of the score display
    TrickleStep,
}

/// Plays sound cues. Implementations must ignore cues they cannot play.
pub trait SoundCuePlayer {
    fn play(&mut self, cue: SoundCue);
}

/// Player that never makes a sound
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl SoundCuePlayer for SilentPlayer {
    fn play(&mut self, cue: SoundCue) {
        trace!("Silent player ignoring {:?}", cue);
    }
}

/// Destination for resolved clip names
pub trait ClipOutput {
    fn play_clip(&mut self, clip: &str);
}

/// Writes played clips to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOutput;

impl ClipOutput for LogOutput {
    fn play_clip(&mut self, clip: &str) {
        info!("♪ {}", clip);
    }
}

/// Resolves cues to the clips named in `SoundConfig`
pub struct ClipBank<O: ClipOutput = LogOutput> {
    level_up: Vec<Option<String>>,
    trickle: Option<String>,
    output: O,
}

impl ClipBank<LogOutput> {
    pub fn new(config: &SoundConfig) -> Self {
        Self::with_output(config, LogOutput)
    }
}

impl<O: ClipOutput> ClipBank<O> {
    pub fn with_output(config: &SoundConfig, output: O) -> Self {
        Self {
            level_up: config.level_up_clips.clone(),
            trickle: config.trickle_clip.clone(),
            output,
        }
    }

    /// Clip configured for `cue`, if any
    pub fn resolve(&self, cue: SoundCue) -> Option<&str> {
        match cue {
            SoundCue::LevelUp { index } => self.level_up.get(index)?.as_deref(),
            SoundCue::TrickleStep => self.trickle.as_deref(),
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: ClipOutput> SoundCuePlayer for ClipBank<O> {
    fn play(&mut self, cue: SoundCue) {
        match self.resolve(cue).map(str::to_owned) {
            Some(clip) => self.output.play_clip(&clip),
            None => trace!("No clip configured for {:?}", cue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorded(Vec<String>);

    impl ClipOutput for Recorded {
        fn play_clip(&mut self, clip: &str) {
            self.0.push(clip.to_string());
        }
    }

    fn config() -> SoundConfig {
        SoundConfig {
            level_up_clips: vec![Some("fanfare".to_string()), None, Some("gong".to_string())],
            trickle_clip: Some("tick".to_string()),
        }
    }

    #[test]
    fn test_resolve() {
        let bank = ClipBank::new(&config());
        assert_eq!(bank.resolve(SoundCue::LevelUp { index: 0 }), Some("fanfare"));
        assert_eq!(bank.resolve(SoundCue::LevelUp { index: 1 }), None);
        assert_eq!(bank.resolve(SoundCue::LevelUp { index: 2 }), Some("gong"));
        assert_eq!(bank.resolve(SoundCue::TrickleStep), Some("tick"));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut bank = ClipBank::with_output(&config(), Recorded::default());
        bank.play(SoundCue::LevelUp { index: 99 });
        assert!(bank.output().0.is_empty());
    }

    #[test]
    fn test_play_forwards_clip() {
        let mut bank = ClipBank::with_output(&config(), Recorded::default());
        bank.play(SoundCue::LevelUp { index: 2 });
        bank.play(SoundCue::LevelUp { index: 1 });
        bank.play(SoundCue::TrickleStep);
        assert_eq!(bank.output().0, vec!["gong", "tick"]);
    }

    #[test]
    fn test_empty_config_is_silent() {
        let mut bank = ClipBank::with_output(&SoundConfig::default(), Recorded::default());
        bank.play(SoundCue::TrickleStep);
        bank.play(SoundCue::LevelUp { index: 0 });
        assert!(bank.output().0.is_empty());
    }
}
