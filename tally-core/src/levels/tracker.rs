// Tally Level Tracker
// STORY-004: Level progression
//
// Advances one level whenever the followed value meets the next threshold.

use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use tally_utils::config::LevelConfig;
use tally_utils::errors::{TallyError, TallyResult};
use tally_utils::notification::{CounterEvent, LevelEvent};

use super::thresholds::LevelThresholds;
use crate::notifications::{NotificationBus, ScoreSource, SubscriptionId};
use crate::sound::{SilentPlayer, SoundCue, SoundCuePlayer};

pub struct LevelTracker {
    level: u32,
    minimum_level: u32,
    maximum_level: u32,
    starting_level: u32,
    thresholds: LevelThresholds,
    play_level_up_sound: bool,
    cue_player: Box<dyn SoundCuePlayer>,
    bus: NotificationBus<LevelEvent>,
}

impl LevelTracker {
    /// Create a tracker at the configured starting level.
    ///
    /// Fails when the starting level lies outside [minimum, maximum] or the
    /// linear step is not positive.
    pub fn new(config: &LevelConfig) -> TallyResult<Self> {
        config.validate()?;
        Ok(Self {
            level: config.starting_level,
            minimum_level: config.minimum_level,
            maximum_level: config.maximum_level,
            starting_level: config.starting_level,
            thresholds: LevelThresholds::from_config(config)?,
            play_level_up_sound: config.play_level_up_sound,
            cue_player: Box::new(SilentPlayer),
            bus: NotificationBus::new(),
        })
    }

    /// Follow `source`: every `Adjusted` event runs `check_for_level_up`.
    ///
    /// The subscription holds a weak reference, so dropping the tracker turns
    /// later events into no-ops.
    pub fn attach(tracker: &Rc<RefCell<Self>>, source: &mut dyn ScoreSource) -> SubscriptionId {
        let weak = Rc::downgrade(tracker);
        source.subscribe(Box::new(move |event: &CounterEvent| {
            let CounterEvent::Adjusted(adjusted) = event else {
                return;
            };
            if let Some(tracker) = weak.upgrade() {
                tracker.borrow_mut().check_for_level_up(adjusted.value);
            }
        }))
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn minimum_level(&self) -> u32 {
        self.minimum_level
    }

    pub fn maximum_level(&self) -> u32 {
        self.maximum_level
    }

    pub fn starting_level(&self) -> u32 {
        self.starting_level
    }

    pub fn thresholds(&self) -> &LevelThresholds {
        &self.thresholds
    }

    /// Value needed to leave the current level, `None` at the maximum level
    pub fn next_threshold(&self) -> Option<i64> {
        if self.level >= self.maximum_level {
            return None;
        }
        Some(self.thresholds.required_for(self.level))
    }

    pub fn set_cue_player(&mut self, player: Box<dyn SoundCuePlayer>) {
        self.cue_player = player;
    }

    pub fn set_play_level_up_sound(&mut self, play: bool) {
        self.play_level_up_sound = play;
    }

    /// Advance one level if `accumulated` meets the current level's threshold.
    ///
    /// No-op at the maximum level. Returns whether the level changed.
    pub fn check_for_level_up(&mut self, accumulated: i64) -> bool {
        let Some(required) = self.next_threshold() else {
            return false;
        };
        if accumulated < required {
            return false;
        }

        let index = self.level as usize;
        self.level = self.level.saturating_add(1).min(self.maximum_level);
        debug!(
            "Levelled up to {} ({} >= {})",
            self.level, accumulated, required
        );
        if self.play_level_up_sound {
            self.cue_player.play(SoundCue::LevelUp { index });
        }
        self.bus.publish(LevelEvent::LevelledUp { level: self.level });
        true
    }

    /// Set the level directly, clamped to [minimum, maximum].
    /// Does not touch the followed value.
    pub fn set_level(&mut self, level: u32) {
        self.level = level.clamp(self.minimum_level, self.maximum_level);
        self.bus.publish(LevelEvent::LevelChanged { level: self.level });
    }

    /// Move the level by `levels` (negative to go down), clamped like `set_level`
    pub fn adjust_level(&mut self, levels: i64) {
        let target = (self.level as i64)
            .saturating_add(levels)
            .clamp(self.minimum_level as i64, self.maximum_level as i64);
        self.set_level(target as u32);
    }

    pub fn reset_level(&mut self) {
        self.level = self.starting_level;
        self.bus.publish(LevelEvent::Reset { level: self.level });
    }

    pub fn set_starting_level(&mut self, level: u32) -> TallyResult<()> {
        if level < self.minimum_level {
            return Err(TallyError::invalid(
                "starting level cannot be less than minimum level",
            ));
        }
        if level > self.maximum_level {
            return Err(TallyError::invalid(
                "starting level cannot be greater than maximum level",
            ));
        }
        self.starting_level = level;
        Ok(())
    }

    pub fn set_linear_step(&mut self, linear_step: i64) -> TallyResult<()> {
        self.thresholds.set_linear_step(linear_step)
    }

    /// Change the lowest permitted level.
    ///
    /// Rejected when it would exceed the maximum or the starting level. The
    /// current level is pulled up into range if needed.
    pub fn set_minimum_level(&mut self, minimum: u32) -> TallyResult<()> {
        if minimum == self.minimum_level {
            return Ok(());
        }
        if minimum > self.maximum_level || minimum > self.starting_level {
            return Err(TallyError::invalid(format!(
                "minimum level {} must not exceed the maximum ({}) or starting ({}) level",
                minimum, self.maximum_level, self.starting_level
            )));
        }

        let previous = self.minimum_level;
        self.minimum_level = minimum;
        self.bus.publish(LevelEvent::MinimumLevelChanged {
            previous,
            current: minimum,
        });
        if self.level < minimum {
            self.set_level(minimum);
        }
        Ok(())
    }

    /// Change the highest permitted level.
    ///
    /// Rejected when it would fall below the minimum or the starting level.
    /// The current level is pulled down into range if needed.
    pub fn set_maximum_level(&mut self, maximum: u32) -> TallyResult<()> {
        if maximum == self.maximum_level {
            return Ok(());
        }
        if maximum < self.minimum_level || maximum < self.starting_level {
            return Err(TallyError::invalid(format!(
                "maximum level {} must not be below the minimum ({}) or starting ({}) level",
                maximum, self.minimum_level, self.starting_level
            )));
        }

        let previous = self.maximum_level;
        self.maximum_level = maximum;
        self.bus.publish(LevelEvent::MaximumLevelChanged {
            previous,
            current: maximum,
        });
        if self.level > maximum {
            warn!("Level {} above new maximum {}, clamping", self.level, maximum);
            self.set_level(maximum);
        }
        Ok(())
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&LevelEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }
}

impl std::fmt::Debug for LevelTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelTracker")
            .field("level", &self.level)
            .field("minimum_level", &self.minimum_level)
            .field("maximum_level", &self.maximum_level)
            .field("starting_level", &self.starting_level)
            .field("thresholds", &self.thresholds)
            .finish()
    }
}
