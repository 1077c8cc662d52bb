// Tally configuration
// STORY-006: Configuration file
//
// Every field has a default, so an empty JSON object is a valid file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::errors::{TallyError, TallyResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] TallyError),
}

/// Bounds and behaviour of a single counter (score or experience)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Whether negative adjustments are accepted
    pub can_decrease: bool,
    pub starting_value: i64,
    pub clamp_to_minimum: bool,
    pub minimum: i64,
    pub clamp_to_maximum: bool,
    pub maximum: i64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            can_decrease: true,
            starting_value: 0,
            clamp_to_minimum: true,
            minimum: 0,
            clamp_to_maximum: true,
            maximum: i64::MAX,
        }
    }
}

/// Level progression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub starting_level: u32,
    pub minimum_level: u32,
    pub maximum_level: u32,
    /// Value required to advance past the level at each index
    pub thresholds: Vec<i64>,
    /// Extra value required per level once `thresholds` runs out
    pub linear_step: i64,
    pub play_level_up_sound: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            starting_level: 1,
            minimum_level: 1,
            maximum_level: 100,
            thresholds: vec![100, 200, 400, 800, 1600, 2000, 2500, 3000, 4000, 5000],
            linear_step: 2500,
            play_level_up_sound: true,
        }
    }
}

impl LevelConfig {
    pub fn validate(&self) -> TallyResult<()> {
        if self.linear_step <= 0 {
            return Err(TallyError::invalid(
                "linear progression step cannot be zero or lower",
            ));
        }
        if self.minimum_level > self.maximum_level {
            return Err(TallyError::invalid(format!(
                "minimum level {} is greater than maximum level {}",
                self.minimum_level, self.maximum_level
            )));
        }
        if self.starting_level < self.minimum_level {
            return Err(TallyError::invalid(
                "starting level cannot be less than minimum level",
            ));
        }
        if self.starting_level > self.maximum_level {
            return Err(TallyError::invalid(
                "starting level cannot be greater than maximum level",
            ));
        }
        Ok(())
    }
}

/// Trickling score display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrickleConfig {
    pub should_trickle: bool,
    pub step_delay_secs: f64,
    /// Step sizes, coarsest first
    pub unit_divisors: Vec<i64>,
}

impl Default for TrickleConfig {
    fn default() -> Self {
        Self {
            should_trickle: true,
            step_delay_secs: 0.05,
            unit_divisors: vec![1000, 100, 10],
        }
    }
}

impl TrickleConfig {
    /// Delay between steps; zero when the configured value is unusable
    pub fn step_delay(&self) -> Duration {
        self.checked_step_delay().unwrap_or(Duration::ZERO)
    }

    fn checked_step_delay(&self) -> TallyResult<Duration> {
        Duration::try_from_secs_f64(self.step_delay_secs).map_err(|_| {
            TallyError::invalid(format!(
                "trickle step delay must be a non-negative number of seconds, got {}",
                self.step_delay_secs
            ))
        })
    }

    pub fn validate(&self) -> TallyResult<()> {
        self.checked_step_delay()?;
        if self.unit_divisors.is_empty() {
            return Err(TallyError::invalid("unit divisors cannot be empty"));
        }
        if let Some(divisor) = self.unit_divisors.iter().find(|d| **d <= 0) {
            return Err(TallyError::invalid(format!(
                "unit divisors must be positive, got {}",
                divisor
            )));
        }
        Ok(())
    }
}

/// Clip names played for sound cues
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Indexed like `LevelConfig::thresholds`; `None` entries stay silent
    pub level_up_clips: Vec<Option<String>>,
    pub trickle_clip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    pub score: CounterConfig,
    pub experience: CounterConfig,
    pub levels: LevelConfig,
    pub trickle: TrickleConfig,
    pub sounds: SoundConfig,
}

impl TallyConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TallyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> TallyResult<()> {
        self.levels.validate()?;
        self.trickle.validate()?;
        Ok(())
    }
}
