//! Level threshold table.
//!
//! `table[L]` is the accumulated value needed to advance past level `L`.
//! Past the end of the table every level costs `linear_step` more than the
//! one before, starting from the last table entry:
//!
//! ```text
//! required(L) = table[L]                                   if L < len
//!             = table[len - 1] + (L - len + 1) * step      otherwise
//! ```

use tally_utils::config::LevelConfig;
use tally_utils::errors::{TallyError, TallyResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelThresholds {
    table: Vec<i64>,
    linear_step: i64,
}

impl LevelThresholds {
    /// Fails if `linear_step` is zero or negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use tally_core::levels::LevelThresholds;
    ///
    /// let thresholds = LevelThresholds::new(vec![100, 200, 400], 500).unwrap();
    /// assert_eq!(thresholds.required_for(1), 200);
    /// assert_eq!(thresholds.required_for(3), 900);
    /// assert_eq!(thresholds.required_for(4), 1400);
    /// ```
    pub fn new(table: Vec<i64>, linear_step: i64) -> TallyResult<Self> {
        validate_step(linear_step)?;
        Ok(Self { table, linear_step })
    }

    pub fn from_config(config: &LevelConfig) -> TallyResult<Self> {
        Self::new(config.thresholds.clone(), config.linear_step)
    }

    /// Accumulated value needed to advance past `level`.
    ///
    /// An empty table progresses linearly from zero.
    pub fn required_for(&self, level: u32) -> i64 {
        let index = level as usize;
        if let Some(required) = self.table.get(index) {
            return *required;
        }
        let base = self.table.last().copied().unwrap_or(0);
        let overflow = (index - self.table.len() + 1) as i64;
        base.saturating_add(overflow.saturating_mul(self.linear_step))
    }

    pub fn table(&self) -> &[i64] {
        &self.table
    }

    pub fn linear_step(&self) -> i64 {
        self.linear_step
    }

    pub fn set_linear_step(&mut self, linear_step: i64) -> TallyResult<()> {
        validate_step(linear_step)?;
        self.linear_step = linear_step;
        Ok(())
    }
}

fn validate_step(linear_step: i64) -> TallyResult<()> {
    if linear_step <= 0 {
        return Err(TallyError::invalid(
            "linear progression step cannot be zero or lower",
        ));
    }
    Ok(())
}
