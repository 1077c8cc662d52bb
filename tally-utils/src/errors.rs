// Tally error types
// STORY-001: Clamped counters
//
// One error kind for the whole core. Raised for programmer/configuration
// mistakes; nothing retries it.

use thiserror::Error;

/// Errors raised by counters, level tracking and animator configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    /// A mutation or configuration value violates a declared invariant
    #[error("Invalid adjustment: {0}")]
    InvalidAdjustment(String),
}

impl TallyError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidAdjustment(reason.into())
    }

    /// Negative change applied to a counter that only grows
    pub fn cannot_decrease(what: impl std::fmt::Display) -> Self {
        Self::invalid(format!(
            "{} cannot be taken away when decreases are disallowed",
            what
        ))
    }
}

/// Result type for counter and level operations
pub type TallyResult<T> = Result<T, TallyError>;
