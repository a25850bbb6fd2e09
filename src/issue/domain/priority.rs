//! Issue priority levels.

use super::IssueDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of an issue. Lower non-zero levels are more urgent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// No priority set.
    #[default]
    None,
    /// Needs attention now.
    Urgent,
    /// Important.
    High,
    /// Normal.
    Medium,
    /// Can wait.
    Low,
}

impl Priority {
    /// Parses a numeric level in `0..=4`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidPriority`] for any other value.
    pub const fn from_level(level: i64) -> Result<Self, IssueDomainError> {
        match level {
            0 => Ok(Self::None),
            1 => Ok(Self::Urgent),
            2 => Ok(Self::High),
            3 => Ok(Self::Medium),
            4 => Ok(Self::Low),
            other => Err(IssueDomainError::InvalidPriority(other)),
        }
    }

    /// Returns the numeric level stored in the database.
    #[must_use]
    pub const fn level(self) -> i16 {
        match self {
            Self::None => 0,
            Self::Urgent => 1,
            Self::High => 2,
            Self::Medium => 3,
            Self::Low => 4,
        }
    }

    /// Returns the lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
