//! Identifier and validated scalar types for the team domain.

use super::TeamDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for a team key, matching the `VARCHAR(10)` column.
const MAX_TEAM_KEY_LENGTH: usize = 10;

/// Maximum length for a team name, matching the `VARCHAR(255)` column.
const MAX_TEAM_NAME_LENGTH: usize = 255;

/// Unique identifier for a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Creates a new random team identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a team identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TeamId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short upper-case team key used in human-readable issue identifiers.
///
/// Keys are trimmed and upper-cased, must start with an ASCII letter, and may
/// contain only ASCII letters and digits (for example `ENG` or `OPS2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamKey(String);

impl TeamKey {
    /// Creates a validated team key.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::EmptyTeamKey`] when the value is blank,
    /// [`TeamDomainError::TeamKeyTooLong`] when it exceeds ten characters, or
    /// [`TeamDomainError::InvalidTeamKey`] when it contains anything other
    /// than ASCII alphanumerics or does not start with a letter.
    pub fn new(value: impl Into<String>) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(TeamDomainError::EmptyTeamKey);
        }
        if normalized.len() > MAX_TEAM_KEY_LENGTH {
            return Err(TeamDomainError::TeamKeyTooLong(raw));
        }

        let starts_with_letter = normalized
            .chars()
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic());
        let is_alphanumeric = normalized.chars().all(|c| c.is_ascii_alphanumeric());
        if !starts_with_letter || !is_alphanumeric {
            return Err(TeamDomainError::InvalidTeamKey(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TeamKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name of a team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Creates a validated team name.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::EmptyTeamName`] when the trimmed value is
    /// empty or [`TeamDomainError::TeamNameTooLong`] when it exceeds 255
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TeamDomainError::EmptyTeamName);
        }
        if normalized.chars().count() > MAX_TEAM_NAME_LENGTH {
            return Err(TeamDomainError::TeamNameTooLong(normalized.chars().count()));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
