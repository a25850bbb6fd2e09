//! Identifier and validated scalar types for issues.

use super::IssueDomainError;
use crate::team::domain::TeamKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for an issue title, matching the `VARCHAR(500)` column.
const MAX_TITLE_LENGTH: usize = 500;

/// Unique identifier for an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(Uuid);

impl IssueId {
    /// Creates a new random issue identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an issue identifier from an existing UUID.
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

impl Default for IssueId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for IssueId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user, resolved by the surrounding identity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Wraps an actor UUID.
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

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a project an issue is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Wraps a project UUID.
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

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team-scoped sequential issue number, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(u32);

impl IssueNumber {
    /// Number given to a team's first issue.
    pub const FIRST: Self = Self(1);

    /// Creates a validated issue number.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidNumber`] for zero or for values
    /// that do not fit a signed 32-bit column.
    pub fn new(value: i64) -> Result<Self, IssueDomainError> {
        u32::try_from(value)
            .ok()
            .filter(|number| *number > 0 && i32::try_from(*number).is_ok())
            .map(Self)
            .ok_or(IssueDomainError::InvalidNumber(value))
    }

    /// Returns the number after `current`, or [`Self::FIRST`] when a team
    /// has no issues yet.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidNumber`] when the sequence would
    /// overflow the column.
    pub fn next_after(current: Option<Self>) -> Result<Self, IssueDomainError> {
        current.map_or(Ok(Self::FIRST), |number| {
            Self::new(i64::from(number.0).saturating_add(1))
        })
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable issue identifier such as `ENG-42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueIdentifier(String);

impl IssueIdentifier {
    /// Builds the identifier from a team key and issue number.
    #[must_use]
    pub fn new(key: &TeamKey, number: IssueNumber) -> Self {
        Self(format!("{key}-{number}"))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated issue title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueTitle(String);

impl IssueTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyTitle`] or
    /// [`IssueDomainError::TitleTooLong`].
    pub fn new(value: impl Into<String>) -> Result<Self, IssueDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(IssueDomainError::EmptyTitle);
        }
        let length = normalized.chars().count();
        if length > MAX_TITLE_LENGTH {
            return Err(IssueDomainError::TitleTooLong(length));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
