//! Identifier and validated scalar types for workflow states.

use super::WorkflowDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for a state name, matching the `VARCHAR(100)` column.
const MAX_STATE_NAME_LENGTH: usize = 100;

/// Unique identifier for a workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowStateId(Uuid);

impl WorkflowStateId {
    /// Creates a new random state identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a state identifier from an existing UUID.
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

impl Default for WorkflowStateId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for WorkflowStateId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for WorkflowStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a workflow state.
///
/// Names are unique within a team, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateName(String);

impl StateName {
    /// Creates a validated state name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyStateName`] when the trimmed value
    /// is empty or [`WorkflowDomainError::StateNameTooLong`] when it exceeds
    /// 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(WorkflowDomainError::EmptyStateName);
        }
        let length = normalized.chars().count();
        if length > MAX_STATE_NAME_LENGTH {
            return Err(WorkflowDomainError::StateNameTooLong(length));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when both names collide under the per-team uniqueness
    /// rule.
    #[must_use]
    pub fn collides_with(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl AsRef<str> for StateName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex colour of a workflow state, stored lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateColor(String);

impl StateColor {
    /// Neutral grey used when no colour is supplied.
    pub const NEUTRAL_GRAY: &'static str = "#808080";

    /// Creates a validated colour.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidColor`] unless the value is `#`
    /// followed by three or six hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let digits = normalized.strip_prefix('#').unwrap_or_default();
        let is_valid = matches!(digits.len(), 3 | 6)
            && digits.chars().all(|c| c.is_ascii_hexdigit());
        if !is_valid {
            return Err(WorkflowDomainError::InvalidColor(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the neutral grey default.
    #[must_use]
    pub fn neutral() -> Self {
        Self(Self::NEUTRAL_GRAY.to_owned())
    }

    /// Returns the colour as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StateColor {
    fn default() -> Self {
        Self::neutral()
    }
}

impl fmt::Display for StateColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
