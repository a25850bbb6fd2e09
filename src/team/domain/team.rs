//! Team aggregate root.

use super::{TeamId, TeamKey, TeamName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A team owns a private namespace of issue numbers and an ordered set of
/// workflow states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    key: TeamKey,
    name: TeamName,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTeamData {
    /// Persisted team identifier.
    pub id: TeamId,
    /// Persisted team key.
    pub key: TeamKey,
    /// Persisted display name.
    pub name: TeamName,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new team with a fresh identifier.
    #[must_use]
    pub fn new(key: TeamKey, name: TeamName, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TeamId::new(),
            key,
            name,
            description: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Sets the team description, dropping blank values.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let value = description.into();
        let normalized = value.trim();
        self.description = (!normalized.is_empty()).then(|| normalized.to_owned());
        self
    }

    /// Reconstructs a team from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTeamData) -> Self {
        Self {
            id: data.id,
            key: data.key,
            name: data.name,
            description: data.description,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the team key.
    #[must_use]
    pub const fn key(&self) -> &TeamKey {
        &self.key
    }

    /// Returns the team name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns the team description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
