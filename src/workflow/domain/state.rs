//! Workflow-state aggregate and its creation draft.

use super::{StateColor, StateKind, StateName, WorkflowStateId};
use crate::position::Position;
use crate::team::domain::TeamId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A named column on a team's board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    id: WorkflowStateId,
    team_id: TeamId,
    name: StateName,
    kind: StateKind,
    color: StateColor,
    position: Position,
    description: Option<String>,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted workflow state.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedWorkflowStateData {
    /// Persisted state identifier.
    pub id: WorkflowStateId,
    /// Owning team.
    pub team_id: TeamId,
    /// Persisted display name.
    pub name: StateName,
    /// Persisted kind.
    pub kind: StateKind,
    /// Persisted colour.
    pub color: StateColor,
    /// Persisted sort key.
    pub position: Position,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Whether the state was provisioned from a template.
    pub is_default: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A workflow state that has not been stored yet.
///
/// The position stays open until the store resolves it, because the default
/// depends on the team's current maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowStateDraft {
    id: WorkflowStateId,
    team_id: TeamId,
    name: StateName,
    kind: StateKind,
    color: StateColor,
    position: Option<Position>,
    description: Option<String>,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl WorkflowStateDraft {
    /// Starts a draft for `team_id` with a neutral colour and no position.
    #[must_use]
    pub fn new(team_id: TeamId, name: StateName, kind: StateKind, clock: &impl Clock) -> Self {
        Self {
            id: WorkflowStateId::new(),
            team_id,
            name,
            kind,
            color: StateColor::neutral(),
            position: None,
            description: None,
            is_default: false,
            created_at: clock.utc(),
        }
    }

    /// Sets the colour.
    #[must_use]
    pub fn with_color(mut self, color: StateColor) -> Self {
        self.color = color;
        self
    }

    /// Pins the position. Unset (zero) positions are ignored.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = (!position.is_unset()).then_some(position);
        self
    }

    /// Sets the description, dropping blank values.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_description(description.into());
        self
    }

    /// Marks the state as provisioned from a template.
    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the draft name.
    #[must_use]
    pub const fn name(&self) -> &StateName {
        &self.name
    }

    /// Returns the draft kind.
    #[must_use]
    pub const fn kind(&self) -> StateKind {
        self.kind
    }

    /// Returns the explicit position, if one was supplied.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    /// Turns the draft into a state, calling `fallback` only when no position
    /// was supplied.
    #[must_use]
    pub fn resolve(self, fallback: impl FnOnce() -> Position) -> WorkflowState {
        let position = self.position.unwrap_or_else(fallback);
        WorkflowState {
            id: self.id,
            team_id: self.team_id,
            name: self.name,
            kind: self.kind,
            color: self.color,
            position,
            description: self.description,
            is_default: self.is_default,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl WorkflowState {
    /// Reconstructs a state from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkflowStateData) -> Self {
        Self {
            id: data.id,
            team_id: data.team_id,
            name: data.name,
            kind: data.kind,
            color: data.color,
            position: data.position,
            description: data.description,
            is_default: data.is_default,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Renames the state.
    pub fn rename(&mut self, name: StateName, clock: &impl Clock) {
        self.name = name;
        self.touch(clock);
    }

    /// Changes the colour.
    pub fn recolor(&mut self, color: StateColor, clock: &impl Clock) {
        self.color = color;
        self.touch(clock);
    }

    /// Moves the state to a new sort key.
    pub fn reposition(&mut self, position: Position, clock: &impl Clock) {
        self.position = position;
        self.touch(clock);
    }

    /// Replaces the description. Blank values clear it.
    pub fn describe(&mut self, description: impl Into<String>, clock: &impl Clock) {
        self.description = normalize_description(description.into());
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }

    /// Returns the state identifier.
    #[must_use]
    pub const fn id(&self) -> WorkflowStateId {
        self.id
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &StateName {
        &self.name
    }

    /// Returns the kind. Kinds are fixed at creation.
    #[must_use]
    pub const fn kind(&self) -> StateKind {
        self.kind
    }

    /// Returns the colour.
    #[must_use]
    pub const fn color(&self) -> &StateColor {
        &self.color
    }

    /// Returns the sort key.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns `true` for template-provisioned states.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
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

fn normalize_description(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
