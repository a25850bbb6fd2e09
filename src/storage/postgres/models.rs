//! Diesel row models for tracker persistence.

use super::schema::{issues, teams, workflow_states};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for teams.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamRow {
    /// Internal team identifier.
    pub id: Uuid,
    /// Team key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for teams.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub struct NewTeamRow {
    /// Internal team identifier.
    pub id: Uuid,
    /// Team key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for workflow states.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workflow_states)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkflowStateRow {
    /// Internal state identifier.
    pub id: Uuid,
    /// Owning team.
    pub team_id: Uuid,
    /// Display name.
    pub name: String,
    /// Kind label.
    pub kind: String,
    /// Hex colour.
    pub color: String,
    /// Sort key.
    pub position: f64,
    /// Optional description.
    pub description: Option<String>,
    /// Template flag.
    pub is_default: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for workflow states.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workflow_states)]
pub struct NewWorkflowStateRow {
    /// Internal state identifier.
    pub id: Uuid,
    /// Owning team.
    pub team_id: Uuid,
    /// Display name.
    pub name: String,
    /// Kind label.
    pub kind: String,
    /// Hex colour.
    pub color: String,
    /// Sort key.
    pub position: f64,
    /// Optional description.
    pub description: Option<String>,
    /// Template flag.
    pub is_default: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by workflow-state updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = workflow_states)]
#[diesel(treat_none_as_null = true)]
pub struct WorkflowStateChanges {
    /// Display name.
    pub name: String,
    /// Hex colour.
    pub color: String,
    /// Sort key.
    pub position: f64,
    /// Optional description.
    pub description: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for issues.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueRow {
    /// Internal issue identifier.
    pub id: Uuid,
    /// Owning team.
    pub team_id: Uuid,
    /// Team-scoped number.
    pub number: i32,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Current status.
    pub status_id: Uuid,
    /// Priority level.
    pub priority: i16,
    /// Optional assignee.
    pub assignee_id: Option<Uuid>,
    /// Optional project.
    pub project_id: Option<Uuid>,
    /// Optional creator.
    pub created_by: Option<Uuid>,
    /// Sort key.
    pub position: f64,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for issues.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = issues)]
pub struct NewIssueRow {
    /// Internal issue identifier.
    pub id: Uuid,
    /// Owning team.
    pub team_id: Uuid,
    /// Team-scoped number.
    pub number: i32,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Current status.
    pub status_id: Uuid,
    /// Priority level.
    pub priority: i16,
    /// Optional assignee.
    pub assignee_id: Option<Uuid>,
    /// Optional project.
    pub project_id: Option<Uuid>,
    /// Optional creator.
    pub created_by: Option<Uuid>,
    /// Sort key.
    pub position: f64,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when an issue moves.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = issues)]
#[diesel(treat_none_as_null = true)]
pub struct IssuePlacement {
    /// Current status.
    pub status_id: Uuid,
    /// Sort key.
    pub position: f64,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
