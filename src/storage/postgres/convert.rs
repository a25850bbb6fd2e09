//! Conversions between Diesel rows and domain aggregates.

use super::PersistenceFailure;
use super::models::{
    IssueRow, NewIssueRow, NewTeamRow, NewWorkflowStateRow, TeamRow, WorkflowStateRow,
};
use crate::issue::domain::{
    ActorId, Issue, IssueId, IssueNumber, IssueTitle, PersistedIssueData, Priority, ProjectId,
};
use crate::position::Position;
use crate::team::domain::{PersistedTeamData, Team, TeamId, TeamKey, TeamName};
use crate::workflow::domain::{
    PersistedWorkflowStateData, StateColor, StateKind, StateName, WorkflowState, WorkflowStateId,
};
use std::error::Error;

/// Boxed decoding failure for rows that no longer satisfy domain rules.
pub(super) type DecodeError = Box<dyn Error + Send + Sync>;

pub(super) fn team_to_row(team: &Team) -> NewTeamRow {
    NewTeamRow {
        id: team.id().into_inner(),
        key: team.key().as_str().to_owned(),
        name: team.name().as_str().to_owned(),
        description: team.description().map(str::to_owned),
        created_at: team.created_at(),
        updated_at: team.updated_at(),
    }
}

pub(super) fn row_to_team(row: TeamRow) -> Result<Team, DecodeError> {
    Ok(Team::from_persisted(PersistedTeamData {
        id: TeamId::from_uuid(row.id),
        key: TeamKey::new(row.key)?,
        name: TeamName::new(row.name)?,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

pub(super) fn state_to_row(state: &WorkflowState) -> NewWorkflowStateRow {
    NewWorkflowStateRow {
        id: state.id().into_inner(),
        team_id: state.team_id().into_inner(),
        name: state.name().as_str().to_owned(),
        kind: state.kind().as_str().to_owned(),
        color: state.color().as_str().to_owned(),
        position: state.position().value(),
        description: state.description().map(str::to_owned),
        is_default: state.is_default(),
        created_at: state.created_at(),
        updated_at: state.updated_at(),
    }
}

pub(super) fn row_to_state(row: WorkflowStateRow) -> Result<WorkflowState, DecodeError> {
    Ok(WorkflowState::from_persisted(PersistedWorkflowStateData {
        id: WorkflowStateId::from_uuid(row.id),
        team_id: TeamId::from_uuid(row.team_id),
        name: StateName::new(row.name)?,
        kind: StateKind::try_from(row.kind.as_str())?,
        color: StateColor::new(row.color)?,
        position: Position::new(row.position)?,
        description: row.description,
        is_default: row.is_default,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

pub(super) fn issue_to_row(issue: &Issue) -> Result<NewIssueRow, DecodeError> {
    Ok(NewIssueRow {
        id: issue.id().into_inner(),
        team_id: issue.team_id().into_inner(),
        number: i32::try_from(issue.number().value())?,
        title: issue.title().as_str().to_owned(),
        description: issue.description().map(str::to_owned),
        status_id: issue.status_id().into_inner(),
        priority: issue.priority().level(),
        assignee_id: issue.assignee_id().map(ActorId::into_inner),
        project_id: issue.project_id().map(ProjectId::into_inner),
        created_by: issue.created_by().map(ActorId::into_inner),
        position: issue.position().value(),
        completed_at: issue.completed_at(),
        cancelled_at: issue.cancelled_at(),
        created_at: issue.created_at(),
        updated_at: issue.updated_at(),
    })
}

pub(super) fn row_to_issue(row: IssueRow) -> Result<Issue, DecodeError> {
    Ok(Issue::from_persisted(PersistedIssueData {
        id: IssueId::from_uuid(row.id),
        team_id: TeamId::from_uuid(row.team_id),
        number: IssueNumber::new(i64::from(row.number))?,
        title: IssueTitle::new(row.title)?,
        description: row.description,
        status_id: WorkflowStateId::from_uuid(row.status_id),
        priority: Priority::from_level(i64::from(row.priority))?,
        assignee_id: row.assignee_id.map(ActorId::from_uuid),
        project_id: row.project_id.map(ProjectId::from_uuid),
        created_by: row.created_by.map(ActorId::from_uuid),
        position: Position::new(row.position)?,
        completed_at: row.completed_at,
        cancelled_at: row.cancelled_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

/// Error wrapper so boxed decode failures satisfy `Error + Sized`.
#[derive(Debug, thiserror::Error)]
#[error("stored row is invalid: {0}")]
pub(super) struct CorruptRow(pub(super) DecodeError);

/// Maps a decode failure into the caller's repository error.
pub(super) fn corrupt<E: PersistenceFailure>(err: DecodeError) -> E {
    E::from_persistence(CorruptRow(err))
}
