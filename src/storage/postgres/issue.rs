//! Issue port over `PostgreSQL`.

use super::convert::{corrupt, issue_to_row, row_to_issue};
use super::models::{IssuePlacement, IssueRow};
use super::schema::{issues, workflow_states};
use super::{PostgresTrackerStore, in_transaction, lock_team, violates};
use crate::issue::{
    domain::{Issue, IssueDraft, IssueId, IssueNumber},
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult},
};
use crate::position::Position;
use crate::team::domain::TeamId;
use crate::workflow::domain::{StateKind, WorkflowStateId};
use async_trait::async_trait;
use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

const ISSUE_NUMBER_UNIQUE: &str = "idx_issues_team_number_unique";

#[async_trait]
impl IssueRepository for PostgresTrackerStore {
    async fn create(&self, draft: &IssueDraft) -> IssueRepositoryResult<Issue> {
        let pending = draft.clone();
        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                let team_id = pending.team_id();
                let team_exists = lock_team(tx, team_id.into_inner())
                    .map_err(|err| conflict_or(err, team_id))?;
                if !team_exists {
                    return Err(IssueRepositoryError::TeamNotFound(team_id));
                }
                let kind = share_status(tx, team_id, pending.status_id())?;
                let number = IssueNumber::next_after(max_number_in(tx, team_id)?)
                    .map_err(|_| IssueRepositoryError::SequenceExhausted(team_id))?;
                let issue = pending.into_issue(number, kind);
                let row = issue_to_row(&issue).map_err(corrupt::<IssueRepositoryError>)?;

                diesel::insert_into(issues::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if violates(info.as_ref(), ISSUE_NUMBER_UNIQUE) =>
                        {
                            IssueRepositoryError::NumberConflict {
                                team: team_id,
                                number,
                            }
                        }
                        other => conflict_or(other, team_id),
                    })?;
                Ok(issue)
            })
        })
        .await
    }

    async fn update_placement(&self, issue: &Issue) -> IssueRepositoryResult<()> {
        let id = issue.id();
        let team_id = issue.team_id();
        let status_id = issue.status_id();
        let placement = IssuePlacement {
            status_id: status_id.into_inner(),
            position: issue.position().value(),
            completed_at: issue.completed_at(),
            cancelled_at: issue.cancelled_at(),
            updated_at: issue.updated_at(),
        };
        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                share_status(tx, team_id, status_id)?;
                let updated = diesel::update(issues::table.find(id.into_inner()))
                    .set(&placement)
                    .execute(tx)
                    .map_err(IssueRepositoryError::persistence)?;
                if updated == 0 {
                    return Err(IssueRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        self.run_blocking(move |connection| {
            let row = issues::table
                .find(id.into_inner())
                .select(IssueRow::as_select())
                .first::<IssueRow>(connection)
                .optional()
                .map_err(IssueRepositoryError::persistence)?;
            row.map(|found| row_to_issue(found).map_err(corrupt))
                .transpose()
        })
        .await
    }

    async fn find_by_number(
        &self,
        team_id: TeamId,
        number: IssueNumber,
    ) -> IssueRepositoryResult<Option<Issue>> {
        self.run_blocking(move |connection| {
            let raw_number =
                i32::try_from(number.value()).map_err(IssueRepositoryError::persistence)?;
            let row = issues::table
                .filter(issues::team_id.eq(team_id.into_inner()))
                .filter(issues::number.eq(raw_number))
                .select(IssueRow::as_select())
                .first::<IssueRow>(connection)
                .optional()
                .map_err(IssueRepositoryError::persistence)?;
            row.map(|found| row_to_issue(found).map_err(corrupt))
                .transpose()
        })
        .await
    }

    async fn list_by_status(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueRepositoryResult<Vec<Issue>> {
        self.run_blocking(move |connection| {
            let rows = ordered_in_status(connection, team_id, status_id)?;
            rows.into_iter()
                .map(|row| row_to_issue(row).map_err(corrupt))
                .collect()
        })
        .await
    }

    async fn renormalize(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                let team_exists = lock_team(tx, team_id.into_inner())
                    .map_err(IssueRepositoryError::persistence)?;
                if !team_exists {
                    return Err(IssueRepositoryError::TeamNotFound(team_id));
                }
                let rows = ordered_in_status(tx, team_id, status_id)?;
                for (row, slot) in rows.iter().zip(1_u64..) {
                    diesel::update(issues::table.find(row.id))
                        .set(issues::position.eq(Position::for_sequence(slot).value()))
                        .execute(tx)
                        .map_err(IssueRepositoryError::persistence)?;
                }
                Ok(rows.len())
            })
        })
        .await
    }
}

/// Takes the status row `FOR SHARE` so it cannot be deleted before commit,
/// and checks that it belongs to `team_id`.
fn share_status(
    connection: &mut PgConnection,
    team_id: TeamId,
    status_id: WorkflowStateId,
) -> IssueRepositoryResult<StateKind> {
    let (owner, raw_kind) = workflow_states::table
        .find(status_id.into_inner())
        .select((workflow_states::team_id, workflow_states::kind))
        .for_share()
        .first::<(Uuid, String)>(connection)
        .optional()
        .map_err(|err| conflict_or(err, team_id))?
        .ok_or(IssueRepositoryError::StatusNotFound(status_id))?;
    if owner != team_id.into_inner() {
        return Err(IssueRepositoryError::StatusOutsideTeam {
            team: team_id,
            status: status_id,
        });
    }
    StateKind::try_from(raw_kind.as_str()).map_err(IssueRepositoryError::persistence)
}

fn max_number_in(
    connection: &mut PgConnection,
    team_id: TeamId,
) -> IssueRepositoryResult<Option<IssueNumber>> {
    let highest = issues::table
        .filter(issues::team_id.eq(team_id.into_inner()))
        .select(max(issues::number))
        .first::<Option<i32>>(connection)
        .map_err(IssueRepositoryError::persistence)?;
    highest
        .map(|raw| IssueNumber::new(i64::from(raw)))
        .transpose()
        .map_err(IssueRepositoryError::persistence)
}

fn ordered_in_status(
    connection: &mut PgConnection,
    team_id: TeamId,
    status_id: WorkflowStateId,
) -> IssueRepositoryResult<Vec<IssueRow>> {
    issues::table
        .filter(issues::team_id.eq(team_id.into_inner()))
        .filter(issues::status_id.eq(status_id.into_inner()))
        .order((
            issues::position.asc(),
            issues::created_at.asc(),
            issues::number.asc(),
        ))
        .select(IssueRow::as_select())
        .load::<IssueRow>(connection)
        .map_err(IssueRepositoryError::persistence)
}

/// Maps serialisation failures to a retryable conflict.
fn conflict_or(err: DieselError, team_id: TeamId) -> IssueRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            IssueRepositoryError::SerializationConflict(team_id)
        }
        other => IssueRepositoryError::persistence(other),
    }
}
