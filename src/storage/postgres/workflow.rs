//! Workflow-state port over `PostgreSQL`.

use super::convert::{corrupt, row_to_state, state_to_row};
use super::models::{WorkflowStateChanges, WorkflowStateRow};
use super::schema::{issues, workflow_states};
use super::team::STATE_NAME_UNIQUE;
use super::{PostgresTrackerStore, in_transaction, lock_team, violates};
use crate::position::Position;
use crate::team::domain::TeamId;
use crate::workflow::{
    domain::{
        DeletionCensus, DeletionGuard, StateName, WorkflowState, WorkflowStateDraft,
        WorkflowStateId,
    },
    ports::{WorkflowStateRepository, WorkflowStateRepositoryError, WorkflowStateRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashSet;
use uuid::Uuid;

#[async_trait]
impl WorkflowStateRepository for PostgresTrackerStore {
    async fn create(
        &self,
        draft: WorkflowStateDraft,
    ) -> WorkflowStateRepositoryResult<WorkflowState> {
        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                let team_id = draft.team_id();
                ensure_team_locked(tx, team_id)?;
                let current_max = max_position_in(tx, team_id)?;
                let created = draft.resolve(|| current_max.unwrap_or_default().after());
                insert_state(tx, &created)?;
                Ok(created)
            })
        })
        .await
    }

    async fn store_missing_kinds(
        &self,
        team_id: TeamId,
        states: &[WorkflowState],
    ) -> WorkflowStateRepositoryResult<Vec<WorkflowState>> {
        let planned = states.to_vec();
        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                ensure_team_locked(tx, team_id)?;
                let present: HashSet<String> = workflow_states::table
                    .filter(workflow_states::team_id.eq(team_id.into_inner()))
                    .select(workflow_states::kind)
                    .load::<String>(tx)
                    .map_err(WorkflowStateRepositoryError::persistence)?
                    .into_iter()
                    .collect();
                let missing: Vec<WorkflowState> = planned
                    .into_iter()
                    .filter(|state| !present.contains(state.kind().as_str()))
                    .collect();
                for state in &missing {
                    insert_state(tx, state)?;
                }
                Ok(missing)
            })
        })
        .await
    }

    async fn update(&self, state: &WorkflowState) -> WorkflowStateRepositoryResult<()> {
        let id = state.id();
        let team_id = state.team_id();
        let name = state.name().clone();
        let changes = WorkflowStateChanges {
            name: state.name().as_str().to_owned(),
            color: state.color().as_str().to_owned(),
            position: state.position().value(),
            description: state.description().map(str::to_owned),
            updated_at: state.updated_at(),
        };
        self.run_blocking(move |connection| {
            let updated = diesel::update(workflow_states::table.find(id.into_inner()))
                .set(&changes)
                .execute(connection)
                .map_err(|err| duplicate_name_or(err, team_id, &name))?;
            if updated == 0 {
                return Err(WorkflowStateRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: WorkflowStateId,
    ) -> WorkflowStateRepositoryResult<Option<WorkflowState>> {
        self.run_blocking(move |connection| {
            let row = workflow_states::table
                .find(id.into_inner())
                .select(WorkflowStateRow::as_select())
                .first::<WorkflowStateRow>(connection)
                .optional()
                .map_err(WorkflowStateRepositoryError::persistence)?;
            row.map(|found| row_to_state(found).map_err(corrupt))
                .transpose()
        })
        .await
    }

    async fn list_by_team(
        &self,
        team_id: TeamId,
    ) -> WorkflowStateRepositoryResult<Vec<WorkflowState>> {
        self.run_blocking(move |connection| {
            let rows = workflow_states::table
                .filter(workflow_states::team_id.eq(team_id.into_inner()))
                .order((
                    workflow_states::position.asc(),
                    workflow_states::created_at.asc(),
                    workflow_states::id.asc(),
                ))
                .select(WorkflowStateRow::as_select())
                .load::<WorkflowStateRow>(connection)
                .map_err(WorkflowStateRepositoryError::persistence)?;
            rows.into_iter()
                .map(|row| row_to_state(row).map_err(corrupt))
                .collect()
        })
        .await
    }

    async fn delete(
        &self,
        id: WorkflowStateId,
        guard: DeletionGuard,
    ) -> WorkflowStateRepositoryResult<WorkflowState> {
        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                let team_uuid = workflow_states::table
                    .find(id.into_inner())
                    .select(workflow_states::team_id)
                    .first::<Uuid>(tx)
                    .optional()
                    .map_err(WorkflowStateRepositoryError::persistence)?
                    .ok_or(WorkflowStateRepositoryError::NotFound(id))?;
                ensure_team_locked(tx, TeamId::from_uuid(team_uuid))?;

                let row = workflow_states::table
                    .find(id.into_inner())
                    .select(WorkflowStateRow::as_select())
                    .for_update()
                    .first::<WorkflowStateRow>(tx)
                    .optional()
                    .map_err(WorkflowStateRepositoryError::persistence)?
                    .ok_or(WorkflowStateRepositoryError::NotFound(id))?;
                let target = row_to_state(row).map_err(corrupt::<WorkflowStateRepositoryError>)?;

                let states_of_kind = workflow_states::table
                    .filter(workflow_states::team_id.eq(team_uuid))
                    .filter(workflow_states::kind.eq(target.kind().as_str()))
                    .count()
                    .get_result::<i64>(tx)
                    .map_err(WorkflowStateRepositoryError::persistence)?;
                let census = DeletionCensus {
                    state: id,
                    team: target.team_id(),
                    kind: target.kind(),
                    referencing_issues: count_referencing(tx, id.into_inner())?,
                    states_of_kind: u64::try_from(states_of_kind)
                        .map_err(WorkflowStateRepositoryError::persistence)?,
                };
                guard.evaluate(&census)?;

                diesel::delete(workflow_states::table.find(id.into_inner()))
                    .execute(tx)
                    .map_err(WorkflowStateRepositoryError::persistence)?;
                Ok(target)
            })
        })
        .await
    }
}

fn ensure_team_locked(
    connection: &mut PgConnection,
    team_id: TeamId,
) -> WorkflowStateRepositoryResult<()> {
    let exists = lock_team(connection, team_id.into_inner())
        .map_err(WorkflowStateRepositoryError::persistence)?;
    if exists {
        Ok(())
    } else {
        Err(WorkflowStateRepositoryError::TeamNotFound(team_id))
    }
}

fn max_position_in(
    connection: &mut PgConnection,
    team_id: TeamId,
) -> WorkflowStateRepositoryResult<Option<Position>> {
    let highest = workflow_states::table
        .filter(workflow_states::team_id.eq(team_id.into_inner()))
        .select(max(workflow_states::position))
        .first::<Option<f64>>(connection)
        .map_err(WorkflowStateRepositoryError::persistence)?;
    highest
        .map(Position::new)
        .transpose()
        .map_err(WorkflowStateRepositoryError::persistence)
}

fn count_referencing(
    connection: &mut PgConnection,
    state_id: Uuid,
) -> WorkflowStateRepositoryResult<u64> {
    let count = issues::table
        .filter(issues::status_id.eq(state_id))
        .count()
        .get_result::<i64>(connection)
        .map_err(WorkflowStateRepositoryError::persistence)?;
    u64::try_from(count).map_err(WorkflowStateRepositoryError::persistence)
}

fn insert_state(
    connection: &mut PgConnection,
    state: &WorkflowState,
) -> WorkflowStateRepositoryResult<()> {
    diesel::insert_into(workflow_states::table)
        .values(&state_to_row(state))
        .execute(connection)
        .map_err(|err| duplicate_name_or(err, state.team_id(), state.name()))?;
    Ok(())
}

fn duplicate_name_or(err: DieselError, team: TeamId, name: &StateName) -> WorkflowStateRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if violates(info.as_ref(), STATE_NAME_UNIQUE) =>
        {
            WorkflowStateRepositoryError::DuplicateName {
                team,
                name: name.clone(),
            }
        }
        _ => WorkflowStateRepositoryError::persistence(err),
    }
}
