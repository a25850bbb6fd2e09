//! Team port over `PostgreSQL`.

use super::convert::{corrupt, row_to_team, state_to_row, team_to_row};
use super::models::TeamRow;
use super::schema::{teams, workflow_states};
use super::{PostgresTrackerStore, in_transaction, violates};
use crate::team::{
    domain::{Team, TeamId, TeamKey},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};
use crate::workflow::domain::WorkflowState;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const TEAM_KEY_UNIQUE: &str = "idx_teams_key_unique";
pub(super) const STATE_NAME_UNIQUE: &str = "idx_workflow_states_team_name_unique";

#[async_trait]
impl TeamRepository for PostgresTrackerStore {
    async fn create_with_states(
        &self,
        team: &Team,
        states: &[WorkflowState],
    ) -> TeamRepositoryResult<()> {
        let team_id = team.id();
        let key = team.key().clone();
        let team_row = team_to_row(team);
        let state_rows: Vec<_> = states
            .iter()
            .map(|state| (state.name().clone(), state_to_row(state)))
            .collect();

        self.run_blocking(move |connection| {
            in_transaction(connection, |tx| {
                diesel::insert_into(teams::table)
                    .values(&team_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if violates(info.as_ref(), TEAM_KEY_UNIQUE) =>
                        {
                            TeamRepositoryError::DuplicateKey(key.clone())
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TeamRepositoryError::DuplicateTeam(team_id)
                        }
                        _ => TeamRepositoryError::persistence(err),
                    })?;

                for (name, row) in &state_rows {
                    diesel::insert_into(workflow_states::table)
                        .values(row)
                        .execute(tx)
                        .map_err(|err| match err {
                            DieselError::DatabaseError(
                                DatabaseErrorKind::UniqueViolation,
                                ref info,
                            ) if violates(info.as_ref(), STATE_NAME_UNIQUE) => {
                                TeamRepositoryError::DuplicateStateName(name.clone())
                            }
                            _ => TeamRepositoryError::persistence(err),
                        })?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>> {
        self.run_blocking(move |connection| {
            let row = teams::table
                .find(id.into_inner())
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()
                .map_err(TeamRepositoryError::persistence)?;
            row.map(|found| row_to_team(found).map_err(corrupt))
                .transpose()
        })
        .await
    }

    async fn find_by_key(&self, key: &TeamKey) -> TeamRepositoryResult<Option<Team>> {
        let lookup_key = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = teams::table
                .filter(teams::key.eq(lookup_key))
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()
                .map_err(TeamRepositoryError::persistence)?;
            row.map(|found| row_to_team(found).map_err(corrupt))
                .transpose()
        })
        .await
    }
}
