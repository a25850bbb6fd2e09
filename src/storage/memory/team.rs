//! Team port over the in-memory store.

use super::InMemoryTrackerStore;
use crate::team::{
    domain::{Team, TeamId, TeamKey},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};
use crate::workflow::domain::WorkflowState;
use async_trait::async_trait;

#[async_trait]
impl TeamRepository for InMemoryTrackerStore {
    async fn create_with_states(
        &self,
        team: &Team,
        states: &[WorkflowState],
    ) -> TeamRepositoryResult<()> {
        let mut state = self.write(TeamRepositoryError::persistence)?;
        if state.teams.contains_key(&team.id()) {
            return Err(TeamRepositoryError::DuplicateTeam(team.id()));
        }
        if state.team_keys.contains_key(team.key()) {
            return Err(TeamRepositoryError::DuplicateKey(team.key().clone()));
        }
        for (index, workflow_state) in states.iter().enumerate() {
            let collides = states
                .iter()
                .take(index)
                .any(|earlier| earlier.name().collides_with(workflow_state.name()));
            if collides {
                return Err(TeamRepositoryError::DuplicateStateName(
                    workflow_state.name().clone(),
                ));
            }
        }

        state.team_keys.insert(team.key().clone(), team.id());
        state.teams.insert(team.id(), team.clone());
        for workflow_state in states {
            state
                .states
                .insert(workflow_state.id(), workflow_state.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>> {
        let state = self.read(TeamRepositoryError::persistence)?;
        Ok(state.teams.get(&id).cloned())
    }

    async fn find_by_key(&self, key: &TeamKey) -> TeamRepositoryResult<Option<Team>> {
        let state = self.read(TeamRepositoryError::persistence)?;
        Ok(state
            .team_keys
            .get(key)
            .and_then(|id| state.teams.get(id))
            .cloned())
    }
}
