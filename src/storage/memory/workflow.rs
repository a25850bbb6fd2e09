//! Workflow-state port over the in-memory store.

use super::InMemoryTrackerStore;
use crate::issue::domain::{Issue, IssueId};
use crate::position::Position;
use crate::team::domain::TeamId;
use crate::workflow::{
    domain::{
        DeletionCensus, DeletionGuard, StateKind, WorkflowState, WorkflowStateDraft, WorkflowStateId,
    },
    ports::{WorkflowStateRepository, WorkflowStateRepositoryError, WorkflowStateRepositoryResult},
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

#[async_trait]
impl WorkflowStateRepository for InMemoryTrackerStore {
    async fn create(
        &self,
        draft: WorkflowStateDraft,
    ) -> WorkflowStateRepositoryResult<WorkflowState> {
        let mut state = self.write(WorkflowStateRepositoryError::persistence)?;
        let team_id = draft.team_id();
        if !state.teams.contains_key(&team_id) {
            return Err(WorkflowStateRepositoryError::TeamNotFound(team_id));
        }
        if state.name_taken(team_id, draft.name(), None) {
            return Err(WorkflowStateRepositoryError::DuplicateName {
                team: team_id,
                name: draft.name().clone(),
            });
        }
        let current_max = state
            .team_states(team_id)
            .map(WorkflowState::position)
            .max_by(Position::total_cmp);
        let created = draft.resolve(|| current_max.unwrap_or_default().after());
        state.states.insert(created.id(), created.clone());
        Ok(created)
    }

    async fn store_missing_kinds(
        &self,
        team_id: TeamId,
        states: &[WorkflowState],
    ) -> WorkflowStateRepositoryResult<Vec<WorkflowState>> {
        let mut state = self.write(WorkflowStateRepositoryError::persistence)?;
        if !state.teams.contains_key(&team_id) {
            return Err(WorkflowStateRepositoryError::TeamNotFound(team_id));
        }
        let present: HashSet<StateKind> =
            state.team_states(team_id).map(WorkflowState::kind).collect();
        let missing: Vec<WorkflowState> = states
            .iter()
            .filter(|candidate| !present.contains(&candidate.kind()))
            .cloned()
            .collect();
        for (index, candidate) in missing.iter().enumerate() {
            let collides = state.name_taken(team_id, candidate.name(), None)
                || missing
                    .iter()
                    .take(index)
                    .any(|earlier| earlier.name().collides_with(candidate.name()));
            if collides {
                return Err(WorkflowStateRepositoryError::DuplicateName {
                    team: team_id,
                    name: candidate.name().clone(),
                });
            }
        }
        for candidate in &missing {
            state.states.insert(candidate.id(), candidate.clone());
        }
        Ok(missing)
    }

    async fn update(&self, workflow_state: &WorkflowState) -> WorkflowStateRepositoryResult<()> {
        let mut state = self.write(WorkflowStateRepositoryError::persistence)?;
        let id = workflow_state.id();
        if !state.states.contains_key(&id) {
            return Err(WorkflowStateRepositoryError::NotFound(id));
        }
        let team_id = workflow_state.team_id();
        if state.name_taken(team_id, workflow_state.name(), Some(id)) {
            return Err(WorkflowStateRepositoryError::DuplicateName {
                team: team_id,
                name: workflow_state.name().clone(),
            });
        }
        state.states.insert(id, workflow_state.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: WorkflowStateId,
    ) -> WorkflowStateRepositoryResult<Option<WorkflowState>> {
        let state = self.read(WorkflowStateRepositoryError::persistence)?;
        Ok(state.states.get(&id).cloned())
    }

    async fn list_by_team(
        &self,
        team_id: TeamId,
    ) -> WorkflowStateRepositoryResult<Vec<WorkflowState>> {
        let state = self.read(WorkflowStateRepositoryError::persistence)?;
        let mut states: Vec<WorkflowState> = state.team_states(team_id).cloned().collect();
        states.sort_by(|left, right| {
            left.position()
                .total_cmp(&right.position())
                .then_with(|| left.created_at().cmp(&right.created_at()))
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(states)
    }

    async fn delete(
        &self,
        id: WorkflowStateId,
        guard: DeletionGuard,
    ) -> WorkflowStateRepositoryResult<WorkflowState> {
        let mut state = self.write(WorkflowStateRepositoryError::persistence)?;
        let target = state
            .states
            .get(&id)
            .cloned()
            .ok_or(WorkflowStateRepositoryError::NotFound(id))?;
        let census = DeletionCensus {
            state: id,
            team: target.team_id(),
            kind: target.kind(),
            referencing_issues: count_referencing(&state.issues, id),
            states_of_kind: state
                .team_states(target.team_id())
                .filter(|candidate| candidate.kind() == target.kind())
                .fold(0, |count, _| count + 1),
        };
        guard.evaluate(&census)?;
        state.states.remove(&id);
        Ok(target)
    }
}

fn count_referencing(issues: &HashMap<IssueId, Issue>, id: WorkflowStateId) -> u64 {
    issues
        .values()
        .filter(|issue| issue.status_id() == id)
        .fold(0, |count, _| count + 1)
}
