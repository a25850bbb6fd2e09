//! Issue port over the in-memory store.

use super::{InMemoryTrackerStore, TrackerState};
use crate::issue::{
    domain::{Issue, IssueDraft, IssueId, IssueNumber},
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult},
};
use crate::position::Position;
use crate::team::domain::TeamId;
use crate::workflow::domain::{StateKind, WorkflowStateId};
use async_trait::async_trait;

impl TrackerState {
    fn status_kind(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueRepositoryResult<StateKind> {
        let status = self
            .states
            .get(&status_id)
            .ok_or(IssueRepositoryError::StatusNotFound(status_id))?;
        if status.team_id() != team_id {
            return Err(IssueRepositoryError::StatusOutsideTeam {
                team: team_id,
                status: status_id,
            });
        }
        Ok(status.kind())
    }

    fn max_number(&self, team_id: TeamId) -> Option<IssueNumber> {
        self.issues
            .values()
            .filter(|issue| issue.team_id() == team_id)
            .map(Issue::number)
            .max()
    }

    fn ordered_in_status(&self, team_id: TeamId, status_id: WorkflowStateId) -> Vec<&Issue> {
        let mut issues: Vec<&Issue> = self
            .issues
            .values()
            .filter(|issue| issue.team_id() == team_id && issue.status_id() == status_id)
            .collect();
        issues.sort_by(|left, right| {
            left.position()
                .total_cmp(&right.position())
                .then_with(|| left.created_at().cmp(&right.created_at()))
                .then_with(|| left.number().cmp(&right.number()))
        });
        issues
    }
}

#[async_trait]
impl IssueRepository for InMemoryTrackerStore {
    async fn create(&self, draft: &IssueDraft) -> IssueRepositoryResult<Issue> {
        let mut state = self.write(IssueRepositoryError::persistence)?;
        let team_id = draft.team_id();
        if !state.teams.contains_key(&team_id) {
            return Err(IssueRepositoryError::TeamNotFound(team_id));
        }
        let kind = state.status_kind(team_id, draft.status_id())?;
        let number = IssueNumber::next_after(state.max_number(team_id))
            .map_err(|_| IssueRepositoryError::SequenceExhausted(team_id))?;
        if state.issue_numbers.contains_key(&(team_id, number)) {
            return Err(IssueRepositoryError::NumberConflict {
                team: team_id,
                number,
            });
        }
        let issue = draft.clone().into_issue(number, kind);
        state.issue_numbers.insert((team_id, number), issue.id());
        state.issues.insert(issue.id(), issue.clone());
        Ok(issue)
    }

    async fn update_placement(&self, issue: &Issue) -> IssueRepositoryResult<()> {
        let mut state = self.write(IssueRepositoryError::persistence)?;
        if !state.issues.contains_key(&issue.id()) {
            return Err(IssueRepositoryError::NotFound(issue.id()));
        }
        state.status_kind(issue.team_id(), issue.status_id())?;
        state.issues.insert(issue.id(), issue.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        let state = self.read(IssueRepositoryError::persistence)?;
        Ok(state.issues.get(&id).cloned())
    }

    async fn find_by_number(
        &self,
        team_id: TeamId,
        number: IssueNumber,
    ) -> IssueRepositoryResult<Option<Issue>> {
        let state = self.read(IssueRepositoryError::persistence)?;
        Ok(state
            .issue_numbers
            .get(&(team_id, number))
            .and_then(|id| state.issues.get(id))
            .cloned())
    }

    async fn list_by_status(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueRepositoryResult<Vec<Issue>> {
        let state = self.read(IssueRepositoryError::persistence)?;
        Ok(state
            .ordered_in_status(team_id, status_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn renormalize(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueRepositoryResult<usize> {
        let mut state = self.write(IssueRepositoryError::persistence)?;
        let ordered: Vec<IssueId> = state
            .ordered_in_status(team_id, status_id)
            .into_iter()
            .map(Issue::id)
            .collect();
        for (id, slot) in ordered.iter().zip(1_u64..) {
            if let Some(issue) = state.issues.get_mut(id) {
                issue.respace(Position::for_sequence(slot));
            }
        }
        Ok(ordered.len())
    }
}
