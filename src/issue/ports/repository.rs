//! Repository port for issue storage, numbering, and ordering.

use crate::issue::domain::{Issue, IssueDraft, IssueId, IssueNumber};
use crate::team::domain::TeamId;
use crate::workflow::domain::WorkflowStateId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue repository operations.
pub type IssueRepositoryResult<T> = Result<T, IssueRepositoryError>;

/// Issue persistence contract.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Numbers and stores a drafted issue.
    ///
    /// Implementations serialise creation per team: the team is locked, the
    /// status re-checked, `max(number) + 1` assigned, and the row inserted
    /// before the lock is released. Other teams are not blocked.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NumberConflict`] when a concurrent
    /// writer claimed the number first (safe to retry),
    /// [`IssueRepositoryError::TeamNotFound`],
    /// [`IssueRepositoryError::StatusNotFound`], or
    /// [`IssueRepositoryError::StatusOutsideTeam`].
    async fn create(&self, draft: &IssueDraft) -> IssueRepositoryResult<Issue>;

    /// Persists a new position, status, and terminal timestamps.
    ///
    /// The status is re-checked in the same transaction so a concurrently
    /// deleted state can never be referenced.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NotFound`],
    /// [`IssueRepositoryError::StatusNotFound`], or
    /// [`IssueRepositoryError::StatusOutsideTeam`].
    async fn update_placement(&self, issue: &Issue) -> IssueRepositoryResult<()>;

    /// Finds an issue by identifier.
    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>>;

    /// Finds an issue by its team-scoped number.
    async fn find_by_number(
        &self,
        team_id: TeamId,
        number: IssueNumber,
    ) -> IssueRepositoryResult<Option<Issue>>;

    /// Lists the issues in a status by position, then creation time, then
    /// number.
    async fn list_by_status(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueRepositoryResult<Vec<Issue>>;

    /// Respaces every issue in a status to `1000, 2000, …` in current order.
    ///
    /// Returns the number of issues rewritten.
    async fn renormalize(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueRepositoryResult<usize>;
}

/// Errors returned by issue repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueRepositoryError {
    /// A concurrent writer claimed the number; retrying picks a fresh one.
    #[error("issue number {number} already taken in team {team}")]
    NumberConflict {
        /// Team whose sequence collided.
        team: TeamId,
        /// Number that collided.
        number: IssueNumber,
    },

    /// The transaction lost a serialisation race and may be retried.
    #[error("transaction conflict in team {0}")]
    SerializationConflict(TeamId),

    /// The team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// The status does not exist.
    #[error("workflow state not found: {0}")]
    StatusNotFound(WorkflowStateId),

    /// The status belongs to a different team.
    #[error("workflow state {status} does not belong to team {team}")]
    StatusOutsideTeam {
        /// Team the issue belongs to.
        team: TeamId,
        /// Offending status.
        status: WorkflowStateId,
    },

    /// The issue was not found.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// The team's sequence cannot produce another number.
    #[error("issue numbers exhausted for team {0}")]
    SequenceExhausted(TeamId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for conflicts that a fresh attempt can resolve.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NumberConflict { .. } | Self::SerializationConflict(_)
        )
    }
}
