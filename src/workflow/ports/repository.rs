//! Repository port for workflow-state storage, ordering, and guarded deletion.

use crate::team::domain::TeamId;
use crate::workflow::domain::{
    DeletionGuard, GuardViolation, StateName, WorkflowState, WorkflowStateDraft, WorkflowStateId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workflow-state repository operations.
pub type WorkflowStateRepositoryResult<T> = Result<T, WorkflowStateRepositoryError>;

/// Workflow-state persistence contract.
#[async_trait]
pub trait WorkflowStateRepository: Send + Sync {
    /// Stores a drafted state, resolving a missing position to the team's
    /// current maximum plus one step.
    ///
    /// The maximum is read and the row inserted while the team is locked, so
    /// concurrent creations never pick the same default.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowStateRepositoryError::TeamNotFound`] when the team
    /// does not exist or [`WorkflowStateRepositoryError::DuplicateName`] when
    /// the name is already used in the team.
    async fn create(&self, draft: WorkflowStateDraft)
    -> WorkflowStateRepositoryResult<WorkflowState>;

    /// Stores the planned states whose kind the team does not have yet.
    ///
    /// The kinds already present are read while the team is locked, so
    /// concurrent callers never store the same kind twice. The remaining
    /// states are stored as one unit; the stored ones are returned.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowStateRepositoryError::TeamNotFound`] or
    /// [`WorkflowStateRepositoryError::DuplicateName`]; nothing is stored in
    /// either case.
    async fn store_missing_kinds(
        &self,
        team_id: TeamId,
        states: &[WorkflowState],
    ) -> WorkflowStateRepositoryResult<Vec<WorkflowState>>;

    /// Persists name, colour, position, and description changes.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowStateRepositoryError::NotFound`] when the state does
    /// not exist or [`WorkflowStateRepositoryError::DuplicateName`] when a
    /// rename collides.
    async fn update(&self, state: &WorkflowState) -> WorkflowStateRepositoryResult<()>;

    /// Finds a state by identifier.
    async fn find_by_id(
        &self,
        id: WorkflowStateId,
    ) -> WorkflowStateRepositoryResult<Option<WorkflowState>>;

    /// Lists a team's states by position, then creation time.
    async fn list_by_team(&self, team_id: TeamId)
    -> WorkflowStateRepositoryResult<Vec<WorkflowState>>;

    /// Deletes a state if `guard` accepts the census taken in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowStateRepositoryError::NotFound`] when the state does
    /// not exist or [`WorkflowStateRepositoryError::Guarded`] when the guard
    /// refuses; nothing is removed in either case.
    async fn delete(
        &self,
        id: WorkflowStateId,
        guard: DeletionGuard,
    ) -> WorkflowStateRepositoryResult<WorkflowState>;
}

/// Errors returned by workflow-state repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkflowStateRepositoryError {
    /// The owning team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// Another state in the team already uses the name.
    #[error("team {team} already has a state named '{name}'")]
    DuplicateName {
        /// Team owning the colliding state.
        team: TeamId,
        /// Name that collided.
        name: StateName,
    },

    /// The state was not found.
    #[error("workflow state not found: {0}")]
    NotFound(WorkflowStateId),

    /// The deletion guard refused the delete.
    #[error(transparent)]
    Guarded(#[from] GuardViolation),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowStateRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
