//! Repository port for team persistence and lookup.

use crate::team::domain::{Team, TeamId, TeamKey};
use crate::workflow::domain::{StateName, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for team repository operations.
pub type TeamRepositoryResult<T> = Result<T, TeamRepositoryError>;

/// Team persistence contract.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Stores a new team together with its initial workflow states.
    ///
    /// The team and every state commit as one unit: on any error neither the
    /// team nor any of the states is visible afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicateTeam`] or
    /// [`TeamRepositoryError::DuplicateKey`] when the team collides, and
    /// [`TeamRepositoryError::DuplicateStateName`] when two states share a
    /// name.
    async fn create_with_states(
        &self,
        team: &Team,
        states: &[WorkflowState],
    ) -> TeamRepositoryResult<()>;

    /// Finds a team by identifier.
    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>>;

    /// Finds a team by its key.
    async fn find_by_key(&self, key: &TeamKey) -> TeamRepositoryResult<Option<Team>>;
}

/// Errors returned by team repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TeamRepositoryError {
    /// A team with the same identifier already exists.
    #[error("duplicate team identifier: {0}")]
    DuplicateTeam(TeamId),

    /// A team with the same key already exists.
    #[error("duplicate team key: {0}")]
    DuplicateKey(TeamKey),

    /// Two provisioned states share a name.
    #[error("duplicate workflow state name: {0}")]
    DuplicateStateName(StateName),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TeamRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
