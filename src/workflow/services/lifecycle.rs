//! Service layer for creating, reordering, and deleting workflow states.

use crate::position::Position;
use crate::team::domain::TeamId;
use crate::workflow::{
    domain::{
        DeletionGuard, GuardViolation, StateColor, StateKind, StateName, WorkflowDomainError,
        WorkflowState, WorkflowStateDraft, WorkflowStateId,
    },
    ports::{WorkflowStateRepository, WorkflowStateRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a workflow state.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateStateRequest {
    name: String,
    kind: StateKind,
    color: Option<String>,
    position: Option<f64>,
    description: Option<String>,
    is_default: bool,
}

impl CreateStateRequest {
    /// Creates a request with the required name and kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: StateKind) -> Self {
        Self {
            name: name.into(),
            kind,
            color: None,
            position: None,
            description: None,
            is_default: false,
        }
    }

    /// Sets the hex colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets an explicit position. Zero is treated as omitted.
    #[must_use]
    pub const fn with_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the state as template-provisioned.
    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Partial update for a workflow state. Omitted fields are left unchanged.
///
/// There is deliberately no way to supply a kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStateRequest {
    name: Option<String>,
    color: Option<String>,
    position: Option<f64>,
    description: Option<String>,
}

impl UpdateStateRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the state.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Changes the colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Moves the state.
    #[must_use]
    pub const fn with_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }

    /// Replaces the description. An empty string clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for workflow-state operations.
#[derive(Debug, Error)]
pub enum WorkflowLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),

    /// The state does not exist.
    #[error("workflow state not found: {0}")]
    NotFound(WorkflowStateId),

    /// A deletion guard refused the operation.
    #[error("deletion rejected: {0}")]
    Rejected(GuardViolation),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(WorkflowStateRepositoryError),
}

impl WorkflowLifecycleError {
    /// Returns `true` when the caller supplied invalid input or asked for an
    /// operation the guards forbid.
    #[must_use]
    pub const fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::Domain(_)
                | Self::Rejected(_)
                | Self::Repository(WorkflowStateRepositoryError::DuplicateName { .. })
        )
    }

    /// Returns `true` when a referenced state or team does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Repository(WorkflowStateRepositoryError::TeamNotFound(_))
        )
    }
}

impl From<WorkflowStateRepositoryError> for WorkflowLifecycleError {
    fn from(err: WorkflowStateRepositoryError) -> Self {
        match err {
            WorkflowStateRepositoryError::NotFound(id) => Self::NotFound(id),
            WorkflowStateRepositoryError::Guarded(violation) => Self::Rejected(violation),
            other => Self::Repository(other),
        }
    }
}

/// Result type for workflow lifecycle service operations.
pub type WorkflowLifecycleResult<T> = Result<T, WorkflowLifecycleError>;

/// Workflow-state lifecycle orchestration service.
pub struct WorkflowLifecycleService<R, C>
where
    R: WorkflowStateRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    default_color: StateColor,
}

impl<R, C> Clone for WorkflowLifecycleService<R, C>
where
    R: WorkflowStateRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            default_color: self.default_color.clone(),
        }
    }
}

impl<R, C> WorkflowLifecycleService<R, C>
where
    R: WorkflowStateRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow lifecycle service using neutral grey for states
    /// created without a colour.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            default_color: StateColor::neutral(),
        }
    }

    /// Overrides the colour given to states created without one.
    #[must_use]
    pub fn with_default_color(mut self, color: StateColor) -> Self {
        self.default_color = color;
        self
    }

    /// Validates a creation request and turns it into a draft without
    /// touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowLifecycleError::Domain`] for an empty or overlong
    /// name, a malformed colour, or a non-finite position.
    pub fn plan_state(
        &self,
        team_id: TeamId,
        request: CreateStateRequest,
    ) -> WorkflowLifecycleResult<WorkflowStateDraft> {
        let name = StateName::new(request.name)?;
        let color = request
            .color
            .map(StateColor::new)
            .transpose()?
            .unwrap_or_else(|| self.default_color.clone());
        let mut draft =
            WorkflowStateDraft::new(team_id, name, request.kind, &*self.clock).with_color(color);
        if let Some(raw) = request.position {
            draft = draft.with_position(Position::new(raw).map_err(WorkflowDomainError::from)?);
        }
        if let Some(description) = request.description {
            draft = draft.with_description(description);
        }
        if request.is_default {
            draft = draft.as_default();
        }
        Ok(draft)
    }

    /// Creates a workflow state for a team.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowLifecycleError`] when validation fails, the team is
    /// unknown, or the name is already taken in the team.
    pub async fn create_state(
        &self,
        team_id: TeamId,
        request: CreateStateRequest,
    ) -> WorkflowLifecycleResult<WorkflowState> {
        let draft = self.plan_state(team_id, request)?;
        let state = self.repository.create(draft).await?;
        info!(
            team = %team_id,
            state = %state.id(),
            kind = %state.kind(),
            position = %state.position(),
            "created workflow state"
        );
        Ok(state)
    }

    /// Stores the planned states whose kind the team lacks, as one unit.
    ///
    /// Returns the states that were stored; kinds the team already has are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowLifecycleError::Repository`] when the team is
    /// unknown or a name collides; nothing is stored in that case.
    pub async fn store_missing_kinds(
        &self,
        team_id: TeamId,
        states: &[WorkflowState],
    ) -> WorkflowLifecycleResult<Vec<WorkflowState>> {
        Ok(self.repository.store_missing_kinds(team_id, states).await?)
    }

    /// Lists a team's states in board order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowLifecycleError::Repository`] when the lookup fails.
    pub async fn list_states(&self, team_id: TeamId) -> WorkflowLifecycleResult<Vec<WorkflowState>> {
        Ok(self.repository.list_by_team(team_id).await?)
    }

    /// Loads a state by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowLifecycleError::NotFound`] when the state does not
    /// exist.
    pub async fn get_state(&self, id: WorkflowStateId) -> WorkflowLifecycleResult<WorkflowState> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(WorkflowLifecycleError::NotFound(id))
    }

    /// Applies a partial update to a state.
    ///
    /// Every supplied field is validated before any is applied.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowLifecycleError`] when the state is unknown, a field
    /// is invalid, or a rename collides with another state in the team.
    pub async fn update_state(
        &self,
        id: WorkflowStateId,
        request: UpdateStateRequest,
    ) -> WorkflowLifecycleResult<WorkflowState> {
        let name = request.name.map(StateName::new).transpose()?;
        let color = request.color.map(StateColor::new).transpose()?;
        let position = request
            .position
            .map(Position::new)
            .transpose()
            .map_err(WorkflowDomainError::from)?;

        let mut state = self.get_state(id).await?;
        let clock = &*self.clock;
        if let Some(name) = name {
            state.rename(name, clock);
        }
        if let Some(color) = color {
            state.recolor(color, clock);
        }
        if let Some(position) = position {
            state.reposition(position, clock);
        }
        if let Some(description) = request.description {
            state.describe(description, clock);
        }
        self.repository.update(&state).await?;
        Ok(state)
    }

    /// Deletes a state once no issue references it and another state of the
    /// same kind remains in the team.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowLifecycleError::Rejected`] naming the guard that
    /// failed, or [`WorkflowLifecycleError::NotFound`] for unknown states.
    pub async fn delete_state(&self, id: WorkflowStateId) -> WorkflowLifecycleResult<()> {
        match self.repository.delete(id, DeletionGuard).await {
            Ok(state) => {
                info!(
                    team = %state.team_id(),
                    state = %id,
                    kind = %state.kind(),
                    "deleted workflow state"
                );
                Ok(())
            }
            Err(WorkflowStateRepositoryError::Guarded(violation)) => {
                warn!(state = %id, %violation, "workflow state deletion rejected");
                Err(WorkflowLifecycleError::Rejected(violation))
            }
            Err(err) => Err(err.into()),
        }
    }
}
