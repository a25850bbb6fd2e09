//! Service layer that creates teams together with their workflow states.

use crate::position::Position;
use crate::team::{
    domain::{ProvisioningTemplate, Team, TeamDomainError, TeamId, TeamKey, TeamName},
    ports::{TeamRepository, TeamRepositoryError},
};
use crate::workflow::{
    domain::{StateKind, WorkflowState},
    ports::WorkflowStateRepository,
    services::{CreateStateRequest, WorkflowLifecycleError, WorkflowLifecycleService},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamRequest {
    key: String,
    name: String,
    description: Option<String>,
}

impl CreateTeamRequest {
    /// Creates a request with the required key and name.
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: None,
        }
    }

    /// Sets the team description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for team provisioning.
#[derive(Debug, Error)]
pub enum TeamProvisioningError {
    /// Team validation failed.
    #[error(transparent)]
    Domain(#[from] TeamDomainError),

    /// Planning or storing a workflow state failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowLifecycleError),

    /// The team does not exist.
    #[error("team not found: {0}")]
    NotFound(TeamId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TeamRepositoryError),
}

impl TeamProvisioningError {
    /// Returns `true` when the request itself was at fault.
    #[must_use]
    pub const fn is_client_fault(&self) -> bool {
        match self {
            Self::Domain(_)
            | Self::Repository(
                TeamRepositoryError::DuplicateKey(_) | TeamRepositoryError::DuplicateStateName(_),
            ) => true,
            Self::Workflow(err) => err.is_client_fault(),
            Self::NotFound(_) | Self::Repository(_) => false,
        }
    }

    /// Returns `true` when the team does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Workflow(err) => err.is_not_found(),
            Self::Domain(_) | Self::Repository(_) => false,
        }
    }
}

/// Result type for team provisioning operations.
pub type TeamProvisioningResult<T> = Result<T, TeamProvisioningError>;

/// Creates teams and keeps their default workflow states in place.
#[derive(Clone)]
pub struct TeamProvisioningService<T, W, C>
where
    T: TeamRepository,
    W: WorkflowStateRepository,
    C: Clock + Send + Sync,
{
    teams: Arc<T>,
    workflow: WorkflowLifecycleService<W, C>,
    clock: Arc<C>,
    template: ProvisioningTemplate,
}

impl<T, W, C> TeamProvisioningService<T, W, C>
where
    T: TeamRepository,
    W: WorkflowStateRepository,
    C: Clock + Send + Sync,
{
    /// Creates a provisioning service using the canonical five-state
    /// template.
    #[must_use]
    pub fn new(teams: Arc<T>, workflow: WorkflowLifecycleService<W, C>, clock: Arc<C>) -> Self {
        Self {
            teams,
            workflow,
            clock,
            template: ProvisioningTemplate::canonical(),
        }
    }

    /// Replaces the provisioning template.
    #[must_use]
    pub fn with_template(mut self, template: ProvisioningTemplate) -> Self {
        self.template = template;
        self
    }

    /// Creates a team and its default workflow states in one unit.
    ///
    /// Each template entry goes through workflow-state planning, then the
    /// team and all planned states are stored together. If any step fails,
    /// neither the team nor any of its states remains.
    ///
    /// # Errors
    ///
    /// Returns [`TeamProvisioningError`] when validation fails, the key is
    /// taken, or the store rejects a state.
    pub async fn create_team(&self, request: CreateTeamRequest) -> TeamProvisioningResult<Team> {
        let key = TeamKey::new(request.key)?;
        let name = TeamName::new(request.name)?;
        let mut team = Team::new(key, name, &*self.clock);
        if let Some(description) = request.description {
            team = team.with_description(description);
        }

        let states = self.plan_template(team.id())?;
        self.teams.create_with_states(&team, &states).await?;
        info!(
            team = %team.id(),
            key = %team.key(),
            states = states.len(),
            "created team with default workflow states"
        );
        Ok(team)
    }

    /// Adds any template states whose kind the team does not have yet.
    ///
    /// Running this on a fully provisioned team changes nothing. Returns the
    /// states that were added.
    ///
    /// # Errors
    ///
    /// Returns [`TeamProvisioningError::NotFound`] for unknown teams, or a
    /// workflow error when a planned state collides with an existing name.
    pub async fn provision_default_states(
        &self,
        team_id: TeamId,
    ) -> TeamProvisioningResult<Vec<WorkflowState>> {
        if self.teams.find_by_id(team_id).await?.is_none() {
            return Err(TeamProvisioningError::NotFound(team_id));
        }
        let planned = self.plan_template(team_id)?;
        let added = self.workflow.store_missing_kinds(team_id, &planned).await?;
        if added.is_empty() {
            return Ok(added);
        }
        info!(team = %team_id, added = added.len(), "provisioned missing workflow states");
        Ok(added)
    }

    /// Finds a team by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TeamProvisioningError::Repository`] when the lookup fails.
    pub async fn find_team(&self, id: TeamId) -> TeamProvisioningResult<Option<Team>> {
        Ok(self.teams.find_by_id(id).await?)
    }

    /// Finds a team by key. The key is normalised before lookup.
    ///
    /// # Errors
    ///
    /// Returns [`TeamProvisioningError::Domain`] for malformed keys or
    /// [`TeamProvisioningError::Repository`] when the lookup fails.
    pub async fn find_by_key(&self, raw_key: &str) -> TeamProvisioningResult<Option<Team>> {
        let key = TeamKey::new(raw_key)?;
        Ok(self.teams.find_by_key(&key).await?)
    }

    fn plan_template(&self, team_id: TeamId) -> TeamProvisioningResult<Vec<WorkflowState>> {
        self.template
            .entries()
            .iter()
            .map(|entry| -> TeamProvisioningResult<WorkflowState> {
                let request = CreateStateRequest::new(entry.name.clone(), entry.kind)
                    .with_color(entry.color.clone())
                    .with_position(entry.position.value())
                    .as_default();
                let draft = self.workflow.plan_state(team_id, request)?;
                Ok(draft.resolve(|| Position::for_slot(slot_of(entry.kind))))
            })
            .collect()
    }
}

/// One-based board slot of a kind in canonical order.
const fn slot_of(kind: StateKind) -> u32 {
    match kind {
        StateKind::Backlog => 1,
        StateKind::Unstarted => 2,
        StateKind::Started => 3,
        StateKind::Completed => 4,
        StateKind::Canceled => 5,
    }
}
