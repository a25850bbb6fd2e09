//! Service layer for issue creation, numbering retries, and reordering.

use crate::issue::{
    domain::{
        ActorId, Issue, IssueDomainError, IssueDraft, IssueId, IssueNumber, IssueTitle, Priority,
        ProjectId,
    },
    ports::{IssueRepository, IssueRepositoryError},
};
use crate::position::Position;
use crate::team::domain::TeamId;
use crate::workflow::{
    domain::{WorkflowState, WorkflowStateId},
    ports::{WorkflowStateRepository, WorkflowStateRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating an issue.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIssueRequest {
    team_id: TeamId,
    title: String,
    status_id: WorkflowStateId,
    priority: i64,
    description: Option<String>,
    assignee_id: Option<ActorId>,
    project_id: Option<ProjectId>,
    created_by: Option<ActorId>,
    position: Option<f64>,
}

impl CreateIssueRequest {
    /// Creates a request with the required team, title, and status.
    #[must_use]
    pub fn new(team_id: TeamId, title: impl Into<String>, status_id: WorkflowStateId) -> Self {
        Self {
            team_id,
            title: title.into(),
            status_id,
            priority: 0,
            description: None,
            assignee_id: None,
            project_id: None,
            created_by: None,
            position: None,
        }
    }

    /// Sets the numeric priority level (`0` none through `4` low).
    #[must_use]
    pub const fn with_priority(mut self, level: i64) -> Self {
        self.priority = level;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: ActorId) -> Self {
        self.assignee_id = Some(assignee);
        self
    }

    /// Sets the project.
    #[must_use]
    pub const fn with_project(mut self, project: ProjectId) -> Self {
        self.project_id = Some(project);
        self
    }

    /// Records the creating user.
    #[must_use]
    pub const fn with_creator(mut self, creator: ActorId) -> Self {
        self.created_by = Some(creator);
        self
    }

    /// Sets an explicit position. Zero is treated as omitted.
    #[must_use]
    pub const fn with_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }
}

/// Request payload for moving an issue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdatePositionRequest {
    position: f64,
    status_id: Option<WorkflowStateId>,
}

impl UpdatePositionRequest {
    /// Moves the issue to `position` within its current status.
    #[must_use]
    pub const fn new(position: f64) -> Self {
        Self {
            position,
            status_id: None,
        }
    }

    /// Also moves the issue into another status of the same team.
    #[must_use]
    pub const fn with_status(mut self, status_id: WorkflowStateId) -> Self {
        self.status_id = Some(status_id);
        self
    }
}

/// Bounded retry for numbering conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl NumberingPolicy {
    /// Creates a policy making at most `max_attempts` attempts (at least
    /// one), sleeping `backoff × attempt` between them.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Returns the attempt limit.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for NumberingPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(5))
    }
}

/// Service-level errors for issue operations.
#[derive(Debug, Error)]
pub enum IssueLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IssueDomainError),

    /// The issue does not exist.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// The requested status does not exist.
    #[error("workflow state not found: {0}")]
    StatusNotFound(WorkflowStateId),

    /// Every numbering attempt lost a race.
    #[error("could not assign an issue number in team {team} after {attempts} attempts")]
    NumberingExhausted {
        /// Team whose sequence was contended.
        team: TeamId,
        /// Attempts made.
        attempts: u32,
    },

    /// Issue repository operation failed.
    #[error(transparent)]
    Repository(IssueRepositoryError),

    /// Workflow-state lookup failed.
    #[error(transparent)]
    Workflow(WorkflowStateRepositoryError),
}

impl IssueLifecycleError {
    /// Returns `true` when the request itself was at fault.
    #[must_use]
    pub const fn is_client_fault(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Returns `true` when a referenced issue, status, or team does not
    /// exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::StatusNotFound(_)
                | Self::Repository(IssueRepositoryError::TeamNotFound(_))
        )
    }
}

impl From<IssueRepositoryError> for IssueLifecycleError {
    fn from(err: IssueRepositoryError) -> Self {
        match err {
            IssueRepositoryError::NotFound(id) => Self::NotFound(id),
            IssueRepositoryError::StatusNotFound(status) => Self::StatusNotFound(status),
            IssueRepositoryError::StatusOutsideTeam { team, status } => {
                Self::Domain(IssueDomainError::StatusOutsideTeam { team, status })
            }
            other => Self::Repository(other),
        }
    }
}

impl From<WorkflowStateRepositoryError> for IssueLifecycleError {
    fn from(err: WorkflowStateRepositoryError) -> Self {
        Self::Workflow(err)
    }
}

/// Result type for issue lifecycle service operations.
pub type IssueLifecycleResult<T> = Result<T, IssueLifecycleError>;

/// Issue lifecycle orchestration service.
#[derive(Clone)]
pub struct IssueLifecycleService<I, W, C>
where
    I: IssueRepository,
    W: WorkflowStateRepository,
    C: Clock + Send + Sync,
{
    issues: Arc<I>,
    states: Arc<W>,
    clock: Arc<C>,
    numbering: NumberingPolicy,
}

impl<I, W, C> IssueLifecycleService<I, W, C>
where
    I: IssueRepository,
    W: WorkflowStateRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new issue lifecycle service with the default numbering
    /// policy.
    #[must_use]
    pub fn new(issues: Arc<I>, states: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            issues,
            states,
            clock,
            numbering: NumberingPolicy::default(),
        }
    }

    /// Replaces the numbering retry policy.
    #[must_use]
    pub const fn with_numbering(mut self, numbering: NumberingPolicy) -> Self {
        self.numbering = numbering;
        self
    }

    /// Creates an issue with the next number in its team.
    ///
    /// All input is validated before anything is written. Numbering conflicts
    /// are retried with a short linear backoff up to the policy's limit.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::Domain`] for invalid input or a status
    /// from another team, [`IssueLifecycleError::StatusNotFound`] for an
    /// unknown status, and [`IssueLifecycleError::NumberingExhausted`] when
    /// every attempt conflicted.
    pub async fn create_issue(&self, request: CreateIssueRequest) -> IssueLifecycleResult<Issue> {
        let title = IssueTitle::new(request.title)?;
        let priority = Priority::from_level(request.priority)?;
        let position = request
            .position
            .map(Position::new)
            .transpose()
            .map_err(IssueDomainError::from)?;
        self.status_in_team(request.team_id, request.status_id).await?;

        let mut draft = IssueDraft::new(request.team_id, title, request.status_id, &*self.clock)
            .with_priority(priority);
        if let Some(description) = request.description {
            draft = draft.with_description(description);
        }
        if let Some(assignee) = request.assignee_id {
            draft = draft.with_assignee(assignee);
        }
        if let Some(project) = request.project_id {
            draft = draft.with_project(project);
        }
        if let Some(creator) = request.created_by {
            draft = draft.with_creator(creator);
        }
        if let Some(explicit) = position {
            draft = draft.with_position(explicit);
        }
        self.store_numbered(&draft).await
    }

    async fn store_numbered(&self, draft: &IssueDraft) -> IssueLifecycleResult<Issue> {
        let team = draft.team_id();
        let max_attempts = self.numbering.max_attempts();
        for attempt in 1..=max_attempts {
            match self.issues.create(draft).await {
                Ok(issue) => {
                    info!(
                        team = %team,
                        issue = %issue.id(),
                        number = %issue.number(),
                        attempt,
                        "created issue"
                    );
                    return Ok(issue);
                }
                Err(err) if err.is_retryable() => {
                    warn!(team = %team, attempt, error = %err, "issue numbering conflict");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.numbering.backoff.saturating_mul(attempt)).await;
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(IssueLifecycleError::NumberingExhausted {
            team,
            attempts: max_attempts,
        })
    }

    /// Moves an issue to a new position, optionally in another status.
    ///
    /// No other issue is touched and the number never changes.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::NotFound`] for unknown issues,
    /// [`IssueLifecycleError::StatusNotFound`] for unknown statuses, and
    /// [`IssueLifecycleError::Domain`] for non-finite positions or statuses
    /// from another team.
    pub async fn update_position(
        &self,
        id: IssueId,
        request: UpdatePositionRequest,
    ) -> IssueLifecycleResult<Issue> {
        let position = Position::new(request.position).map_err(IssueDomainError::from)?;
        let mut issue = self.get_issue(id).await?;
        match request.status_id {
            Some(status_id) => {
                let status = self.status_in_team(issue.team_id(), status_id).await?;
                issue.transition(status_id, status.kind(), position, &*self.clock);
            }
            None => issue.reposition(position, &*self.clock),
        }
        self.issues.update_placement(&issue).await?;
        debug!(
            issue = %id,
            status = %issue.status_id(),
            position = %issue.position(),
            "moved issue"
        );
        Ok(issue)
    }

    /// Respaces the positions of every issue in a status to `1000, 2000, …`
    /// keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::StatusNotFound`] or
    /// [`IssueLifecycleError::Domain`] when the status is unknown or belongs
    /// to another team.
    pub async fn renormalize_positions(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueLifecycleResult<usize> {
        self.status_in_team(team_id, status_id).await?;
        let rewritten = self.issues.renormalize(team_id, status_id).await?;
        info!(team = %team_id, status = %status_id, rewritten, "renormalised issue positions");
        Ok(rewritten)
    }

    /// Loads an issue by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::NotFound`] when the issue does not
    /// exist.
    pub async fn get_issue(&self, id: IssueId) -> IssueLifecycleResult<Issue> {
        self.issues
            .find_by_id(id)
            .await?
            .ok_or(IssueLifecycleError::NotFound(id))
    }

    /// Finds an issue by its team-scoped number.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::Domain`] for non-positive numbers.
    pub async fn find_by_number(
        &self,
        team_id: TeamId,
        number: i64,
    ) -> IssueLifecycleResult<Option<Issue>> {
        let parsed = IssueNumber::new(number)?;
        Ok(self.issues.find_by_number(team_id, parsed).await?)
    }

    /// Lists the issues in a status in board order.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::Repository`] when the lookup fails.
    pub async fn list_issues_in_status(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueLifecycleResult<Vec<Issue>> {
        Ok(self.issues.list_by_status(team_id, status_id).await?)
    }

    async fn status_in_team(
        &self,
        team_id: TeamId,
        status_id: WorkflowStateId,
    ) -> IssueLifecycleResult<WorkflowState> {
        let status = self
            .states
            .find_by_id(status_id)
            .await?
            .ok_or(IssueLifecycleError::StatusNotFound(status_id))?;
        if status.team_id() != team_id {
            return Err(IssueDomainError::StatusOutsideTeam {
                team: team_id,
                status: status_id,
            }
            .into());
        }
        Ok(status)
    }
}
