//! Issue aggregate and its creation draft.

use super::{
    ActorId, IssueId, IssueIdentifier, IssueNumber, IssueTitle, Priority, ProjectId,
};
use crate::position::Position;
use crate::team::domain::{TeamId, TeamKey};
use crate::workflow::domain::{StateKind, WorkflowStateId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A unit of work owned by a team and sitting in one workflow state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    id: IssueId,
    team_id: TeamId,
    number: IssueNumber,
    title: IssueTitle,
    description: Option<String>,
    status_id: WorkflowStateId,
    priority: Priority,
    assignee_id: Option<ActorId>,
    project_id: Option<ProjectId>,
    created_by: Option<ActorId>,
    position: Position,
    completed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted issue.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedIssueData {
    /// Persisted issue identifier.
    pub id: IssueId,
    /// Owning team.
    pub team_id: TeamId,
    /// Team-scoped number.
    pub number: IssueNumber,
    /// Persisted title.
    pub title: IssueTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Current workflow state.
    pub status_id: WorkflowStateId,
    /// Persisted priority.
    pub priority: Priority,
    /// Assigned user, if any.
    pub assignee_id: Option<ActorId>,
    /// Project, if any.
    pub project_id: Option<ProjectId>,
    /// Creating user, if known.
    pub created_by: Option<ActorId>,
    /// Persisted sort key.
    pub position: Position,
    /// Completion timestamp, if completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp, if cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated issue content waiting for a number.
///
/// Numbers, and default positions derived from them, are only known inside
/// the store's serialised section, so the store finishes the draft.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueDraft {
    id: IssueId,
    team_id: TeamId,
    title: IssueTitle,
    description: Option<String>,
    status_id: WorkflowStateId,
    priority: Priority,
    assignee_id: Option<ActorId>,
    project_id: Option<ProjectId>,
    created_by: Option<ActorId>,
    position: Option<Position>,
    created_at: DateTime<Utc>,
}

impl IssueDraft {
    /// Starts a draft in the given team and status.
    #[must_use]
    pub fn new(
        team_id: TeamId,
        title: IssueTitle,
        status_id: WorkflowStateId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: IssueId::new(),
            team_id,
            title,
            description: None,
            status_id,
            priority: Priority::None,
            assignee_id: None,
            project_id: None,
            created_by: None,
            position: None,
            created_at: clock.utc(),
        }
    }

    /// Sets the description, dropping blank values.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let value = description.into();
        let trimmed = value.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
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

    /// Pins the position. Unset (zero) positions are ignored.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = (!position.is_unset()).then_some(position);
        self
    }

    /// Returns the draft identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the requested status.
    #[must_use]
    pub const fn status_id(&self) -> WorkflowStateId {
        self.status_id
    }

    /// Returns the explicit position, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    /// Completes the draft with its assigned number.
    ///
    /// Without an explicit position the issue is placed at `number × 1000`.
    /// Issues filed directly into a terminal state get the matching
    /// timestamp.
    #[must_use]
    pub fn into_issue(self, number: IssueNumber, status_kind: StateKind) -> Issue {
        let position = self
            .position
            .unwrap_or_else(|| Position::for_sequence(u64::from(number.value())));
        let mut issue = Issue {
            id: self.id,
            team_id: self.team_id,
            number,
            title: self.title,
            description: self.description,
            status_id: self.status_id,
            priority: self.priority,
            assignee_id: self.assignee_id,
            project_id: self.project_id,
            created_by: self.created_by,
            position,
            completed_at: None,
            cancelled_at: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        };
        issue.stamp_terminal(status_kind, self.created_at);
        issue
    }
}

impl Issue {
    /// Reconstructs an issue from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            team_id: data.team_id,
            number: data.number,
            title: data.title,
            description: data.description,
            status_id: data.status_id,
            priority: data.priority,
            assignee_id: data.assignee_id,
            project_id: data.project_id,
            created_by: data.created_by,
            position: data.position,
            completed_at: data.completed_at,
            cancelled_at: data.cancelled_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Moves the issue to a new position without changing its status.
    pub fn reposition(&mut self, position: Position, clock: &impl Clock) {
        self.position = position;
        self.updated_at = clock.utc();
    }

    /// Overwrites the position during a bucket respacing pass.
    ///
    /// The update timestamp is left alone because the visible order does not
    /// change.
    pub const fn respace(&mut self, position: Position) {
        self.position = position;
    }

    /// Moves the issue to a new position in another status.
    ///
    /// Entering a `completed` or `canceled` state stamps the matching
    /// timestamp; any other kind clears both. Moving within the same status
    /// leaves the timestamps alone.
    pub fn transition(
        &mut self,
        status_id: WorkflowStateId,
        status_kind: StateKind,
        position: Position,
        clock: &impl Clock,
    ) {
        let now = clock.utc();
        if status_id != self.status_id {
            self.status_id = status_id;
            self.stamp_terminal(status_kind, now);
        }
        self.position = position;
        self.updated_at = now;
    }

    fn stamp_terminal(&mut self, kind: StateKind, at: DateTime<Utc>) {
        self.completed_at = None;
        self.cancelled_at = None;
        match kind {
            StateKind::Completed => self.completed_at = Some(at),
            StateKind::Canceled => self.cancelled_at = Some(at),
            StateKind::Backlog | StateKind::Unstarted | StateKind::Started => {}
        }
    }

    /// Renders the human identifier for this issue, e.g. `ENG-42`.
    #[must_use]
    pub fn identifier(&self, key: &TeamKey) -> IssueIdentifier {
        IssueIdentifier::new(key, self.number)
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the team-scoped number.
    #[must_use]
    pub const fn number(&self) -> IssueNumber {
        self.number
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &IssueTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status_id(&self) -> WorkflowStateId {
        self.status_id
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<ActorId> {
        self.assignee_id
    }

    /// Returns the project.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> Option<ActorId> {
        self.created_by
    }

    /// Returns the sort key.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns when the issue was completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns when the issue was cancelled.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
