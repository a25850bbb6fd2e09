//! Shared fixtures for in-memory tracker integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use ticketry::issue::services::IssueLifecycleService;
use ticketry::storage::memory::InMemoryTrackerStore;
use ticketry::team::{
    domain::{Team, TeamKey, TeamName},
    ports::TeamRepository,
    services::{CreateTeamRequest, TeamProvisioningService},
};
use ticketry::workflow::{
    domain::{StateKind, WorkflowStateId},
    services::WorkflowLifecycleService,
};

/// Workflow service over the in-memory store.
pub type Workflow = WorkflowLifecycleService<InMemoryTrackerStore, DefaultClock>;
/// Team service over the in-memory store.
pub type Teams = TeamProvisioningService<InMemoryTrackerStore, InMemoryTrackerStore, DefaultClock>;
/// Issue service over the in-memory store.
pub type Issues = IssueLifecycleService<InMemoryTrackerStore, InMemoryTrackerStore, DefaultClock>;

/// Every service wired to one shared store.
pub struct Tracker {
    pub store: Arc<InMemoryTrackerStore>,
    pub teams: Arc<Teams>,
    pub workflow: Arc<Workflow>,
    pub issues: Arc<Issues>,
}

/// A provisioned team with its default state per kind.
pub struct ProvisionedTeam {
    pub team: Team,
    pub states: HashMap<StateKind, WorkflowStateId>,
}

impl ProvisionedTeam {
    /// Returns the default state of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the team has no state of that kind.
    pub fn state(&self, kind: StateKind) -> eyre::Result<WorkflowStateId> {
        self.states
            .get(&kind)
            .copied()
            .ok_or_else(|| eyre::eyre!("team has no {kind} state"))
    }
}

impl Tracker {
    /// Stores a team without any workflow states.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is malformed or already taken.
    pub async fn bare_team(&self, key: &str) -> eyre::Result<Team> {
        let team = Team::new(
            TeamKey::new(key)?,
            TeamName::new(format!("{key} team"))?,
            &DefaultClock,
        );
        self.store.create_with_states(&team, &[]).await?;
        Ok(team)
    }

    /// Creates a team from the canonical template.
    ///
    /// # Errors
    ///
    /// Returns an error if creation or the state listing fails.
    pub async fn provision(&self, key: &str) -> eyre::Result<ProvisionedTeam> {
        let team = self
            .teams
            .create_team(CreateTeamRequest::new(key, format!("{key} team")))
            .await?;
        let states = self
            .workflow
            .list_states(team.id())
            .await?
            .iter()
            .map(|state| (state.kind(), state.id()))
            .collect();
        Ok(ProvisionedTeam { team, states })
    }
}

/// Provides services sharing a fresh in-memory store.
#[fixture]
pub fn tracker() -> Tracker {
    let store = Arc::new(InMemoryTrackerStore::new());
    let clock = Arc::new(DefaultClock);
    let workflow = WorkflowLifecycleService::new(Arc::clone(&store), Arc::clone(&clock));
    let teams = TeamProvisioningService::new(Arc::clone(&store), workflow.clone(), Arc::clone(&clock));
    let issues = IssueLifecycleService::new(Arc::clone(&store), Arc::clone(&store), clock);
    Tracker {
        store,
        teams: Arc::new(teams),
        workflow: Arc::new(workflow),
        issues: Arc::new(issues),
    }
}
