//! In-memory store for tests and embedding.

mod issue;
mod team;
mod workflow;

use crate::issue::domain::{Issue, IssueId, IssueNumber};
use crate::team::domain::{Team, TeamId, TeamKey};
use crate::workflow::domain::{StateName, WorkflowState, WorkflowStateId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory tracker store.
///
/// A single lock guards every aggregate, which makes each port operation
/// atomic and serialises writers the same way a team-row lock would.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<TrackerState>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    teams: HashMap<TeamId, Team>,
    team_keys: HashMap<TeamKey, TeamId>,
    states: HashMap<WorkflowStateId, WorkflowState>,
    issues: HashMap<IssueId, Issue>,
    issue_numbers: HashMap<(TeamId, IssueNumber), IssueId>,
}

impl InMemoryTrackerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<E>(
        &self,
        wrap: impl FnOnce(std::io::Error) -> E,
    ) -> Result<RwLockReadGuard<'_, TrackerState>, E> {
        self.state.read().map_err(|err| wrap(poisoned(&err)))
    }

    fn write<E>(
        &self,
        wrap: impl FnOnce(std::io::Error) -> E,
    ) -> Result<RwLockWriteGuard<'_, TrackerState>, E> {
        self.state.write().map_err(|err| wrap(poisoned(&err)))
    }
}

fn poisoned(err: &impl fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

impl TrackerState {
    fn team_states(&self, team_id: TeamId) -> impl Iterator<Item = &WorkflowState> {
        self.states
            .values()
            .filter(move |state| state.team_id() == team_id)
    }

    fn name_taken(
        &self,
        team_id: TeamId,
        name: &StateName,
        except: Option<WorkflowStateId>,
    ) -> bool {
        self.team_states(team_id)
            .filter(|state| Some(state.id()) != except)
            .any(|state| state.name().collides_with(name))
    }
}
