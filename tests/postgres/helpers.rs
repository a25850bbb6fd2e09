//! Shared helpers for `PostgreSQL` integration tests.
//!
//! Each tracker runs against its own database cloned from the migrated
//! template on the shared embedded cluster.

use std::collections::HashMap;
use std::sync::Arc;

use diesel::prelude::*;
use mockable::DefaultClock;
use ticketry::issue::services::IssueLifecycleService;
use ticketry::storage::postgres::{PostgresTrackerStore, TrackerPgPool, apply_schema, connect};
use ticketry::team::{
    domain::Team,
    services::{CreateTeamRequest, TeamProvisioningService},
};
use ticketry::workflow::{
    domain::{StateKind, WorkflowStateId},
    services::WorkflowLifecycleService,
};

use super::cluster::{BoxError, TEMPLATE_DATABASE, TemporaryDatabase, shared_cluster};

/// Workflow service over the `PostgreSQL` store.
pub type Workflow = WorkflowLifecycleService<PostgresTrackerStore, DefaultClock>;
/// Team service over the `PostgreSQL` store.
pub type Teams = TeamProvisioningService<PostgresTrackerStore, PostgresTrackerStore, DefaultClock>;
/// Issue service over the `PostgreSQL` store.
pub type Issues = IssueLifecycleService<PostgresTrackerStore, PostgresTrackerStore, DefaultClock>;

/// Services sharing one store over a migrated temporary database.
pub struct PgTracker {
    pub teams: Arc<Teams>,
    pub workflow: Arc<Workflow>,
    pub issues: Arc<Issues>,
    pub pool: TrackerPgPool,
    // Dropped last so pooled connections close first.
    _database: TemporaryDatabase,
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

impl PgTracker {
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

    /// Counts rows in `table` directly through the pool.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub fn count_rows(&self, table: &str) -> eyre::Result<i64> {
        #[derive(QueryableByName)]
        struct Count {
            #[diesel(sql_type = diesel::sql_types::BigInt)]
            total: i64,
        }
        let mut connection = self.pool.get()?;
        let row: Count = diesel::sql_query(format!("SELECT count(*) AS total FROM {table}"))
            .get_result(&mut connection)?;
        Ok(row.total)
    }
}

/// Builds a tracker over a fresh database on the shared cluster.
///
/// # Errors
///
/// Returns an error if the cluster cannot boot or the database cannot be
/// cloned from the template.
pub async fn pg_tracker() -> eyre::Result<PgTracker> {
    let database = tokio::task::spawn_blocking(|| -> Result<TemporaryDatabase, BoxError> {
        let cluster = shared_cluster()?;
        cluster.ensure_template_exists(TEMPLATE_DATABASE, |url| {
            let mut connection = PgConnection::establish(url)?;
            apply_schema(&mut connection)?;
            Ok(())
        })?;
        cluster.temporary_database(TEMPLATE_DATABASE)
    })
    .await?
    .map_err(|err| eyre::eyre!(err))?;

    let pool = connect(database.url(), 8)?;
    let store = Arc::new(PostgresTrackerStore::new(pool.clone()));
    let clock = Arc::new(DefaultClock);
    let workflow = WorkflowLifecycleService::new(Arc::clone(&store), Arc::clone(&clock));
    let teams = TeamProvisioningService::new(Arc::clone(&store), workflow.clone(), Arc::clone(&clock));
    let issues = IssueLifecycleService::new(Arc::clone(&store), store, clock);
    Ok(PgTracker {
        teams: Arc::new(teams),
        workflow: Arc::new(workflow),
        issues: Arc::new(issues),
        pool,
        _database: database,
    })
}
