//! `PostgreSQL` store for tracker persistence.
//!
//! Each port operation runs on the blocking pool with one pooled connection.
//! Multi-step writes run inside one transaction and take the team row
//! `FOR UPDATE` to serialise numbering and positioning per team.

mod convert;
mod issue;
mod migrations;
mod models;
mod schema;
mod team;
mod workflow;

pub use migrations::apply_schema;

use crate::issue::ports::IssueRepositoryError;
use crate::team::ports::TeamRepositoryError;
use crate::workflow::ports::WorkflowStateRepositoryError;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::result::{DatabaseErrorInformation, Error as DieselError};
use schema::teams;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by the tracker store.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn connect(database_url: &str, max_connections: u32) -> Result<TrackerPgPool, PoolError> {
    Pool::builder()
        .max_size(max_connections)
        .build(ConnectionManager::<PgConnection>::new(database_url))
}

/// `PostgreSQL`-backed tracker store implementing every repository port.
#[derive(Debug, Clone)]
pub struct PostgresTrackerStore {
    pool: TrackerPgPool,
}

impl PostgresTrackerStore {
    /// Creates a store from a connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: PersistenceFailure + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::from_persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(E::from_persistence)?
    }
}

/// Repository errors that can wrap an infrastructure failure.
trait PersistenceFailure: Sized {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for TeamRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for WorkflowStateRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for IssueRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// Failure inside [`in_transaction`]: either the body gave up or the
/// database refused `BEGIN`/`COMMIT`.
enum TransactionFailure<E> {
    Aborted(E),
    Database(DieselError),
}

impl<E> From<DieselError> for TransactionFailure<E> {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

/// Runs `body` in a transaction, rolling back when it returns an error.
fn in_transaction<T, E, F>(connection: &mut PgConnection, body: F) -> Result<T, E>
where
    E: PersistenceFailure,
    F: FnOnce(&mut PgConnection) -> Result<T, E>,
{
    connection
        .transaction::<T, TransactionFailure<E>, _>(|tx| body(tx).map_err(TransactionFailure::Aborted))
        .map_err(|failure| match failure {
            TransactionFailure::Aborted(err) => err,
            TransactionFailure::Database(err) => E::from_persistence(err),
        })
}

/// Locks a team row until the surrounding transaction ends.
///
/// Returns `false` when the team does not exist.
fn lock_team(connection: &mut PgConnection, team_id: Uuid) -> Result<bool, DieselError> {
    teams::table
        .find(team_id)
        .select(teams::id)
        .for_update()
        .first::<Uuid>(connection)
        .optional()
        .map(|row| row.is_some())
}

fn violates(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}
