//! Embedded `PostgreSQL` cluster shared by the integration tests.
//!
//! The first test to ask for a database boots one cluster for the whole test
//! binary. A migrated template database is created once and every test then
//! clones it into a database of its own.

mod env_utils;

use self::env_utils::{env_vars_to_os, worker_env_changes};
use self::fs_utils::{sync_password_from_file, sync_port_from_pid};
use crate::test_helpers::EnvVarGuard;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests};
use postgresql_embedded::{PostgreSQL, Status};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Template every test database is cloned from.
pub const TEMPLATE_DATABASE: &str = "ticketry_template";

static SHARED_CLUSTER: OnceLock<Result<ManagedCluster, String>> = OnceLock::new();
static TEMPLATE_LOCK: Mutex<()> = Mutex::new(());

/// Embedded cluster and the runtime that owns its server handle.
pub struct ManagedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    runtime: Option<Runtime>,
    postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn boot() -> Result<Self, BoxError> {
        let worker_env = worker_env_changes()?;
        let guard = EnvVarGuard::set_many(&worker_env);
        let bootstrap = bootstrap_for_tests();
        drop(guard);
        let mut bootstrap = bootstrap?;
        sync_password_from_file(&mut bootstrap.settings)?;
        let env_vars = bootstrap.environment.to_env();
        let mut cluster = Self {
            bootstrap,
            env_vars,
            runtime: None,
            postgres: None,
        };
        match cluster.bootstrap.privileges {
            ExecutionPrivileges::Root => cluster.start_via_worker()?,
            ExecutionPrivileges::Unprivileged => cluster.start_in_process()?,
        }
        Ok(cluster)
    }

    fn start_in_process(&mut self) -> Result<(), BoxError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let guard = EnvVarGuard::set_many(&env_vars_to_os(&self.env_vars));
        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        let started = runtime.block_on(async {
            postgres.setup().await?;
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await?;
            }
            Ok::<(), postgresql_embedded::Error>(())
        });
        drop(guard);
        started?;
        self.bootstrap.settings = postgres.settings().clone();
        sync_port_from_pid(&mut self.bootstrap.settings)?;
        self.runtime = Some(runtime);
        self.postgres = Some(postgres);
        Ok(())
    }

    fn start_via_worker(&mut self) -> Result<(), BoxError> {
        self.run_worker_operation(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.run_worker_operation(WorkerOperation::Start, self.bootstrap.start_timeout)?;
        sync_port_from_pid(&mut self.bootstrap.settings)
    }

    fn stop(&mut self) -> Result<(), BoxError> {
        let Some(postgres) = self.postgres.take() else {
            if matches!(self.bootstrap.privileges, ExecutionPrivileges::Root) {
                self.run_worker_operation(WorkerOperation::Stop, self.bootstrap.shutdown_timeout)?;
            }
            return Ok(());
        };
        if let Some(runtime) = &self.runtime {
            runtime.block_on(postgres.stop())?;
        }
        Ok(())
    }

    fn run_worker_operation(
        &self,
        operation: WorkerOperation,
        timeout: Duration,
    ) -> Result<(), BoxError> {
        let worker = self.bootstrap.worker_binary.as_ref().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is not set for worker operation",
            )
        })?;
        run_worker(&WorkerRequest::new(WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        }))?;
        Ok(())
    }

    /// Returns the connection URL of `database` on this cluster.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        self.bootstrap.settings.url(database)
    }

    fn execute_admin_sql(&self, sql: &str) -> Result<(), BoxError> {
        let mut admin = PgConnection::establish(&self.database_url("postgres"))?;
        diesel::sql_query(sql).execute(&mut admin)?;
        Ok(())
    }

    fn database_exists(&self, name: &str) -> Result<bool, BoxError> {
        #[derive(QueryableByName)]
        struct Exists {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }
        let mut admin = PgConnection::establish(&self.database_url("postgres"))?;
        let row: Exists = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(name)
        .get_result(&mut admin)?;
        Ok(row.exists)
    }

    /// Creates `template` and runs `migrate` against it unless it exists.
    ///
    /// A failed migration drops the half-built template so the next caller
    /// retries from scratch.
    ///
    /// # Errors
    ///
    /// Returns an error when the template cannot be created or migrated.
    pub fn ensure_template_exists<F>(&self, template: &str, migrate: F) -> Result<(), BoxError>
    where
        F: FnOnce(&str) -> Result<(), BoxError>,
    {
        let _guard = TEMPLATE_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if self.database_exists(template)? {
            return Ok(());
        }
        self.execute_admin_sql(&format!("CREATE DATABASE {}", quote_identifier(template)))?;
        if let Err(err) = migrate(&self.database_url(template)) {
            self.drop_database(template)?;
            return Err(err);
        }
        Ok(())
    }

    /// Clones `template` into a uniquely named database.
    ///
    /// # Errors
    ///
    /// Returns an error when the clone fails.
    pub fn temporary_database(&'static self, template: &str) -> Result<TemporaryDatabase, BoxError> {
        let name = format!("ticketry_test_{}", Uuid::new_v4().simple());
        self.execute_admin_sql(&format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quote_identifier(&name),
            quote_identifier(template),
        ))?;
        Ok(TemporaryDatabase {
            cluster: self,
            url: self.database_url(&name),
            name,
        })
    }

    fn drop_database(&self, name: &str) -> Result<(), BoxError> {
        self.execute_admin_sql(&format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(name)
        ))
    }
}

impl Drop for ManagedCluster {
    fn drop(&mut self) {
        drop(self.stop());
    }
}

/// Database cloned for one test and dropped on scope exit.
pub struct TemporaryDatabase {
    cluster: &'static ManagedCluster,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Returns the URL of the database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Returns the cluster for this test binary, booting it on first use.
///
/// Boot blocks on its own runtime, so async callers should reach this from
/// a blocking task.
///
/// # Errors
///
/// Returns the boot failure; every later call reports the same failure.
pub fn shared_cluster() -> Result<&'static ManagedCluster, BoxError> {
    SHARED_CLUSTER
        .get_or_init(|| {
            ManagedCluster::boot().map_err(|err| format!("failed to start PostgreSQL: {err}"))
        })
        .as_ref()
        .map_err(|err| err.clone().into())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_identifier;
    use rstest::rstest;

    #[rstest]
    #[case("ticketry_template", "\"ticketry_template\"")]
    #[case("odd\"name", "\"odd\"\"name\"")]
    fn identifiers_are_quoted(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(quote_identifier(raw), expected);
    }
}
