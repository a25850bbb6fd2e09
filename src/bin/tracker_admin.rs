//! Administrative entry point for the tracker database.
//!
//! Usage:
//!
//! ```text
//! tracker_admin migrate
//! tracker_admin create-team <KEY> <NAME>
//! ```
//!
//! `migrate` applies the embedded schema. `create-team` creates a team with
//! the five default workflow states and prints it, with its states, as JSON.
//! Connection settings come from `ticketry.toml` and `TICKETRY__*`
//! environment variables.

use mockable::DefaultClock;
use serde::Serialize;
use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;
use ticketry::config::{TrackerConfig, TrackerConfigError};
use ticketry::storage::postgres::{self, PostgresTrackerStore};
use ticketry::team::domain::Team;
use ticketry::team::services::{CreateTeamRequest, TeamProvisioningError, TeamProvisioningService};
use ticketry::telemetry::{TelemetryError, init_tracing};
use ticketry::workflow::domain::WorkflowState;
use ticketry::workflow::services::{WorkflowLifecycleError, WorkflowLifecycleService};
use tokio::runtime::Builder;
use tracing::info;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum AdminError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] TrackerConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("schema migration failed: {0}")]
    Migration(#[from] diesel::result::Error),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error(transparent)]
    Provisioning(#[from] TeamProvisioningError),
    #[error(transparent)]
    Workflow(#[from] WorkflowLifecycleError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, PartialEq, Eq)]
enum Operation {
    Migrate,
    CreateTeam { key: String, name: String },
}

impl Operation {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, AdminError> {
        let operation = args.next().ok_or_else(|| {
            AdminError::InvalidArgs("missing operation; expected migrate or create-team".into())
        })?;
        let parsed = match operation.as_str() {
            "migrate" => Self::Migrate,
            "create-team" => {
                let key = args
                    .next()
                    .ok_or_else(|| AdminError::InvalidArgs("create-team needs <KEY>".into()))?;
                let name = args
                    .next()
                    .ok_or_else(|| AdminError::InvalidArgs("create-team needs <NAME>".into()))?;
                Self::CreateTeam { key, name }
            }
            other => {
                return Err(AdminError::InvalidArgs(format!(
                    "unknown operation '{other}'; expected migrate or create-team"
                )));
            }
        };
        if let Some(extra) = args.next() {
            return Err(AdminError::InvalidArgs(format!(
                "unexpected argument '{extra}'"
            )));
        }
        Ok(parsed)
    }
}

#[derive(Debug, Serialize)]
struct CreatedTeam {
    team: Team,
    states: Vec<WorkflowState>,
}

fn main() -> Result<(), BoxError> {
    let operation = Operation::parse(env::args().skip(1))?;
    run(operation).map_err(Into::into)
}

fn run(operation: Operation) -> Result<(), AdminError> {
    let config = TrackerConfig::load()?;
    init_tracing(&config.telemetry)?;
    let pool = postgres::connect(&config.database.url, config.database.max_connections)?;

    match operation {
        Operation::Migrate => {
            let mut connection = pool.get()?;
            postgres::apply_schema(&mut connection)?;
            info!("tracker schema applied");
            Ok(())
        }
        Operation::CreateTeam { key, name } => {
            let runtime = Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(AdminError::RuntimeInit)?;
            let created = runtime.block_on(create_team(&config, pool, key, name))?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", serde_json::to_string_pretty(&created)?)?;
            Ok(())
        }
    }
}

async fn create_team(
    config: &TrackerConfig,
    pool: postgres::TrackerPgPool,
    key: String,
    name: String,
) -> Result<CreatedTeam, AdminError> {
    let store = Arc::new(PostgresTrackerStore::new(pool));
    let clock = Arc::new(DefaultClock);
    let default_color = config
        .workflow
        .default_color()
        .map_err(TrackerConfigError::from)?;
    let workflow = WorkflowLifecycleService::new(Arc::clone(&store), Arc::clone(&clock))
        .with_default_color(default_color);
    let provisioning =
        TeamProvisioningService::new(Arc::clone(&store), workflow.clone(), Arc::clone(&clock));

    let team = provisioning
        .create_team(CreateTeamRequest::new(key, name))
        .await?;
    let states = workflow.list_states(team.id()).await?;
    Ok(CreatedTeam { team, states })
}
