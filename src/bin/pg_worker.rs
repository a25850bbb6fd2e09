//! Runs embedded `PostgreSQL` lifecycle steps on behalf of the test cluster.
//!
//! Usage:
//!
//! ```text
//! pg_worker <setup|start|stop> <config-path>
//! ```
//!
//! `config-path` names a JSON worker payload written by
//! `pg-embed-setup-unpriv`. The embedded server refuses to run as root, so
//! when invoked as root the worker switches to `nobody` before touching the
//! cluster. `start` leaves the server running after the worker exits.

#[cfg(unix)]
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use nix::unistd::{Uid, User, initgroups, setgid, setuid};
#[cfg(unix)]
use pg_embedded_setup_unpriv::ambient_dir_and_path;
#[cfg(unix)]
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
#[cfg(unix)]
use postgresql_embedded::{PostgreSQL, Status};
#[cfg(unix)]
use std::env;
#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::io::Read;
#[cfg(unix)]
use thiserror::Error;
#[cfg(unix)]
use tokio::runtime::Builder;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Account the worker runs the cluster as when started by root.
#[cfg(unix)]
const UNPRIVILEGED_USER: &str = "nobody";

#[cfg(unix)]
#[derive(Debug, Error)]
enum WorkerError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read worker config: {0}")]
    ConfigRead(#[source] BoxError),
    #[error("failed to parse worker config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("settings conversion failed: {0}")]
    SettingsConversion(String),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error("failed to drop privileges: {0}")]
    PrivilegeDrop(String),
    #[error("postgres {operation} failed: {message}")]
    Postgres {
        operation: &'static str,
        message: String,
    },
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Setup,
    Start,
    Stop,
}

#[cfg(unix)]
impl Operation {
    fn parse(arg: &str) -> Result<Self, WorkerError> {
        match arg {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(WorkerError::InvalidArgs(format!(
                "unknown operation '{other}'; expected setup, start, or stop"
            ))),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    let args = env::args_os()
        .skip(1)
        .map(|arg| {
            arg.into_string()
                .map_err(|_| WorkerError::InvalidArgs("argument is not valid UTF-8".into()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    run(args.into_iter()).map_err(Into::into)
}

#[cfg(unix)]
fn run(args: impl Iterator<Item = String>) -> Result<(), WorkerError> {
    let (operation, config_path) = parse_args(args)?;
    let payload = load_payload(&config_path)?;
    drop_privileges_if_root(UNPRIVILEGED_USER)?;
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| WorkerError::SettingsConversion(err.to_string()))?;
    apply_environment(&payload.environment);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::RuntimeInit)?;
    let mut postgres = PostgreSQL::new(settings);
    runtime.block_on(async {
        match operation {
            Operation::Setup => {
                postgres
                    .setup()
                    .await
                    .map_err(|err| postgres_failure(operation, &err))?;
                ensure_started(&mut postgres, operation).await
            }
            Operation::Start => ensure_started(&mut postgres, operation).await,
            Operation::Stop => postgres
                .stop()
                .await
                .map_err(|err| postgres_failure(operation, &err)),
        }
    })?;

    if operation == Operation::Start {
        // Dropping the handle would stop the server this worker just started.
        std::mem::forget(postgres);
    }
    Ok(())
}

#[cfg(unix)]
fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<(Operation, Utf8PathBuf), WorkerError> {
    let operation = args
        .next()
        .ok_or_else(|| WorkerError::InvalidArgs("missing operation argument".into()))
        .and_then(|arg| Operation::parse(&arg))?;
    let config_path = args
        .next()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| WorkerError::InvalidArgs("missing config path argument".into()))?;
    if let Some(extra) = args.next() {
        return Err(WorkerError::InvalidArgs(format!(
            "unexpected extra argument '{extra}'"
        )));
    }
    Ok((operation, config_path))
}

#[cfg(unix)]
fn load_payload(config_path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
    let bytes = read_config(config_path).map_err(WorkerError::ConfigRead)?;
    serde_json::from_slice(&bytes).map_err(WorkerError::ConfigParse)
}

#[cfg(unix)]
fn read_config(path: &Utf8Path) -> Result<Vec<u8>, BoxError> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    let mut file = dir.open(relative.as_std_path())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(unix)]
fn drop_privileges_if_root(username: &str) -> Result<(), WorkerError> {
    if !Uid::effective().is_root() {
        return Ok(());
    }

    let user = User::from_name(username)
        .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?
        .ok_or_else(|| WorkerError::PrivilegeDrop(format!("user '{username}' not found")))?;
    let name = CString::new(user.name.clone())
        .map_err(|err| WorkerError::PrivilegeDrop(format!("invalid user name: {err}")))?;
    initgroups(&name, user.gid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
    setgid(user.gid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
    setuid(user.uid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;

    // SAFETY: no other threads exist yet; the runtime is built afterwards.
    unsafe {
        env::set_var("HOME", user.dir);
        env::set_var("USER", &user.name);
        env::set_var("LOGNAME", &user.name);
    }
    Ok(())
}

#[cfg(unix)]
fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: called before the runtime starts, while the worker is single-threaded.
        unsafe {
            match value {
                Some(plain) => env::set_var(key, plain.expose()),
                None => env::remove_var(key),
            }
        }
    }
}

#[cfg(unix)]
async fn ensure_started(postgres: &mut PostgreSQL, operation: Operation) -> Result<(), WorkerError> {
    if matches!(postgres.status(), Status::Started) {
        return Ok(());
    }
    postgres
        .start()
        .await
        .map_err(|err| postgres_failure(operation, &err))
}

#[cfg(unix)]
fn postgres_failure(operation: Operation, err: &impl std::fmt::Display) -> WorkerError {
    WorkerError::Postgres {
        operation: operation.as_str(),
        message: err.to_string(),
    }
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker is only supported on Unix platforms".into())
}
