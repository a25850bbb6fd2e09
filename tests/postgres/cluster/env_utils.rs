//! Environment preparation for booting the embedded cluster.

use super::BoxError;
use super::worker_helpers::{locate_pg_worker_path, prepare_pg_worker};
use crate::test_helpers::EnvChange;
use pg_embedded_setup_unpriv::{ExecutionPrivileges, detect_execution_privileges};
use std::ffi::OsString;
use std::net::TcpListener;

pub(super) fn env_vars_to_os(env_vars: &[(String, Option<String>)]) -> Vec<EnvChange> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

/// Variables the bootstrap reads: a free port, and the worker when root.
pub(super) fn worker_env_changes() -> Result<Vec<EnvChange>, BoxError> {
    let mut changes = Vec::new();
    if std::env::var_os("PG_PORT").is_none() {
        changes.push((OsString::from("PG_PORT"), Some(free_port()?.into())));
    }

    if matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && std::env::var_os("PG_EMBEDDED_WORKER").is_none()
    {
        let worker = locate_pg_worker_path().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is unset and no pg_worker binary was found",
            )
        })?;
        let prepared = prepare_pg_worker(&worker)?;
        changes.push((
            OsString::from("PG_EMBEDDED_WORKER"),
            Some(OsString::from(prepared.as_str())),
        ));
    }
    Ok(changes)
}

fn free_port() -> Result<String, BoxError> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port.to_string())
}
