//! Scoped environment overrides shared by integration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Environment change: the variable name and its new value, or `None` to unset.
pub type EnvChange = (OsString, Option<OsString>);

/// Applies environment changes and restores the previous values on drop.
///
/// Guards serialize on a process-wide mutex, so only one set of overrides is
/// live at a time.
pub struct EnvVarGuard {
    previous: Vec<EnvChange>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Applies `changes` for the lifetime of the guard.
    pub fn set_many(changes: &[EnvChange]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = changes
            .iter()
            .map(|(key, value)| {
                let old = env::var_os(key);
                apply(key, value.as_ref());
                (key.clone(), old)
            })
            .collect();
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..).rev() {
            apply(&key, value.as_ref());
        }
    }
}

fn apply(key: &OsString, value: Option<&OsString>) {
    // SAFETY: callers hold ENV_MUTEX, which serializes environment mutation in tests.
    unsafe {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}
