//! Layered configuration for the tracker.
//!
//! Values come from built-in defaults, then an optional `ticketry.toml` in
//! the working directory, then `TICKETRY__`-prefixed environment variables
//! with `__` separating sections (for example `TICKETRY__DATABASE__URL`).
//! A `.env` file is loaded into the environment first when one exists.

use crate::issue::services::NumberingPolicy;
use crate::workflow::domain::{StateColor, WorkflowDomainError};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Base name of the optional configuration file.
const CONFIG_FILE: &str = "ticketry";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "TICKETRY";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum TrackerConfigError {
    /// The `.env` file exists but could not be read.
    #[error("failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    /// A source could not be read or deserialised.
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    /// `numbering.max_attempts` is zero.
    #[error("numbering.max_attempts must be at least 1")]
    ZeroAttempts,

    /// `database.max_connections` is zero.
    #[error("database.max_connections must be at least 1")]
    ZeroConnections,

    /// `workflow.default_color` is not a hex colour.
    #[error("workflow.default_color: {0}")]
    DefaultColor(#[from] WorkflowDomainError),
}

/// Complete tracker configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Issue numbering retry settings.
    pub numbering: NumberingConfig,
    /// Workflow-state defaults.
    pub workflow: WorkflowConfig,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/ticketry".to_owned(),
            max_connections: 10,
        }
    }
}

/// Issue numbering retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingConfig {
    /// Attempts before a numbering conflict is surfaced.
    pub max_attempts: u32,
    /// Backoff unit in milliseconds; attempt `n` waits `n ×` this.
    pub retry_backoff_ms: u64,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_backoff_ms: 5,
        }
    }
}

impl NumberingConfig {
    /// Returns the retry policy for the issue service.
    #[must_use]
    pub fn policy(&self) -> NumberingPolicy {
        NumberingPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }
}

/// Workflow-state defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Colour for states created without one.
    pub default_color: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_color: StateColor::NEUTRAL_GRAY.to_owned(),
        }
    }
}

impl WorkflowConfig {
    /// Returns the validated default colour.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidColor`] for malformed values.
    pub fn default_color(&self) -> Result<StateColor, WorkflowDomainError> {
        StateColor::new(self.default_color.as_str())
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            json: false,
        }
    }
}

impl TrackerConfig {
    /// Loads configuration from `.env`, `ticketry.toml`, and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerConfigError`] when a source is unreadable or a value
    /// fails validation.
    pub fn load() -> Result<Self, TrackerConfigError> {
        match dotenvy::dotenv() {
            Err(err) if !err.not_found() => return Err(err.into()),
            Ok(_) | Err(_) => {}
        }
        let builder = Config::builder().add_source(File::with_name(CONFIG_FILE).required(false));
        Self::finish(builder)
    }

    /// Loads configuration from TOML text, still honouring environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerConfigError`] when the text is malformed or a value
    /// fails validation.
    pub fn from_toml(text: &str) -> Result<Self, TrackerConfigError> {
        let builder = Config::builder().add_source(File::from_str(text, FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, TrackerConfigError> {
        let loaded: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), TrackerConfigError> {
        if self.numbering.max_attempts == 0 {
            return Err(TrackerConfigError::ZeroAttempts);
        }
        if self.database.max_connections == 0 {
            return Err(TrackerConfigError::ZeroConnections);
        }
        self.workflow.default_color()?;
        Ok(())
    }
}
