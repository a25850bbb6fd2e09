//! Error types for team domain validation.

use crate::workflow::domain::StateKind;
use thiserror::Error;

/// Errors returned while constructing team values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamDomainError {
    /// The team key is blank.
    #[error("team key must not be empty")]
    EmptyTeamKey,

    /// The team key exceeds the column width.
    #[error("team key '{0}' exceeds 10 characters")]
    TeamKeyTooLong(String),

    /// The team key contains unsupported characters.
    #[error("invalid team key '{0}', expected a letter followed by letters or digits")]
    InvalidTeamKey(String),

    /// The team name is blank.
    #[error("team name must not be empty")]
    EmptyTeamName,

    /// The team name exceeds the column width.
    #[error("team name has {0} characters, exceeds limit of 255")]
    TeamNameTooLong(usize),

    /// A provisioning template lists the same kind twice.
    #[error("provisioning template lists kind {0} more than once")]
    DuplicateTemplateKind(StateKind),

    /// A provisioning template leaves a kind without a state.
    #[error("provisioning template has no entry for kind {0}")]
    MissingTemplateKind(StateKind),
}
