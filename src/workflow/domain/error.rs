//! Error types for workflow-state validation and parsing.

use crate::position::InvalidPosition;
use thiserror::Error;

/// Errors returned while constructing workflow-state values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowDomainError {
    /// The state name is empty after trimming.
    #[error("state name must not be empty")]
    EmptyStateName,

    /// The state name exceeds the column width.
    #[error("state name has {0} characters, exceeds limit of 100")]
    StateNameTooLong(usize),

    /// The colour is not a `#RGB` or `#RRGGBB` hex value.
    #[error("invalid state colour '{0}', expected #RGB or #RRGGBB")]
    InvalidColor(String),

    /// The kind is not one of the five supported kinds.
    #[error(transparent)]
    UnknownKind(#[from] ParseStateKindError),

    /// The position is not a finite number.
    #[error(transparent)]
    InvalidPosition(#[from] InvalidPosition),
}

/// Error returned while parsing state kinds from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown state kind: {0}")]
pub struct ParseStateKindError(pub String);
