//! Error types for issue validation.

use crate::position::InvalidPosition;
use crate::team::domain::TeamId;
use crate::workflow::domain::WorkflowStateId;
use thiserror::Error;

/// Errors returned while constructing or moving issues.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IssueDomainError {
    /// The title is empty after trimming.
    #[error("issue title must not be empty")]
    EmptyTitle,

    /// The title exceeds the column width.
    #[error("issue title has {0} characters, exceeds limit of 500")]
    TitleTooLong(usize),

    /// The priority is outside `0..=4`.
    #[error("invalid priority {0}, expected 0 (none) through 4 (low)")]
    InvalidPriority(i64),

    /// The issue number is zero or does not fit the column.
    #[error("invalid issue number {0}")]
    InvalidNumber(i64),

    /// The status belongs to a different team than the issue.
    #[error("workflow state {status} does not belong to team {team}")]
    StatusOutsideTeam {
        /// Team the issue belongs to.
        team: TeamId,
        /// Offending status.
        status: WorkflowStateId,
    },

    /// The position is not a finite number.
    #[error(transparent)]
    InvalidPosition(#[from] InvalidPosition),
}
