//! Rules deciding whether a workflow state may be deleted.

use super::{StateKind, WorkflowStateId};
use crate::team::domain::TeamId;
use serde::Serialize;
use thiserror::Error;

/// Facts about a state gathered inside the deleting transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionCensus {
    /// State being deleted.
    pub state: WorkflowStateId,
    /// Team owning the state.
    pub team: TeamId,
    /// Kind of the state.
    pub kind: StateKind,
    /// Number of issues whose status is this state.
    pub referencing_issues: u64,
    /// Number of states of the same kind in the team, this one included.
    pub states_of_kind: u64,
}

/// Reason a deletion was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GuardViolation {
    /// Issues still sit in the state.
    #[error("state {state} is still the status of {issue_count} issue(s)")]
    StillReferenced {
        /// State that was to be deleted.
        state: WorkflowStateId,
        /// Issues blocking the deletion.
        issue_count: u64,
    },
    /// The state is the team's only one of its kind.
    #[error("team {team} must keep at least one {kind} state")]
    LastOfKind {
        /// Team that would lose the kind.
        team: TeamId,
        /// Kind that would disappear.
        kind: StateKind,
    },
}

/// Deletion policy for workflow states.
///
/// Referential integrity is checked before kind cardinality, so a caller
/// whose state is both referenced and unique sees the issue count first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionGuard;

impl DeletionGuard {
    /// Evaluates the census against both rules.
    ///
    /// # Errors
    ///
    /// Returns the first [`GuardViolation`] found.
    pub const fn evaluate(self, census: &DeletionCensus) -> Result<(), GuardViolation> {
        if census.referencing_issues > 0 {
            return Err(GuardViolation::StillReferenced {
                state: census.state,
                issue_count: census.referencing_issues,
            });
        }
        if census.states_of_kind <= 1 {
            return Err(GuardViolation::LastOfKind {
                team: census.team,
                kind: census.kind,
            });
        }
        Ok(())
    }
}
