//! Domain model for team workflow states.

mod error;
mod guard;
mod ids;
mod kind;
mod state;

pub use error::{ParseStateKindError, WorkflowDomainError};
pub use guard::{DeletionCensus, DeletionGuard, GuardViolation};
pub use ids::{StateColor, StateName, WorkflowStateId};
pub use kind::{LifecycleBucket, StateKind};
pub use state::{PersistedWorkflowStateData, WorkflowState, WorkflowStateDraft};
