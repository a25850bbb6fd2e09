//! Application services for workflow-state lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateStateRequest, UpdateStateRequest, WorkflowLifecycleError, WorkflowLifecycleResult,
    WorkflowLifecycleService,
};
