//! Application services for issue numbering and placement.

mod lifecycle;

pub use lifecycle::{
    CreateIssueRequest, IssueLifecycleError, IssueLifecycleResult, IssueLifecycleService,
    NumberingPolicy, UpdatePositionRequest,
};
