//! Domain model for team-scoped issues.

mod error;
mod ids;
mod issue;
mod priority;

pub use error::IssueDomainError;
pub use ids::{ActorId, IssueId, IssueIdentifier, IssueNumber, IssueTitle, ProjectId};
pub use issue::{Issue, IssueDraft, PersistedIssueData};
pub use priority::Priority;
