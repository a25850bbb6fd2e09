//! Port contracts for issue persistence and numbering.

pub mod repository;

pub use repository::{IssueRepository, IssueRepositoryError, IssueRepositoryResult};
