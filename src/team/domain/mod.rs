//! Domain model for teams.
//!
//! A team scopes a private sequence of issue numbers and a private ordered set
//! of workflow states. Provisioning templates describe the states a new team
//! starts with.

mod error;
mod ids;
mod team;
mod template;

pub use error::TeamDomainError;
pub use ids::{TeamId, TeamKey, TeamName};
pub use team::{PersistedTeamData, Team};
pub use template::{ProvisioningTemplate, StateTemplate};
