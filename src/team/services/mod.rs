//! Application services for team creation and state provisioning.

mod provisioning;

pub use provisioning::{
    CreateTeamRequest, TeamProvisioningError, TeamProvisioningResult, TeamProvisioningService,
};
