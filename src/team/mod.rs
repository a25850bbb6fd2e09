//! Team management and workflow-state provisioning.
//!
//! Creating a team also creates its canonical workflow states in the same
//! transaction, so a team is never visible with a partial state set. The
//! module follows the crate's hexagonal layout:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
