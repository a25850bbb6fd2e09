//! Store adapters implementing the team, workflow-state, and issue ports.
//!
//! Each adapter implements all three ports over one shared backend, so
//! operations spanning aggregates (a team with its states, an issue with its
//! status, a guard check with its delete) commit atomically.

pub mod memory;
pub mod postgres;
