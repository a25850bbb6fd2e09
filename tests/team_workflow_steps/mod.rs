//! Step definitions for team workflow scenarios.

pub mod when;
