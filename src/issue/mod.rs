//! Issues: team-scoped, sequentially numbered units of work.
//!
//! Each issue gets the next number in its team's sequence when it is created
//! and a fractional position that orders it within its status. Moving an issue
//! rewrites only its own position and status.

pub mod domain;
pub mod ports;
pub mod services;
