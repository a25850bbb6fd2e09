//! Workflow states: the ordered, kind-tagged columns of a team's board.
//!
//! States are created per team, either from the provisioning template or one
//! at a time. Deletion is guarded so issues never lose their status and no
//! team loses a lifecycle kind.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
