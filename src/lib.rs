//! Ticketry: issue numbering and workflow-state lifecycle engine.
//!
//! This crate assigns team-scoped sequential issue numbers, keeps each team's
//! ordered set of workflow states, guards state deletion, and provisions a
//! team's default states atomically when the team is created.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Services**: Orchestration over the ports
//!
//! Store adapters live in [`storage`] and implement every port over one
//! backend, so operations that span aggregates commit atomically.
//!
//! # Modules
//!
//! - [`team`]: Teams and default-state provisioning
//! - [`workflow`]: Workflow states and deletion guards
//! - [`issue`]: Issue numbering and placement
//! - [`position`]: Fractional sort keys
//! - [`storage`]: In-memory and `PostgreSQL` stores
//! - [`config`]: Layered configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod issue;
pub mod position;
pub mod storage;
pub mod team;
pub mod telemetry;
pub mod workflow;
