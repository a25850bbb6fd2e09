//! Unit tests for the team context.
