//! Closed set of workflow-state kinds.

use super::ParseStateKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle bucket a workflow state represents.
///
/// The set is closed: every team's states fall into exactly these five kinds,
/// and a state's kind never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    /// Captured but not yet triaged.
    Backlog,
    /// Triaged and ready to start.
    Unstarted,
    /// Work in progress.
    Started,
    /// Work finished.
    Completed,
    /// Work abandoned.
    Canceled,
}

/// Coarse grouping of [`StateKind`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleBucket {
    /// Backlog and unstarted states.
    NotStarted,
    /// Started states.
    InProgress,
    /// Completed states.
    Done,
    /// Canceled states.
    Abandoned,
}

impl StateKind {
    /// Every kind, in canonical board order.
    pub const ALL: [Self; 5] = [
        Self::Backlog,
        Self::Unstarted,
        Self::Started,
        Self::Completed,
        Self::Canceled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Unstarted => "unstarted",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Returns the lifecycle bucket this kind belongs to.
    #[must_use]
    pub const fn lifecycle_bucket(self) -> LifecycleBucket {
        match self {
            Self::Backlog | Self::Unstarted => LifecycleBucket::NotStarted,
            Self::Started => LifecycleBucket::InProgress,
            Self::Completed => LifecycleBucket::Done,
            Self::Canceled => LifecycleBucket::Abandoned,
        }
    }

    /// Returns `true` for kinds that end an issue's lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        match self {
            Self::Completed | Self::Canceled => true,
            Self::Backlog | Self::Unstarted | Self::Started => false,
        }
    }
}

impl TryFrom<&str> for StateKind {
    type Error = ParseStateKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "unstarted" => Ok(Self::Unstarted),
            "started" => Ok(Self::Started),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseStateKindError(value.to_owned())),
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
