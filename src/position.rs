//! Fractional sort keys shared by workflow states and issues.
//!
//! A [`Position`] is a real number used only for ordering. Reordering an item
//! means giving it a value between its new neighbours, so siblings never need
//! renumbering. When the gap between two neighbours can no longer be split,
//! [`Position::between`] reports exhaustion and the bucket must be respaced.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Error returned for positions that cannot be used as sort keys.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("position must be a finite number, got {0}")]
pub struct InvalidPosition(pub f64);

/// Finite sort key.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Position(f64);

#[expect(
    clippy::float_arithmetic,
    reason = "positions are fractional sort keys by construction"
)]
impl Position {
    /// Spacing between consecutive default positions.
    pub const STEP: f64 = 1000.0;

    /// Creates a position from a finite value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPosition`] for `NaN` or infinite values.
    pub const fn new(value: f64) -> Result<Self, InvalidPosition> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(InvalidPosition(value))
        }
    }

    /// Returns the default position for the `slot`-th item (`slot × 1000`).
    #[must_use]
    pub fn for_slot(slot: u32) -> Self {
        Self(f64::from(slot) * Self::STEP)
    }

    /// Returns the default position for a sequence value (`sequence × 1000`).
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "sequence values stay far below 2^52 in practice"
    )]
    pub fn for_sequence(sequence: u64) -> Self {
        Self(sequence as f64 * Self::STEP)
    }

    /// Returns the position one step after `self`.
    #[must_use]
    pub fn after(self) -> Self {
        Self(self.0 + Self::STEP)
    }

    /// Returns the midpoint strictly between `lower` and `upper`.
    ///
    /// Returns `None` when `lower >= upper` or when the gap is too small to
    /// produce a distinct value in `f64` precision.
    #[must_use]
    pub fn between(lower: Self, upper: Self) -> Option<Self> {
        if lower.0 >= upper.0 {
            return None;
        }
        let midpoint = lower.0 + (upper.0 - lower.0) / 2.0;
        (lower.0 < midpoint && midpoint < upper.0).then_some(Self(midpoint))
    }

    /// Returns `true` for the zero position, which callers use to mean "not
    /// supplied".
    #[must_use]
    #[expect(clippy::float_cmp, reason = "exact zero is the omission sentinel")]
    pub fn is_unset(self) -> bool {
        self.0 == 0.0
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Total ordering used when sorting by position.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self(0.0)
    }
}

impl TryFrom<f64> for Position {
    type Error = InvalidPosition;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Position> for f64 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
