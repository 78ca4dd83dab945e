//! Simulated time
//!
//! Simulated time is measured in minutes from the start of the run and is
//! independent of wall-clock time.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Sub;

/// A point on the simulated timeline, in minutes since the run started
///
/// Ordering is total (`f64::total_cmp`) so instants can key a priority queue.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(f64);

impl SimTime {
    /// Start of every run
    pub const ZERO: SimTime = SimTime(0.0);

    /// Create an instant from minutes since the start of the run
    pub const fn from_minutes(minutes: f64) -> Self {
        Self(minutes)
    }

    /// Minutes since the start of the run
    pub const fn as_minutes(self) -> f64 {
        self.0
    }

    /// The instant `minutes` after this one
    pub fn after(self, minutes: f64) -> Self {
        Self(self.0 + minutes)
    }

    /// Minutes elapsed from `earlier` to this instant
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }

    /// Whether the instant is a real, finite time
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Sub for SimTime {
    type Output = f64;

    fn sub(self, rhs: SimTime) -> f64 {
        self.since(rhs)
    }
}

impl From<f64> for SimTime {
    fn from(minutes: f64) -> Self {
        Self::from_minutes(minutes)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
