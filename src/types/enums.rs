//! Enumeration types for the paint shop simulator
//!
//! This module contains the enumeration types used throughout the simulation,
//! including the conveyor stations, log detail levels, and results output formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Processing stages of the paint shop conveyor, in routing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StationKind {
    /// Body cleaning before any coating
    Cleaning,
    /// Primer application
    Primer,
    /// Final paint coat
    Painting,
}

impl StationKind {
    /// All stations in the order every car visits them
    pub const ALL: [StationKind; 3] = [StationKind::Cleaning, StationKind::Primer, StationKind::Painting];

    /// Position of this station on the conveyor (0-based)
    pub fn index(self) -> usize {
        match self {
            StationKind::Cleaning => 0,
            StationKind::Primer => 1,
            StationKind::Painting => 2,
        }
    }

    /// The station a car moves to after this one, if any
    pub fn next(self) -> Option<StationKind> {
        match self {
            StationKind::Cleaning => Some(StationKind::Primer),
            StationKind::Primer => Some(StationKind::Painting),
            StationKind::Painting => None,
        }
    }

    /// The station a car leaves before entering this one, if any
    pub fn previous(self) -> Option<StationKind> {
        match self {
            StationKind::Cleaning => None,
            StationKind::Primer => Some(StationKind::Cleaning),
            StationKind::Painting => Some(StationKind::Primer),
        }
    }

    /// Long heading used in reports
    pub fn title(self) -> &'static str {
        match self {
            StationKind::Cleaning => "CLEANING",
            StationKind::Primer => "PRIMER APPLICATION",
            StationKind::Painting => "PAINTING",
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationKind::Cleaning => write!(f, "Cleaning"),
            StationKind::Primer => write!(f, "Primer"),
            StationKind::Painting => write!(f, "Painting"),
        }
    }
}

impl FromStr for StationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cleaning" => Ok(StationKind::Cleaning),
            "primer" | "primer application" => Ok(StationKind::Primer),
            "painting" | "paint" => Ok(StationKind::Painting),
            _ => Err(format!("Unknown station: {}", s)),
        }
    }
}

/// How much of the simulation event stream is echoed to the console
///
/// The log file always receives every event; the level only gates console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogDetailLevel {
    /// Every event
    Detailed,
    /// Arrivals, exits, alerts and run boundaries
    Summary,
    /// Alerts and the arrival stop only
    Minimal,
}

impl Default for LogDetailLevel {
    fn default() -> Self {
        LogDetailLevel::Summary
    }
}

impl fmt::Display for LogDetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogDetailLevel::Detailed => write!(f, "DETAILED"),
            LogDetailLevel::Summary => write!(f, "SUMMARY"),
            LogDetailLevel::Minimal => write!(f, "MINIMAL"),
        }
    }
}

impl FromStr for LogDetailLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detailed" | "all" => Ok(LogDetailLevel::Detailed),
            "summary" => Ok(LogDetailLevel::Summary),
            "minimal" => Ok(LogDetailLevel::Minimal),
            _ => Err(format!("Unknown log detail level: {}", s)),
        }
    }
}

/// Output formats for the results file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary, same as the console report
    Text,
    /// Pretty-printed JSON snapshot of the results
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "TEXT"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
