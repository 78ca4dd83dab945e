//! Identifier types for the paint shop simulator
//!
//! Cars are numbered sequentially in arrival order, scheduler processes are
//! indexed by slot, and each run carries a UUID so its log and results file can
//! be matched up.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Sequential identifier of a car body, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(pub u64);

impl CarId {
    /// The id given to the first car of a run
    pub const FIRST: CarId = CarId(1);

    /// The id that follows this one
    pub fn next(self) -> Self {
        CarId(self.0 + 1)
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Car {}", self.0)
    }
}

/// Handle of a process registered with the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub usize);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PROC_{}", self.0)
    }
}

/// Unique identifier of one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RUN_{}", self.0.simple())
    }
}

impl Serialize for RunId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RunId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("RUN_").unwrap_or(&s);
        let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
        Ok(RunId(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_ids_are_sequential() {
        let first = CarId::FIRST;
        assert_eq!(first.0, 1);
        assert_eq!(first.next(), CarId(2));
        assert_eq!(first.next().next().to_string(), "Car 3");
    }

    #[test]
    fn test_run_id_uniqueness_and_format() {
        let a = RunId::new();
        let b = RunId::new();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("RUN_"));
    }

    #[test]
    fn test_run_id_serialization_roundtrip() {
        let id = RunId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: RunId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);

        // Raw UUIDs are accepted too
        let raw = format!("\"{}\"", id.0);
        let back: RunId = serde_json::from_str(&raw).unwrap();
        assert_eq!(id, back);
    }
}
