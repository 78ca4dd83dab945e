//! Timestamped shop floor events
//!
//! Every state change worth logging becomes a [`ShopEvent`]. The event kind,
//! not the message text, decides which detail levels show it on the console.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::simulation::SimTime;
use crate::types::{CarId, LogDetailLevel, StationKind};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopEventKind {
    /// Start or end of a run
    RunBoundary,
    /// Rule line framing a run boundary banner
    Separator,
    /// A new car entered the shop
    Arrival,
    /// A car joined a station queue
    QueueEntry,
    /// A machine started work on a car
    ServiceStart,
    /// A machine finished work on a car
    ServiceFinish,
    /// A car left the shop
    Exit,
    /// A queue exceeded the bottleneck threshold
    Alert,
    /// The shift ended and no more cars are accepted
    ArrivalsStopped,
}

impl fmt::Display for ShopEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShopEventKind::RunBoundary => "run_boundary",
            ShopEventKind::Separator => "separator",
            ShopEventKind::Arrival => "arrival",
            ShopEventKind::QueueEntry => "queue_entry",
            ShopEventKind::ServiceStart => "service_start",
            ShopEventKind::ServiceFinish => "service_finish",
            ShopEventKind::Exit => "exit",
            ShopEventKind::Alert => "alert",
            ShopEventKind::ArrivalsStopped => "arrivals_stopped",
        };
        write!(f, "{}", name)
    }
}

impl LogDetailLevel {
    /// Whether events of `kind` are shown on the console at this level
    pub fn admits(self, kind: ShopEventKind) -> bool {
        match self {
            LogDetailLevel::Detailed => true,
            LogDetailLevel::Summary => matches!(
                kind,
                ShopEventKind::Arrival
                    | ShopEventKind::Exit
                    | ShopEventKind::Alert
                    | ShopEventKind::ArrivalsStopped
                    | ShopEventKind::RunBoundary
            ),
            LogDetailLevel::Minimal => {
                matches!(kind, ShopEventKind::Alert | ShopEventKind::ArrivalsStopped)
            }
        }
    }
}

/// A single logged occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopEvent {
    /// Simulated time of the event
    pub time: SimTime,
    /// Category used for filtering
    pub kind: ShopEventKind,
    /// Car involved, if any
    pub car_id: Option<CarId>,
    /// Station involved, if any
    pub station: Option<StationKind>,
    /// Human-readable text
    pub message: String,
}

impl ShopEvent {
    /// Create an event
    pub fn new(
        time: SimTime,
        kind: ShopEventKind,
        car_id: Option<CarId>,
        station: Option<StationKind>,
        message: impl Into<String>,
    ) -> Self {
        Self { time, kind, car_id, station, message: message.into() }
    }

    /// Create an event that involves no car or station
    pub fn shop(time: SimTime, kind: ShopEventKind, message: impl Into<String>) -> Self {
        Self::new(time, kind, None, None, message)
    }
}

impl fmt::Display for ShopEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.time, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [ShopEventKind; 9] = [
        ShopEventKind::RunBoundary,
        ShopEventKind::Separator,
        ShopEventKind::Arrival,
        ShopEventKind::QueueEntry,
        ShopEventKind::ServiceStart,
        ShopEventKind::ServiceFinish,
        ShopEventKind::Exit,
        ShopEventKind::Alert,
        ShopEventKind::ArrivalsStopped,
    ];

    #[test]
    fn test_event_renders_with_one_decimal_timestamp() {
        let event = ShopEvent::new(
            SimTime::from_minutes(12.345),
            ShopEventKind::Arrival,
            Some(CarId(3)),
            None,
            "Car 3 ARRIVED",
        );
        assert_eq!(event.to_string(), "[12.3] Car 3 ARRIVED");
    }

    #[test]
    fn test_detailed_admits_everything() {
        assert!(ALL_KINDS.iter().all(|&kind| LogDetailLevel::Detailed.admits(kind)));
    }

    #[test]
    fn test_summary_filters_station_traffic() {
        let level = LogDetailLevel::Summary;
        assert!(level.admits(ShopEventKind::Arrival));
        assert!(level.admits(ShopEventKind::Exit));
        assert!(level.admits(ShopEventKind::Alert));
        assert!(level.admits(ShopEventKind::ArrivalsStopped));
        assert!(level.admits(ShopEventKind::RunBoundary));
        assert!(!level.admits(ShopEventKind::QueueEntry));
        assert!(!level.admits(ShopEventKind::ServiceStart));
        assert!(!level.admits(ShopEventKind::ServiceFinish));
        assert!(!level.admits(ShopEventKind::Separator));
    }

    #[test]
    fn test_minimal_only_alerts_and_stop() {
        let admitted: Vec<_> =
            ALL_KINDS.iter().copied().filter(|&kind| LogDetailLevel::Minimal.admits(kind)).collect();
        assert_eq!(admitted, vec![ShopEventKind::Alert, ShopEventKind::ArrivalsStopped]);
    }

    #[test]
    fn test_event_serializes_kind_in_snake_case() {
        let event = ShopEvent::shop(SimTime::ZERO, ShopEventKind::ArrivalsStopped, "STOP");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"arrivals_stopped\""));
    }
}
