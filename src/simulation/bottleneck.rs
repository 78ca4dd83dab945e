//! Queue-length bottleneck detection
//!
//! A station is a bottleneck at an instant when more cars are waiting for it
//! than the configured threshold. Every breach is reported; the alert history
//! is kept for the results but never used to suppress repeats.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::simulation::SimTime;
use crate::types::StationKind;

/// One threshold breach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BottleneckAlert {
    /// Station whose queue was too long
    pub station: StationKind,
    /// Cars waiting at that instant
    pub queue_length: usize,
    /// When the breach was observed
    pub time: SimTime,
}

/// Threshold check over instantaneous queue lengths
#[derive(Debug, Clone)]
pub struct BottleneckDetector {
    threshold: usize,
    alerts: Vec<BottleneckAlert>,
}

impl BottleneckDetector {
    /// Create a detector that alerts when a queue exceeds `threshold`
    pub fn new(threshold: usize) -> Self {
        Self { threshold, alerts: Vec::new() }
    }

    /// Configured threshold
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether `queue_length` cars waiting at `station` is a bottleneck
    ///
    /// Breaches are appended to the alert history.
    pub fn check(&mut self, station: StationKind, queue_length: usize, time: SimTime) -> bool {
        if queue_length <= self.threshold {
            return false;
        }

        debug!(%station, queue_length, threshold = self.threshold, %time, "bottleneck detected");
        self.alerts.push(BottleneckAlert { station, queue_length, time });
        true
    }

    /// Every breach so far, in detection order
    pub fn alerts(&self) -> &[BottleneckAlert] {
        &self.alerts
    }

    /// Breaches recorded for one station
    pub fn alerts_for(&self, station: StationKind) -> impl Iterator<Item = &BottleneckAlert> {
        self.alerts.iter().filter(move |alert| alert.station == station)
    }

    /// Forget the alert history
    pub fn reset_alerts(&mut self) {
        self.alerts.clear();
    }
}

impl Default for BottleneckDetector {
    fn default() -> Self {
        Self::new(crate::types::config::defaults::BOTTLENECK_THRESHOLD)
    }
}
