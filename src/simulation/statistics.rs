//! Statistics collection and reporting
//!
//! This module contains the end-of-run results snapshot. It is built once from
//! the final simulation state and is read-only afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::car::Car;
use crate::simulation::{BottleneckAlert, SimulationState};
use crate::station::StationMetrics;
use crate::types::{RunId, StationKind};

/// Aggregate outcome of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResults {
    /// Identifier of the run
    pub run_id: RunId,
    /// Wall-clock time the run was created
    pub started_at: DateTime<Utc>,
    /// Seed used for sampling, when one was configured
    pub seed: Option<u64>,

    // Throughput
    /// Cars that left the shop
    pub total_cars: usize,
    /// Cars admitted by the arrival process
    pub cars_generated: u64,
    /// Cars admitted but still inside when the run stopped
    pub cars_in_system: usize,
    /// Mean arrival-to-exit time, `None` when no car completed
    pub avg_system_time: Option<f64>,

    /// Per-station records, in conveyor order
    pub stations: [StationMetrics; 3],

    // Bottlenecks
    /// Threshold breaches counted during the run
    pub alert_count: usize,
    /// Every breach, in detection order
    pub alerts: Vec<BottleneckAlert>,

    /// Configured shift length, minutes
    pub shift_duration: f64,
    /// Simulated time when the run stopped, minutes
    pub elapsed_time: f64,

    /// Cars that left the shop, in exit order
    pub completed_cars: Vec<Car>,
}

impl SimulationResults {
    /// Snapshot the final state of a run
    pub fn from_state(run_id: RunId, started_at: DateTime<Utc>, state: SimulationState) -> Self {
        let completed_cars = state.completed_cars().to_vec();
        let total_cars = completed_cars.len();
        let avg_system_time = if total_cars == 0 {
            None
        } else {
            let total: f64 = completed_cars.iter().filter_map(Car::total_system_time).sum();
            Some(total / total_cars as f64)
        };

        Self {
            run_id,
            started_at,
            seed: state.config().seed,
            total_cars,
            cars_generated: state.cars_generated(),
            cars_in_system: state.cars_in_system(),
            avg_system_time,
            stations: state.stations().metrics_snapshot(),
            alert_count: state.alert_count(),
            alerts: state.detector().alerts().to_vec(),
            shift_duration: state.config().shift_duration,
            elapsed_time: state.now().as_minutes(),
            completed_cars,
        }
    }

    /// Metrics of one station
    pub fn station(&self, kind: StationKind) -> &StationMetrics {
        &self.stations[kind.index()]
    }

    /// Minutes the utilization of every station is measured over
    ///
    /// The shift length, stretched to the final clock when cars were still
    /// being drained after the shift ended.
    pub fn measurement_window(&self) -> f64 {
        self.shift_duration.max(self.elapsed_time)
    }

    /// Utilization of one station, percent
    pub fn utilization(&self, kind: StationKind) -> f64 {
        self.station(kind).utilization(self.measurement_window())
    }

    /// Station with the highest utilization; the earliest one wins ties
    pub fn most_utilized(&self) -> (StationKind, f64) {
        StationKind::ALL.iter().map(|&kind| (kind, self.utilization(kind))).fold(
            (StationKind::Cleaning, f64::MIN),
            |best, candidate| if candidate.1 > best.1 { candidate } else { best },
        )
    }

    /// Throughput in cars per hour over the measurement window
    pub fn throughput_per_hour(&self) -> f64 {
        let window = self.measurement_window();
        if window <= 0.0 {
            0.0
        } else {
            self.total_cars as f64 / window * 60.0
        }
    }

    /// One-line summary of the run
    pub fn summary(&self) -> String {
        let avg = match self.avg_system_time {
            Some(avg) => format!("{:.2} min", avg),
            None => "N/A".to_string(),
        };
        let (busiest, utilization) = self.most_utilized();
        format!(
            "Run Summary: {} cars completed of {} generated | Avg system time: {} | Alerts: {} | Busiest: {} ({:.1}%)",
            self.total_cars, self.cars_generated, avg, self.alert_count, busiest, utilization
        )
    }
}

impl fmt::Display for SimulationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
