//! Per-station cumulative statistics
//!
//! One record per station, created when the simulation starts, updated by car
//! journeys throughout the run and read-only in the results snapshot.

use serde::{Deserialize, Serialize};

use crate::simulation::SimTime;
use crate::types::StationKind;

/// Queue length observed at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueSample {
    /// When the queue was observed
    pub time: SimTime,
    /// Cars waiting for a machine
    pub queue_length: usize,
    /// Machines busy at that instant
    pub busy_machines: usize,
}

/// Cumulative statistics of one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMetrics {
    /// Which station this record describes
    pub station: StationKind,
    /// Number of parallel machines
    pub machines: usize,
    /// Sum of all service durations, in machine-minutes
    pub total_busy_time: f64,
    /// Wait before service, one entry per car that started service
    pub wait_times: Vec<f64>,
    /// Service durations, one entry per car that finished service
    pub processing_times: Vec<f64>,
    /// Queue length at the latest observation
    pub current_queue_length: usize,
    /// Longest queue ever observed
    pub max_queue_length: usize,
    /// Every observation, in time order
    pub queue_length_history: Vec<QueueSample>,
}

impl StationMetrics {
    /// Empty record for a station with `machines` machines
    pub fn new(station: StationKind, machines: usize) -> Self {
        Self {
            station,
            machines,
            total_busy_time: 0.0,
            wait_times: Vec::new(),
            processing_times: Vec::new(),
            current_queue_length: 0,
            max_queue_length: 0,
            queue_length_history: Vec::new(),
        }
    }

    /// Record how long a car waited before its service started
    pub fn add_wait_time(&mut self, wait_time: f64) {
        self.wait_times.push(wait_time);
    }

    /// Record a completed service and count it as busy machine time
    pub fn add_processing_time(&mut self, processing_time: f64) {
        self.processing_times.push(processing_time);
        self.total_busy_time += processing_time;
    }

    /// Record a queue observation and keep the running maximum
    pub fn update_queue(&mut self, queue_length: usize, busy_machines: usize, time: SimTime) {
        self.current_queue_length = queue_length;
        self.max_queue_length = self.max_queue_length.max(queue_length);
        self.queue_length_history.push(QueueSample { time, queue_length, busy_machines });
    }

    /// Mean wait before service, 0 when no car has started
    pub fn avg_wait_time(&self) -> f64 {
        mean(&self.wait_times)
    }

    /// Mean service duration, 0 when no car has finished
    pub fn avg_processing_time(&self) -> f64 {
        mean(&self.processing_times)
    }

    /// Longest single wait observed
    pub fn max_wait_time(&self) -> f64 {
        self.wait_times.iter().copied().fold(0.0, f64::max)
    }

    /// Cars that finished service here
    pub fn cars_processed(&self) -> usize {
        self.processing_times.len()
    }

    /// Busy share of the available machine-time over `window` minutes, as a percentage
    pub fn utilization(&self, window: f64) -> f64 {
        if window <= 0.0 || self.machines == 0 {
            return 0.0;
        }
        self.total_busy_time / (self.machines as f64 * window) * 100.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let metrics = StationMetrics::new(StationKind::Primer, 2);
        assert_eq!(metrics.machines, 2);
        assert_eq!(metrics.avg_wait_time(), 0.0);
        assert_eq!(metrics.avg_processing_time(), 0.0);
        assert_eq!(metrics.cars_processed(), 0);
        assert_eq!(metrics.utilization(480.0), 0.0);
        assert!(metrics.queue_length_history.is_empty());
    }

    #[test]
    fn test_processing_accumulates_busy_time() {
        let mut metrics = StationMetrics::new(StationKind::Cleaning, 1);
        metrics.add_processing_time(15.0);
        metrics.add_processing_time(20.0);

        assert_eq!(metrics.total_busy_time, 35.0);
        assert_eq!(metrics.avg_processing_time(), 17.5);
        assert_eq!(metrics.cars_processed(), 2);
    }

    #[test]
    fn test_wait_time_statistics() {
        let mut metrics = StationMetrics::new(StationKind::Painting, 1);
        metrics.add_wait_time(0.0);
        metrics.add_wait_time(10.0);
        metrics.add_wait_time(20.0);

        assert_eq!(metrics.avg_wait_time(), 10.0);
        assert_eq!(metrics.max_wait_time(), 20.0);
    }

    #[test]
    fn test_queue_updates_keep_running_max() {
        let mut metrics = StationMetrics::new(StationKind::Painting, 1);
        metrics.update_queue(2, 1, SimTime::from_minutes(10.0));
        metrics.update_queue(5, 1, SimTime::from_minutes(20.0));
        metrics.update_queue(1, 1, SimTime::from_minutes(30.0));

        assert_eq!(metrics.current_queue_length, 1);
        assert_eq!(metrics.max_queue_length, 5);
        assert_eq!(metrics.queue_length_history.len(), 3);
        assert_eq!(metrics.queue_length_history[1].queue_length, 5);
    }

    #[test]
    fn test_utilization_scales_with_machines() {
        let mut metrics = StationMetrics::new(StationKind::Primer, 2);
        metrics.add_processing_time(240.0);

        assert!((metrics.utilization(240.0) - 50.0).abs() < 1e-9);
        assert_eq!(metrics.utilization(0.0), 0.0);
    }
}
