//! Car bodies moving through the paint shop
//!
//! A car records when it arrived, when each station started and finished with
//! it, and when it left the shop.

use serde::{Deserialize, Serialize};

use crate::simulation::SimTime;
use crate::types::{CarId, StationKind};

/// Start and end of one station visit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StationVisit {
    /// When a machine was acquired
    pub start: Option<SimTime>,
    /// When service completed
    pub end: Option<SimTime>,
}

/// A car body and its timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// Unique, sequential identifier
    pub id: CarId,
    /// When the car entered the shop
    pub arrival_time: SimTime,
    /// Visits in conveyor order (Cleaning, Primer, Painting)
    pub visits: [StationVisit; 3],
    /// When the car left the shop
    pub exit_time: Option<SimTime>,
}

impl Car {
    /// Create a car that arrived at `arrival_time`
    pub fn new(id: CarId, arrival_time: SimTime) -> Self {
        Self { id, arrival_time, visits: [StationVisit::default(); 3], exit_time: None }
    }

    /// When service at `station` started
    pub fn start(&self, station: StationKind) -> Option<SimTime> {
        self.visits[station.index()].start
    }

    /// When service at `station` finished
    pub fn end(&self, station: StationKind) -> Option<SimTime> {
        self.visits[station.index()].end
    }

    /// Stamp the start of service at `station`
    pub fn mark_started(&mut self, station: StationKind, time: SimTime) {
        self.visits[station.index()].start = Some(time);
    }

    /// Stamp the end of service at `station`
    pub fn mark_finished(&mut self, station: StationKind, time: SimTime) {
        self.visits[station.index()].end = Some(time);
    }

    /// Stamp the exit from the shop
    pub fn mark_exited(&mut self, time: SimTime) {
        self.exit_time = Some(time);
    }

    /// When the car became ready for `station`
    ///
    /// That is the arrival time for Cleaning and the previous station's end otherwise.
    pub fn ready_for(&self, station: StationKind) -> Option<SimTime> {
        match station.previous() {
            Some(previous) => self.end(previous),
            None => Some(self.arrival_time),
        }
    }

    /// Time spent queueing before `station`, once its service has started
    pub fn wait_time(&self, station: StationKind) -> Option<f64> {
        let start = self.start(station)?;
        let ready = self.ready_for(station)?;
        Some(start.since(ready))
    }

    /// Time spent being serviced at `station`, once it has finished
    pub fn service_time(&self, station: StationKind) -> Option<f64> {
        Some(self.end(station)?.since(self.start(station)?))
    }

    /// Time from arrival to exit, once the car has left
    pub fn total_system_time(&self) -> Option<f64> {
        self.exit_time.map(|exit| exit.since(self.arrival_time))
    }

    /// Whether the car has left the shop
    pub fn has_exited(&self) -> bool {
        self.exit_time.is_some()
    }
}
