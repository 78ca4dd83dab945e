//! Paint shop stations
//!
//! Each station pairs a [`StationResource`] (who may use a machine right now)
//! with a [`StationMetrics`] record (what happened so far) and the service-time
//! range its machines draw from.

pub mod metrics;
pub mod resource;

pub use metrics::*;
pub use resource::*;

use crate::simulation::SimulationResult;
use crate::types::{SimulationConfig, StationKind, TimeRange};

/// Resource, metrics and service times of one station
#[derive(Debug)]
pub struct Station {
    /// Machine access control
    pub resource: StationResource,
    /// Cumulative statistics
    pub metrics: StationMetrics,
    /// Service duration range, minutes
    pub service_time: TimeRange,
}

impl Station {
    /// Build a station from its configuration
    pub fn new(kind: StationKind, machines: usize, service_time: TimeRange) -> SimulationResult<Self> {
        Ok(Self {
            resource: StationResource::new(kind, machines)?,
            metrics: StationMetrics::new(kind, machines),
            service_time,
        })
    }

    /// Which station this is
    pub fn kind(&self) -> StationKind {
        self.resource.kind()
    }
}

/// The three conveyor stations, indexed by [`StationKind`]
#[derive(Debug)]
pub struct StationSet {
    stations: [Station; 3],
}

impl StationSet {
    /// Build all stations from the configuration
    pub fn from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        let build = |kind: StationKind| {
            let settings = config.station(kind);
            Station::new(kind, settings.machines, settings.service_time)
        };

        Ok(Self {
            stations: [
                build(StationKind::Cleaning)?,
                build(StationKind::Primer)?,
                build(StationKind::Painting)?,
            ],
        })
    }

    /// The station of the given kind
    pub fn get(&self, kind: StationKind) -> &Station {
        &self.stations[kind.index()]
    }

    /// Mutable access to the station of the given kind
    pub fn get_mut(&mut self, kind: StationKind) -> &mut Station {
        &mut self.stations[kind.index()]
    }

    /// Stations in conveyor order
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Copy out the metrics records, in conveyor order
    pub fn metrics_snapshot(&self) -> [StationMetrics; 3] {
        [
            self.stations[0].metrics.clone(),
            self.stations[1].metrics.clone(),
            self.stations[2].metrics.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_set_from_default_config() {
        let config = SimulationConfig::default();
        let stations = StationSet::from_config(&config).unwrap();

        for kind in StationKind::ALL {
            let station = stations.get(kind);
            assert_eq!(station.kind(), kind);
            assert_eq!(station.resource.capacity(), config.station(kind).machines);
            assert_eq!(station.metrics.machines, config.station(kind).machines);
        }
        assert_eq!(stations.iter().count(), 3);
    }

    #[test]
    fn test_station_set_rejects_zero_machines() {
        let mut config = SimulationConfig::default();
        config.painting.machines = 0;
        assert!(StationSet::from_config(&config).is_err());
    }
}
