//! One car's trip through Cleaning, Primer and Painting
//!
//! A journey is a resumable state machine. Each call to [`CarJourney::resume`]
//! runs one step against the shared [`SimulationState`] and returns what the
//! journey is waiting for next: a machine, a service delay, or nothing.
//!
//! ```text
//! Arrived ──► Queued(Cleaning) ──► InService(Cleaning) ──► Queued(Primer) ──► ...
//!                                                    ... ──► InService(Painting) ──► Exited
//! ```

use tracing::trace;

use crate::car::Car;
use crate::events::ShopEventKind;
use crate::simulation::{SimulationError, SimulationResult, SimulationState, Yield};
use crate::station::MachineSlot;
use crate::types::StationKind;

/// Where a car currently is in its journey
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JourneyState {
    /// Created by the arrival process, not yet queued anywhere
    Arrived,
    /// Waiting for a machine at this station
    Queued(StationKind),
    /// Being serviced at this station for `duration` minutes
    InService {
        /// Station doing the work
        station: StationKind,
        /// Sampled service time
        duration: f64,
    },
    /// Left the shop
    Exited,
}

/// Process driving a single car through the conveyor
#[derive(Debug)]
pub struct CarJourney {
    car: Car,
    state: JourneyState,
    held: Option<MachineSlot>,
}

impl CarJourney {
    /// Start a journey for a freshly arrived car
    pub fn new(car: Car) -> Self {
        Self { car, state: JourneyState::Arrived, held: None }
    }

    /// The car being driven
    pub fn car(&self) -> &Car {
        &self.car
    }

    /// Current position in the journey
    pub fn state(&self) -> JourneyState {
        self.state
    }

    /// Whether the journey currently holds a machine
    pub fn holds_machine(&self) -> bool {
        self.held.is_some()
    }

    /// Hand the journey the machine it queued for
    pub fn grant(&mut self, slot: MachineSlot) -> SimulationResult<()> {
        match self.state {
            JourneyState::Queued(station) if self.held.is_none() && slot.station() == station => {
                self.held = Some(slot);
                Ok(())
            }
            state => Err(SimulationError::scheduling_error(format!(
                "{} cannot take a {} machine while {:?}",
                self.car.id,
                slot.station(),
                state
            ))),
        }
    }

    /// Run the next step of the journey
    pub fn resume(&mut self, sim: &mut SimulationState) -> SimulationResult<Yield> {
        trace!(car = %self.car.id, state = ?self.state, "resuming journey");

        match self.state {
            JourneyState::Arrived => self.enter_queue(sim, StationKind::Cleaning),
            JourneyState::Queued(station) => self.start_service(sim, station),
            JourneyState::InService { station, duration } => {
                self.finish_service(sim, station, duration)
            }
            JourneyState::Exited => Err(SimulationError::scheduling_error(format!(
                "{} resumed after leaving the shop",
                self.car.id
            ))),
        }
    }

    fn enter_queue(&mut self, sim: &mut SimulationState, station: StationKind) -> SimulationResult<Yield> {
        sim.emit(
            ShopEventKind::QueueEntry,
            Some(self.car.id),
            Some(station),
            format!("{} entering {} queue", self.car.id, station),
        )?;
        self.state = JourneyState::Queued(station);
        Ok(Yield::Request(station))
    }

    fn start_service(&mut self, sim: &mut SimulationState, station: StationKind) -> SimulationResult<Yield> {
        if self.held.is_none() {
            return Err(SimulationError::scheduling_error(format!(
                "{} resumed at {} without a machine",
                self.car.id, station
            )));
        }

        let now = sim.now();
        self.car.mark_started(station, now);
        let wait = self.car.wait_time(station).ok_or_else(|| {
            SimulationError::scheduling_error(format!(
                "{} started {} before finishing the previous station",
                self.car.id, station
            ))
        })?;
        sim.station_mut(station).metrics.add_wait_time(wait);

        sim.emit(
            ShopEventKind::ServiceStart,
            Some(self.car.id),
            Some(station),
            format!("{} STARTED {}", self.car.id, station),
        )?;

        let duration = sim.sample_service_time(station);
        self.state = JourneyState::InService { station, duration };
        Ok(Yield::Timeout(duration))
    }

    fn finish_service(
        &mut self,
        sim: &mut SimulationState,
        station: StationKind,
        duration: f64,
    ) -> SimulationResult<Yield> {
        self.car.mark_finished(station, sim.now());
        sim.station_mut(station).metrics.add_processing_time(duration);

        sim.emit(
            ShopEventKind::ServiceFinish,
            Some(self.car.id),
            Some(station),
            format!("{} FINISHED {}", self.car.id, station),
        )?;

        let slot = self.held.take().ok_or_else(|| {
            SimulationError::scheduling_error(format!(
                "{} finished {} without holding a machine",
                self.car.id, station
            ))
        })?;
        sim.release(slot)?;

        // Queue snapshots follow Cleaning and Primer only
        if station != StationKind::Painting {
            sim.update_queue_status()?;
        }

        match station.next() {
            Some(next) => self.enter_queue(sim, next),
            None => self.exit(sim),
        }
    }

    fn exit(&mut self, sim: &mut SimulationState) -> SimulationResult<Yield> {
        self.car.mark_exited(sim.now());
        let total = self.car.total_system_time().unwrap_or_default();
        sim.car_exited(self.car.clone());

        sim.emit(
            ShopEventKind::Exit,
            Some(self.car.id),
            None,
            format!("{} EXITED SYSTEM (Total time: {:.1} min)", self.car.id, total),
        )?;
        self.state = JourneyState::Exited;
        Ok(Yield::Finished)
    }
}
