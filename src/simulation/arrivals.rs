//! Car arrival process
//!
//! Waits a random interval, then either admits a new car (launching its
//! journey) or, once the cutoff has passed, announces the end of arrivals and
//! stops for good.

use tracing::debug;

use crate::car::{Car, CarJourney};
use crate::events::ShopEventKind;
use crate::simulation::{SimTime, SimulationResult, SimulationState, Yield};

/// Where the arrival loop is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalState {
    /// Not started yet
    Idle,
    /// Waiting for the next car
    Waiting,
    /// Cutoff reached, no more cars
    Stopped,
}

/// Process generating cars until the arrival cutoff
#[derive(Debug, Clone)]
pub struct ArrivalProcess {
    cutoff: SimTime,
    state: ArrivalState,
}

impl ArrivalProcess {
    /// Create an arrival process that admits cars strictly before `cutoff`
    pub fn new(cutoff: SimTime) -> Self {
        Self { cutoff, state: ArrivalState::Idle }
    }

    /// Current state
    pub fn state(&self) -> ArrivalState {
        self.state
    }

    /// Run the next step of the arrival loop
    pub fn resume(&mut self, sim: &mut SimulationState) -> SimulationResult<Yield> {
        match self.state {
            ArrivalState::Idle => {
                self.state = ArrivalState::Waiting;
                Ok(Yield::Timeout(sim.sample_arrival_interval()))
            }
            ArrivalState::Waiting if sim.now() >= self.cutoff => {
                sim.emit(
                    ShopEventKind::ArrivalsStopped,
                    None,
                    None,
                    format!("STOP accepting new cars (shift end at {} min)", self.cutoff.as_minutes()),
                )?;
                debug!(cars = sim.cars_generated(), "arrival process finished");
                self.state = ArrivalState::Stopped;
                Ok(Yield::Finished)
            }
            ArrivalState::Waiting => {
                let car = Car::new(sim.next_car_id(), sim.now());
                sim.emit(ShopEventKind::Arrival, Some(car.id), None, format!("{} ARRIVED", car.id))?;
                sim.spawn(CarJourney::new(car));
                Ok(Yield::Timeout(sim.sample_arrival_interval()))
            }
            ArrivalState::Stopped => Ok(Yield::Finished),
        }
    }
}
