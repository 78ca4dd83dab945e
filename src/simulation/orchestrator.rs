//! Main simulation orchestrator
//!
//! This module contains the shared [`SimulationState`], the process table and
//! the event loop that drives every arrival and car journey to completion.
//!
//! Each step pops the next due process, resumes it against the state, and then
//! schedules, in order: processes that received a machine from a release during
//! the step, journeys spawned during the step, and finally the stepped process
//! itself according to what it yielded.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, trace};

use crate::car::{Car, CarJourney};
use crate::events::{EventLog, EventSink, FileEventLog, ShopEvent, ShopEventKind};
use crate::simulation::{
    ArrivalProcess, BottleneckDetector, EventScheduler, SimTime, SimulationError,
    SimulationResult, SimulationResults,
};
use crate::station::{Acquire, Handoff, MachineSlot, Station, StationSet};
use crate::types::{CarId, ProcessId, RunId, SimulationConfig, StationKind};

const BANNER_WIDTH: usize = 80;

/// What a resumed process is waiting for next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Yield {
    /// Resume after this many simulated minutes
    Timeout(f64),
    /// Resume once a machine at this station is held
    Request(StationKind),
    /// Nothing left to do
    Finished,
}

/// A logical process known to the event loop
#[derive(Debug)]
pub enum Process {
    /// The car generator
    Arrivals(ArrivalProcess),
    /// One car moving through the stations
    Journey(CarJourney),
}

impl Process {
    fn resume(&mut self, sim: &mut SimulationState) -> SimulationResult<Yield> {
        match self {
            Process::Arrivals(arrivals) => arrivals.resume(sim),
            Process::Journey(journey) => journey.resume(sim),
        }
    }

    fn grant(&mut self, slot: MachineSlot) -> SimulationResult<()> {
        match self {
            Process::Journey(journey) => journey.grant(slot),
            Process::Arrivals(_) => Err(SimulationError::scheduling_error(format!(
                "arrival process was handed a {} machine",
                slot.station()
            ))),
        }
    }
}

/// Everything a process step may read or change
///
/// Owned by the running simulation and lent to one process at a time.
#[derive(Debug)]
pub struct SimulationState {
    now: SimTime,
    config: SimulationConfig,
    rng: StdRng,
    stations: StationSet,
    detector: BottleneckDetector,
    log: EventLog,
    completed: Vec<Car>,
    last_car_id: u64,
    cars_in_system: usize,
    alert_count: usize,
    spawned: Vec<CarJourney>,
    handoffs: Vec<Handoff>,
}

impl SimulationState {
    /// Build the initial state for a run
    pub fn new(config: SimulationConfig, log: EventLog) -> SimulationResult<Self> {
        let rng = match config.seed {
            Some(seed) => {
                info!("Using deterministic seed: {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => {
                debug!("Using entropy-based random seed");
                StdRng::from_entropy()
            }
        };

        Ok(Self {
            now: SimTime::ZERO,
            stations: StationSet::from_config(&config)?,
            detector: BottleneckDetector::new(config.bottleneck_threshold),
            config,
            rng,
            log,
            completed: Vec::new(),
            last_car_id: 0,
            cars_in_system: 0,
            alert_count: 0,
            spawned: Vec::new(),
            handoffs: Vec::new(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_memory_log(
        config: SimulationConfig,
    ) -> SimulationResult<(Self, crate::events::MemoryEventLog)> {
        let memory = crate::events::MemoryEventLog::new();
        let log = EventLog::new(Box::new(memory.clone()), config.log_detail_level, false);
        Ok((Self::new(config, log)?, memory))
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub(crate) fn advance_to(&mut self, time: SimTime) {
        self.now = time;
    }

    /// Configuration of the run
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The station of the given kind
    pub fn station(&self, kind: StationKind) -> &Station {
        self.stations.get(kind)
    }

    /// Mutable access to the station of the given kind
    pub fn station_mut(&mut self, kind: StationKind) -> &mut Station {
        self.stations.get_mut(kind)
    }

    /// All stations in conveyor order
    pub fn stations(&self) -> &StationSet {
        &self.stations
    }

    /// Bottleneck detector and its alert history
    pub fn detector(&self) -> &BottleneckDetector {
        &self.detector
    }

    /// Draw a service duration for `kind`
    pub fn sample_service_time(&mut self, kind: StationKind) -> f64 {
        let range = self.stations.get(kind).service_time;
        range.sample(&mut self.rng)
    }

    /// Draw the gap until the next arrival
    pub fn sample_arrival_interval(&mut self) -> f64 {
        self.config.arrival_interval.sample(&mut self.rng)
    }

    /// Log a shop event at the current time
    pub fn emit(
        &mut self,
        kind: ShopEventKind,
        car_id: Option<CarId>,
        station: Option<StationKind>,
        message: impl Into<String>,
    ) -> SimulationResult<()> {
        self.log.record(ShopEvent::new(self.now, kind, car_id, station, message))
    }

    /// Allocate the id of the next arriving car
    pub fn next_car_id(&mut self) -> CarId {
        self.last_car_id += 1;
        CarId(self.last_car_id)
    }

    /// Launch a journey for a car that just arrived
    pub fn spawn(&mut self, journey: CarJourney) {
        self.cars_in_system += 1;
        self.spawned.push(journey);
    }

    /// Record that a car left the shop
    pub fn car_exited(&mut self, car: Car) {
        self.cars_in_system = self.cars_in_system.saturating_sub(1);
        self.completed.push(car);
    }

    /// Return a machine; a waiting process that receives it is resumed after this step
    pub fn release(&mut self, slot: MachineSlot) -> SimulationResult<()> {
        let station = slot.station();
        if let Some(handoff) = self.stations.get_mut(station).resource.release(slot)? {
            self.handoffs.push(handoff);
        }
        Ok(())
    }

    /// Sample every queue and raise an alert for each one over the threshold
    pub fn update_queue_status(&mut self) -> SimulationResult<()> {
        let now = self.now;
        let mut lengths = [0; 3];

        for kind in StationKind::ALL {
            let station = self.stations.get_mut(kind);
            let queue_length = station.resource.queue_len();
            let busy = station.resource.occupancy();
            station.metrics.update_queue(queue_length, busy, now);
            lengths[kind.index()] = queue_length;
        }

        for kind in StationKind::ALL {
            let queue_length = lengths[kind.index()];
            if self.detector.check(kind, queue_length, now) {
                self.alert_count += 1;
                self.emit(
                    ShopEventKind::Alert,
                    None,
                    Some(kind),
                    format!("ALERT: Queue at {} has {} cars waiting", kind, queue_length),
                )?;
            }
        }
        Ok(())
    }

    /// Cars that have left the shop, in exit order
    pub fn completed_cars(&self) -> &[Car] {
        &self.completed
    }

    /// Cars admitted so far
    pub fn cars_generated(&self) -> u64 {
        self.last_car_id
    }

    /// Cars admitted but not yet exited
    pub fn cars_in_system(&self) -> usize {
        self.cars_in_system
    }

    /// Threshold breaches so far
    pub fn alert_count(&self) -> usize {
        self.alert_count
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<CarJourney> {
        std::mem::take(&mut self.spawned)
    }

    pub(crate) fn take_handoffs(&mut self) -> Vec<Handoff> {
        std::mem::take(&mut self.handoffs)
    }

    fn flush_log(&mut self) -> SimulationResult<()> {
        self.log.flush()
    }
}

/// A paint shop run: state, process table and scheduler
#[derive(Debug)]
pub struct PaintShopSimulation {
    run_id: RunId,
    started_at: DateTime<Utc>,
    state: SimulationState,
    scheduler: EventScheduler<ProcessId>,
    processes: Vec<Option<Process>>,
    steps: u64,
}

impl PaintShopSimulation {
    /// Create a simulation that records events to `sink`
    #[instrument(skip(config, sink), fields(seed = ?config.seed))]
    pub fn new(config: SimulationConfig, sink: Box<dyn EventSink>) -> SimulationResult<Self> {
        config.validate()?;

        let log = EventLog::new(sink, config.log_detail_level, config.verbose_logging);
        let run_id = RunId::new();
        info!(
            "Initializing paint shop {}: {} cleaning, {} primer, {} painting machines",
            run_id, config.cleaning.machines, config.primer.machines, config.painting.machines
        );

        Ok(Self {
            run_id,
            started_at: Utc::now(),
            state: SimulationState::new(config, log)?,
            scheduler: EventScheduler::new(),
            processes: Vec::new(),
            steps: 0,
        })
    }

    /// Create a simulation that writes its event log to the configured file
    pub fn with_log_file(config: SimulationConfig) -> SimulationResult<Self> {
        let sink = FileEventLog::create(&config.log_file_path)?;
        Self::new(config, Box::new(sink))
    }

    /// Identifier of this run
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Shared state, for inspection
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Run from time zero to the horizon and return the results
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub fn run(mut self) -> SimulationResult<SimulationResults> {
        self.banner("PAINT SHOP CONVEYOR SYSTEM SIMULATION STARTED")?;

        let cutoff = SimTime::from_minutes(self.state.config.arrival_cutoff);
        let arrivals = self.register(Process::Arrivals(ArrivalProcess::new(cutoff)));
        self.scheduler.schedule_now(arrivals);

        let horizon = SimTime::from_minutes(self.state.config.horizon);
        self.run_until(horizon)?;

        self.banner("SIMULATION COMPLETE")?;
        self.state.flush_log()?;

        info!(
            "Simulation finished at {} min after {} steps: {} cars completed, {} still in system, {} alerts",
            self.state.now,
            self.steps,
            self.state.completed.len(),
            self.state.cars_in_system,
            self.state.alert_count
        );
        if !self.scheduler.is_empty() {
            debug!(pending = self.scheduler.len(), "abandoning events past the horizon");
        }

        Ok(SimulationResults::from_state(self.run_id, self.started_at, self.state))
    }

    /// Process every pending event due at or before `horizon`
    pub fn run_until(&mut self, horizon: SimTime) -> SimulationResult<()> {
        while let Some(event) = self.scheduler.pop_until(horizon) {
            self.state.advance_to(event.time);
            self.step(event.payload)?;
        }
        Ok(())
    }

    fn step(&mut self, pid: ProcessId) -> SimulationResult<()> {
        self.steps += 1;
        let mut process = self.take_process(pid)?;
        let outcome = process.resume(&mut self.state)?;
        trace!(%pid, ?outcome, time = %self.state.now, "process stepped");

        for handoff in self.state.take_handoffs() {
            let waiting = self.process_mut(handoff.process)?;
            waiting.grant(handoff.slot)?;
            self.scheduler.schedule_now(handoff.process);
        }

        for journey in self.state.take_spawned() {
            let spawned = self.register(Process::Journey(journey));
            self.scheduler.schedule_now(spawned);
        }

        match outcome {
            Yield::Timeout(delay) => {
                self.processes[pid.0] = Some(process);
                self.scheduler.schedule_in(delay, pid)?;
            }
            Yield::Request(kind) => {
                match self.state.stations.get_mut(kind).resource.request(pid) {
                    Acquire::Granted(slot) => {
                        process.grant(slot)?;
                        self.scheduler.schedule_now(pid);
                    }
                    Acquire::Queued { position } => {
                        trace!(%pid, station = %kind, position, "waiting for a machine");
                    }
                }
                self.processes[pid.0] = Some(process);
            }
            Yield::Finished => {}
        }
        Ok(())
    }

    fn register(&mut self, process: Process) -> ProcessId {
        let pid = ProcessId(self.processes.len());
        self.processes.push(Some(process));
        pid
    }

    fn take_process(&mut self, pid: ProcessId) -> SimulationResult<Process> {
        self.processes
            .get_mut(pid.0)
            .and_then(Option::take)
            .ok_or_else(|| SimulationError::scheduling_error(format!("{} is not runnable", pid)))
    }

    fn process_mut(&mut self, pid: ProcessId) -> SimulationResult<&mut Process> {
        self.processes
            .get_mut(pid.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| SimulationError::scheduling_error(format!("{} is not waiting", pid)))
    }

    fn banner(&mut self, title: &str) -> SimulationResult<()> {
        let rule = "=".repeat(BANNER_WIDTH);
        self.state.emit(ShopEventKind::Separator, None, None, rule.clone())?;
        self.state.emit(ShopEventKind::RunBoundary, None, None, title)?;
        self.state.emit(ShopEventKind::Separator, None, None, rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventLog;
    use crate::types::TimeRange;

    fn deterministic_config() -> SimulationConfig {
        SimulationConfig {
            arrival_interval: TimeRange::fixed(10.0),
            arrival_cutoff: 30.0,
            verbose_logging: false,
            seed: Some(11),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_drains_all_cars() {
        let memory = MemoryEventLog::new();
        let simulation =
            PaintShopSimulation::new(deterministic_config(), Box::new(memory.clone())).unwrap();
        let results = simulation.run().unwrap();

        // Arrivals at 10 and 20; the one at 30 hits the cutoff
        assert_eq!(results.cars_generated, 2);
        assert_eq!(results.total_cars, 2);
        assert_eq!(results.cars_in_system, 0);

        let messages = memory.messages();
        assert_eq!(messages[1], "PAINT SHOP CONVEYOR SYSTEM SIMULATION STARTED");
        assert_eq!(messages[messages.len() - 2], "SIMULATION COMPLETE");
        assert!(messages.contains(&"STOP accepting new cars (shift end at 30 min)".to_string()));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = deterministic_config();
        config.primer.machines = 0;
        let result = PaintShopSimulation::new(config, Box::new(MemoryEventLog::new()));
        assert!(matches!(result, Err(SimulationError::ValidationError(_))));
    }

    #[test]
    fn test_horizon_abandons_in_flight_cars() {
        let mut config = deterministic_config();
        config.horizon = 40.0;
        config.painting.service_time = TimeRange::fixed(500.0);

        let results = PaintShopSimulation::new(config, Box::new(MemoryEventLog::new()))
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(results.total_cars, 0);
        assert_eq!(results.cars_in_system as u64, results.cars_generated);
        assert!(results.elapsed_time <= 40.0);
    }

    #[test]
    fn test_run_until_can_be_called_in_stages() {
        let mut simulation =
            PaintShopSimulation::new(deterministic_config(), Box::new(MemoryEventLog::new())).unwrap();
        let arrivals = simulation.register(Process::Arrivals(ArrivalProcess::new(SimTime::from_minutes(30.0))));
        simulation.scheduler.schedule_now(arrivals);

        simulation.run_until(SimTime::from_minutes(15.0)).unwrap();
        assert_eq!(simulation.state().cars_generated(), 1);
        assert!(simulation.state().now() <= SimTime::from_minutes(15.0));

        simulation.run_until(SimTime::from_minutes(2000.0)).unwrap();
        assert_eq!(simulation.state().completed_cars().len(), 2);
    }
}
