//! Capacity-limited station resource with a FIFO wait queue
//!
//! A station grants at most `capacity` machine slots at once. Requests beyond
//! that wait in arrival order; releasing a slot hands it straight to the head
//! of the queue, so a freed machine never sits idle while a car is waiting.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{ProcessId, StationKind};

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Proof of holding one machine at a station
///
/// Only a [`StationResource`] can create one and only `release` on that same
/// resource accepts it, so every release is paired with exactly one earlier grant.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a machine slot must be released back to its station"]
pub struct MachineSlot {
    station: StationKind,
    owner: u64,
    serial: u64,
}

impl MachineSlot {
    /// Station this slot belongs to
    pub fn station(&self) -> StationKind {
        self.station
    }

    /// Grant number, unique per station
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

/// Outcome of a machine request
#[derive(Debug)]
pub enum Acquire {
    /// A machine was free and is now held
    Granted(MachineSlot),
    /// All machines are busy; the requester waits at this queue position (0 = head)
    Queued {
        /// Zero-based place in line
        position: usize,
    },
}

/// A slot passed to the first waiting process when a machine is released
#[derive(Debug)]
pub struct Handoff {
    /// Process that was waiting at the head of the queue
    pub process: ProcessId,
    /// Slot it now holds
    pub slot: MachineSlot,
}

/// Semaphore-like resource guarding the machines of one station
///
/// Not `Clone`: a copy could accept slots it never granted.
#[derive(Debug)]
pub struct StationResource {
    id: u64,
    kind: StationKind,
    capacity: usize,
    occupancy: usize,
    queue: VecDeque<ProcessId>,
    issued: u64,
}

impl StationResource {
    /// Create a resource with `capacity` machines, all idle
    pub fn new(kind: StationKind, capacity: usize) -> SimulationResult<Self> {
        if capacity == 0 {
            return Err(SimulationError::configuration_error(format!(
                "{} needs at least one machine",
                kind
            )));
        }
        Ok(Self {
            id: NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            capacity,
            occupancy: 0,
            queue: VecDeque::new(),
            issued: 0,
        })
    }

    /// Ask for a machine on behalf of `process`
    pub fn request(&mut self, process: ProcessId) -> Acquire {
        if self.occupancy < self.capacity {
            self.occupancy += 1;
            trace!(station = %self.kind, %process, occupancy = self.occupancy, "machine granted");
            Acquire::Granted(self.mint())
        } else {
            self.queue.push_back(process);
            let position = self.queue.len() - 1;
            trace!(station = %self.kind, %process, position, "request queued");
            Acquire::Queued { position }
        }
    }

    /// Give a machine back, handing it to the first waiting process if there is one
    pub fn release(&mut self, slot: MachineSlot) -> SimulationResult<Option<Handoff>> {
        if slot.station != self.kind {
            return Err(SimulationError::scheduling_error(format!(
                "slot from {} released at {}",
                slot.station, self.kind
            )));
        }
        if slot.owner != self.id {
            return Err(SimulationError::scheduling_error(format!(
                "{} slot {} was granted by another resource",
                self.kind, slot.serial
            )));
        }
        self.occupancy = self.occupancy.checked_sub(1).ok_or_else(|| {
            SimulationError::scheduling_error(format!(
                "{} released slot {} with no machine in use",
                self.kind, slot.serial
            ))
        })?;

        match self.queue.pop_front() {
            Some(process) => {
                self.occupancy += 1;
                trace!(station = %self.kind, %process, "machine handed off");
                Ok(Some(Handoff { process, slot: self.mint() }))
            }
            None => Ok(None),
        }
    }

    fn mint(&mut self) -> MachineSlot {
        self.issued += 1;
        MachineSlot { station: self.kind, owner: self.id, serial: self.issued }
    }

    /// Station this resource guards
    pub fn kind(&self) -> StationKind {
        self.kind
    }

    /// Number of machines
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Machines currently held
    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    /// Requests waiting for a machine
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether every machine is held
    pub fn is_saturated(&self) -> bool {
        self.occupancy == self.capacity
    }

    /// Total grants made so far
    pub fn grants_issued(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(acquire: Acquire) -> MachineSlot {
        match acquire {
            Acquire::Granted(slot) => slot,
            Acquire::Queued { .. } => panic!("expected an immediate grant"),
        }
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(StationResource::new(StationKind::Cleaning, 0).is_err());
    }

    #[test]
    fn test_grants_up_to_capacity_then_queues() {
        let mut primer = StationResource::new(StationKind::Primer, 2).unwrap();

        let _a = granted(primer.request(ProcessId(1)));
        let _b = granted(primer.request(ProcessId(2)));
        assert!(primer.is_saturated());

        match primer.request(ProcessId(3)) {
            Acquire::Queued { position } => assert_eq!(position, 0),
            Acquire::Granted(_) => panic!("capacity exceeded"),
        }
        match primer.request(ProcessId(4)) {
            Acquire::Queued { position } => assert_eq!(position, 1),
            Acquire::Granted(_) => panic!("capacity exceeded"),
        }
        assert_eq!(primer.occupancy(), 2);
        assert_eq!(primer.queue_len(), 2);
    }

    #[test]
    fn test_release_hands_off_in_fifo_order() {
        let mut cleaning = StationResource::new(StationKind::Cleaning, 1).unwrap();
        let first = granted(cleaning.request(ProcessId(10)));
        let _ = cleaning.request(ProcessId(11));
        let _ = cleaning.request(ProcessId(12));

        let handoff = cleaning.release(first).unwrap().expect("queue was not empty");
        assert_eq!(handoff.process, ProcessId(11));
        // No gap: the machine stays occupied through the hand-off
        assert_eq!(cleaning.occupancy(), 1);
        assert_eq!(cleaning.queue_len(), 1);

        let handoff = cleaning.release(handoff.slot).unwrap().expect("queue was not empty");
        assert_eq!(handoff.process, ProcessId(12));

        assert!(cleaning.release(handoff.slot).unwrap().is_none());
        assert_eq!(cleaning.occupancy(), 0);
        assert_eq!(cleaning.grants_issued(), 3);
    }

    #[test]
    fn test_slot_from_other_station_is_rejected() {
        let mut cleaning = StationResource::new(StationKind::Cleaning, 1).unwrap();
        let mut painting = StationResource::new(StationKind::Painting, 1).unwrap();
        let slot = granted(cleaning.request(ProcessId(1)));

        assert!(painting.release(slot).is_err());
        assert_eq!(painting.occupancy(), 0);
    }

    #[test]
    fn test_slot_from_same_kind_resource_is_rejected() {
        let mut line_a = StationResource::new(StationKind::Cleaning, 1).unwrap();
        let mut line_b = StationResource::new(StationKind::Cleaning, 1).unwrap();
        let slot = granted(line_a.request(ProcessId(1)));

        // line_b never granted anything
        assert!(matches!(line_b.release(slot), Err(SimulationError::SchedulingError(_))));
        assert_eq!(line_b.occupancy(), 0);
        assert_eq!(line_a.occupancy(), 1);
    }

    #[test]
    fn test_slot_from_same_kind_busy_resource_is_rejected() {
        let mut line_a = StationResource::new(StationKind::Primer, 2).unwrap();
        let mut line_b = StationResource::new(StationKind::Primer, 2).unwrap();
        let foreign = granted(line_a.request(ProcessId(1)));
        let own = granted(line_b.request(ProcessId(2)));

        assert!(line_b.release(foreign).is_err());
        assert_eq!(line_b.occupancy(), 1);
        assert!(line_b.release(own).unwrap().is_none());
        assert_eq!(line_b.occupancy(), 0);
    }

    #[test]
    fn test_queue_length_query_has_no_side_effects() {
        let mut painting = StationResource::new(StationKind::Painting, 1).unwrap();
        let _slot = granted(painting.request(ProcessId(1)));
        let _ = painting.request(ProcessId(2));

        for _ in 0..3 {
            assert_eq!(painting.queue_len(), 1);
        }
        assert_eq!(painting.occupancy(), 1);
    }
}
