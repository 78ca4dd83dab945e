//! Event scheduler with deterministic ordering
//!
//! Pending resumptions are kept in a min-heap keyed by `(time, sequence)`:
//! - Events are processed in time order
//! - Ties are broken by insertion order (FIFO)
//! - The clock only moves forward

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::simulation::{SimTime, SimulationError, SimulationResult};

/// A pending resumption with its time and tie-break sequence number
#[derive(Debug, Clone)]
pub struct ScheduledEvent<T> {
    /// When the payload becomes due
    pub time: SimTime,
    /// Insertion order for deterministic tie-breaking
    pub sequence: u64,
    /// What to resume
    pub payload: T,
}

impl<T> PartialEq for ScheduledEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl<T> Eq for ScheduledEvent<T> {}

impl<T> PartialOrd for ScheduledEvent<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledEvent<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time).then(self.sequence.cmp(&other.sequence))
    }
}

/// Simulation clock plus the set of pending events
#[derive(Debug)]
pub struct EventScheduler<T> {
    /// Min-heap ordered by (time, sequence)
    queue: BinaryHeap<Reverse<ScheduledEvent<T>>>,
    /// Monotonic sequence counter
    sequence: u64,
    /// Current simulated time
    now: SimTime,
}

impl<T> Default for EventScheduler<T> {
    fn default() -> Self {
        Self { queue: BinaryHeap::new(), sequence: 0, now: SimTime::ZERO }
    }
}

impl<T> EventScheduler<T> {
    /// Create a scheduler with the clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `payload` at an absolute time, which must not be in the past
    pub fn schedule_at(&mut self, time: SimTime, payload: T) -> SimulationResult<()> {
        if !time.is_finite() || time < self.now {
            return Err(SimulationError::scheduling_error(format!(
                "cannot schedule at {} when the clock reads {}",
                time, self.now
            )));
        }

        let sequence = self.sequence;
        self.sequence += 1;
        self.queue.push(Reverse(ScheduledEvent { time, sequence, payload }));
        Ok(())
    }

    /// Schedule `payload` once `delay` minutes have elapsed
    pub fn schedule_in(&mut self, delay: f64, payload: T) -> SimulationResult<()> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(SimulationError::scheduling_error(format!("invalid delay {}", delay)));
        }
        self.schedule_at(self.now.after(delay), payload)
    }

    /// Schedule `payload` at the current instant, behind anything already due now
    pub fn schedule_now(&mut self, payload: T) {
        let sequence = self.sequence;
        self.sequence += 1;
        self.queue.push(Reverse(ScheduledEvent { time: self.now, sequence, payload }));
    }

    /// Pop the next event due at or before `horizon`, advancing the clock to it
    pub fn pop_until(&mut self, horizon: SimTime) -> Option<ScheduledEvent<T>> {
        match self.queue.peek() {
            Some(Reverse(event)) if event.time <= horizon => {}
            _ => return None,
        }

        let Reverse(event) = self.queue.pop()?;
        self.now = event.time;
        Some(event)
    }

    /// Time of the next pending event, if any
    pub fn next_event_time(&self) -> Option<SimTime> {
        self.queue.peek().map(|Reverse(e)| e.time)
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(minutes: f64) -> SimTime {
        SimTime::from_minutes(minutes)
    }

    #[test]
    fn test_scheduler_time_ordering() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at(t(3.0), "c").unwrap();
        scheduler.schedule_at(t(1.0), "a").unwrap();
        scheduler.schedule_at(t(2.0), "b").unwrap();

        let order: Vec<_> =
            std::iter::from_fn(|| scheduler.pop_until(t(10.0))).map(|e| e.payload).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(scheduler.now(), t(3.0));
    }

    #[test]
    fn test_scheduler_fifo_tie_break() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at(t(5.0), 1).unwrap();
        scheduler.schedule_at(t(5.0), 2).unwrap();
        scheduler.schedule_at(t(5.0), 3).unwrap();

        let order: Vec<_> =
            std::iter::from_fn(|| scheduler.pop_until(t(5.0))).map(|e| e.payload).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_schedule_now_runs_after_existing_same_time_events() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at(t(0.0), "first").unwrap();
        scheduler.schedule_now("second");
        assert_eq!(scheduler.pop_until(t(0.0)).unwrap().payload, "first");
        assert_eq!(scheduler.pop_until(t(0.0)).unwrap().payload, "second");
    }

    #[test]
    fn test_horizon_stops_advancing() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at(t(10.0), "due").unwrap();
        scheduler.schedule_at(t(20.0), "late").unwrap();

        assert_eq!(scheduler.pop_until(t(15.0)).unwrap().payload, "due");
        assert!(scheduler.pop_until(t(15.0)).is_none());
        // Abandoned events stay pending and the clock does not jump
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.now(), t(10.0));
        assert_eq!(scheduler.next_event_time(), Some(t(20.0)));
    }

    #[test]
    fn test_schedule_in_is_relative_to_now() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at(t(4.0), 0).unwrap();
        scheduler.pop_until(t(100.0)).unwrap();

        scheduler.schedule_in(6.0, 1).unwrap();
        let event = scheduler.pop_until(t(100.0)).unwrap();
        assert_eq!(event.time, t(10.0));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_rejects_past_and_invalid_times() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at(t(5.0), 0).unwrap();
        scheduler.pop_until(t(5.0)).unwrap();

        assert!(scheduler.schedule_at(t(4.0), 1).is_err());
        assert!(scheduler.schedule_in(-1.0, 1).is_err());
        assert!(scheduler.schedule_in(f64::NAN, 1).is_err());
        assert!(scheduler.schedule_in(f64::INFINITY, 1).is_err());
        assert!(scheduler.is_empty());
    }
}
