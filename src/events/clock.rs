//! Future event list and logical clock

use super::Event;
use crate::simulation::{SimulationError, SimulationResult};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Heap entry: events compare by time, then by insertion order
#[derive(Debug)]
struct Scheduled {
    time: f64,
    sequence: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Time-ordered event queue with a monotone logical clock
///
/// Events with equal times fire in the order they were scheduled, so a run is
/// fully determined by its seed. Scheduled events are never cancelled.
#[derive(Debug, Default)]
pub struct EventClock {
    queue: BinaryHeap<Reverse<Scheduled>>,
    now: f64,
    next_sequence: u64,
}

impl EventClock {
    /// Empty clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event; it may not lie in the past
    pub fn schedule(&mut self, event: Event) -> SimulationResult<()> {
        if event.time.is_nan() {
            return Err(SimulationError::scheduling_error("event time is NaN"));
        }
        if event.time < self.now {
            return Err(SimulationError::scheduling_error(format!(
                "{} event at {} is earlier than the clock ({})",
                event.kind, event.time, self.now
            )));
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Reverse(Scheduled { time: event.time, sequence, event }));
        Ok(())
    }

    /// Remove the earliest event and advance the clock to its time
    pub fn pop_earliest(&mut self) -> SimulationResult<Event> {
        let Reverse(scheduled) = self.queue.pop().ok_or(SimulationError::EmptyEventQueue)?;
        self.now = scheduled.time;
        Ok(scheduled.event)
    }

    /// Time of the most recently popped event
    pub fn current_time(&self) -> f64 {
        self.now
    }

    /// Time of the next event, if any
    pub fn peek_time(&self) -> Option<f64> {
        self.queue.peek().map(|Reverse(scheduled)| scheduled.time)
    }

    /// Pending events
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no event is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Events scheduled since the clock was created
    pub fn scheduled_total(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CenterId;

    #[test]
    fn test_pops_in_time_order() {
        let mut clock = EventClock::new();
        for t in [5.0, 1.0, 3.0, 2.0, 4.0] {
            clock.schedule(Event::sampling(t, CenterId(0))).unwrap();
        }

        let times: Vec<f64> = (0..5).map(|_| clock.pop_earliest().unwrap().time).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(clock.current_time(), 5.0);
    }

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let mut clock = EventClock::new();
        for center in 0..10 {
            clock.schedule(Event::sampling(1.0, CenterId(center))).unwrap();
        }

        for center in 0..10 {
            assert_eq!(clock.pop_earliest().unwrap().target, Some(CenterId(center)));
        }
    }

    #[test]
    fn test_empty_queue_fails() {
        let mut clock = EventClock::new();
        assert!(matches!(clock.pop_earliest(), Err(SimulationError::EmptyEventQueue)));
        assert!(clock.peek_time().is_none());
    }

    #[test]
    fn test_rejects_past_and_nan() {
        let mut clock = EventClock::new();
        clock.schedule(Event::sampling(10.0, CenterId(0))).unwrap();
        clock.pop_earliest().unwrap();

        assert!(clock.schedule(Event::sampling(9.0, CenterId(0))).is_err());
        assert!(clock.schedule(Event::sampling(f64::NAN, CenterId(0))).is_err());
        // Same instant is allowed
        assert!(clock.schedule(Event::sampling(10.0, CenterId(0))).is_ok());
        assert_eq!(clock.len(), 1);
        assert_eq!(clock.scheduled_total(), 2);
    }
}
