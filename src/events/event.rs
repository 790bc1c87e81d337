//! Timestamped event records

use crate::network::Job;
use crate::types::{CenterId, EventKind};

/// A scheduled occurrence in the simulation
///
/// An event with no target is a system exit: the carried job has left the
/// network and only its total response time remains to be recorded.
#[derive(Debug, Clone)]
pub struct Event {
    /// Simulated time at which the event fires
    pub time: f64,
    /// What happens
    pub kind: EventKind,
    /// Center the event is addressed to, `None` for a system exit
    pub target: Option<CenterId>,
    /// Job involved, `None` for sampling events
    pub job: Option<Job>,
    /// Sub-queue that produced a departure at a multi-queue center
    pub tag: Option<usize>,
}

impl Event {
    /// A job arriving at a center
    pub fn arrival(time: f64, target: CenterId, job: Job) -> Self {
        Self { time, kind: EventKind::Arrival, target: Some(target), job: Some(job), tag: None }
    }

    /// A job finishing service at a center
    pub fn departure(time: f64, target: CenterId, job: Job, tag: Option<usize>) -> Self {
        Self { time, kind: EventKind::Departure, target: Some(target), job: Some(job), tag }
    }

    /// A snapshot request for a center
    pub fn sampling(time: f64, target: CenterId) -> Self {
        Self { time, kind: EventKind::Sampling, target: Some(target), job: None, tag: None }
    }

    /// A job leaving the network
    pub fn exit(time: f64, job: Job) -> Self {
        Self { time, kind: EventKind::Arrival, target: None, job: Some(job), tag: None }
    }

    /// Whether the event records a system exit
    pub fn is_exit(&self) -> bool {
        self.target.is_none()
    }

    /// Whether this is the job's very first arrival into the network
    ///
    /// Decided from the job alone, so a job the entry sends straight to the
    /// exit still counts.
    pub fn is_first_hop(&self) -> bool {
        self.kind == EventKind::Arrival && self.job.as_ref().map_or(false, |job| job.is_first_hop(self.time))
    }
}
