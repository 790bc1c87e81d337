//! `m` identical servers sharing one FIFO queue

use super::common::{job_of, Center, CenterContext, CenterCore, Occupancy};
use crate::events::Event;
use crate::network::Job;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::JobId;
use std::collections::VecDeque;

/// Multi-server station with a shared queue
///
/// Servers are interchangeable, so only the number of active ones is tracked.
#[derive(Debug, Clone)]
pub struct MultiServerSingleQueue {
    core: CenterCore,
    servers: usize,
    active: usize,
    queue: VecDeque<Job>,
}

impl MultiServerSingleQueue {
    /// Station with `servers` idle servers; at least one is required
    pub fn new(core: CenterCore, servers: usize) -> SimulationResult<Self> {
        if servers == 0 {
            return Err(SimulationError::configuration_error(format!(
                "{} needs at least one server",
                core.name()
            )));
        }
        Ok(Self { core, servers, active: 0, queue: VecDeque::new() })
    }

    /// Number of servers
    pub fn servers(&self) -> usize {
        self.servers
    }

    /// Busy servers
    pub fn active(&self) -> usize {
        self.active
    }

    /// Jobs waiting
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Waiting jobs, head first
    pub fn queued_ids(&self) -> Vec<JobId> {
        self.queue.iter().map(Job::id).collect()
    }
}

impl Center for MultiServerSingleQueue {
    fn core(&self) -> &CenterCore {
        &self.core
    }

    fn occupancy(&self) -> Occupancy {
        Occupancy { in_node: self.core.jobs_in_node(), queued: self.queue.len(), busy: self.active }
    }

    fn on_arrival(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        let now = event.time;
        let mut job = job_of(event, self.core.name())?;
        let occupancy = self.occupancy();
        self.core.admit(&mut job, now, occupancy, ctx.stats)?;

        if self.active == self.servers {
            self.queue.push_back(job);
            Ok(())
        } else {
            self.active += 1;
            self.core.start_service(job, now, None, ctx)
        }
    }

    fn on_departure(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        if self.active == 0 {
            return Err(SimulationError::invariant_violation(format!(
                "{} received a departure with no active server",
                self.core.name()
            )));
        }
        let now = event.time;
        let job = job_of(event, self.core.name())?;
        let occupancy = self.occupancy();
        self.core.release(job, now, occupancy, ctx)?;

        match self.queue.pop_front() {
            Some(next) => self.core.start_service(next, now, None, ctx),
            None => {
                self.active -= 1;
                Ok(())
            }
        }
    }
}
