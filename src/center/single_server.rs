//! One server with a FIFO queue

use super::common::{job_of, Center, CenterContext, CenterCore, Occupancy};
use crate::events::Event;
use crate::network::Job;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::JobId;
use std::collections::VecDeque;

/// Single server: arrivals wait while it is busy and are served in order
#[derive(Debug, Clone)]
pub struct SingleServerSingleQueue {
    core: CenterCore,
    busy: bool,
    queue: VecDeque<Job>,
}

impl SingleServerSingleQueue {
    /// Idle server with an empty queue
    pub fn new(core: CenterCore) -> Self {
        Self { core, busy: false, queue: VecDeque::new() }
    }

    /// Whether the server is busy
    pub fn is_busy(&self) -> bool {
        self.busy
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

impl Center for SingleServerSingleQueue {
    fn core(&self) -> &CenterCore {
        &self.core
    }

    fn occupancy(&self) -> Occupancy {
        Occupancy { in_node: self.core.jobs_in_node(), queued: self.queue.len(), busy: usize::from(self.busy) }
    }

    fn on_arrival(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        let now = event.time;
        let mut job = job_of(event, self.core.name())?;
        let occupancy = self.occupancy();
        self.core.admit(&mut job, now, occupancy, ctx.stats)?;

        if self.busy {
            self.queue.push_back(job);
            Ok(())
        } else {
            self.busy = true;
            self.core.start_service(job, now, None, ctx)
        }
    }

    fn on_departure(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        if !self.busy {
            return Err(SimulationError::invariant_violation(format!(
                "{} received a departure while idle",
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
                self.busy = false;
                Ok(())
            }
        }
    }
}
