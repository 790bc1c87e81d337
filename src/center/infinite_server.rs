//! Delay node with unbounded parallelism

use super::common::{job_of, Center, CenterContext, CenterCore, Occupancy};
use crate::events::Event;
use crate::simulation::{SimulationError, SimulationResult};

/// Every arrival starts service immediately; nothing ever waits
#[derive(Debug, Clone)]
pub struct InfiniteServer {
    core: CenterCore,
    in_service: usize,
}

impl InfiniteServer {
    /// Idle delay node
    pub fn new(core: CenterCore) -> Self {
        Self { core, in_service: 0 }
    }

    /// Jobs currently in service
    pub fn in_service(&self) -> usize {
        self.in_service
    }
}

impl Center for InfiniteServer {
    fn core(&self) -> &CenterCore {
        &self.core
    }

    fn occupancy(&self) -> Occupancy {
        Occupancy { in_node: self.core.jobs_in_node(), queued: 0, busy: self.in_service }
    }

    fn on_arrival(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        let now = event.time;
        let mut job = job_of(event, self.core.name())?;
        let occupancy = self.occupancy();
        self.core.admit(&mut job, now, occupancy, ctx.stats)?;

        self.in_service += 1;
        self.core.start_service(job, now, None, ctx)
    }

    fn on_departure(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        let now = event.time;
        let job = job_of(event, self.core.name())?;
        let occupancy = self.occupancy();
        self.core.release(job, now, occupancy, ctx)?;

        self.in_service = self.in_service.checked_sub(1).ok_or_else(|| {
            SimulationError::invariant_violation(format!("{} completed a service with none running", self.core.name()))
        })?;
        Ok(())
    }
}
