//! Independent single-server lanes, each with its own FIFO queue
//!
//! An arriving job is assigned a lane by the center's flow policy and stays
//! in it. Departures carry the lane index as their tag so the handler can
//! address the lane that finished.

use super::common::{job_of, Center, CenterContext, CenterCore, Occupancy};
use crate::events::Event;
use crate::network::{FlowAssignmentPolicy, FlowState};
use crate::simulation::{SimulationError, SimulationResult};
use tracing::trace;

/// Multi-queue station such as the X-ray lanes
#[derive(Debug, Clone)]
pub struct MultiServerMultiQueue {
    core: CenterCore,
    flows: Vec<FlowState>,
    policy: FlowAssignmentPolicy,
}

impl MultiServerMultiQueue {
    /// Station with `lanes` idle lanes; at least one is required
    pub fn new(core: CenterCore, lanes: usize, policy: FlowAssignmentPolicy) -> SimulationResult<Self> {
        if lanes == 0 {
            return Err(SimulationError::configuration_error(format!(
                "{} needs at least one lane",
                core.name()
            )));
        }
        Ok(Self { core, flows: (0..lanes).map(|_| FlowState::new()).collect(), policy })
    }

    /// Lane states, in index order
    pub fn flow_states(&self) -> &[FlowState] {
        &self.flows
    }

    /// Lane selection policy
    pub fn policy(&self) -> &FlowAssignmentPolicy {
        &self.policy
    }

    fn lane_of(&self, event: &Event) -> SimulationResult<usize> {
        let lane = event.tag.ok_or_else(|| {
            SimulationError::protocol_error(format!("departure at {} carries no lane tag", self.core.name()))
        })?;
        if lane >= self.flows.len() {
            return Err(SimulationError::protocol_error(format!(
                "departure at {} tagged with lane {} of {}",
                self.core.name(),
                lane,
                self.flows.len()
            )));
        }
        Ok(lane)
    }
}

impl Center for MultiServerMultiQueue {
    fn core(&self) -> &CenterCore {
        &self.core
    }

    fn occupancy(&self) -> Occupancy {
        Occupancy {
            in_node: self.core.jobs_in_node(),
            queued: self.flows.iter().map(FlowState::queue_len).sum(),
            busy: self.flows.iter().filter(|flow| flow.is_busy()).count(),
        }
    }

    fn on_arrival(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        let now = event.time;
        let mut job = job_of(event, self.core.name())?;
        let occupancy = self.occupancy();
        self.core.admit(&mut job, now, occupancy, ctx.stats)?;

        let lane = self.policy.assign_flow(&self.flows, ctx.streams)?;
        trace!(center = %self.core.name(), job = %job.id(), lane = lane, "Lane assigned");
        let flow = &mut self.flows[lane];
        if flow.busy {
            flow.queue.push_back(job);
            Ok(())
        } else {
            flow.busy = true;
            self.core.start_service(job, now, Some(lane), ctx)
        }
    }

    fn on_departure(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        let lane = self.lane_of(&event)?;
        if !self.flows[lane].busy {
            return Err(SimulationError::invariant_violation(format!(
                "{} lane {} received a departure while idle",
                self.core.name(),
                lane
            )));
        }
        let now = event.time;
        let job = job_of(event, self.core.name())?;
        let occupancy = self.occupancy();
        self.core.release(job, now, occupancy, ctx)?;

        match self.flows[lane].queue.pop_front() {
            Some(next) => self.core.start_service(next, now, Some(lane), ctx),
            None => {
                self.flows[lane].busy = false;
                Ok(())
            }
        }
    }
}
