//! Closed set of center variants held by the orchestrator

use super::common::{Center, CenterContext, CenterCore, Occupancy};
use super::{InfiniteServer, MultiServerMultiQueue, MultiServerSingleQueue, SingleServerSingleQueue};
use crate::events::Event;
use crate::network::{CenterDescriptor, CenterKind, FlowAssignmentPolicy};
use crate::simulation::SimulationResult;

/// A center of any discipline
#[derive(Debug, Clone)]
pub enum CenterNode {
    /// Delay node
    InfiniteServer(InfiniteServer),
    /// One server, one queue
    SingleServerSingleQueue(SingleServerSingleQueue),
    /// Many servers, one shared queue
    MultiServerSingleQueue(MultiServerSingleQueue),
    /// Many single-server lanes
    MultiServerMultiQueue(MultiServerMultiQueue),
}

macro_rules! dispatch {
    ($node:expr, $center:ident => $body:expr) => {
        match $node {
            CenterNode::InfiniteServer($center) => $body,
            CenterNode::SingleServerSingleQueue($center) => $body,
            CenterNode::MultiServerSingleQueue($center) => $body,
            CenterNode::MultiServerMultiQueue($center) => $body,
        }
    };
}

impl CenterNode {
    /// Build an idle center from its topology entry
    pub fn from_descriptor(descriptor: &CenterDescriptor) -> SimulationResult<Self> {
        let core = CenterCore::from_descriptor(descriptor);
        let node = match descriptor.kind {
            CenterKind::InfiniteServer => CenterNode::InfiniteServer(InfiniteServer::new(core)),
            CenterKind::SingleServerSingleQueue => {
                CenterNode::SingleServerSingleQueue(SingleServerSingleQueue::new(core))
            }
            CenterKind::MultiServerSingleQueue => {
                CenterNode::MultiServerSingleQueue(MultiServerSingleQueue::new(core, descriptor.servers)?)
            }
            CenterKind::MultiServerMultiQueue { policy, tie_break } => CenterNode::MultiServerMultiQueue(
                MultiServerMultiQueue::new(
                    core,
                    descriptor.servers,
                    FlowAssignmentPolicy::from_kind(policy, tie_break),
                )?,
            ),
        };
        Ok(node)
    }

    /// Lane view, for multi-queue centers
    pub fn as_multi_queue(&self) -> Option<&MultiServerMultiQueue> {
        match self {
            CenterNode::MultiServerMultiQueue(center) => Some(center),
            _ => None,
        }
    }
}

impl Center for CenterNode {
    fn core(&self) -> &CenterCore {
        dispatch!(self, center => center.core())
    }

    fn occupancy(&self) -> Occupancy {
        dispatch!(self, center => center.occupancy())
    }

    fn on_arrival(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        dispatch!(self, center => center.on_arrival(event, ctx))
    }

    fn on_departure(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        dispatch!(self, center => center.on_departure(event, ctx))
    }

    fn on_sampling(&mut self, now: f64, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        dispatch!(self, center => center.on_sampling(now, ctx))
    }
}
