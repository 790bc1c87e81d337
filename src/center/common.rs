//! Bookkeeping shared by every center variant
//!
//! Variants own only their resource state (busy flags, queues). Job counting,
//! time-weighted accounting, per-visit samples, routing and departure
//! scheduling all go through [`CenterCore`] so the four disciplines cannot
//! drift apart in how they measure.

use crate::events::{Event, EventClock};
use crate::network::{CenterDescriptor, Job, Route, RoutingPoint};
use crate::random::{RandomStreams, ServiceProcess};
use crate::simulation::{SimulationError, SimulationResult};
use crate::stats::{BatchCollector, CenterSnapshot, MetricKey, MetricScope, SampleCollector, StatCollector};
use crate::types::{CenterId, MetricKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

/// Collaborators a center mutates while handling one event
///
/// Built by the orchestrator for each dispatched event; every borrow ends
/// with the handler.
#[derive(Debug)]
pub struct CenterContext<'a> {
    /// Event clock receiving departures, downstream arrivals and exits
    pub clock: &'a mut EventClock,
    /// Random streams for service times and routing
    pub streams: &'a mut RandomStreams,
    /// Accumulators of the run
    pub stats: &'a mut StatCollector,
    /// Raw sample ledger, required by centers that receive sampling events
    pub sampler: Option<&'a mut SampleCollector>,
    /// Batch-means collector of steady-state runs
    pub batches: Option<&'a mut BatchCollector>,
}

/// Jobs at a center, split by what they are doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    /// Jobs in the center
    pub in_node: usize,
    /// Jobs waiting
    pub queued: usize,
    /// Jobs in service (busy servers)
    pub busy: usize,
}

impl Occupancy {
    /// Whether every job is either waiting or in service
    pub fn is_consistent(&self) -> bool {
        self.in_node == self.queued + self.busy
    }
}

/// Identity, service process, routing and counters common to all centers
#[derive(Debug, Clone)]
pub struct CenterCore {
    id: CenterId,
    name: String,
    service: ServiceProcess,
    routing: Arc<RoutingPoint>,
    jobs_in_node: usize,
    last_update: f64,
    arrivals: u64,
    departures: u64,
}

impl CenterCore {
    /// Core of a center that has seen no jobs yet
    pub fn new(id: CenterId, name: impl Into<String>, service: ServiceProcess, routing: Arc<RoutingPoint>) -> Self {
        Self {
            id,
            name: name.into(),
            service,
            routing,
            jobs_in_node: 0,
            last_update: 0.0,
            arrivals: 0,
            departures: 0,
        }
    }

    /// Core described by a topology entry
    pub fn from_descriptor(descriptor: &CenterDescriptor) -> Self {
        Self::new(descriptor.id, descriptor.name.clone(), descriptor.service, Arc::clone(&descriptor.routing))
    }

    /// Center identity
    pub fn id(&self) -> CenterId {
        self.id
    }

    /// Center name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service-time process
    pub fn service(&self) -> &ServiceProcess {
        &self.service
    }

    /// Routing applied to departing jobs
    pub fn routing(&self) -> &RoutingPoint {
        &self.routing
    }

    /// Jobs currently in the center
    pub fn jobs_in_node(&self) -> usize {
        self.jobs_in_node
    }

    /// Time of the last state change
    pub fn last_update(&self) -> f64 {
        self.last_update
    }

    /// Jobs admitted so far
    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    /// Jobs released so far
    pub fn departures(&self) -> u64 {
        self.departures
    }

    fn key(&self, kind: MetricKind) -> MetricKey {
        MetricKey::center(self.id, kind)
    }

    /// Close out the interval the current state has held, up to `now`
    pub(crate) fn advance(&mut self, now: f64, occupancy: Occupancy, stats: &mut StatCollector) {
        let duration = now - self.last_update;
        stats.update_area(self.key(MetricKind::JobsInNode), occupancy.in_node as f64, duration);
        stats.update_area(self.key(MetricKind::JobsInQueue), occupancy.queued as f64, duration);
        stats.update_area(self.key(MetricKind::BusyServers), occupancy.busy as f64, duration);
        self.last_update = now;
    }

    /// Count an arriving job in and stamp its queue entry
    pub(crate) fn admit(
        &mut self,
        job: &mut Job,
        now: f64,
        occupancy: Occupancy,
        stats: &mut StatCollector,
    ) -> SimulationResult<()> {
        self.advance(now, occupancy, stats);
        job.stamp_queued(now)?;
        self.jobs_in_node += 1;
        self.arrivals += 1;
        trace!(center = %self.name, job = %job.id(), time = now, "Job admitted");
        Ok(())
    }

    /// Start serving `job` now and schedule its departure, tagged with `lane`
    ///
    /// The service time is drawn here, when service starts, from the
    /// center's own stream.
    pub(crate) fn start_service(
        &self,
        mut job: Job,
        now: f64,
        lane: Option<usize>,
        ctx: &mut CenterContext<'_>,
    ) -> SimulationResult<()> {
        job.stamp_service_started(now)?;
        let service_time = self.service.sample(ctx.streams);
        ctx.clock.schedule(Event::departure(now + service_time, self.id, job, lane))
    }

    /// Count a served job out, record its visit and send it on
    pub(crate) fn release(
        &mut self,
        mut job: Job,
        now: f64,
        occupancy: Occupancy,
        ctx: &mut CenterContext<'_>,
    ) -> SimulationResult<()> {
        self.advance(now, occupancy, ctx.stats);
        self.jobs_in_node = self.jobs_in_node.checked_sub(1).ok_or_else(|| {
            SimulationError::invariant_violation(format!("{} released {} while empty", self.name, job.id()))
        })?;
        self.departures += 1;
        job.stamp_service_ended(now)?;

        ctx.stats.add_sample(self.key(MetricKind::ResponseTime), job.response_time());
        ctx.stats.add_sample(self.key(MetricKind::QueueTime), job.queue_time());
        ctx.stats.add_sample(self.key(MetricKind::ServiceTime), job.service_time());
        if let Some(batches) = ctx.batches.as_deref_mut() {
            batches.observe(now, MetricScope::Center(self.id), ctx.stats);
        }

        match self.routing.route(ctx.streams, &mut job) {
            Route::Next(next) => ctx.clock.schedule(Event::arrival(now, next, job)),
            Route::Exit => ctx.clock.schedule(Event::exit(now, job)),
        }
    }

    /// Record a snapshot of the center into the sampler
    pub(crate) fn sample(&self, now: f64, occupancy: Occupancy, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        let snapshot = CenterSnapshot {
            jobs_in_node: occupancy.in_node,
            jobs_in_queue: occupancy.queued,
            busy_servers: occupancy.busy,
            running_response_time: ctx.stats.population_mean(&self.key(MetricKind::ResponseTime)),
        };
        let sampler = ctx.sampler.as_deref_mut().ok_or_else(|| {
            SimulationError::configuration_error(format!("sampling event reached {} with no sampler bound", self.name))
        })?;
        sampler.record_snapshot(now, self.id, &snapshot);
        Ok(())
    }
}

/// Behaviour shared by every queueing discipline
pub trait Center {
    /// Shared bookkeeping
    fn core(&self) -> &CenterCore;

    /// Current split of jobs between waiting and service
    fn occupancy(&self) -> Occupancy;

    /// Admit a job and start its service if a server is free
    fn on_arrival(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()>;

    /// Release a served job and start the next waiting one, if any
    fn on_departure(&mut self, event: Event, ctx: &mut CenterContext<'_>) -> SimulationResult<()>;

    /// Record a snapshot of the center
    fn on_sampling(&mut self, now: f64, ctx: &mut CenterContext<'_>) -> SimulationResult<()> {
        self.core().sample(now, self.occupancy(), ctx)
    }

    /// Center identity
    fn id(&self) -> CenterId {
        self.core().id()
    }

    /// Center name
    fn name(&self) -> &str {
        self.core().name()
    }

    /// Fail if the job count disagrees with the resource state
    fn check_invariants(&self) -> SimulationResult<()> {
        let occupancy = self.occupancy();
        if occupancy.is_consistent() {
            Ok(())
        } else {
            Err(SimulationError::invariant_violation(format!(
                "{} holds {} jobs but {} queued and {} in service",
                self.name(),
                occupancy.in_node,
                occupancy.queued,
                occupancy.busy
            )))
        }
    }
}

/// Take the job out of an event addressed to `center`
pub(crate) fn job_of(event: Event, center: &str) -> SimulationResult<Job> {
    let kind = event.kind;
    event.job.ok_or_else(|| SimulationError::protocol_error(format!("{} event for {} carries no job", kind, center)))
}
