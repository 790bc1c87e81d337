//! Event loop driving a network of centers
//!
//! The model owns the clock, the random streams, the centers and the
//! statistics collaborators. Each popped event is dispatched to its target
//! center with a [`CenterContext`] borrowing the collaborators for the
//! duration of the handler; events without a target are system exits.

use crate::center::{Center, CenterContext, CenterNode};
use crate::events::{Event, EventClock};
use crate::network::{JobFactory, Route, RoutingPoint, Topology};
use crate::random::{ArrivalProcess, RandomStreams};
use crate::simulation::{SimulationError, SimulationResult};
use crate::stats::{BatchCollector, MetricKey, MetricScope, SampleCollector, StatCollector};
use crate::types::{CenterId, CenterNames, EventKind, JobId, JobOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

/// When [`SimulationModel::run`] stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCondition {
    /// Generate arrivals up to this time, then let the network empty
    Horizon(f64),
    /// Generate arrivals until the batch collector is done
    BatchesComplete,
    /// Generate nothing; process what is scheduled until the clock is empty
    Drain,
}

/// A job that left the network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitRecord {
    /// Job identity
    pub job_id: JobId,
    /// Time the job entered the network
    pub arrival_time: f64,
    /// Time the job left
    pub exit_time: f64,
    /// Whether the job passed security
    pub outcome: JobOutcome,
}

impl ExitRecord {
    /// Time spent in the network
    pub fn response_time(&self) -> f64 {
        self.exit_time - self.arrival_time
    }
}

/// Totals of one call to [`SimulationModel::run`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Events processed since the model was built
    pub events: u64,
    /// Jobs created since the model was built
    pub jobs: u64,
    /// Jobs that left the network
    pub exits: u64,
    /// Clock time when the run stopped
    pub end_time: f64,
}

/// Collaborators recovered from a finished model
#[derive(Debug)]
pub struct ModelParts {
    /// Random streams, positioned after the run's draws
    pub streams: RandomStreams,
    /// Accumulators
    pub stats: StatCollector,
    /// Raw samples, if a sampler was bound
    pub sampler: Option<SampleCollector>,
    /// Batch means, if a collector was bound
    pub batches: Option<BatchCollector>,
    /// Center names keyed by id
    pub names: CenterNames,
    /// Exit log, if recording was enabled
    pub exits: Option<Vec<ExitRecord>>,
}

/// A runnable queueing network
#[derive(Debug)]
pub struct SimulationModel {
    clock: EventClock,
    streams: RandomStreams,
    arrivals: ArrivalProcess,
    entry: RoutingPoint,
    centers: Vec<CenterNode>,
    visited: Vec<CenterId>,
    names: CenterNames,
    jobs: JobFactory,
    stats: StatCollector,
    sampler: Option<SampleCollector>,
    batches: Option<BatchCollector>,
    exit_log: Option<Vec<ExitRecord>>,
    arrivals_seeded: bool,
    events: u64,
    exits: u64,
}

impl SimulationModel {
    /// Build idle centers from `topology`, drawing from `streams`
    #[instrument(skip(topology, streams), fields(centers = topology.centers().len(), seed = streams.seed()))]
    pub fn new(topology: Topology, streams: RandomStreams) -> SimulationResult<Self> {
        topology.validate()?;
        let names = topology.names();
        let (arrivals, entry, descriptors) = topology.into_parts();
        let centers = descriptors.iter().map(CenterNode::from_descriptor).collect::<SimulationResult<Vec<_>>>()?;
        let visited = descriptors
            .iter()
            .filter(|descriptor| descriptor.visit_ratio > 0.0)
            .map(|descriptor| descriptor.id)
            .collect();
        debug!("Model built with {} centers", names.len());

        Ok(Self {
            clock: EventClock::new(),
            streams,
            arrivals,
            entry,
            centers,
            visited,
            names,
            jobs: JobFactory::new(),
            stats: StatCollector::new(),
            sampler: None,
            batches: None,
            exit_log: None,
            arrivals_seeded: false,
            events: 0,
            exits: 0,
        })
    }

    /// Bind a sample ledger; required before sampling events are processed
    pub fn with_sampler(mut self) -> Self {
        self.sampler = Some(SampleCollector::new());
        self
    }

    /// Bind a batch collector tracking the system scope and every center
    /// with a positive visit ratio
    ///
    /// Centers no job ever visits would never fill a batch.
    pub fn with_batches(mut self, mut collector: BatchCollector) -> Self {
        for id in &self.visited {
            collector.track(MetricScope::Center(*id));
        }
        collector.track(MetricScope::System);
        self.batches = Some(collector);
        self
    }

    /// Replace the accumulator registry, e.g. with one keeping time logs
    pub fn with_stats(mut self, stats: StatCollector) -> Self {
        self.stats = stats;
        self
    }

    /// Keep a record of every job leaving the network
    pub fn record_exits(mut self) -> Self {
        self.exit_log = Some(Vec::new());
        self
    }

    /// Create the next exogenous job and schedule its first hop
    pub fn plan_next_arrival(&mut self) -> SimulationResult<()> {
        self.plan_arrival(None).map(|_| ())
    }

    /// Plan the next arrival unless it falls after `limit`; returns whether one was scheduled
    fn plan_arrival(&mut self, limit: Option<f64>) -> SimulationResult<bool> {
        self.arrivals_seeded = true;
        let time = self.arrivals.next_arrival(&mut self.streams);
        if limit.map_or(false, |limit| time > limit) {
            trace!(time = time, "Arrival past the horizon dropped");
            return Ok(false);
        }
        let mut job = self.jobs.create(time);
        let event = match self.entry.route(&mut self.streams, &mut job) {
            Route::Next(center) => Event::arrival(time, center, job),
            Route::Exit => Event::exit(time, job),
        };
        self.clock.schedule(event)?;
        Ok(true)
    }

    /// Schedule a job arriving at `center` at `time`, outside the arrival process
    pub fn inject_arrival(&mut self, time: f64, center: CenterId) -> SimulationResult<JobId> {
        self.center(center).ok_or_else(|| {
            SimulationError::configuration_error(format!("cannot inject a job into unknown {}", center))
        })?;
        let job = self.jobs.create(time);
        let id = job.id();
        self.clock.schedule(Event::arrival(time, center, job))?;
        Ok(id)
    }

    /// Schedule a sampling event for every center at each multiple of `interval` up to `horizon`
    ///
    /// Returns the number of sampling instants scheduled.
    pub fn schedule_sampling(&mut self, interval: f64, horizon: f64) -> SimulationResult<usize> {
        if !(interval > 0.0) {
            return Err(SimulationError::configuration_error(format!(
                "sampling interval must be positive, got {}",
                interval
            )));
        }
        let mut instants = 0;
        loop {
            let time = interval * (instants + 1) as f64;
            if time > horizon {
                break;
            }
            for center in &self.centers {
                self.clock.schedule(Event::sampling(time, center.id()))?;
            }
            instants += 1;
        }
        debug!("Scheduled {} sampling instants every {}s", instants, interval);
        Ok(instants)
    }

    /// Dispatch one event to its center, or record a system exit
    pub fn process_event(&mut self, event: Event) -> SimulationResult<()> {
        self.events += 1;
        let Some(target) = event.target else {
            return self.record_exit(event);
        };

        trace!(time = event.time, kind = %event.kind, target = %target, "Dispatching event");
        let center = self
            .centers
            .get_mut(target.index())
            .ok_or_else(|| SimulationError::protocol_error(format!("{} event for unknown {}", event.kind, target)))?;
        let mut ctx = CenterContext {
            clock: &mut self.clock,
            streams: &mut self.streams,
            stats: &mut self.stats,
            sampler: self.sampler.as_mut(),
            batches: self.batches.as_mut(),
        };

        match event.kind {
            EventKind::Arrival => center.on_arrival(event, &mut ctx)?,
            EventKind::Departure => center.on_departure(event, &mut ctx)?,
            EventKind::Sampling => center.on_sampling(event.time, &mut ctx)?,
        }
        center.check_invariants()
    }

    fn record_exit(&mut self, event: Event) -> SimulationResult<()> {
        if event.kind != EventKind::Arrival {
            return Err(SimulationError::protocol_error(format!("{} event has no target center", event.kind)));
        }
        let job = event
            .job
            .ok_or_else(|| SimulationError::protocol_error("exit event carries no job"))?;

        let now = event.time;
        let outcome = job.outcome();
        let response = now - job.arrival_time();
        self.stats.add_sample(MetricKey::system(outcome.metric()), response);
        if let Some(batches) = self.batches.as_mut() {
            batches.observe(now, MetricScope::System, &mut self.stats);
        }
        if let Some(log) = self.exit_log.as_mut() {
            log.push(ExitRecord { job_id: job.id(), arrival_time: job.arrival_time(), exit_time: now, outcome });
        }
        self.exits += 1;
        trace!(job = %job.id(), outcome = %outcome, response = response, "Job left the network");
        Ok(())
    }

    /// Process events until `stop` is met
    ///
    /// Unless [`plan_next_arrival`](Self::plan_next_arrival) was already
    /// called, the first arrival is planned here. Each job's first hop plans
    /// the next exogenous arrival.
    #[instrument(skip(self), fields(centers = self.centers.len()))]
    pub fn run(&mut self, stop: StopCondition) -> SimulationResult<RunSummary> {
        match stop {
            StopCondition::Horizon(horizon) => {
                if !self.arrivals_seeded {
                    self.plan_arrival(Some(horizon))?;
                }
                while !self.clock.is_empty() {
                    let event = self.clock.pop_earliest()?;
                    if event.is_first_hop() {
                        self.plan_arrival(Some(horizon))?;
                    }
                    self.process_event(event)?;
                }
            }
            StopCondition::BatchesComplete => {
                if self.batches.is_none() {
                    return Err(SimulationError::configuration_error(
                        "run until batches complete requires a batch collector",
                    ));
                }
                if !self.arrivals_seeded {
                    self.plan_arrival(None)?;
                }
                while !self.batches.as_ref().map_or(true, BatchCollector::is_done) {
                    let event = self.clock.pop_earliest()?;
                    if event.is_first_hop() {
                        self.plan_arrival(None)?;
                    }
                    self.process_event(event)?;
                }
            }
            StopCondition::Drain => {
                while !self.clock.is_empty() {
                    let event = self.clock.pop_earliest()?;
                    self.process_event(event)?;
                }
            }
        }

        let summary = self.summary();
        info!(
            "Run stopped at t={:.1} after {} events, {} jobs created, {} exits",
            summary.end_time, summary.events, summary.jobs, summary.exits
        );
        Ok(summary)
    }

    /// Totals so far
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            events: self.events,
            jobs: self.jobs.created(),
            exits: self.exits,
            end_time: self.clock.current_time(),
        }
    }

    /// Event clock
    pub fn clock(&self) -> &EventClock {
        &self.clock
    }

    /// Accumulators
    pub fn stats(&self) -> &StatCollector {
        &self.stats
    }

    /// Sample ledger, if bound
    pub fn sampler(&self) -> Option<&SampleCollector> {
        self.sampler.as_ref()
    }

    /// Batch collector, if bound
    pub fn batches(&self) -> Option<&BatchCollector> {
        self.batches.as_ref()
    }

    /// One center
    pub fn center(&self, id: CenterId) -> Option<&CenterNode> {
        self.centers.get(id.index())
    }

    /// Every center in sampling fan-out order
    pub fn centers(&self) -> &[CenterNode] {
        &self.centers
    }

    /// Center names keyed by id
    pub fn center_names(&self) -> &CenterNames {
        &self.names
    }

    /// Exit log, if recording was enabled
    pub fn exits(&self) -> Option<&[ExitRecord]> {
        self.exit_log.as_deref()
    }

    /// Jobs currently inside any center
    pub fn jobs_in_network(&self) -> usize {
        self.centers.iter().map(|center| center.core().jobs_in_node()).sum()
    }

    /// Recover the collaborators once the run is over
    pub fn into_parts(self) -> ModelParts {
        ModelParts {
            streams: self.streams,
            stats: self.stats,
            sampler: self.sampler,
            batches: self.batches,
            names: self.names,
            exits: self.exit_log,
        }
    }
}
