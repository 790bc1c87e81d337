//! Tests for the four center disciplines
//!
//! Each center is driven directly with its own event clock, so the tests can
//! look at queue state between events and at the jobs as they leave.

use airport_checkpoint_sim::center::*;
use airport_checkpoint_sim::events::{Event, EventClock};
use airport_checkpoint_sim::network::{FlowAssignmentPolicy, Job, JobFactory, RoutingPoint};
use airport_checkpoint_sim::random::{RandomStreams, RandomVariateGenerator, ServiceProcess};
use airport_checkpoint_sim::stats::{MetricKey, StatCollector};
use airport_checkpoint_sim::types::{CenterId, EventKind, JobId, MetricKind, StreamId};
use std::collections::BTreeMap;
use std::sync::Arc;

const CENTER: CenterId = CenterId(0);

/// Clock, streams and accumulators a center runs against
struct Bench {
    clock: EventClock,
    streams: RandomStreams,
    stats: StatCollector,
    jobs: JobFactory,
}

/// Job that left the center, with the lane that served it
struct Departed {
    job: Job,
    lane: Option<usize>,
}

impl Bench {
    fn new(seed: u64) -> Self {
        Self { clock: EventClock::new(), streams: RandomStreams::new(seed), stats: StatCollector::new(), jobs: JobFactory::new() }
    }

    fn ctx(&mut self) -> CenterContext<'_> {
        CenterContext { clock: &mut self.clock, streams: &mut self.streams, stats: &mut self.stats, sampler: None, batches: None }
    }

    /// Hand an arrival at `time` straight to the center
    fn arrive<C: Center>(&mut self, center: &mut C, time: f64) -> JobId {
        let job = self.jobs.create(time);
        let id = job.id();
        center.on_arrival(Event::arrival(time, CENTER, job), &mut self.ctx()).unwrap();
        id
    }

    /// Put an arrival on the clock
    fn schedule_arrival(&mut self, time: f64) -> JobId {
        let job = self.jobs.create(time);
        let id = job.id();
        self.clock.schedule(Event::arrival(time, CENTER, job)).unwrap();
        id
    }

    /// Process every pending event; returns the jobs in the order they left
    fn drain<C: Center>(&mut self, center: &mut C) -> Vec<Departed> {
        let mut departed = Vec::new();
        let mut lanes = BTreeMap::new();
        while !self.clock.is_empty() {
            let event = self.clock.pop_earliest().unwrap();
            if event.is_exit() {
                let job = event.job.unwrap();
                let lane = lanes.remove(&job.id()).flatten();
                departed.push(Departed { job, lane });
                continue;
            }
            match event.kind {
                EventKind::Arrival => center.on_arrival(event, &mut self.ctx()).unwrap(),
                EventKind::Departure => {
                    let id = event.job.as_ref().map(Job::id).unwrap();
                    lanes.insert(id, event.tag);
                    center.on_departure(event, &mut self.ctx()).unwrap();
                }
                EventKind::Sampling => unreachable!("no sampling scheduled"),
            }
            center.check_invariants().unwrap();
        }
        departed
    }
}

fn core(generator: RandomVariateGenerator) -> CenterCore {
    let service = ServiceProcess::new(generator, StreamId(10));
    CenterCore::new(CENTER, "Station", service, Arc::new(RoutingPoint::exit()))
}

fn fixed(value: f64) -> RandomVariateGenerator {
    RandomVariateGenerator::deterministic(value).unwrap()
}

fn assert_conserved<C: Center>(center: &C) {
    let core = center.core();
    assert_eq!(core.arrivals(), core.departures() + core.jobs_in_node() as u64);
}

/// Scenario A: the second job waits for the first
#[test]
fn test_single_server_queue_time() {
    let mut bench = Bench::new(1);
    let mut desk = SingleServerSingleQueue::new(core(fixed(5.0)));

    bench.schedule_arrival(0.0);
    let second = bench.schedule_arrival(2.0);
    let departed = bench.drain(&mut desk);

    assert_eq!(departed.len(), 2);
    let job = &departed[1].job;
    assert_eq!(job.id(), second);
    assert_eq!(job.queue_time(), 3.0);
    assert_eq!(job.response_time(), 8.0);
    assert_eq!(job.service_started_at(), 5.0);
    assert_eq!(job.service_ended_at(), 10.0);

    let tq = MetricKey::center(CENTER, MetricKind::QueueTime);
    assert_eq!(bench.stats.population_mean(&tq), 1.5);
    assert_conserved(&desk);
}

/// Scenario B: two servers take two jobs, the third waits
#[test]
fn test_multi_server_fills_servers_then_queues() {
    let mut bench = Bench::new(1);
    let mut station = MultiServerSingleQueue::new(core(fixed(5.0)), 2).unwrap();

    bench.arrive(&mut station, 0.0);
    assert_eq!(station.active(), 1);
    bench.arrive(&mut station, 0.1);
    assert_eq!(station.active(), 2);
    assert_eq!(station.queue_len(), 0);

    let third = bench.arrive(&mut station, 0.2);
    assert_eq!(station.active(), 2);
    assert_eq!(station.queued_ids(), vec![third]);
    assert_eq!(station.occupancy(), Occupancy { in_node: 3, queued: 1, busy: 2 });

    let departed = bench.drain(&mut station);
    let waited = departed.iter().find(|d| d.job.id() == third).unwrap();
    assert_eq!(waited.job.service_started_at(), 5.0);
    assert!((waited.job.queue_time() - 4.8).abs() < 1e-12);
    assert_eq!(station.active(), 0);
    assert_conserved(&station);
}

/// Scenario C: nothing ever waits at a delay node
#[test]
fn test_infinite_server_never_queues() {
    let mut bench = Bench::new(1);
    let mut recovery = InfiniteServer::new(core(fixed(30.0)));

    for _ in 0..50 {
        bench.arrive(&mut recovery, 0.0);
        assert_eq!(recovery.occupancy().queued, 0);
    }
    assert_eq!(recovery.in_service(), 50);

    let departed = bench.drain(&mut recovery);
    assert_eq!(departed.len(), 50);
    assert!(departed.iter().all(|d| d.job.queue_time() == 0.0));
    assert!(departed.iter().all(|d| d.job.service_ended_at() == 30.0));
    assert_conserved(&recovery);
}

/// Scenario D: round-robin alternates lanes regardless of their state
#[test]
fn test_round_robin_lane_assignment() {
    let mut bench = Bench::new(1);
    let mut x_ray = MultiServerMultiQueue::new(core(fixed(5.0)), 2, FlowAssignmentPolicy::round_robin()).unwrap();

    let ids: Vec<JobId> = [0.0, 0.1, 0.2, 0.3].iter().map(|&t| bench.arrive(&mut x_ray, t)).collect();

    let lanes = x_ray.flow_states();
    assert!(lanes[0].is_busy() && lanes[1].is_busy());
    assert_eq!(lanes[0].queued_ids(), vec![ids[2]]);
    assert_eq!(lanes[1].queued_ids(), vec![ids[3]]);

    let departed = bench.drain(&mut x_ray);
    let lane_of = |id: JobId| departed.iter().find(|d| d.job.id() == id).and_then(|d| d.lane);
    assert_eq!(ids.iter().map(|&id| lane_of(id)).collect::<Vec<_>>(), vec![Some(0), Some(1), Some(0), Some(1)]);
    assert_conserved(&x_ray);
}

/// Shortest queue prefers the emptier lane
#[test]
fn test_shortest_queue_joins_idle_lane() {
    let mut bench = Bench::new(1);
    let policy = FlowAssignmentPolicy::shortest_queue(None);
    let mut x_ray = MultiServerMultiQueue::new(core(fixed(5.0)), 3, policy).unwrap();

    for t in [0.0, 0.1, 0.2, 0.3] {
        bench.arrive(&mut x_ray, t);
    }
    let jobs: Vec<usize> = x_ray.flow_states().iter().map(|lane| lane.jobs()).collect();
    assert_eq!(jobs, vec![2, 1, 1]);
}

/// A single server releases jobs in arrival order
#[test]
fn test_single_server_fifo() {
    let mut bench = Bench::new(99);
    let mut desk = SingleServerSingleQueue::new(core(RandomVariateGenerator::exponential(4.0).unwrap()));

    let mut time = 0.0;
    let mut ids = Vec::new();
    for i in 0..300 {
        time += 1.0 + (i % 7) as f64 * 0.5;
        ids.push(bench.schedule_arrival(time));
    }

    let departed = bench.drain(&mut desk);
    let order: Vec<JobId> = departed.iter().map(|d| d.job.id()).collect();
    assert_eq!(order, ids);
    assert_conserved(&desk);
}

/// Every lane of a multi-queue center releases its own jobs in the order they joined it
#[test]
fn test_multi_queue_fifo_per_lane() {
    let mut bench = Bench::new(5);
    let policy = FlowAssignmentPolicy::shortest_queue(Some(StreamId(20)));
    let mut x_ray = MultiServerMultiQueue::new(core(RandomVariateGenerator::exponential(9.0).unwrap()), 3, policy).unwrap();

    let mut time = 0.0;
    for i in 0..400 {
        time += 2.0 + (i % 5) as f64 * 0.4;
        bench.schedule_arrival(time);
    }

    let departed = bench.drain(&mut x_ray);
    assert_eq!(departed.len(), 400);

    let mut last_per_lane: BTreeMap<usize, JobId> = BTreeMap::new();
    for d in &departed {
        let lane = d.lane.unwrap();
        if let Some(previous) = last_per_lane.insert(lane, d.job.id()) {
            assert!(previous < d.job.id(), "lane {} served out of order", lane);
        }
    }
    assert!(last_per_lane.len() > 1);
    assert_conserved(&x_ray);
}

/// A departure without its lane tag is a protocol error
#[test]
fn test_untagged_multi_queue_departure_rejected() {
    let mut bench = Bench::new(1);
    let mut x_ray = MultiServerMultiQueue::new(core(fixed(5.0)), 2, FlowAssignmentPolicy::round_robin()).unwrap();
    bench.arrive(&mut x_ray, 0.0);

    let stray = bench.jobs.create(0.0);
    let result = x_ray.on_departure(Event::departure(5.0, CENTER, stray, None), &mut bench.ctx());
    assert!(result.is_err());
}

/// A departure at an idle single server is an invariant violation
#[test]
fn test_departure_from_idle_server_rejected() {
    let mut bench = Bench::new(1);
    let mut desk = SingleServerSingleQueue::new(core(fixed(5.0)));
    let stray = bench.jobs.create(0.0);
    assert!(desk.on_departure(Event::departure(5.0, CENTER, stray, None), &mut bench.ctx()).is_err());
}

/// The closed sum dispatches to the wrapped discipline
#[test]
fn test_center_node_from_descriptor() {
    use airport_checkpoint_sim::network::{CenterDescriptor, CenterKind};
    use airport_checkpoint_sim::types::FlowPolicyKind;

    let service = ServiceProcess::new(fixed(5.0), StreamId(10));
    let kind = CenterKind::MultiServerMultiQueue { policy: FlowPolicyKind::RoundRobin, tie_break: None };
    let descriptor = CenterDescriptor::new("XRay", kind, 4, service, Arc::new(RoutingPoint::exit()));

    let mut node = CenterNode::from_descriptor(&descriptor).unwrap();
    assert_eq!(node.name(), "XRay");
    assert_eq!(node.as_multi_queue().unwrap().flow_states().len(), 4);

    let mut bench = Bench::new(1);
    bench.arrive(&mut node, 0.0);
    assert_eq!(node.occupancy().busy, 1);
}

/// A station without servers is refused when built, not when the first job arrives
#[test]
fn test_zero_server_stations_rejected() {
    assert!(MultiServerMultiQueue::new(core(fixed(5.0)), 0, FlowAssignmentPolicy::round_robin()).is_err());
    assert!(MultiServerMultiQueue::new(core(fixed(5.0)), 0, FlowAssignmentPolicy::shortest_queue(None)).is_err());
    assert!(MultiServerSingleQueue::new(core(fixed(5.0)), 0).is_err());

    use airport_checkpoint_sim::network::{CenterDescriptor, CenterKind};
    use airport_checkpoint_sim::types::FlowPolicyKind;

    let service = ServiceProcess::new(fixed(5.0), StreamId(10));
    let kind = CenterKind::MultiServerMultiQueue { policy: FlowPolicyKind::RoundRobin, tie_break: None };
    let descriptor = CenterDescriptor::new("XRay", kind, 0, service, Arc::new(RoutingPoint::exit()));
    assert!(CenterNode::from_descriptor(&descriptor).is_err());
}
