//! Network wiring: which centers exist, how they are sized and where jobs go next
//!
//! A [`Topology`] is a description only. The orchestrator turns each
//! [`CenterDescriptor`] into a live center when a model is built, so the same
//! topology can seed any number of independent replications.

use super::routing::{Branch, Route, RoutingPoint};
use crate::random::{ArrivalProcess, RandomVariateGenerator, ServiceProcess};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{
    CenterId, CenterNames, FlowPolicyKind, JobFlag, SimulationConfig, StationConfig, StreamId, TopologyVariant,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Stream indices, one per purpose, so draws for different purposes never interleave
pub mod stream_ids {
    use crate::types::StreamId;

    /// Exogenous inter-arrival times
    pub const ARRIVALS: StreamId = StreamId(0);
    /// Entry split: check-in desk or straight to the e-gates
    pub const ENTRY_ROUTING: StreamId = StreamId(1);
    /// E-gates split: fast-track or standard X-ray
    pub const E_GATES_ROUTING: StreamId = StreamId(2);
    /// X-ray split: trace detection or recovery
    pub const X_RAY_ROUTING: StreamId = StreamId(3);
    /// Trace-detection split: failure or recovery
    pub const TRACE_ROUTING: StreamId = StreamId(4);
    /// Shortest-queue tie-break at the X-ray lanes
    pub const X_RAY_TIE_BREAK: StreamId = StreamId(5);
    /// Check-in service times
    pub const CHECK_IN_SERVICE: StreamId = StreamId(10);
    /// E-gate service times
    pub const E_GATES_SERVICE: StreamId = StreamId(11);
    /// X-ray service times
    pub const X_RAY_SERVICE: StreamId = StreamId(12);
    /// Trace-detection service times
    pub const TRACE_SERVICE: StreamId = StreamId(13);
    /// Fast-track service times
    pub const FAST_TRACK_SERVICE: StreamId = StreamId(14);
    /// Recovery service times
    pub const RECOVERY_SERVICE: StreamId = StreamId(15);
}

/// Queueing discipline of a center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CenterKind {
    /// Delay node: every job is served immediately
    InfiniteServer,
    /// One server with a FIFO queue
    SingleServerSingleQueue,
    /// `servers` servers sharing one FIFO queue
    MultiServerSingleQueue,
    /// `servers` single-server lanes, each with its own FIFO queue
    MultiServerMultiQueue {
        /// Lane selection rule
        policy: FlowPolicyKind,
        /// Stream for shortest-queue tie-breaking; lowest index wins when absent
        tie_break: Option<StreamId>,
    },
}

impl CenterKind {
    /// Short label of the discipline
    pub fn label(&self) -> &'static str {
        match self {
            CenterKind::InfiniteServer => "IS",
            CenterKind::SingleServerSingleQueue => "SSSQ",
            CenterKind::MultiServerSingleQueue => "MSSQ",
            CenterKind::MultiServerMultiQueue { .. } => "MSMQ",
        }
    }
}

/// Everything needed to build one center
#[derive(Debug, Clone)]
pub struct CenterDescriptor {
    /// Identity, assigned when the descriptor is added to a topology
    pub id: CenterId,
    /// Display name used in metric names
    pub name: String,
    /// Queueing discipline
    pub kind: CenterKind,
    /// Servers (or lanes); ignored for infinite-server centers
    pub servers: usize,
    /// Service-time process bound to the center's own stream
    pub service: ServiceProcess,
    /// Routing applied to departing jobs, possibly shared with other centers
    pub routing: Arc<RoutingPoint>,
    /// Fraction of the exogenous arrival rate that visits this center
    pub visit_ratio: f64,
}

impl CenterDescriptor {
    /// Describe a center; the id is assigned by [`Topology::add_center`]
    pub fn new(
        name: impl Into<String>,
        kind: CenterKind,
        servers: usize,
        service: ServiceProcess,
        routing: Arc<RoutingPoint>,
    ) -> Self {
        Self { id: CenterId(0), name: name.into(), kind, servers, service, routing, visit_ratio: 1.0 }
    }

    /// Set the visit ratio
    pub fn with_visit_ratio(mut self, visit_ratio: f64) -> Self {
        self.visit_ratio = visit_ratio;
        self
    }
}

/// A fully wired network, ready to be turned into a model
#[derive(Debug, Clone)]
pub struct Topology {
    arrivals: ArrivalProcess,
    entry: RoutingPoint,
    centers: Vec<CenterDescriptor>,
}

impl Topology {
    /// Empty network fed by `arrivals`; `entry` picks each new job's first center
    pub fn new(arrivals: ArrivalProcess, entry: RoutingPoint) -> Self {
        Self { arrivals, entry, centers: Vec::new() }
    }

    /// Add a center; ids are assigned in insertion order, starting at 0
    pub fn add_center(&mut self, mut descriptor: CenterDescriptor) -> CenterId {
        let id = CenterId(self.centers.len());
        descriptor.id = id;
        self.centers.push(descriptor);
        id
    }

    /// Build the network selected by `config.topology`
    pub fn from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        match config.topology {
            TopologyVariant::Baseline => Self::baseline(config),
            TopologyVariant::Improved => Self::improved(config),
        }
    }

    /// Checkpoint as currently operated
    ///
    /// Entry → (CheckIn →) EGates → XRay → (TraceDetection →) Recovery → exit,
    /// with trace-detection failures leaving the network directly.
    pub fn baseline(config: &SimulationConfig) -> SimulationResult<Self> {
        Self::checkpoint(config, false)
    }

    /// Baseline plus a fast-track lane fed from the e-gates
    pub fn improved(config: &SimulationConfig) -> SimulationResult<Self> {
        Self::checkpoint(config, true)
    }

    fn checkpoint(config: &SimulationConfig, fast_track: bool) -> SimulationResult<Self> {
        use stream_ids::*;

        let routing = &config.routing;
        let stations = &config.stations;
        let exponential = config.exponential_services;

        // Ids follow insertion order below
        let check_in = CenterId(0);
        let e_gates = CenterId(1);
        let x_ray = CenterId(2);
        let trace = CenterId(3);
        let recovery = CenterId(4);
        let fast_lane = CenterId(5);

        let entry = RoutingPoint::binary(
            ENTRY_ROUTING,
            routing.p_desk,
            Branch::new(routing.p_desk, Route::Next(check_in)).stamping(JobFlag::CheckedBaggage),
            Branch::otherwise(Route::Next(e_gates)),
        )?;
        let arrivals = ArrivalProcess::poisson(config.arrival_mean_time, ARRIVALS)?;
        let mut topology = Topology::new(arrivals, entry);

        let e_gates_routing = if fast_track {
            RoutingPoint::binary(
                E_GATES_ROUTING,
                routing.p_fast_track,
                Branch::new(routing.p_fast_track, Route::Next(fast_lane)).stamping(JobFlag::FastTrackUsed),
                Branch::otherwise(Route::Next(x_ray)),
            )?
        } else {
            RoutingPoint::to(x_ray)
        };
        let x_ray_routing = Arc::new(RoutingPoint::binary(
            X_RAY_ROUTING,
            routing.p_check,
            Branch::new(routing.p_check, Route::Next(trace)).stamping(JobFlag::SecurityCheckRequested),
            Branch::otherwise(Route::Next(recovery)),
        )?);
        let trace_routing = RoutingPoint::binary(
            TRACE_ROUTING,
            routing.p_fail,
            Branch::new(routing.p_fail, Route::Exit).stamping(JobFlag::SecurityCheckFailed),
            Branch::otherwise(Route::Next(recovery)),
        )?;

        let p_fast = if fast_track { routing.p_fast_track } else { 0.0 };
        let trace_kind = if stations.trace_detection.servers == 1 {
            CenterKind::SingleServerSingleQueue
        } else {
            CenterKind::MultiServerSingleQueue
        };

        topology.add_center(
            CenterDescriptor::new(
                "CheckIn",
                CenterKind::MultiServerSingleQueue,
                stations.check_in.servers,
                service(&stations.check_in, exponential, CHECK_IN_SERVICE)?,
                Arc::new(RoutingPoint::to(e_gates)),
            )
            .with_visit_ratio(routing.p_desk),
        );
        topology.add_center(CenterDescriptor::new(
            "EGates",
            CenterKind::MultiServerSingleQueue,
            stations.e_gates.servers,
            service(&stations.e_gates, exponential, E_GATES_SERVICE)?,
            Arc::new(e_gates_routing),
        ));
        topology.add_center(
            CenterDescriptor::new(
                "XRay",
                CenterKind::MultiServerMultiQueue { policy: config.x_ray_policy, tie_break: Some(X_RAY_TIE_BREAK) },
                stations.x_ray.servers,
                service(&stations.x_ray, exponential, X_RAY_SERVICE)?,
                Arc::clone(&x_ray_routing),
            )
            .with_visit_ratio(1.0 - p_fast),
        );
        topology.add_center(
            CenterDescriptor::new(
                "TraceDetection",
                trace_kind,
                stations.trace_detection.servers,
                service(&stations.trace_detection, exponential, TRACE_SERVICE)?,
                Arc::new(trace_routing),
            )
            .with_visit_ratio(routing.p_check),
        );
        topology.add_center(
            CenterDescriptor::new(
                "Recovery",
                CenterKind::InfiniteServer,
                stations.recovery.servers,
                service(&stations.recovery, exponential, RECOVERY_SERVICE)?,
                Arc::new(RoutingPoint::exit()),
            )
            .with_visit_ratio(1.0 - routing.p_check * routing.p_fail),
        );
        if fast_track {
            topology.add_center(
                CenterDescriptor::new(
                    "FastTrack",
                    CenterKind::MultiServerSingleQueue,
                    stations.fast_track.servers,
                    service(&stations.fast_track, exponential, FAST_TRACK_SERVICE)?,
                    x_ray_routing,
                )
                .with_visit_ratio(p_fast),
            );
        }

        topology.validate()?;
        debug!(
            centers = topology.centers.len(),
            fast_track = fast_track,
            exponential = exponential,
            "Checkpoint topology built"
        );
        Ok(topology)
    }

    /// Check that every routed center exists and every center is sized for its kind
    pub fn validate(&self) -> SimulationResult<()> {
        if self.centers.is_empty() {
            return Err(SimulationError::configuration_error("topology has no centers"));
        }
        let known = |route: &Route| match route {
            Route::Next(id) => id.index() < self.centers.len(),
            Route::Exit => true,
        };

        if let Some(route) = self.entry.destinations().iter().find(|route| !known(*route)) {
            return Err(SimulationError::configuration_error(format!(
                "entry routes to unknown center {:?}",
                route
            )));
        }
        for center in &self.centers {
            if let Some(route) = center.routing.destinations().iter().find(|route| !known(*route)) {
                return Err(SimulationError::configuration_error(format!(
                    "{} routes to unknown center {:?}",
                    center.name, route
                )));
            }
            match center.kind {
                CenterKind::InfiniteServer => {}
                CenterKind::SingleServerSingleQueue if center.servers != 1 => {
                    return Err(SimulationError::configuration_error(format!(
                        "{} is single-server but has {} servers",
                        center.name, center.servers
                    )));
                }
                _ if center.servers == 0 => {
                    return Err(SimulationError::configuration_error(format!("{} has no servers", center.name)));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Arrival process feeding the network
    pub fn arrivals(&self) -> &ArrivalProcess {
        &self.arrivals
    }

    /// Routing point choosing each new job's first center
    pub fn entry(&self) -> &RoutingPoint {
        &self.entry
    }

    /// Center descriptors in sampling fan-out order
    pub fn centers(&self) -> &[CenterDescriptor] {
        &self.centers
    }

    /// Descriptor of one center
    pub fn center(&self, id: CenterId) -> Option<&CenterDescriptor> {
        self.centers.get(id.index())
    }

    /// Center names keyed by id
    pub fn names(&self) -> CenterNames {
        self.centers.iter().map(|center| (center.id, center.name.clone())).collect()
    }

    /// Split into parts for model construction
    pub fn into_parts(self) -> (ArrivalProcess, RoutingPoint, Vec<CenterDescriptor>) {
        (self.arrivals, self.entry, self.centers)
    }
}

fn service(station: &StationConfig, exponential: bool, stream: StreamId) -> SimulationResult<ServiceProcess> {
    let generator = RandomVariateGenerator::for_station(station, exponential)?;
    Ok(ServiceProcess::new(generator, stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomStreams;

    #[test]
    fn test_baseline_wiring() {
        let topology = Topology::baseline(&SimulationConfig::default()).unwrap();
        let names = topology.names();

        assert_eq!(topology.centers().len(), 5);
        assert_eq!(names.name(CenterId(2)), "XRay");
        assert_eq!(
            topology.center(CenterId(0)).unwrap().routing.destinations(),
            vec![Route::Next(CenterId(1))]
        );
        assert_eq!(topology.center(CenterId(4)).unwrap().kind, CenterKind::InfiniteServer);
        assert_eq!(topology.center(CenterId(3)).unwrap().kind, CenterKind::SingleServerSingleQueue);
        assert!(matches!(topology.center(CenterId(2)).unwrap().kind, CenterKind::MultiServerMultiQueue { .. }));
    }

    #[test]
    fn test_improved_shares_x_ray_routing() {
        let mut config = SimulationConfig::default();
        config.topology = TopologyVariant::Improved;
        let topology = Topology::from_config(&config).unwrap();

        assert_eq!(topology.centers().len(), 6);
        let x_ray = topology.center(CenterId(2)).unwrap();
        let fast = topology.center(CenterId(5)).unwrap();
        assert_eq!(fast.name, "FastTrack");
        assert!(Arc::ptr_eq(&x_ray.routing, &fast.routing));
        assert!((x_ray.visit_ratio + fast.visit_ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_multi_server_trace_detection() {
        let mut config = SimulationConfig::default();
        config.stations.trace_detection.servers = 2;
        let topology = Topology::baseline(&config).unwrap();
        assert_eq!(topology.center(CenterId(3)).unwrap().kind, CenterKind::MultiServerSingleQueue);
    }

    #[test]
    fn test_entry_split_stamps_baggage_flag() {
        let topology = Topology::baseline(&SimulationConfig::default()).unwrap();
        let mut streams = RandomStreams::new(3);
        let mut factory = crate::network::JobFactory::new();

        for _ in 0..500 {
            let mut job = factory.create(0.0);
            match topology.entry().route(&mut streams, &mut job) {
                Route::Next(CenterId(0)) => assert!(job.flags().checked_baggage),
                Route::Next(CenterId(1)) => assert!(!job.flags().checked_baggage),
                other => panic!("unexpected entry route {:?}", other),
            }
        }
    }

    #[test]
    fn test_dangling_route_rejected() {
        let arrivals = ArrivalProcess::poisson(1.0, stream_ids::ARRIVALS).unwrap();
        let mut topology = Topology::new(arrivals, RoutingPoint::to(CenterId(0)));
        let service = ServiceProcess::new(RandomVariateGenerator::deterministic(1.0).unwrap(), StreamId(10));
        topology.add_center(CenterDescriptor::new(
            "Only",
            CenterKind::MultiServerSingleQueue,
            2,
            service,
            Arc::new(RoutingPoint::to(CenterId(7))),
        ));

        let err = topology.validate().unwrap_err();
        assert!(matches!(err, SimulationError::ConfigurationError(_)));
    }

    #[test]
    fn test_single_server_kind_requires_one_server() {
        let arrivals = ArrivalProcess::poisson(1.0, stream_ids::ARRIVALS).unwrap();
        let mut topology = Topology::new(arrivals, RoutingPoint::to(CenterId(0)));
        let service = ServiceProcess::new(RandomVariateGenerator::deterministic(1.0).unwrap(), StreamId(10));
        topology.add_center(CenterDescriptor::new(
            "Desk",
            CenterKind::SingleServerSingleQueue,
            3,
            service,
            Arc::new(RoutingPoint::exit()),
        ));
        assert!(topology.validate().is_err());
    }
}
