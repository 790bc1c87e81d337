//! Airport Checkpoint Simulator
//!
//! A discrete-event simulation of the passenger flow through an airport
//! security checkpoint, modelled as an open queueing network.
//!
//! # Overview
//!
//! Passengers arrive as a Poisson stream, optionally check a bag, pass the
//! e-gates, queue at one of several X-ray lanes, may be pulled aside for trace
//! detection and finally collect their belongings. The library runs that
//! network event by event and estimates its performance.
//!
//! ## Key Features
//!
//! - **Event Clock**: future event list with FIFO tie-breaking and a monotone clock
//! - **Service Centers**: infinite-server, single-server, multi-server and multi-lane disciplines
//! - **Routing**: probabilistic branching that tags passengers on the way
//! - **Statistics**: job and time-weighted accumulators, raw sampling, batch means
//! - **Interval Estimation**: Student-t confidence intervals and lag-1 autocorrelation
//! - **Experiments**: finite-horizon replications, steady state and analytical verification
//! - **Reports**: CSV or JSON output with a run manifest
//!
//! ## Quick Start
//!
//! ```rust
//! use airport_checkpoint_sim::*;
//!
//! let config = SimulationConfig {
//!     horizon: 1_800.0,
//!     replications: 2,
//!     sampling_interval: 600.0,
//!     ..Default::default()
//! };
//!
//! let runner = FiniteHorizonRunner::new(config.clone(), ReplicationPlan::finite_horizon(&config));
//! let report = runner.run()?;
//! println!("{} population intervals", report.population.len());
//! # Ok::<(), SimulationError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums and configuration
//! - [`random`]: Random streams and variate generators
//! - [`events`]: Events and the event clock
//! - [`network`]: Jobs, routing, flow policies and topologies
//! - [`center`]: Service center disciplines
//! - [`stats`]: Accumulators, sampling, batch means and intervals
//! - [`analysis`]: Closed-form queueing models
//! - [`simulation`]: Event loop, runners, errors and logging
//! - [`report`]: CSV/JSON writers and run manifest
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │   Random    │    │   Network   │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Streams     │◄───┤ Routing     │
//! │ Enums       │    │ Variates    │    │ Topology    │
//! │ Config      │    │             │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                   ▲                   ▲
//!        │                   │                   │
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Events    │    │   Center    │    │ Simulation  │
//! │             │    │             │    │             │
//! │ Clock       │◄───┤ Disciplines │◄───┤ Model       │
//! │             │    │ Stats       │    │ Runners     │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                                                ▲
//!                                                │
//!                                        ┌─────────────┐
//!                                        │   Report    │
//!                                        └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod analysis;
pub mod center;
pub mod events;
pub mod network;
pub mod random;
pub mod report;
pub mod simulation;
pub mod stats;
pub mod types;

// Core types and configuration
pub use types::{
    CenterId, CenterNames, ConfigValidationError, EventKind, ExperimentKind, FlowPolicyKind, JobId, JobOutcome,
    MetricKind, OutputFormat, SimulationConfig, StreamId, TopologyVariant,
};

// Kernel
pub use center::{Center, CenterNode};
pub use events::{Event, EventClock};
pub use network::{Job, RoutingPoint, Topology};
pub use random::RandomStreams;

// Statistics
pub use stats::{BatchCollector, IntervalEstimate, IntervalEstimationRow, MetricKey, StatCollector, Warmup};

// Experiments and reports
pub use analysis::{QueueModel, VerificationRow};
pub use report::{ReportRow, RunManifest};
pub use simulation::{
    FiniteHorizonRunner, ReplicationPlan, SimulationError, SimulationModel, SimulationResult, SteadyStateRunner,
    StopCondition, VerificationRunner,
};
