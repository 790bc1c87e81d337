//! Jobs and the routing layer that wires centers into a network
//!
//! # Overview
//!
//! - **Job**: a passenger, with visit timestamps and outcome flags
//! - **RoutingPoint**: fixed or probabilistic choice of the next center (or exit)
//! - **FlowAssignmentPolicy**: lane selection at multi-queue centers
//! - **Topology**: the baseline and improved checkpoint networks
//!
//! # Usage Example
//!
//! ```rust
//! use airport_checkpoint_sim::network::*;
//! use airport_checkpoint_sim::random::RandomStreams;
//! use airport_checkpoint_sim::types::{CenterId, SimulationConfig};
//!
//! let topology = Topology::baseline(&SimulationConfig::default()).unwrap();
//! assert_eq!(topology.names().name(CenterId(1)), "EGates");
//!
//! let mut streams = RandomStreams::new(42);
//! let mut job = JobFactory::new().create(0.0);
//! let first = topology.entry().route(&mut streams, &mut job);
//! assert!(matches!(first, Route::Next(_)));
//! ```

pub mod flow_policy;
pub mod job;
pub mod routing;
pub mod topology;

pub use flow_policy::*;
pub use job::*;
pub use routing::*;
pub use topology::*;
