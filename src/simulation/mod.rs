//! Simulation orchestration and control
//!
//! This module contains the event loop, the experiment runners, error
//! handling and logging setup.
//!
//! # Overview
//!
//! - **SimulationModel**: owns the clock, the centers and the statistics and dispatches events
//! - **FiniteHorizonRunner**: independent replications of a working day (or a transient window)
//! - **SteadyStateRunner**: one long run analysed with batch means
//! - **VerificationRunner**: steady-state run checked against queueing formulas
//! - **SimulationError**: error handling for every simulation operation
//!
//! # Usage Example
//!
//! ```rust
//! use airport_checkpoint_sim::network::Topology;
//! use airport_checkpoint_sim::random::RandomStreams;
//! use airport_checkpoint_sim::simulation::*;
//! use airport_checkpoint_sim::types::SimulationConfig;
//!
//! let config = SimulationConfig { horizon: 600.0, ..Default::default() };
//! let topology = Topology::from_config(&config).unwrap();
//! let mut model = SimulationModel::new(topology, RandomStreams::new(config.seed)).unwrap();
//!
//! let summary = model.run(StopCondition::Horizon(600.0)).unwrap();
//! assert_eq!(model.jobs_in_network(), 0);
//! assert!(summary.exits > 0);
//! ```

pub mod error;
pub mod finite_horizon;
pub mod logging;
pub mod model;
pub mod steady_state;
pub mod verification;

// Re-export all public types for convenience
pub use error::*;
pub use finite_horizon::{FiniteHorizonReport, FiniteHorizonRunner, ReplicationPlan, ReplicationSamples};
pub use logging::*;
pub use model::*;
pub use steady_state::*;
pub use verification::*;
