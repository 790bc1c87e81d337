//! Core types and identifiers for the checkpoint simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: integer handles for jobs, centers and random streams, UUID run ids
//! - **Enums**: event kinds, metric kinds, job flags and experiment choices
//! - **Configuration**: simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use airport_checkpoint_sim::types::*;
//!
//! let config = SimulationConfig {
//!     experiment: ExperimentKind::SteadyState,
//!     batch_size: 256,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(MetricKind::ResponseTime.prefix(), "Ts");
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
