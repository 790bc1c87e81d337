//! Statistics collection and estimation
//!
//! # Overview
//!
//! - **StatCollector**: population and time-weighted accumulators keyed by
//!   [`MetricKey`] (a center or the system, plus the metric kind)
//! - **SampleCollector**: raw `(time, center, metric, value)` ledger filled at
//!   sampling events
//! - **BatchCollector**: warmup-aware batch means for steady-state runs
//! - **IntervalEstimate**: Student-t confidence intervals and lag-1
//!   autocorrelation over replication or batch means
//!
//! # Usage Example
//!
//! ```rust
//! use airport_checkpoint_sim::stats::*;
//! use airport_checkpoint_sim::types::{CenterId, MetricKind};
//!
//! let mut stats = StatCollector::new();
//! let key = MetricKey::center(CenterId(0), MetricKind::ResponseTime);
//! stats.add_sample(key, 12.0);
//! stats.add_sample(key, 18.0);
//! assert_eq!(stats.population_mean(&key), 15.0);
//!
//! let estimate = IntervalEstimate::from_values("Ts", &[14.0, 15.0, 16.0], DEFAULT_CONFIDENCE).unwrap();
//! assert!(estimate.contains(15.0));
//! ```

pub mod accumulators;
pub mod batch_means;
pub mod distributions;
pub mod interval;
pub mod sampling;

pub use accumulators::*;
pub use batch_means::*;
pub use distributions::*;
pub use interval::*;
pub use sampling::*;
