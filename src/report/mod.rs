//! Report rendering for experiment results
//!
//! This module turns runner results into CSV or JSON files and records every
//! file of a run in a manifest.
//!
//! # Overview
//!
//! - **ReportRow**: flat `(column, value)` view of a result row
//! - **Writers**: `write_csv`, `write_json` and `write_rows`
//! - **Experiment layouts**: the files each experiment produces
//! - **RunManifest**: run id, timestamp, seed and file list as `manifest.json`
//!
//! # Usage Example
//!
//! ```rust
//! use airport_checkpoint_sim::report::*;
//! use airport_checkpoint_sim::stats::BatchMeanRow;
//! use airport_checkpoint_sim::types::{ExperimentKind, OutputFormat};
//!
//! let dir = std::env::temp_dir().join("checkpoint-report-doc");
//! let rows = vec![BatchMeanRow { metric: "Ts_XRay".to_string(), batch: 0, mean: 42.0 }];
//!
//! let mut manifest = RunManifest::new(ExperimentKind::SteadyState, 7);
//! let path = write_rows(&dir, "batch-means", &rows, OutputFormat::Csv).unwrap();
//! manifest.add_file(&dir, path);
//! manifest.write(&dir).unwrap();
//! ```

pub mod experiment;
pub mod manifest;
pub mod rows;
pub mod writer;

// Re-export all public types for convenience
pub use experiment::*;
pub use manifest::*;
pub use rows::*;
pub use writer::*;
