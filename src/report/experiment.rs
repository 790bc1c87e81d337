//! File layout of each experiment's reports

use super::manifest::RunManifest;
use super::writer::write_rows;
use crate::simulation::{FiniteHorizonReport, SimulationResult, SteadyStateReport, VerificationReport};
use crate::types::OutputFormat;
use std::path::Path;

/// Interval files plus one sample file per replication under `runs-samples/run-<i>/`
pub fn write_finite_horizon(
    dir: &Path,
    report: &FiniteHorizonReport,
    format: OutputFormat,
    manifest: &mut RunManifest,
) -> SimulationResult<()> {
    manifest.add_file(dir, write_rows(dir, "population-ie", &report.population, format)?);
    manifest.add_file(dir, write_rows(dir, "time-ie", &report.time, format)?);

    for samples in &report.samples {
        let run_dir = dir.join("runs-samples").join(format!("run-{}", samples.replication));
        manifest.add_file(dir, write_rows(&run_dir, "sample", &samples.rows, format)?);
    }
    Ok(())
}

/// Batch means and their interval rows
pub fn write_steady_state(
    dir: &Path,
    report: &SteadyStateReport,
    format: OutputFormat,
    manifest: &mut RunManifest,
) -> SimulationResult<()> {
    manifest.add_file(dir, write_rows(dir, "batch-means", &report.batch_means, format)?);
    manifest.add_file(dir, write_rows(dir, "steady-state-ie", &report.intervals, format)?);
    Ok(())
}

/// One comparison row per verified center
pub fn write_verification(
    dir: &Path,
    report: &VerificationReport,
    format: OutputFormat,
    manifest: &mut RunManifest,
) -> SimulationResult<()> {
    manifest.add_file(dir, write_rows(dir, "verification", &report.rows, format)?);
    Ok(())
}
