//! Finite-horizon and transient experiments
//!
//! Independent replications of one working day (or a shorter transient
//! window). Every replication draws from the same stream set, continuing where
//! the previous one stopped, so replications are independent yet the whole
//! experiment is reproducible from one seed. The mean of each metric in each
//! replication becomes one observation for interval estimation.

use super::model::{SimulationModel, StopCondition};
use crate::network::Topology;
use crate::random::RandomStreams;
use crate::simulation::SimulationResult;
use crate::stats::{IntervalEstimationRow, MetricKey, SampleRow, DEFAULT_CONFIDENCE};
use crate::types::{CenterNames, SimulationConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Horizon, replication count and sampling interval of a replicated experiment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicationPlan {
    /// Arrivals are generated up to this time
    pub horizon: f64,
    /// Independent replications
    pub replications: usize,
    /// Time between snapshots
    pub sampling_interval: f64,
}

impl ReplicationPlan {
    /// Full working day
    pub fn finite_horizon(config: &SimulationConfig) -> Self {
        Self {
            horizon: config.horizon,
            replications: config.replications,
            sampling_interval: config.sampling_interval,
        }
    }

    /// Shorter window with dense sampling, for warmup inspection
    pub fn transient(config: &SimulationConfig) -> Self {
        Self {
            horizon: config.transient_horizon,
            replications: config.transient_replications,
            sampling_interval: config.transient_sampling_interval,
        }
    }
}

/// Raw samples of one replication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSamples {
    /// Replication index, from 0
    pub replication: usize,
    /// Ledger rows
    pub rows: Vec<SampleRow>,
}

/// Results of a replicated experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiniteHorizonReport {
    /// Intervals over job-level metrics (Ts, Tq, S and system response)
    pub population: Vec<IntervalEstimationRow>,
    /// Intervals over time-weighted metrics (N, Nq, X)
    pub time: Vec<IntervalEstimationRow>,
    /// Every replication's raw samples
    pub samples: Vec<ReplicationSamples>,
    /// Metrics without enough replications for an interval
    pub skipped: Vec<String>,
}

/// Runs replications and estimates intervals over their means
#[derive(Debug, Clone)]
pub struct FiniteHorizonRunner {
    config: SimulationConfig,
    plan: ReplicationPlan,
}

impl FiniteHorizonRunner {
    /// Runner for the network described by `config`
    pub fn new(config: SimulationConfig, plan: ReplicationPlan) -> Self {
        Self { config, plan }
    }

    /// Replication plan in use
    pub fn plan(&self) -> &ReplicationPlan {
        &self.plan
    }

    /// Run every replication and estimate the intervals
    #[instrument(skip(self), fields(replications = self.plan.replications, horizon = self.plan.horizon))]
    pub fn run(&self) -> SimulationResult<FiniteHorizonReport> {
        info!(
            "Starting {} replications of {}s on the {} network",
            self.plan.replications, self.plan.horizon, self.config.topology
        );

        let mut streams = RandomStreams::new(self.config.seed);
        let mut population: BTreeMap<MetricKey, Vec<f64>> = BTreeMap::new();
        let mut time: BTreeMap<MetricKey, Vec<f64>> = BTreeMap::new();
        let mut samples = Vec::with_capacity(self.plan.replications);
        let mut names = CenterNames::new();

        for replication in 0..self.plan.replications {
            let _span = crate::perf_span!("replication", index = replication).entered();
            let topology = Topology::from_config(&self.config)?;
            let mut model = SimulationModel::new(topology, streams)?.with_sampler();
            model.schedule_sampling(self.plan.sampling_interval, self.plan.horizon)?;
            let summary = model.run(StopCondition::Horizon(self.plan.horizon))?;
            debug!(
                "Replication {} finished: {} jobs, {} events, clock {:.1}",
                replication, summary.jobs, summary.events, summary.end_time
            );

            let parts = model.into_parts();
            for (key, stat) in parts.stats.population_stats().filter(|(_, stat)| stat.count() > 0) {
                population.entry(*key).or_default().push(stat.mean());
            }
            for (key, stat) in parts.stats.time_stats().filter(|(_, stat)| stat.total_time() > 0.0) {
                time.entry(*key).or_default().push(stat.mean());
            }
            let rows = parts.sampler.map(|sampler| sampler.rows(&parts.names)).unwrap_or_default();
            samples.push(ReplicationSamples { replication, rows });

            streams = parts.streams;
            names = parts.names;
        }

        let mut skipped = Vec::new();
        let population = estimate(&population, &names, &mut skipped)?;
        let time = estimate(&time, &names, &mut skipped)?;
        info!(
            "Estimated {} population and {} time intervals ({} skipped)",
            population.len(),
            time.len(),
            skipped.len()
        );

        Ok(FiniteHorizonReport { population, time, samples, skipped })
    }
}

/// Interval rows for every metric series
pub(crate) fn estimate(
    series: &BTreeMap<MetricKey, Vec<f64>>,
    names: &CenterNames,
    skipped: &mut Vec<String>,
) -> SimulationResult<Vec<IntervalEstimationRow>> {
    let results = series.iter().map(|(key, values)| {
        let metric = key.display_name(names);
        let row = IntervalEstimationRow::from_series(metric.clone(), values, DEFAULT_CONFIDENCE, false);
        (metric, row)
    });
    collect_rows(results, skipped)
}

/// Keep the successful rows, sorted; recoverable failures are logged and skipped
pub(crate) fn collect_rows(
    results: impl IntoIterator<Item = (String, SimulationResult<IntervalEstimationRow>)>,
    skipped: &mut Vec<String>,
) -> SimulationResult<Vec<IntervalEstimationRow>> {
    let mut rows = Vec::new();
    for (metric, result) in results {
        match result {
            Ok(row) => rows.push(row),
            Err(e) if e.is_recoverable() => {
                warn!("Skipping {}: {}", metric, e);
                skipped.push(metric);
            }
            Err(e) => return Err(e),
        }
    }
    IntervalEstimationRow::sort_rows(&mut rows);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            horizon: 3_600.0,
            replications: 3,
            sampling_interval: 600.0,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_replications_produce_rows_and_samples() {
        let config = small_config();
        let runner = FiniteHorizonRunner::new(config.clone(), ReplicationPlan::finite_horizon(&config));
        let report = runner.run().unwrap();

        assert_eq!(report.samples.len(), 3);
        // 5 centers, 6 sampling instants, 4 metrics
        assert_eq!(report.samples[0].rows.len(), 5 * 6 * 4);
        assert!(report.population.iter().any(|row| row.metric == "Ts_XRay"));
        assert!(report.time.iter().any(|row| row.metric == "N_EGates"));
        assert!(report.population.iter().any(|row| row.metric == "SystemResponseTime_Success"));

        let sorted = report.population.windows(2).all(|pair| pair[0].metric <= pair[1].metric);
        assert!(sorted);
    }

    #[test]
    fn test_transient_plan_reads_transient_fields() {
        let config = SimulationConfig::default();
        let plan = ReplicationPlan::transient(&config);
        assert_eq!(plan.horizon, config.transient_horizon);
        assert_eq!(plan.replications, config.transient_replications);
        assert_eq!(plan.sampling_interval, config.transient_sampling_interval);
    }

    #[test]
    fn test_single_observation_metrics_are_skipped() {
        let mut series = BTreeMap::new();
        series.insert(MetricKey::system(crate::types::MetricKind::SystemResponseFailure), vec![120.0]);
        let mut skipped = Vec::new();

        let rows = estimate(&series, &CenterNames::new(), &mut skipped).unwrap();
        assert!(rows.is_empty());
        assert_eq!(skipped, vec!["SystemResponseTime_Failure".to_string()]);
    }
}
