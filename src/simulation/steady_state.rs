//! Steady-state estimation by batch means
//!
//! One long run, with a batch collector tracking every center and the system.
//! The run stops as soon as every tracked scope holds the requested number of
//! batches.

use super::finite_horizon::collect_rows;
use super::model::{RunSummary, SimulationModel, StopCondition};
use crate::network::Topology;
use crate::random::RandomStreams;
use crate::simulation::SimulationResult;
use crate::stats::{
    BatchCollector, BatchMeanRow, IntervalEstimationRow, Warmup, AUTOCORRELATION_THRESHOLD, DEFAULT_CONFIDENCE,
};
use crate::types::SimulationConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Results of a steady-state run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteadyStateReport {
    /// Every batch mean of every metric
    pub batch_means: Vec<BatchMeanRow>,
    /// Interval and lag-1 autocorrelation per metric, sorted by name
    pub intervals: Vec<IntervalEstimationRow>,
    /// Metrics without enough batches for an interval
    pub skipped: Vec<String>,
    /// Totals of the run
    pub summary: RunSummary,
}

impl SteadyStateReport {
    /// Interval row of one metric
    pub fn interval(&self, metric: &str) -> Option<&IntervalEstimationRow> {
        self.intervals.iter().find(|row| row.metric == metric)
    }
}

/// Runs one batch-means experiment
#[derive(Debug, Clone)]
pub struct SteadyStateRunner {
    config: SimulationConfig,
}

impl SteadyStateRunner {
    /// Runner for the network described by `config`
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Warmup rule configured for the run; no warmup when neither field is set
    pub fn warmup(&self) -> Warmup {
        match (self.config.warmup.jobs, self.config.warmup.time) {
            (Some(jobs), _) => Warmup::Jobs(jobs),
            (None, Some(time)) => Warmup::Time(time),
            (None, None) => Warmup::Jobs(0),
        }
    }

    /// Run the network described by the configuration
    pub fn run(&self) -> SimulationResult<SteadyStateReport> {
        self.run_topology(Topology::from_config(&self.config)?)
    }

    /// Run an explicit network with the configured batch parameters
    #[instrument(skip(self, topology), fields(batch_size = self.config.batch_size, batch_count = self.config.batch_count))]
    pub fn run_topology(&self, topology: Topology) -> SimulationResult<SteadyStateReport> {
        let warmup = self.warmup();
        info!(
            "Starting batch means: {} batches of {} observations, warmup {:?}",
            self.config.batch_count, self.config.batch_size, warmup
        );

        let mut collector = BatchCollector::new(self.config.batch_size, self.config.batch_count, warmup);
        collector.on_complete(|time| info!("All batches collected at t={:.1}", time));

        let streams = RandomStreams::new(self.config.seed);
        let mut model = SimulationModel::new(topology, streams)?.with_batches(collector);
        let summary = model.run(StopCondition::BatchesComplete)?;

        let parts = model.into_parts();
        let mut skipped = Vec::new();
        let (batch_means, intervals) = match parts.batches {
            Some(batches) => {
                for (metric, held) in batches.incomplete_metrics(&parts.names) {
                    warn!("{} has data in only {} of {} batches", metric, held, batches.batch_count());
                }
                (
                    batches.batch_rows(&parts.names),
                    collect_rows(batches.interval_rows(&parts.names, DEFAULT_CONFIDENCE), &mut skipped)?,
                )
            }
            None => (Vec::new(), Vec::new()),
        };

        for row in intervals.iter().filter(|row| row.is_correlated()) {
            warn!(
                "Batch means of {} are correlated (lag-1 r = {:.3} > {}); consider a larger batch size",
                row.metric,
                row.autocorrelation.unwrap_or_default(),
                AUTOCORRELATION_THRESHOLD
            );
        }

        Ok(SteadyStateReport { batch_means, intervals, skipped, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WarmupConfig;

    #[test]
    fn test_warmup_selection() {
        let mut config = SimulationConfig::default();
        assert_eq!(SteadyStateRunner::new(config.clone()).warmup(), Warmup::Time(20_000.0));

        config.warmup = WarmupConfig { jobs: Some(500), time: None };
        assert_eq!(SteadyStateRunner::new(config).warmup(), Warmup::Jobs(500));
    }

    #[test]
    fn test_short_baseline_run() {
        let config = SimulationConfig {
            batch_size: 64,
            batch_count: 4,
            warmup: WarmupConfig { jobs: Some(100), time: None },
            ..SimulationConfig::default()
        };
        let report = SteadyStateRunner::new(config).run().unwrap();

        let ts = report.interval("Ts_EGates").unwrap();
        assert!(ts.mean > 0.0);
        assert!(ts.autocorrelation.is_some());
        assert_eq!(ts.batches, Some(4));
        assert_eq!(report.batch_means.iter().filter(|row| row.metric == "Ts_EGates").count(), 4);
    }
}
