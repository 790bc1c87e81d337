//! Steady-state verification against closed-form queueing models
//!
//! Services are switched to exponential with the configured means, the
//! network runs under batch means, and each center's response-time interval
//! is compared with the matching analytical model at the center's own
//! arrival rate (network rate times visit ratio).

use super::steady_state::{SteadyStateReport, SteadyStateRunner};
use crate::analysis::{QueueModel, VerificationRow};
use crate::network::{CenterDescriptor, Topology};
use crate::simulation::SimulationResult;
use crate::types::{MetricKind, SimulationConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Results of a verification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// One row per center with a response-time interval
    pub rows: Vec<VerificationRow>,
    /// The underlying steady-state results
    pub steady_state: SteadyStateReport,
}

impl VerificationReport {
    /// Row of one center
    pub fn row(&self, center: &str) -> Option<&VerificationRow> {
        self.rows.iter().find(|row| row.center == center)
    }

    /// Rows whose analytical value falls inside the simulated interval
    pub fn verified(&self) -> usize {
        self.rows.iter().filter(|row| row.within_interval).count()
    }
}

/// Compares simulated centers with their analytical counterparts
#[derive(Debug, Clone)]
pub struct VerificationRunner {
    config: SimulationConfig,
}

impl VerificationRunner {
    /// Runner for the network described by `config`; services are forced exponential
    pub fn new(config: SimulationConfig) -> Self {
        Self { config: SimulationConfig { exponential_services: true, ..config } }
    }

    /// Verify the configured network
    pub fn run(&self) -> SimulationResult<VerificationReport> {
        self.verify_topology(Topology::from_config(&self.config)?)
    }

    /// Verify an explicit network; its service processes should be exponential
    #[instrument(skip(self, topology), fields(centers = topology.centers().len()))]
    pub fn verify_topology(&self, topology: Topology) -> SimulationResult<VerificationReport> {
        let lambda = topology.arrivals().rate();
        let descriptors: Vec<CenterDescriptor> = topology.centers().to_vec();

        let steady_state = SteadyStateRunner::new(self.config.clone()).run_topology(topology)?;

        let mut rows = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            let metric = format!("{}_{}", MetricKind::ResponseTime.prefix(), descriptor.name);
            let Some(interval) = steady_state.interval(&metric) else {
                warn!("No response-time interval for {}; center not verified", descriptor.name);
                continue;
            };

            let model = QueueModel::for_center(descriptor.kind, descriptor.servers);
            let metrics = model.evaluate(lambda * descriptor.visit_ratio, descriptor.service.mean());
            if !metrics.stable {
                warn!(
                    "{} is unstable as {} (utilization {:.3}); no analytical value",
                    descriptor.name, model, metrics.utilization
                );
            }

            let row = VerificationRow::compare(descriptor.name.clone(), model, interval, &metrics);
            info!(
                "{}: simulated {:.3} ± {:.3}, {} gives {:.3}",
                row.metric, row.sim_mean, row.sim_width, row.model, row.theo_value
            );
            rows.push(row);
        }

        let report = VerificationReport { rows, steady_state };
        info!("{} of {} centers within their interval", report.verified(), report.rows.len());
        Ok(report)
    }
}
