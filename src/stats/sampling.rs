//! Raw time-series sampling of center state
//!
//! The ledger is append-only and never aggregated; transient and finite-horizon
//! plots are drawn from it directly.

use crate::types::{CenterId, CenterNames, SampleMetric};
use serde::{Deserialize, Serialize};

/// State of a center at a sampling instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterSnapshot {
    /// Jobs in the center
    pub jobs_in_node: usize,
    /// Jobs waiting
    pub jobs_in_queue: usize,
    /// Busy servers
    pub busy_servers: usize,
    /// Mean response time observed at the center so far
    pub running_response_time: f64,
}

impl CenterSnapshot {
    /// The snapshot as `(metric, value)` pairs
    pub fn metrics(&self) -> [(SampleMetric, f64); 4] {
        [
            (SampleMetric::Total, self.jobs_in_node as f64),
            (SampleMetric::Queue, self.jobs_in_queue as f64),
            (SampleMetric::BusyServers, self.busy_servers as f64),
            (SampleMetric::RunningResponseTime, self.running_response_time),
        ]
    }
}

/// One ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Simulated time of the snapshot
    pub timestamp: f64,
    /// Center that was sampled
    pub center: CenterId,
    /// Metric sampled
    pub metric: SampleMetric,
    /// Value observed
    pub value: f64,
}

/// A ledger entry with the center name resolved, ready for output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    /// Simulated time of the snapshot
    pub timestamp: f64,
    /// Center name
    pub node: String,
    /// Metric name
    pub metric: String,
    /// Value observed
    pub value: f64,
}

/// Append-only `(time, center, metric, value)` ledger
#[derive(Debug, Clone, Default)]
pub struct SampleCollector {
    samples: Vec<Sample>,
}

impl SampleCollector {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry
    pub fn record(&mut self, timestamp: f64, center: CenterId, metric: SampleMetric, value: f64) {
        self.samples.push(Sample { timestamp, center, metric, value });
    }

    /// Append one entry per metric of a snapshot
    pub fn record_snapshot(&mut self, timestamp: f64, center: CenterId, snapshot: &CenterSnapshot) {
        for (metric, value) in snapshot.metrics() {
            self.record(timestamp, center, metric, value);
        }
    }

    /// Every entry in recording order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Entries of one center
    pub fn for_center(&self, center: CenterId) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(move |sample| sample.center == center)
    }

    /// Entries recorded
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Ledger with center names resolved
    pub fn rows(&self, names: &CenterNames) -> Vec<SampleRow> {
        self.samples
            .iter()
            .map(|sample| SampleRow {
                timestamp: sample.timestamp,
                node: names.name(sample.center),
                metric: sample.metric.to_string(),
                value: sample.value,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_expands_to_one_entry_per_metric() {
        let mut collector = SampleCollector::new();
        let snapshot = CenterSnapshot {
            jobs_in_node: 5,
            jobs_in_queue: 2,
            busy_servers: 3,
            running_response_time: 41.5,
        };
        collector.record_snapshot(300.0, CenterId(1), &snapshot);

        assert_eq!(collector.len(), 4);
        let queue = collector
            .for_center(CenterId(1))
            .find(|sample| sample.metric == SampleMetric::Queue)
            .unwrap();
        assert_eq!(queue.value, 2.0);
        assert_eq!(queue.timestamp, 300.0);
    }

    #[test]
    fn test_rows_resolve_names() {
        let mut collector = SampleCollector::new();
        collector.record(60.0, CenterId(0), SampleMetric::Total, 7.0);

        let mut names = CenterNames::new();
        names.insert(CenterId(0), "EGates");
        let rows = collector.rows(&names);

        assert_eq!(rows[0].node, "EGates");
        assert_eq!(rows[0].metric, "Total");
        assert_eq!(rows[0].value, 7.0);
    }
}
