//! Batch-means collection for steady-state estimation
//!
//! Each tracked scope (a center, or the system as a whole) counts the completed
//! observations it receives. After a warmup, every `batch_size` observations
//! close a batch: the scope's current means are captured and its accumulators
//! reset. A scope stops collecting once it holds `batch_count` batches; the
//! collector is done when every tracked scope is.
//!
//! # Warmup
//!
//! - `Warmup::Jobs(n)`: the first `n` observations of each scope are discarded.
//! - `Warmup::Time(t)`: observations before simulated time `t` are discarded;
//!   the first observation at or after `t` counts toward the first batch.
//!
//! Every discarded observation resets the scope's accumulators, so nothing
//! collected during warmup leaks into the first batch.
//!
//! A metric with no data in some batch gets no mean for it. Such a metric
//! ends with fewer than `batch_count` means; its rows keep the real batch
//! indices and [`BatchCollector::incomplete_metrics`] lists it.

use super::accumulators::{MetricKey, MetricScope, StatCollector};
use super::interval::IntervalEstimationRow;
use crate::simulation::SimulationResult;
use crate::types::CenterNames;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Warmup rule applied before the first batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Warmup {
    /// Discard the first `n` observations of every scope
    Jobs(u64),
    /// Discard observations before this simulated time
    Time(f64),
}

/// Progress of the whole collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchState {
    /// No scope has finished its warmup yet
    Warmup,
    /// At least one scope is filling batches
    Collecting,
    /// Every tracked scope holds `batch_count` batches
    Done,
}

#[derive(Debug, Clone, Copy, Default)]
struct ScopeProgress {
    discarded: u64,
    warmed_up: bool,
    observations: usize,
    batches: usize,
}

/// Batch means of one metric, ready for output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMeanRow {
    /// Metric display name
    pub metric: String,
    /// Batch index, from 0
    pub batch: usize,
    /// Mean of the metric over the batch
    pub mean: f64,
}

type CompletionHook = Box<dyn FnOnce(f64) + Send>;

/// Warmup-aware batch-means collector
pub struct BatchCollector {
    batch_size: usize,
    batch_count: usize,
    warmup: Warmup,
    scopes: BTreeMap<MetricScope, ScopeProgress>,
    means: BTreeMap<MetricKey, Vec<f64>>,
    indices: BTreeMap<MetricKey, Vec<usize>>,
    done: bool,
    on_complete: Option<CompletionHook>,
}

impl fmt::Debug for BatchCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchCollector")
            .field("batch_size", &self.batch_size)
            .field("batch_count", &self.batch_count)
            .field("warmup", &self.warmup)
            .field("scopes", &self.scopes)
            .field("done", &self.done)
            .field("has_completion_hook", &self.on_complete.is_some())
            .finish()
    }
}

impl BatchCollector {
    /// Collector closing a batch every `batch_size` observations, up to
    /// `batch_count` batches per scope
    pub fn new(batch_size: usize, batch_count: usize, warmup: Warmup) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_count,
            warmup,
            scopes: BTreeMap::new(),
            means: BTreeMap::new(),
            indices: BTreeMap::new(),
            done: false,
            on_complete: None,
        }
    }

    /// Register a scope; observations of unregistered scopes are ignored
    pub fn track(&mut self, scope: MetricScope) {
        self.scopes.entry(scope).or_default();
    }

    /// Run `hook` once, with the simulated time, when the last scope completes
    pub fn on_complete(&mut self, hook: impl FnOnce(f64) + Send + 'static) {
        self.on_complete = Some(Box::new(hook));
    }

    /// Account for one completed observation of `scope` at time `now`
    ///
    /// Returns `true` when the observation closed a batch.
    pub fn observe(&mut self, now: f64, scope: MetricScope, stats: &mut StatCollector) -> bool {
        if self.done {
            return false;
        }
        let Some(progress) = self.scopes.get_mut(&scope) else {
            return false;
        };

        if !progress.warmed_up {
            match self.warmup {
                Warmup::Jobs(n) if progress.discarded < n => {
                    progress.discarded += 1;
                    stats.reset_scope(scope);
                    return false;
                }
                Warmup::Jobs(_) => progress.warmed_up = true,
                Warmup::Time(cutoff) if now < cutoff => {
                    progress.discarded += 1;
                    stats.reset_scope(scope);
                    return false;
                }
                Warmup::Time(_) => {
                    progress.warmed_up = true;
                    debug!(scope = ?scope, discarded = progress.discarded, time = now, "Warmup finished");
                }
            }
        }

        if progress.batches >= self.batch_count {
            return false;
        }
        progress.observations += 1;
        if progress.observations < self.batch_size {
            return false;
        }

        progress.observations = 0;
        progress.batches += 1;
        crate::sim_event!(debug, "Batch closed", batch = progress.batches, time = now);
        let batch = progress.batches - 1;
        for (key, mean) in stats.scope_means(scope) {
            self.means.entry(key).or_default().push(mean);
            self.indices.entry(key).or_default().push(batch);
        }
        stats.reset_scope(scope);

        if self.scopes.values().all(|p| p.batches >= self.batch_count) {
            self.done = true;
            debug!(batches = self.batch_count, batch_size = self.batch_size, time = now, "Batch collection complete");
            if let Some(hook) = self.on_complete.take() {
                hook(now);
            }
        }
        true
    }

    /// Progress of the collector
    pub fn state(&self) -> BatchState {
        if self.done {
            BatchState::Done
        } else if self.scopes.values().any(|p| p.warmed_up) {
            BatchState::Collecting
        } else {
            BatchState::Warmup
        }
    }

    /// Whether every tracked scope holds `batch_count` batches
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Batches closed so far for `scope`
    pub fn batches_for(&self, scope: MetricScope) -> usize {
        self.scopes.get(&scope).map_or(0, |p| p.batches)
    }

    /// Observations discarded by warmup for `scope`
    pub fn discarded_for(&self, scope: MetricScope) -> u64 {
        self.scopes.get(&scope).map_or(0, |p| p.discarded)
    }

    /// Batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Batches required per scope
    pub fn batch_count(&self) -> usize {
        self.batch_count
    }

    /// Batch means captured so far, per metric
    pub fn batch_means(&self) -> &BTreeMap<MetricKey, Vec<f64>> {
        &self.means
    }

    /// Batch means of one metric
    pub fn means_for(&self, key: &MetricKey) -> &[f64] {
        self.means.get(key).map_or(&[], Vec::as_slice)
    }

    /// Every batch mean as a report row, tagged with the batch it closed
    pub fn batch_rows(&self, names: &CenterNames) -> Vec<BatchMeanRow> {
        self.means
            .iter()
            .flat_map(|(key, means)| {
                let metric = key.display_name(names);
                let indices = self.indices.get(key).map_or(&[][..], Vec::as_slice);
                means
                    .iter()
                    .zip(indices)
                    .map(move |(&mean, &batch)| BatchMeanRow { metric: metric.clone(), batch, mean })
            })
            .collect()
    }

    /// Metrics holding fewer than `batch_count` means, with how many they hold
    pub fn incomplete_metrics(&self, names: &CenterNames) -> Vec<(String, usize)> {
        self.means
            .iter()
            .filter(|(_, means)| means.len() < self.batch_count)
            .map(|(key, means)| (key.display_name(names), means.len()))
            .collect()
    }

    /// Interval estimate with lag-1 autocorrelation for every metric
    ///
    /// Each entry is the metric name with its estimation result; metrics with
    /// fewer than two batches yield an insufficient-data error.
    pub fn interval_rows(
        &self,
        names: &CenterNames,
        confidence: f64,
    ) -> Vec<(String, SimulationResult<IntervalEstimationRow>)> {
        self.means
            .iter()
            .map(|(key, means)| {
                let metric = key.display_name(names);
                let row = IntervalEstimationRow::from_series(metric.clone(), means, confidence, true);
                (metric, row)
            })
            .collect()
    }
}
