//! Population and time-weighted accumulators keyed by typed metric keys

use crate::types::{CenterId, CenterNames, MetricKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running average over discrete observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStat {
    count: u64,
    sum: f64,
}

impl PopulationStat {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
    }

    /// Mean of the observations, 0 when there are none
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Observations so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of the observations
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Forget every observation
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Time-weighted average of a piecewise-constant state variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeStat {
    area: f64,
    total_time: f64,
    #[serde(skip)]
    log: Option<Vec<(f64, f64)>>,
}

impl TimeStat {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty accumulator that also keeps every `(value, duration)` update
    pub fn with_log() -> Self {
        Self { log: Some(Vec::new()), ..Self::default() }
    }

    /// Account for `value` held constant over `duration`
    pub fn accumulate(&mut self, value: f64, duration: f64) {
        self.area += value * duration;
        self.total_time += duration;
        if let Some(log) = &mut self.log {
            log.push((value, duration));
        }
    }

    /// Time-weighted mean, 0 when no time has elapsed
    pub fn mean(&self) -> f64 {
        if self.total_time == 0.0 {
            0.0
        } else {
            self.area / self.total_time
        }
    }

    /// Integral of the state over time
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Time covered so far
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Raw updates, when logging was enabled
    pub fn log(&self) -> Option<&[(f64, f64)]> {
        self.log.as_deref()
    }

    /// Forget the accumulated area and time (and the log, if any)
    pub fn reset(&mut self) {
        self.area = 0.0;
        self.total_time = 0.0;
        if let Some(log) = &mut self.log {
            log.clear();
        }
    }
}

/// Owner of a group of metrics: one center, or the system as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricScope {
    /// Metrics of one center
    Center(CenterId),
    /// End-to-end metrics of the network
    System,
}

/// Typed metric key; the display name is only built when reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MetricKey {
    /// Owner of the metric
    pub scope: MetricScope,
    /// What is measured
    pub kind: MetricKind,
}

impl MetricKey {
    /// Metric of a center
    pub fn center(id: CenterId, kind: MetricKind) -> Self {
        Self { scope: MetricScope::Center(id), kind }
    }

    /// System-wide metric
    pub fn system(kind: MetricKind) -> Self {
        Self { scope: MetricScope::System, kind }
    }

    /// Report name, e.g. `Ts_XRay` or `SystemResponseTime_Success`
    pub fn display_name(&self, names: &CenterNames) -> String {
        match self.scope {
            MetricScope::Center(id) => format!("{}_{}", self.kind.prefix(), names.name(id)),
            MetricScope::System => self.kind.prefix().to_string(),
        }
    }
}

/// Registry of every accumulator of a run
#[derive(Debug, Clone, Default)]
pub struct StatCollector {
    population: BTreeMap<MetricKey, PopulationStat>,
    time: BTreeMap<MetricKey, TimeStat>,
    keep_time_logs: bool,
}

impl StatCollector {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose time accumulators keep their raw update logs
    pub fn with_time_logs() -> Self {
        Self { keep_time_logs: true, ..Self::default() }
    }

    /// Add a job-level observation
    pub fn add_sample(&mut self, key: MetricKey, value: f64) {
        self.population.entry(key).or_default().add(value);
    }

    /// Add `value × duration` to a time-weighted metric
    pub fn update_area(&mut self, key: MetricKey, value: f64, duration: f64) {
        let keep_log = self.keep_time_logs;
        self.time
            .entry(key)
            .or_insert_with(|| if keep_log { TimeStat::with_log() } else { TimeStat::new() })
            .accumulate(value, duration);
    }

    /// Mean of a population metric, 0 if never observed
    pub fn population_mean(&self, key: &MetricKey) -> f64 {
        self.population.get(key).map_or(0.0, PopulationStat::mean)
    }

    /// Observations of a population metric
    pub fn population_count(&self, key: &MetricKey) -> u64 {
        self.population.get(key).map_or(0, PopulationStat::count)
    }

    /// Mean of a time-weighted metric, 0 if never updated
    pub fn time_mean(&self, key: &MetricKey) -> f64 {
        self.time.get(key).map_or(0.0, TimeStat::mean)
    }

    /// Population accumulator, if the metric exists
    pub fn population(&self, key: &MetricKey) -> Option<&PopulationStat> {
        self.population.get(key)
    }

    /// Time accumulator, if the metric exists
    pub fn time(&self, key: &MetricKey) -> Option<&TimeStat> {
        self.time.get(key)
    }

    /// Every population accumulator in key order
    pub fn population_stats(&self) -> impl Iterator<Item = (&MetricKey, &PopulationStat)> {
        self.population.iter()
    }

    /// Every time accumulator in key order
    pub fn time_stats(&self) -> impl Iterator<Item = (&MetricKey, &TimeStat)> {
        self.time.iter()
    }

    /// Means of every metric of `scope` that holds data
    pub fn scope_means(&self, scope: MetricScope) -> Vec<(MetricKey, f64)> {
        let population = self
            .population
            .iter()
            .filter(|(key, stat)| key.scope == scope && stat.count() > 0)
            .map(|(key, stat)| (*key, stat.mean()));
        let time = self
            .time
            .iter()
            .filter(|(key, stat)| key.scope == scope && stat.total_time() > 0.0)
            .map(|(key, stat)| (*key, stat.mean()));
        population.chain(time).collect()
    }

    /// Reset every accumulator of `scope`, keeping the metrics registered
    pub fn reset_scope(&mut self, scope: MetricScope) {
        for (_, stat) in self.population.iter_mut().filter(|(key, _)| key.scope == scope) {
            stat.reset();
        }
        for (_, stat) in self.time.iter_mut().filter(|(key, _)| key.scope == scope) {
            stat.reset();
        }
    }

    /// Drop every metric
    pub fn clear(&mut self) {
        self.population.clear();
        self.time.clear();
    }
}
