//! Confidence intervals over independent observations
//!
//! Observations are replication means (finite horizon) or batch means (steady
//! state). Mean and standard deviation are computed in one Welford pass and the
//! half-width uses the Student-t quantile with `n - 1` degrees of freedom.

use super::distributions::student_t_quantile;
use crate::simulation::{SimulationError, SimulationResult};
use serde::{Deserialize, Serialize};

/// Confidence level used by every experiment
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Lag-1 autocorrelation above which batch means are reported as correlated
pub const AUTOCORRELATION_THRESHOLD: f64 = 0.2;

/// Confidence interval for the mean of a set of observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalEstimate {
    /// Sample mean
    pub mean: f64,
    /// Standard deviation with divisor `n`
    pub std_dev: f64,
    /// Half-width `t · std_dev / √(n - 1)`
    pub half_width: f64,
    /// Number of observations
    pub n: usize,
    /// Confidence level
    pub confidence: f64,
}

impl IntervalEstimate {
    /// Estimate the interval for `values`; `metric` names the series in errors
    pub fn from_values(metric: &str, values: &[f64], confidence: f64) -> SimulationResult<Self> {
        if values.len() <= 1 {
            return Err(SimulationError::insufficient_data(metric, values.len()));
        }
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(SimulationError::statistics_error(format!(
                "confidence level must lie in (0, 1), got {}",
                confidence
            )));
        }

        let (mut mean, mut sum) = (0.0, 0.0);
        for (i, &value) in values.iter().enumerate() {
            let n = (i + 1) as f64;
            let diff = value - mean;
            sum += diff * diff * (n - 1.0) / n;
            mean += diff / n;
        }

        let n = values.len() as f64;
        let std_dev = (sum / n).sqrt();
        let t = student_t_quantile(n - 1.0, 1.0 - (1.0 - confidence) / 2.0)?;
        let half_width = t * std_dev / (n - 1.0).sqrt();

        Ok(Self { mean, std_dev, half_width, n: values.len(), confidence })
    }

    /// Lower interval bound
    pub fn lower(&self) -> f64 {
        self.mean - self.half_width
    }

    /// Upper interval bound
    pub fn upper(&self) -> f64 {
        self.mean + self.half_width
    }

    /// Whether `value` lies inside the interval
    pub fn contains(&self, value: f64) -> bool {
        self.lower() <= value && value <= self.upper()
    }
}

/// Lag-1 autocorrelation `Σ(xᵢ - m)(xᵢ₊₁ - m) / Σ(xᵢ - m)²`
///
/// `None` for fewer than two values; a constant series has zero autocorrelation.
pub fn lag1_autocorrelation(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let denominator: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    if denominator == 0.0 {
        return Some(0.0);
    }
    let numerator: f64 = values.windows(2).map(|pair| (pair[0] - mean) * (pair[1] - mean)).sum();
    Some(numerator / denominator)
}

/// Interval estimation result for one metric, as written to the reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalEstimationRow {
    /// Metric display name
    pub metric: String,
    /// Sample mean
    pub mean: f64,
    /// Interval half-width
    pub width: f64,
    /// Smallest observation
    pub min: f64,
    /// Largest observation
    pub max: f64,
    /// Lag-1 autocorrelation of the observations (steady state only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocorrelation: Option<f64>,
    /// Number of batch means behind the row (steady state only); fewer than
    /// the requested batch count marks a metric some batches had no data for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batches: Option<usize>,
}

impl IntervalEstimationRow {
    /// Estimate one row from a series of observations
    ///
    /// A batch-means series also records its autocorrelation and length.
    pub fn from_series(
        metric: impl Into<String>,
        values: &[f64],
        confidence: f64,
        batch_means: bool,
    ) -> SimulationResult<Self> {
        let metric = metric.into();
        let estimate = IntervalEstimate::from_values(&metric, values, confidence)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (autocorrelation, batches) =
            if batch_means { (lag1_autocorrelation(values), Some(values.len())) } else { (None, None) };

        Ok(Self { metric, mean: estimate.mean, width: estimate.half_width, min, max, autocorrelation, batches })
    }

    /// Whether the series shows significant lag-1 correlation
    pub fn is_correlated(&self) -> bool {
        self.autocorrelation.map_or(false, |r| r.abs() > AUTOCORRELATION_THRESHOLD)
    }

    /// Order rows by metric name
    pub fn sort_rows(rows: &mut [Self]) {
        rows.sort_by(|a, b| a.metric.cmp(&b.metric));
    }
}
