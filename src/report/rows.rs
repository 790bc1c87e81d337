//! Flat field views of the report rows

use crate::analysis::VerificationRow;
use crate::stats::{BatchMeanRow, IntervalEstimationRow, SampleRow};

/// A row that can be rendered as one CSV record
///
/// Field names of the first row become the header, so every row of a file
/// must list the same fields in the same order.
pub trait ReportRow {
    /// Ordered `(column, value)` pairs
    fn fields(&self) -> Vec<(&'static str, String)>;
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportRow for IntervalEstimationRow {
    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("metric", self.metric.clone()),
            ("mean", self.mean.to_string()),
            ("width", self.width.to_string()),
            ("min", self.min.to_string()),
            ("max", self.max.to_string()),
        ];
        if self.autocorrelation.is_some() || self.batches.is_some() {
            fields.push(("autocorrelation", optional(self.autocorrelation)));
        }
        if let Some(batches) = self.batches {
            fields.push(("batches", batches.to_string()));
        }
        fields
    }
}

impl ReportRow for SampleRow {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timestamp", self.timestamp.to_string()),
            ("node", self.node.clone()),
            ("metric", self.metric.clone()),
            ("value", self.value.to_string()),
        ]
    }
}

impl ReportRow for BatchMeanRow {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("metric", self.metric.clone()),
            ("batch", self.batch.to_string()),
            ("mean", self.mean.to_string()),
        ]
    }
}

impl ReportRow for VerificationRow {
    fn fields(&self) -> Vec<(&'static str, String)> {
        let theo = if self.stable { self.theo_value.to_string() } else { "unstable".to_string() };
        vec![
            ("Center", self.center.clone()),
            ("Metric", self.metric.clone()),
            ("Model", self.model.clone()),
            ("SimMean", self.sim_mean.to_string()),
            ("SimMin", self.sim_min.to_string()),
            ("SimMax", self.sim_max.to_string()),
            ("SimWidth", self.sim_width.to_string()),
            ("TheoValue", theo),
            ("WithinInterval", self.within_interval.to_string()),
            ("RelativeError", optional(self.relative_error)),
            ("Stable", self.stable.to_string()),
        ]
    }
}
