//! Closed-form queueing results used to verify simulated centers
//!
//! Each center discipline maps onto a textbook model under Poisson arrivals
//! and exponential service: M/M/1, M/M/k (Erlang-C), k independent M/M/1
//! queues, or M/M/∞. An unstable configuration (ρ ≥ 1) is not an error; it is
//! reported through [`AnalyticalMetrics::stable`] with infinite waiting times.

use crate::network::CenterKind;
use crate::stats::IntervalEstimationRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serde adapter writing non-finite measures as `"unstable"` instead of `null`
mod unbounded {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const MARKER: &str = "unstable";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Value(f64),
        Marker(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(MARKER)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Value(value) => Ok(value),
            Repr::Marker(marker) if marker == MARKER => Ok(f64::INFINITY),
            Repr::Marker(other) => Err(D::Error::custom(format!(
                "expected a number or \"{}\", got \"{}\"",
                MARKER, other
            ))),
        }
    }
}

/// Analytical model matching a center discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueModel {
    /// One server
    MM1,
    /// `k` servers sharing a queue
    MMk(usize),
    /// `k` single-server queues, each receiving `λ / k`
    IndependentMM1(usize),
    /// Unlimited servers
    MMInfinity,
}

/// Steady-state measures of a queue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticalMetrics {
    /// Per-server utilization ρ
    pub utilization: f64,
    /// Probability an arrival has to wait
    pub wait_probability: f64,
    /// Mean waiting time E[Tq]
    #[serde(with = "unbounded")]
    pub queue_time: f64,
    /// Mean response time E[Ts]
    #[serde(with = "unbounded")]
    pub response_time: f64,
    /// Mean number of jobs in the node (Little's law)
    #[serde(with = "unbounded")]
    pub jobs_in_node: f64,
    /// Whether ρ < 1
    pub stable: bool,
}

impl AnalyticalMetrics {
    fn unstable(utilization: f64) -> Self {
        Self {
            utilization,
            wait_probability: 1.0,
            queue_time: f64::INFINITY,
            response_time: f64::INFINITY,
            jobs_in_node: f64::INFINITY,
            stable: false,
        }
    }
}

impl QueueModel {
    /// Model for a center of `kind` with `servers` servers
    pub fn for_center(kind: CenterKind, servers: usize) -> Self {
        match kind {
            CenterKind::InfiniteServer => QueueModel::MMInfinity,
            CenterKind::SingleServerSingleQueue => QueueModel::MM1,
            CenterKind::MultiServerSingleQueue if servers == 1 => QueueModel::MM1,
            CenterKind::MultiServerSingleQueue => QueueModel::MMk(servers),
            CenterKind::MultiServerMultiQueue { .. } => QueueModel::IndependentMM1(servers),
        }
    }

    /// Measures for arrival rate `lambda` and mean service time `mean_service`
    pub fn evaluate(&self, lambda: f64, mean_service: f64) -> AnalyticalMetrics {
        let mu = 1.0 / mean_service;
        match *self {
            QueueModel::MM1 => mm1(lambda, mu),
            QueueModel::MMk(servers) => mmk(lambda, mu, servers),
            QueueModel::IndependentMM1(lanes) => mm1(lambda / lanes.max(1) as f64, mu),
            QueueModel::MMInfinity => AnalyticalMetrics {
                utilization: 0.0,
                wait_probability: 0.0,
                queue_time: 0.0,
                response_time: mean_service,
                jobs_in_node: lambda * mean_service,
                stable: true,
            },
        }
    }
}

impl fmt::Display for QueueModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueModel::MM1 => write!(f, "M/M/1"),
            QueueModel::MMk(k) => write!(f, "M/M/{}", k),
            QueueModel::IndependentMM1(k) => write!(f, "{}xM/M/1", k),
            QueueModel::MMInfinity => write!(f, "M/M/inf"),
        }
    }
}

/// Single-server queue
pub fn mm1(lambda: f64, mu: f64) -> AnalyticalMetrics {
    let rho = lambda / mu;
    if rho >= 1.0 {
        return AnalyticalMetrics::unstable(rho);
    }
    let response_time = 1.0 / (mu - lambda);
    AnalyticalMetrics {
        utilization: rho,
        wait_probability: rho,
        queue_time: response_time - 1.0 / mu,
        response_time,
        jobs_in_node: lambda * response_time,
        stable: true,
    }
}

/// Probability of waiting in an M/M/k queue with offered load `a = λ/μ`
///
/// The series is built term by term so large `k` never overflows a factorial.
pub fn erlang_c(servers: usize, offered_load: f64) -> f64 {
    let k = servers as f64;
    let rho = offered_load / k;
    if rho >= 1.0 {
        return 1.0;
    }
    let mut term = 1.0;
    let mut partial = 0.0;
    for n in 0..servers {
        partial += term;
        term *= offered_load / (n + 1) as f64;
    }
    // term is now a^k / k!
    let tail = term / (1.0 - rho);
    tail / (partial + tail)
}

/// Multi-server queue with a shared FIFO queue
pub fn mmk(lambda: f64, mu: f64, servers: usize) -> AnalyticalMetrics {
    let k = servers as f64;
    let rho = lambda / (k * mu);
    if rho >= 1.0 {
        return AnalyticalMetrics::unstable(rho);
    }
    let wait_probability = erlang_c(servers, lambda / mu);
    let queue_time = wait_probability / (k * mu - lambda);
    let response_time = queue_time + 1.0 / mu;
    AnalyticalMetrics {
        utilization: rho,
        wait_probability,
        queue_time,
        response_time,
        jobs_in_node: lambda * response_time,
        stable: true,
    }
}

/// Simulated interval of one center metric set against its analytical value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRow {
    /// Center name
    pub center: String,
    /// Metric display name, e.g. `Ts_XRay`
    pub metric: String,
    /// Analytical model used
    pub model: String,
    /// Mean of the batch means
    pub sim_mean: f64,
    /// Smallest batch mean
    pub sim_min: f64,
    /// Largest batch mean
    pub sim_max: f64,
    /// Confidence half-width
    pub sim_width: f64,
    /// Analytical value; infinite when the model is unstable
    #[serde(with = "unbounded")]
    pub theo_value: f64,
    /// Whether the analytical value lies inside the interval
    pub within_interval: bool,
    /// `|sim - theo| / theo`, absent when the model is unstable
    pub relative_error: Option<f64>,
    /// Whether ρ < 1
    pub stable: bool,
}

impl VerificationRow {
    /// Compare a simulated response-time interval with `metrics`
    pub fn compare(
        center: impl Into<String>,
        model: QueueModel,
        interval: &IntervalEstimationRow,
        metrics: &AnalyticalMetrics,
    ) -> Self {
        let theo = metrics.response_time;
        let (within_interval, relative_error) = if metrics.stable {
            let within = (interval.mean - theo).abs() <= interval.width;
            let error = if theo > 0.0 { Some((interval.mean - theo).abs() / theo) } else { None };
            (within, error)
        } else {
            (false, None)
        };

        Self {
            center: center.into(),
            metric: interval.metric.clone(),
            model: model.to_string(),
            sim_mean: interval.mean,
            sim_min: interval.min,
            sim_max: interval.max,
            sim_width: interval.width,
            theo_value: theo,
            within_interval,
            relative_error,
            stable: metrics.stable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlowPolicyKind;

    #[test]
    fn test_mm1() {
        let metrics = mm1(0.5, 1.0);
        assert!((metrics.response_time - 2.0).abs() < 1e-12);
        assert!((metrics.queue_time - 1.0).abs() < 1e-12);
        assert!((metrics.jobs_in_node - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mmk_reduces_to_mm1() {
        let single = mmk(0.7, 1.0, 1);
        let reference = mm1(0.7, 1.0);
        assert!((single.response_time - reference.response_time).abs() < 1e-12);
        assert!((single.wait_probability - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_erlang_c_two_servers() {
        // k = 2, a = 1: Pq = 1/3, E[Tq] = Pq / (kμ - λ) = 1/3
        assert!((erlang_c(2, 1.0) - 1.0 / 3.0).abs() < 1e-12);
        let metrics = mmk(1.0, 1.0, 2);
        assert!((metrics.queue_time - 1.0 / 3.0).abs() < 1e-12);
        assert!((metrics.response_time - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_erlang_c_many_servers_stays_finite() {
        let probability = erlang_c(200, 180.0);
        assert!(probability.is_finite());
        assert!(probability > 0.0 && probability < 1.0);
    }

    #[test]
    fn test_unstable_is_flagged() {
        let metrics = mmk(3.0, 1.0, 2);
        assert!(!metrics.stable);
        assert!(metrics.response_time.is_infinite());
        assert!(!mm1(2.0, 1.0).stable);
    }

    #[test]
    fn test_unstable_row_json_carries_marker() {
        let metrics = mm1(2.0, 1.0);
        let row = VerificationRow::compare("EGates", QueueModel::MM1, &interval(30.0, 2.0), &metrics);

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"theo_value\":\"unstable\""), "{}", json);
        assert!(json.contains("\"stable\":false"), "{}", json);

        let back: VerificationRow = serde_json::from_str(&json).unwrap();
        assert!(back.theo_value.is_infinite());
        assert_eq!(back, row);
        assert!(serde_json::from_str::<VerificationRow>(&json.replace("\"unstable\"", "\"bogus\"")).is_err());

        let metrics_json = serde_json::to_string(&metrics).unwrap();
        let restored: AnalyticalMetrics = serde_json::from_str(&metrics_json).unwrap();
        assert!(!restored.stable);
        assert!(restored.response_time.is_infinite());
    }

    #[test]
    fn test_stable_row_json_keeps_number() {
        let metrics = mm1(0.5, 1.0);
        let row = VerificationRow::compare("EGates", QueueModel::MM1, &interval(2.1, 0.2), &metrics);
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"theo_value\":2.0"), "{}", json);
        assert!(json.contains("\"stable\":true"));
        assert_eq!(serde_json::from_str::<VerificationRow>(&json).unwrap(), row);
    }

    #[test]
    fn test_models_for_center_kinds() {
        assert_eq!(QueueModel::for_center(CenterKind::InfiniteServer, 0), QueueModel::MMInfinity);
        assert_eq!(QueueModel::for_center(CenterKind::MultiServerSingleQueue, 4), QueueModel::MMk(4));
        let lanes = CenterKind::MultiServerMultiQueue { policy: FlowPolicyKind::RoundRobin, tie_break: None };
        assert_eq!(QueueModel::for_center(lanes, 8), QueueModel::IndependentMM1(8));
        assert_eq!(QueueModel::IndependentMM1(8).to_string(), "8xM/M/1");

        let infinite = QueueModel::MMInfinity.evaluate(2.0, 180.0);
        assert_eq!(infinite.response_time, 180.0);
        let lanes = QueueModel::IndependentMM1(2).evaluate(1.0, 1.0);
        assert!((lanes.response_time - 2.0).abs() < 1e-12);
    }

    fn interval(mean: f64, width: f64) -> IntervalEstimationRow {
        IntervalEstimationRow {
            metric: "Ts_EGates".to_string(),
            mean,
            width,
            min: mean - 1.0,
            max: mean + 1.0,
            autocorrelation: Some(0.05),
            batches: Some(64),
        }
    }

    #[test]
    fn test_verification_row_inside_interval() {
        let metrics = mm1(0.5, 1.0);
        let row = VerificationRow::compare("EGates", QueueModel::MM1, &interval(2.1, 0.2), &metrics);
        assert!(row.within_interval);
        assert!(row.stable);
        assert!((row.relative_error.unwrap() - 0.05).abs() < 1e-9);
        assert_eq!(row.model, "M/M/1");
    }

    #[test]
    fn test_verification_row_outside_interval_and_unstable() {
        let row = VerificationRow::compare("EGates", QueueModel::MM1, &interval(2.5, 0.2), &mm1(0.5, 1.0));
        assert!(!row.within_interval);

        let unstable = VerificationRow::compare("EGates", QueueModel::MM1, &interval(50.0, 5.0), &mm1(2.0, 1.0));
        assert!(!unstable.stable);
        assert!(!unstable.within_interval);
        assert!(unstable.relative_error.is_none());
    }
}
