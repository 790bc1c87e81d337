//! Enumeration types for the checkpoint simulator
//!
//! This module contains the closed sets used throughout the kernel: event
//! kinds, metric kinds, job flags and outcomes, plus the experiment-level
//! choices exposed through configuration and the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of events handled by the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A job reaches a center, or leaves the system when the event has no target
    Arrival,
    /// A job finishes service at a center
    Departure,
    /// A periodic snapshot request for a center
    Sampling,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Arrival => write!(f, "ARRIVAL"),
            EventKind::Departure => write!(f, "DEPARTURE"),
            EventKind::Sampling => write!(f, "SAMPLING"),
        }
    }
}

/// Kinds of statistics tracked per center or for the whole system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Time from arrival at a center to departure from it
    ResponseTime,
    /// Time spent waiting before service started
    QueueTime,
    /// Time spent in service
    ServiceTime,
    /// Time-weighted number of jobs in the center
    JobsInNode,
    /// Time-weighted number of jobs waiting
    JobsInQueue,
    /// Time-weighted number of busy servers
    BusyServers,
    /// Total time in system of passengers that cleared security
    SystemResponseSuccess,
    /// Total time in system of passengers that failed the security check
    SystemResponseFailure,
}

impl MetricKind {
    /// Short prefix used when rendering per-center metric names
    pub fn prefix(&self) -> &'static str {
        match self {
            MetricKind::ResponseTime => "Ts",
            MetricKind::QueueTime => "Tq",
            MetricKind::ServiceTime => "S",
            MetricKind::JobsInNode => "N",
            MetricKind::JobsInQueue => "Nq",
            MetricKind::BusyServers => "X",
            MetricKind::SystemResponseSuccess => "SystemResponseTime_Success",
            MetricKind::SystemResponseFailure => "SystemResponseTime_Failure",
        }
    }

    /// Whether the metric is a time-weighted average rather than a job average
    pub fn is_time_weighted(&self) -> bool {
        matches!(self, MetricKind::JobsInNode | MetricKind::JobsInQueue | MetricKind::BusyServers)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Values reported by a center's sampling snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SampleMetric {
    /// Jobs currently in the center
    Total,
    /// Jobs currently waiting
    Queue,
    /// Servers currently busy
    BusyServers,
    /// Mean response time observed so far at the center
    RunningResponseTime,
}

impl fmt::Display for SampleMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleMetric::Total => write!(f, "Total"),
            SampleMetric::Queue => write!(f, "Queue"),
            SampleMetric::BusyServers => write!(f, "BusyServers"),
            SampleMetric::RunningResponseTime => write!(f, "RunningResponseTime"),
        }
    }
}

/// Flags a routing decision can stamp on a passenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobFlag {
    /// Passenger went through a check-in desk to drop baggage
    CheckedBaggage,
    /// Passenger was sent to trace detection after X-ray
    SecurityCheckRequested,
    /// Passenger failed the trace detection check
    SecurityCheckFailed,
    /// Passenger used the fast-track lane
    FastTrackUsed,
}

/// Outcome of a passenger's visit to the checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobOutcome {
    /// Passenger cleared security
    Success,
    /// Passenger was stopped at the security check
    Failure,
}

impl JobOutcome {
    /// System metric that records the response time of this outcome
    pub fn metric(&self) -> MetricKind {
        match self {
            JobOutcome::Success => MetricKind::SystemResponseSuccess,
            JobOutcome::Failure => MetricKind::SystemResponseFailure,
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Success => write!(f, "success"),
            JobOutcome::Failure => write!(f, "failed"),
        }
    }
}

/// Output formats for report files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// JSON format for structured data
    Json,
    /// CSV format for tabular data
    Csv,
}

impl OutputFormat {
    /// File extension used for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Experiments the binary can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperimentKind {
    /// Independent replications of one working day
    FiniteHorizon,
    /// One long run analysed with batch means
    SteadyState,
    /// Steady-state run with exponential services checked against queueing formulas
    Verification,
    /// Short, densely sampled replications for inspecting the warmup period
    Transient,
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentKind::FiniteHorizon => write!(f, "finite-horizon"),
            ExperimentKind::SteadyState => write!(f, "steady-state"),
            ExperimentKind::Verification => write!(f, "verification"),
            ExperimentKind::Transient => write!(f, "transient"),
        }
    }
}

impl FromStr for ExperimentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "finite-horizon" | "finite" | "finitehorizon" => Ok(ExperimentKind::FiniteHorizon),
            "steady-state" | "steady" | "steadystate" => Ok(ExperimentKind::SteadyState),
            "verification" | "verify" => Ok(ExperimentKind::Verification),
            "transient" => Ok(ExperimentKind::Transient),
            _ => Err(format!("Unknown experiment: {}", s)),
        }
    }
}

/// Network layouts available from the topology builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyVariant {
    /// Check-in, e-gates, X-ray, trace detection and recovery
    Baseline,
    /// Baseline plus a fast-track lane after the e-gates
    Improved,
}

impl fmt::Display for TopologyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyVariant::Baseline => write!(f, "baseline"),
            TopologyVariant::Improved => write!(f, "improved"),
        }
    }
}

impl FromStr for TopologyVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" | "base" => Ok(TopologyVariant::Baseline),
            "improved" => Ok(TopologyVariant::Improved),
            _ => Err(format!("Unknown topology: {}", s)),
        }
    }
}

/// Sub-queue selection rule for multi-queue centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowPolicyKind {
    /// Cycle through sub-queues in index order
    RoundRobin,
    /// Join the sub-queue holding the fewest jobs
    ShortestQueue,
}

impl fmt::Display for FlowPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowPolicyKind::RoundRobin => write!(f, "round-robin"),
            FlowPolicyKind::ShortestQueue => write!(f, "shortest-queue"),
        }
    }
}

impl FromStr for FlowPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "round-robin" | "roundrobin" | "rr" => Ok(FlowPolicyKind::RoundRobin),
            "shortest-queue" | "shortestqueue" | "sqf" => Ok(FlowPolicyKind::ShortestQueue),
            _ => Err(format!("Unknown flow policy: {}", s)),
        }
    }
}
