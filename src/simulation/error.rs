//! Error types and handling
//!
//! This module contains the error taxonomy of the simulation kernel. Kernel
//! invariant violations abort a run; statistical conditions are returned to the
//! caller, which decides whether to extend the run or report the metric as
//! not estimable.

use thiserror::Error;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration or wiring problem (e.g. sampling without a sampler)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An event reached a handler it cannot be processed by
    #[error("Event protocol error: {0}")]
    ProtocolError(String),

    /// A kernel invariant no longer holds
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// The event clock has nothing left to pop
    #[error("Event queue is empty")]
    EmptyEventQueue,

    /// An event was scheduled at an invalid time
    #[error("Scheduling error: {0}")]
    SchedulingError(String),

    /// Interval estimation was requested with too few observations
    #[error("Insufficient data for {metric}: {observations} observation(s), at least 2 required")]
    InsufficientData {
        /// Metric the estimate was requested for
        metric: String,
        /// Observations available
        observations: usize,
    },

    /// Statistics error
    #[error("Statistics error: {0}")]
    StatisticsError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create an event protocol error
    pub fn protocol_error(msg: impl Into<String>) -> Self {
        Self::ProtocolError(msg.into())
    }

    /// Create an invariant violation
    pub fn invariant_violation(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Create a scheduling error
    pub fn scheduling_error(msg: impl Into<String>) -> Self {
        Self::SchedulingError(msg.into())
    }

    /// Create an insufficient-data error
    pub fn insufficient_data(metric: impl Into<String>, observations: usize) -> Self {
        Self::InsufficientData { metric: metric.into(), observations }
    }

    /// Create a statistics error
    pub fn statistics_error(msg: impl Into<String>) -> Self {
        Self::StatisticsError(msg.into())
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::ConfigurationError(_) => false,
            SimulationError::ProtocolError(_) => false,
            SimulationError::InvariantViolation(_) => false,
            SimulationError::EmptyEventQueue => false,
            SimulationError::SchedulingError(_) => false,
            SimulationError::InsufficientData { .. } => true,
            SimulationError::StatisticsError(_) => true,
            SimulationError::IoError(_) => true,
            SimulationError::SerializationError(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::ProtocolError(_) => "Protocol",
            SimulationError::InvariantViolation(_) => "Invariant",
            SimulationError::EmptyEventQueue => "Event Clock",
            SimulationError::SchedulingError(_) => "Event Clock",
            SimulationError::InsufficientData { .. } => "Statistics",
            SimulationError::StatisticsError(_) => "Statistics",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
