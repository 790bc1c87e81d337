//! Service-time and inter-arrival variates
//!
//! Generators are validated when built, so sampling itself cannot fail.

use super::RandomStreams;
use crate::simulation::{SimulationError, SimulationResult};
use crate::stats::{normal_cdf, normal_quantile};
use crate::types::{StationConfig, StreamId};
use rand::Rng;
use rand_distr::{Distribution, Exp};

/// A univariate distribution of non-negative durations
#[derive(Debug, Clone, Copy)]
pub enum RandomVariateGenerator {
    /// Exponential with the given mean
    Exponential {
        /// Mean of the distribution
        mean: f64,
        /// Distribution object with rate `1 / mean`
        dist: Exp<f64>,
    },
    /// Normal distribution conditioned on `[lower, upper]`, sampled by
    /// inversion with exactly one uniform per draw
    TruncatedNormal {
        /// Mean of the untruncated normal
        mean: f64,
        /// Standard deviation of the untruncated normal
        std_dev: f64,
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
        /// Standard normal CDF at the standardized lower bound
        cdf_lower: f64,
        /// Standard normal CDF at the standardized upper bound
        cdf_upper: f64,
    },
    /// Always the same value
    Deterministic {
        /// The value returned by every draw
        value: f64,
    },
}

impl RandomVariateGenerator {
    /// Exponential distribution with the given mean
    pub fn exponential(mean: f64) -> SimulationResult<Self> {
        if !(mean > 0.0) || !mean.is_finite() {
            return Err(SimulationError::configuration_error(format!(
                "exponential mean must be positive, got {}",
                mean
            )));
        }
        let dist = Exp::new(1.0 / mean)
            .map_err(|e| SimulationError::configuration_error(format!("exponential: {}", e)))?;
        Ok(Self::Exponential { mean, dist })
    }

    /// Normal distribution truncated to `[lower, upper]`
    pub fn truncated_normal(mean: f64, std_dev: f64, lower: f64, upper: f64) -> SimulationResult<Self> {
        if !(lower < upper) || lower < 0.0 {
            return Err(SimulationError::configuration_error(format!(
                "truncated normal needs 0 <= lower < upper, got [{}, {}]",
                lower, upper
            )));
        }
        if !(lower..=upper).contains(&mean) {
            return Err(SimulationError::configuration_error(format!(
                "truncated normal mean {} lies outside [{}, {}]",
                mean, lower, upper
            )));
        }
        if !(std_dev >= 0.0) || !std_dev.is_finite() {
            return Err(SimulationError::configuration_error(format!(
                "truncated normal standard deviation must be finite and non-negative, got {}",
                std_dev
            )));
        }
        let (cdf_lower, cdf_upper) = if std_dev > 0.0 {
            (normal_cdf((lower - mean) / std_dev), normal_cdf((upper - mean) / std_dev))
        } else {
            (0.5, 0.5)
        };
        Ok(Self::TruncatedNormal { mean, std_dev, lower, upper, cdf_lower, cdf_upper })
    }

    /// Constant duration
    pub fn deterministic(value: f64) -> SimulationResult<Self> {
        if !(value >= 0.0) || !value.is_finite() {
            return Err(SimulationError::configuration_error(format!(
                "deterministic value must be non-negative, got {}",
                value
            )));
        }
        Ok(Self::Deterministic { value })
    }

    /// Generator for a station: truncated normal, or exponential of the same mean
    pub fn for_station(station: &StationConfig, exponential: bool) -> SimulationResult<Self> {
        if exponential {
            Self::exponential(station.mean)
        } else {
            Self::truncated_normal(station.mean, station.std_dev, station.lower, station.upper)
        }
    }

    /// Nominal mean (the parent mean for the truncated normal)
    pub fn mean(&self) -> f64 {
        match self {
            Self::Exponential { mean, .. } => *mean,
            Self::TruncatedNormal { mean, .. } => *mean,
            Self::Deterministic { value } => *value,
        }
    }

    /// Draw one value
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Exponential { dist, .. } => dist.sample(rng),
            Self::TruncatedNormal { mean, std_dev, lower, upper, cdf_lower, cdf_upper } => {
                let u: f64 = rng.gen();
                if *std_dev == 0.0 {
                    return *mean;
                }
                let p = cdf_lower + u * (cdf_upper - cdf_lower);
                (mean + std_dev * normal_quantile(p)).clamp(*lower, *upper)
            }
            Self::Deterministic { value } => *value,
        }
    }
}

/// A service-time generator bound to the stream dedicated to one center
#[derive(Debug, Clone, Copy)]
pub struct ServiceProcess {
    generator: RandomVariateGenerator,
    stream: StreamId,
}

impl ServiceProcess {
    /// Bind a generator to a stream
    pub fn new(generator: RandomVariateGenerator, stream: StreamId) -> Self {
        Self { generator, stream }
    }

    /// Draw the next service time
    pub fn sample(&self, streams: &mut RandomStreams) -> f64 {
        self.generator.sample(streams.stream(self.stream))
    }

    /// Mean service time
    pub fn mean(&self) -> f64 {
        self.generator.mean()
    }

    /// Stream the process draws from
    pub fn stream(&self) -> StreamId {
        self.stream
    }
}

/// Exogenous arrival process producing cumulative arrival times
#[derive(Debug, Clone, Copy)]
pub struct ArrivalProcess {
    generator: RandomVariateGenerator,
    stream: StreamId,
    last_arrival: f64,
}

impl ArrivalProcess {
    /// Arrival process whose inter-arrival times follow `generator`
    pub fn new(generator: RandomVariateGenerator, stream: StreamId) -> Self {
        Self { generator, stream, last_arrival: 0.0 }
    }

    /// Poisson arrivals with the given mean inter-arrival time
    pub fn poisson(mean_interarrival: f64, stream: StreamId) -> SimulationResult<Self> {
        Ok(Self::new(RandomVariateGenerator::exponential(mean_interarrival)?, stream))
    }

    /// Time of the next arrival
    pub fn next_arrival(&mut self, streams: &mut RandomStreams) -> f64 {
        self.last_arrival += self.generator.sample(streams.stream(self.stream));
        self.last_arrival
    }

    /// Time of the most recent arrival
    pub fn last_arrival(&self) -> f64 {
        self.last_arrival
    }

    /// Arrival rate in jobs per unit time
    pub fn rate(&self) -> f64 {
        1.0 / self.generator.mean()
    }
}
