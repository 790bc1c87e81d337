//! Routing points: where a job goes after leaving a center
//!
//! Routing points are pure decisions over `(stream, job)`; they hold no state
//! that changes during a run and are shared between centers through `Arc`.

use super::Job;
use crate::random::RandomStreams;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{CenterId, JobFlag, StreamId};

/// Destination chosen by a routing point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Continue to another center
    Next(CenterId),
    /// Leave the network
    Exit,
}

/// One outcome of a probabilistic routing point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    /// Probability of taking this branch (ignored for the fallback branch)
    pub probability: f64,
    /// Where the branch leads
    pub route: Route,
    /// Flag stamped on jobs taking this branch
    pub stamp: Option<JobFlag>,
}

impl Branch {
    /// Branch taken with `probability`
    pub fn new(probability: f64, route: Route) -> Self {
        Self { probability, route, stamp: None }
    }

    /// Fallback branch, taken when no other branch matches
    pub fn otherwise(route: Route) -> Self {
        Self { probability: 0.0, route, stamp: None }
    }

    /// Stamp a flag on jobs taking this branch
    pub fn stamping(mut self, flag: JobFlag) -> Self {
        self.stamp = Some(flag);
        self
    }
}

/// Decision logic selecting a job's next center or its exit
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingPoint {
    /// Always the same destination; draws no random numbers
    Fixed(Route),
    /// One uniform draw from `stream` selects the first branch whose cumulative
    /// probability exceeds it, or `otherwise` when none does
    Split {
        /// Stream dedicated to this routing point
        stream: StreamId,
        /// Probabilistic branches, in evaluation order
        branches: Vec<Branch>,
        /// Fallback branch
        otherwise: Branch,
    },
}

impl RoutingPoint {
    /// Fixed routing to a center
    pub fn to(center: CenterId) -> Self {
        Self::Fixed(Route::Next(center))
    }

    /// Fixed routing out of the network
    pub fn exit() -> Self {
        Self::Fixed(Route::Exit)
    }

    /// Probabilistic split; branch probabilities must be in `[0, 1]` and sum to at most 1
    pub fn split(stream: StreamId, branches: Vec<Branch>, otherwise: Branch) -> SimulationResult<Self> {
        let mut total = 0.0;
        for branch in &branches {
            if !(0.0..=1.0).contains(&branch.probability) {
                return Err(SimulationError::configuration_error(format!(
                    "branch probability {} is outside [0, 1]",
                    branch.probability
                )));
            }
            total += branch.probability;
        }
        if total > 1.0 + 1e-12 {
            return Err(SimulationError::configuration_error(format!(
                "branch probabilities sum to {}, more than 1",
                total
            )));
        }
        Ok(Self::Split { stream, branches, otherwise })
    }

    /// Two-way split: `taken` with probability `p`, `otherwise` with `1 - p`
    pub fn binary(stream: StreamId, p: f64, taken: Branch, otherwise: Branch) -> SimulationResult<Self> {
        Self::split(stream, vec![Branch { probability: p, ..taken }], otherwise)
    }

    /// Choose the next destination of `job`, stamping the chosen branch's flag
    pub fn route(&self, streams: &mut RandomStreams, job: &mut Job) -> Route {
        match self {
            RoutingPoint::Fixed(route) => *route,
            RoutingPoint::Split { stream, branches, otherwise } => {
                let draw = streams.uniform(*stream);
                let mut cumulative = 0.0;
                let chosen = branches
                    .iter()
                    .find(|branch| {
                        cumulative += branch.probability;
                        draw < cumulative
                    })
                    .unwrap_or(otherwise);
                if let Some(flag) = chosen.stamp {
                    job.set_flag(flag);
                }
                chosen.route
            }
        }
    }

    /// Every destination this routing point can produce
    pub fn destinations(&self) -> Vec<Route> {
        match self {
            RoutingPoint::Fixed(route) => vec![*route],
            RoutingPoint::Split { branches, otherwise, .. } => branches
                .iter()
                .map(|branch| branch.route)
                .chain(std::iter::once(otherwise.route))
                .collect(),
        }
    }
}
