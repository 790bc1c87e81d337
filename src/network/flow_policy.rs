//! Sub-queue selection for multi-queue centers

use super::Job;
use crate::random::RandomStreams;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{FlowPolicyKind, StreamId};
use std::collections::VecDeque;

/// One single-server lane of a multi-queue center
#[derive(Debug, Clone, Default)]
pub struct FlowState {
    pub(crate) busy: bool,
    pub(crate) queue: VecDeque<Job>,
}

impl FlowState {
    /// Idle lane with an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the lane's server is busy
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Jobs waiting in the lane
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Jobs in the lane, waiting or in service
    pub fn jobs(&self) -> usize {
        self.queue.len() + usize::from(self.busy)
    }

    /// Identities of the waiting jobs, head first
    pub fn queued_ids(&self) -> Vec<crate::types::JobId> {
        self.queue.iter().map(Job::id).collect()
    }
}

/// Rule choosing the lane an arriving job joins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowAssignmentPolicy {
    /// Cycle through lanes in index order, independent of their state
    RoundRobin {
        /// Lane the next job will join
        next: usize,
    },
    /// Join the lane holding the fewest jobs; ties go to the lowest index
    /// unless a tie-break stream is given, in which case a tied lane is drawn
    ShortestQueue {
        /// Stream used only for breaking ties
        tie_break: Option<StreamId>,
    },
}

impl FlowAssignmentPolicy {
    /// Round-robin starting at lane 0
    pub fn round_robin() -> Self {
        Self::RoundRobin { next: 0 }
    }

    /// Shortest-queue-first
    pub fn shortest_queue(tie_break: Option<StreamId>) -> Self {
        Self::ShortestQueue { tie_break }
    }

    /// Policy of the given kind
    pub fn from_kind(kind: FlowPolicyKind, tie_break: Option<StreamId>) -> Self {
        match kind {
            FlowPolicyKind::RoundRobin => Self::round_robin(),
            FlowPolicyKind::ShortestQueue => Self::shortest_queue(tie_break),
        }
    }

    /// Kind of this policy
    pub fn kind(&self) -> FlowPolicyKind {
        match self {
            Self::RoundRobin { .. } => FlowPolicyKind::RoundRobin,
            Self::ShortestQueue { .. } => FlowPolicyKind::ShortestQueue,
        }
    }

    /// Index of the lane the next job joins
    pub fn assign_flow(&mut self, flows: &[FlowState], streams: &mut RandomStreams) -> SimulationResult<usize> {
        if flows.is_empty() {
            return Err(SimulationError::invariant_violation("no lane to assign a job to"));
        }
        let chosen = match self {
            Self::RoundRobin { next } => {
                let chosen = *next % flows.len();
                *next = (chosen + 1) % flows.len();
                chosen
            }
            Self::ShortestQueue { tie_break } => {
                let fewest = flows.iter().map(FlowState::jobs).min().unwrap_or(0);
                let tied: Vec<usize> = flows
                    .iter()
                    .enumerate()
                    .filter(|(_, flow)| flow.jobs() == fewest)
                    .map(|(index, _)| index)
                    .collect();
                match (tie_break, tied.len()) {
                    (Some(stream), n) if n > 1 => {
                        let pick = (streams.uniform(*stream) * n as f64) as usize;
                        tied[pick.min(n - 1)]
                    }
                    _ => tied.first().copied().unwrap_or(0),
                }
            }
        };
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::JobFactory;

    fn lanes(loads: &[(bool, usize)]) -> Vec<FlowState> {
        let mut factory = JobFactory::new();
        loads
            .iter()
            .map(|&(busy, queued)| FlowState {
                busy,
                queue: (0..queued).map(|_| factory.create(0.0)).collect(),
            })
            .collect()
    }

    #[test]
    fn test_round_robin_cycles() {
        let flows = lanes(&[(true, 3), (false, 0), (false, 0)]);
        let mut policy = FlowAssignmentPolicy::round_robin();
        let mut streams = RandomStreams::new(0);

        let picks: Vec<usize> = (0..7).map(|_| policy.assign_flow(&flows, &mut streams).unwrap()).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(streams.active_streams(), 0);
    }

    #[test]
    fn test_shortest_queue_lowest_index_on_tie() {
        let flows = lanes(&[(true, 1), (true, 0), (false, 0), (false, 0)]);
        let mut policy = FlowAssignmentPolicy::shortest_queue(None);
        let mut streams = RandomStreams::new(0);

        assert_eq!(policy.assign_flow(&flows, &mut streams).unwrap(), 2);
    }

    #[test]
    fn test_shortest_queue_counts_busy_server() {
        let flows = lanes(&[(true, 0), (false, 1)]);
        let mut policy = FlowAssignmentPolicy::shortest_queue(None);
        let mut streams = RandomStreams::new(0);

        // Both lanes hold one job: lowest index wins
        assert_eq!(policy.assign_flow(&flows, &mut streams).unwrap(), 0);
    }

    #[test]
    fn test_tie_break_stream_only_picks_among_tied() {
        let flows = lanes(&[(true, 2), (false, 0), (true, 0), (false, 0)]);
        let mut policy = FlowAssignmentPolicy::shortest_queue(Some(StreamId(9)));
        let mut streams = RandomStreams::new(17);

        let mut seen = [false; 4];
        for _ in 0..200 {
            let pick = policy.assign_flow(&flows, &mut streams).unwrap();
            assert!(pick == 1 || pick == 3);
            seen[pick] = true;
        }
        assert!(seen[1] && seen[3]);
    }

    #[test]
    fn test_empty_lane_set_is_an_error() {
        let mut streams = RandomStreams::new(0);
        for mut policy in [FlowAssignmentPolicy::round_robin(), FlowAssignmentPolicy::shortest_queue(Some(StreamId(3)))] {
            assert!(policy.assign_flow(&[], &mut streams).is_err());
        }
    }
}
