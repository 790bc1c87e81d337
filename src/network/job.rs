//! Passengers flowing through the network

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{JobFlag, JobId, JobOutcome};
use serde::{Deserialize, Serialize};

/// Flags stamped by routing decisions, used for outcome-conditioned statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFlags {
    /// Went through a check-in desk
    pub checked_baggage: bool,
    /// Sent to trace detection
    pub security_check_requested: bool,
    /// Failed trace detection
    pub security_check_failed: bool,
    /// Used the fast-track lane
    pub fast_track_used: bool,
}

impl JobFlags {
    /// Set one flag
    pub fn set(&mut self, flag: JobFlag) {
        match flag {
            JobFlag::CheckedBaggage => self.checked_baggage = true,
            JobFlag::SecurityCheckRequested => self.security_check_requested = true,
            JobFlag::SecurityCheckFailed => self.security_check_failed = true,
            JobFlag::FastTrackUsed => self.fast_track_used = true,
        }
    }

    /// Whether a flag is set
    pub fn contains(&self, flag: JobFlag) -> bool {
        match flag {
            JobFlag::CheckedBaggage => self.checked_baggage,
            JobFlag::SecurityCheckRequested => self.security_check_requested,
            JobFlag::SecurityCheckFailed => self.security_check_failed,
            JobFlag::FastTrackUsed => self.fast_track_used,
        }
    }
}

/// A simulated passenger
///
/// The visit timestamps describe the center the job is currently in and are
/// overwritten on every hop; the arrival time is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    arrival_time: f64,
    queued_at: f64,
    service_started_at: f64,
    service_ended_at: f64,
    flags: JobFlags,
    visits: u32,
}

impl Job {
    fn new(id: JobId, arrival_time: f64) -> Self {
        Self {
            id,
            arrival_time,
            queued_at: arrival_time,
            service_started_at: arrival_time,
            service_ended_at: arrival_time,
            flags: JobFlags::default(),
            visits: 0,
        }
    }

    /// Identity of the job
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Time the job entered the system
    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    /// Time the job joined the current center
    pub fn queued_at(&self) -> f64 {
        self.queued_at
    }

    /// Time service started at the current center
    pub fn service_started_at(&self) -> f64 {
        self.service_started_at
    }

    /// Time service ended at the current center
    pub fn service_ended_at(&self) -> f64 {
        self.service_ended_at
    }

    /// Routing flags collected so far
    pub fn flags(&self) -> &JobFlags {
        &self.flags
    }

    /// Stamp a routing flag
    pub fn set_flag(&mut self, flag: JobFlag) {
        self.flags.set(flag);
    }

    /// Centers entered so far
    pub fn visits(&self) -> u32 {
        self.visits
    }

    /// Whether the job has not reached any center yet
    pub fn is_first_hop(&self, now: f64) -> bool {
        self.visits == 0 && now == self.arrival_time
    }

    /// Record arrival at a center; starts a new visit
    pub fn stamp_queued(&mut self, now: f64) -> SimulationResult<()> {
        if now < self.service_ended_at {
            return Err(SimulationError::invariant_violation(format!(
                "{} queued at {} before leaving its previous center at {}",
                self.id, now, self.service_ended_at
            )));
        }
        self.queued_at = now;
        self.service_started_at = now;
        self.service_ended_at = now;
        self.visits += 1;
        Ok(())
    }

    /// Record the start of service at the current center
    pub fn stamp_service_started(&mut self, now: f64) -> SimulationResult<()> {
        if now < self.queued_at {
            return Err(SimulationError::invariant_violation(format!(
                "{} started service at {} before it queued at {}",
                self.id, now, self.queued_at
            )));
        }
        self.service_started_at = now;
        self.service_ended_at = now;
        Ok(())
    }

    /// Record the end of service at the current center
    pub fn stamp_service_ended(&mut self, now: f64) -> SimulationResult<()> {
        if now < self.service_started_at {
            return Err(SimulationError::invariant_violation(format!(
                "{} ended service at {} before it started at {}",
                self.id, now, self.service_started_at
            )));
        }
        self.service_ended_at = now;
        Ok(())
    }

    /// Waiting time at the current center
    pub fn queue_time(&self) -> f64 {
        self.service_started_at - self.queued_at
    }

    /// Service time at the current center
    pub fn service_time(&self) -> f64 {
        self.service_ended_at - self.service_started_at
    }

    /// Response time at the current center
    pub fn response_time(&self) -> f64 {
        self.service_ended_at - self.queued_at
    }

    /// Outcome of the job's trip through the checkpoint
    pub fn outcome(&self) -> JobOutcome {
        if self.flags.security_check_failed {
            JobOutcome::Failure
        } else {
            JobOutcome::Success
        }
    }
}

/// Creates jobs with monotonically increasing identities
#[derive(Debug, Clone, Default)]
pub struct JobFactory {
    next_id: u64,
}

impl JobFactory {
    /// Factory whose first job gets identity 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a job arriving at `arrival_time`
    pub fn create(&mut self, arrival_time: f64) -> Job {
        self.next_id += 1;
        Job::new(JobId(self.next_id), arrival_time)
    }

    /// Jobs created so far
    pub fn created(&self) -> u64 {
        self.next_id
    }
}
