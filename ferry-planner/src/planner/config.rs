//! Planner configuration.

use chrono::Duration;

use crate::domain::ScheduleRules;

use super::rank::DedupPolicy;

/// Longest check-in or disembark buffer accepted, in minutes.
pub const MAX_BUFFER_MINUTES: i64 = 24 * 60;

/// Configuration that cannot produce a sensible schedule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A port buffer is negative or longer than a day
    #[error("{name} of {minutes} minutes must be between 0 and 1440")]
    InvalidBuffer { name: &'static str, minutes: i64 },
}

/// Configuration parameters for trip evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Maximum number of itineraries the assembler may generate.
    /// Evaluations that would exceed this fail instead.
    pub max_itineraries: usize,

    /// Maximum number of itineraries to return.
    pub max_results: usize,

    /// How long before sailing the car must be at the port (minutes).
    pub check_in_mins: i64,

    /// How long after arrival before the car is off the ferry (minutes).
    pub disembark_mins: i64,

    /// Drop itineraries whose drives don't fit their windows.
    pub feasible_only: bool,

    /// Which itineraries count as duplicates of each other.
    pub dedup: DedupPolicy,
}

impl PlannerConfig {
    /// Check that the port buffers are usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBuffer` for a negative buffer or one over a day.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, minutes) in [
            ("check_in_mins", self.check_in_mins),
            ("disembark_mins", self.disembark_mins),
        ] {
            if !(0..=MAX_BUFFER_MINUTES).contains(&minutes) {
                return Err(ConfigError::InvalidBuffer { name, minutes });
            }
        }
        Ok(())
    }

    /// Returns the check-in buffer as a Duration, clamped to the valid range.
    pub fn check_in(&self) -> Duration {
        Duration::minutes(self.check_in_mins.clamp(0, MAX_BUFFER_MINUTES))
    }

    /// Returns the disembark buffer as a Duration, clamped to the valid range.
    pub fn disembark(&self) -> Duration {
        Duration::minutes(self.disembark_mins.clamp(0, MAX_BUFFER_MINUTES))
    }

    /// Returns the scheduling buffers used when building itineraries.
    pub fn schedule_rules(&self) -> ScheduleRules {
        ScheduleRules {
            check_in: self.check_in(),
            disembark: self.disembark(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_itineraries: 10_000,
            max_results: 30,
            check_in_mins: 60,
            disembark_mins: 15,
            feasible_only: true,
            dedup: DedupPolicy::CrossingPairAndCost,
        }
    }
}
