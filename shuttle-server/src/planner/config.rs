//! Planner configuration.

use std::time::Duration;

/// Configuration parameters for arrival and journey planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Display name of the hub/layover stop. Resolved to a stop id once at
    /// graph build time; never matched by numeric id.
    pub hub_stop_name: String,

    /// Minimum acceptable transfer wait (minutes). Tighter transfers are
    /// rejected as infeasible.
    pub min_transfer_mins: i64,

    /// Maximum acceptable transfer wait (minutes). Longer waits are rejected
    /// as not worth suggesting.
    pub max_transfer_mins: i64,

    /// Minutes stepped back from a leg's departure when resolving the
    /// preceding leg of an arrival-anchored plan.
    pub transfer_buffer_mins: u32,
}

impl PlannerConfig {
    /// Override the hub stop name.
    pub fn with_hub_stop(mut self, name: impl Into<String>) -> Self {
        self.hub_stop_name = name.into();
        self
    }

    /// The transfer buffer as a Duration.
    pub fn transfer_buffer(&self) -> Duration {
        Duration::from_secs(u64::from(self.transfer_buffer_mins) * 60)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            hub_stop_name: "University Transit Center".to_string(),
            min_transfer_mins: 5,
            max_transfer_mins: 30,
            transfer_buffer_mins: 10,
        }
    }
}
