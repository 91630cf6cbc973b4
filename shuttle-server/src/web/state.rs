//! Application state for the web layer.

use std::sync::Arc;

use chrono::Timelike;

use crate::cache::ScheduleCache;
use crate::domain::{DayTime, ServiceDay};
use crate::planner::PlannerConfig;

/// Shared application state.
///
/// The shuttle system's civil timezone lives here: handlers derive "now" and
/// the service day from it once per request and pass plain [`DayTime`] values
/// into the core, which never touches a clock or a timezone itself.
#[derive(Clone)]
pub struct AppState {
    /// Graph snapshot cache over the schedule source
    pub schedule: Arc<ScheduleCache>,

    /// Planner configuration
    pub config: Arc<PlannerConfig>,

    /// The fixed civil timezone of the shuttle system
    pub timezone: chrono_tz::Tz,
}

impl AppState {
    /// Create a new app state.
    pub fn new(schedule: ScheduleCache, config: PlannerConfig, timezone: chrono_tz::Tz) -> Self {
        Self {
            schedule: Arc::new(schedule),
            config: Arc::new(config),
            timezone,
        }
    }

    /// Current wall-clock time and service day in the shuttle timezone.
    pub fn local_now(&self) -> (DayTime, ServiceDay) {
        let now = chrono::Utc::now().with_timezone(&self.timezone);
        let time = DayTime::from_hms(now.hour(), now.minute(), now.second())
            .unwrap_or(DayTime::MIDNIGHT);
        let day = ServiceDay::from_weekday(chrono::Datelike::weekday(&now));
        (time, day)
    }

    /// Human-readable "last updated" timestamp in the shuttle timezone.
    pub fn updated_label(&self) -> String {
        let now = chrono::Utc::now().with_timezone(&self.timezone);
        now.format("%a %b %e, %H:%M").to_string()
    }
}
