//! Arrival prediction and journey planning.
//!
//! The planning components all read one immutable [`RouteGraph`] snapshot:
//! [`ArrivalCalculator`] answers "when does the next bus reach this stop",
//! [`RouteFinder`] finds direct routes between two stops, [`TransferPlanner`]
//! proposes one-transfer journeys when no direct route exists, and
//! [`JourneyTimeCalculator`] turns a journey into concrete per-leg times.
//! [`plan_journey`] ties them together the way the presentation layer uses
//! them: direct routes take priority and suppress the transfer search.

mod arrivals;
mod config;
mod routes;
mod timing;
mod transfer;

use tracing::debug;

use crate::domain::{DayTime, Journey, Leg, RouteId, StopId, TimedJourney};
use crate::schedule::RouteGraph;

pub use arrivals::{Arrival, ArrivalCalculator};
pub use config::PlannerConfig;
pub use routes::RouteFinder;
pub use timing::JourneyTimeCalculator;
pub use transfer::TransferPlanner;

/// Whether a target time is the wanted departure or the wanted arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Departure,
    Arrival,
}

/// Planning failures.
///
/// "No service" outcomes are expected and frequent, so planning functions
/// return empty or `None` results for them; these errors cover conditions the
/// caller asked for incorrectly or data that is genuinely missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The schedule source returned nothing
    #[error("no schedule data available")]
    DataUnavailable,

    /// Unknown route identifier
    #[error("route {0} not found")]
    RouteNotFound(RouteId),

    /// The route does not serve the stop
    #[error("stop {stop} is not served by route {route}")]
    StopNotOnRoute { route: RouteId, stop: StopId },

    /// The route has an empty timetable
    #[error("route {0} has no scheduled trips")]
    NoTripsScheduled(RouteId),

    /// Start and end stop are identical
    #[error("start and end stop must differ")]
    InvalidQuery,
}

/// A resolved plan between two stops: direct options first, one-transfer
/// options only when no direct route exists.
#[derive(Debug, Clone, Default)]
pub struct JourneyPlan {
    pub direct: Vec<TimedJourney>,
    pub transfer: Vec<TimedJourney>,
}

/// Plan journeys from `start` to `end` around `target`.
///
/// Direct routes always take priority: the transfer search runs only when
/// [`RouteFinder::find_direct`] yields nothing. Journeys that cannot be
/// ridden as scheduled (no remaining same-day service, or a transfer wait
/// outside the acceptable window) are dropped from the result rather than
/// reported as errors; routes with empty timetables are skipped likewise.
pub fn plan_journey(
    graph: &RouteGraph,
    config: &PlannerConfig,
    start: StopId,
    end: StopId,
    target: DayTime,
    anchor: Anchor,
) -> Result<JourneyPlan, PlanError> {
    let finder = RouteFinder::new(graph);
    let timing = JourneyTimeCalculator::new(graph, config.clone());

    let direct_routes = finder.find_direct(start, end)?;
    let mut plan = JourneyPlan::default();

    for route in &direct_routes {
        let Ok(journey) = Journey::direct(Leg::new(route.id, start, end)) else {
            continue;
        };
        if let Some(timings) = resolve_quietly(&timing, &journey, target, anchor)? {
            plan.direct.push(TimedJourney { journey, timings });
        }
    }

    if direct_routes.is_empty() {
        let candidates = TransferPlanner::new(graph).find_one_transfer(start, end)?;
        debug!(
            start = %start,
            end = %end,
            candidates = candidates.len(),
            "no direct route, trying transfers"
        );
        for journey in candidates {
            if let Some(timings) = resolve_quietly(&timing, &journey, target, anchor)? {
                plan.transfer.push(TimedJourney { journey, timings });
            }
        }
    }

    Ok(plan)
}

/// Resolve a candidate journey, treating an empty timetable as "this option
/// doesn't run" rather than a failed request.
fn resolve_quietly(
    timing: &JourneyTimeCalculator<'_>,
    journey: &Journey,
    target: DayTime,
    anchor: Anchor,
) -> Result<Option<Vec<crate::domain::LegTiming>>, PlanError> {
    match timing.resolve(journey, target, anchor) {
        Ok(resolved) => Ok(resolved),
        Err(PlanError::NoTripsScheduled(_)) => Ok(None),
        Err(err) => Err(err),
    }
}
