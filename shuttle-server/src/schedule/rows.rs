//! Raw schedule rows, as delivered by a schedule source.
//!
//! These are the flat, foreign-keyed records the data-access layer hands to
//! [`RouteGraph::build`](super::RouteGraph::build). They carry times as
//! unparsed strings; validation happens during the build.

use crate::domain::{RouteId, StopId, TripId};

/// A stop directory row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRow {
    pub stop_id: StopId,
    pub stop_name: String,
}

/// One stop of one route, with its position and inbound leg duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDetailRow {
    pub route_id: RouteId,
    pub route_name: String,
    pub route_description: String,
    /// 1-based position of this stop within the route.
    pub position: u32,
    /// Travel minutes from the previous stop to this one, zero at position 1.
    pub leg_minutes: u32,
    pub stop: StopRow,
}

/// A trip-start row for a route's timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRow {
    pub trip_id: TripId,
    pub route_id: RouteId,
    /// Wall-clock start time, "HH:MM" or "HH:MM:SS".
    pub start_time: String,
    /// True when this trip belongs to the weekend timetable.
    pub weekend: bool,
    /// True when this trip pauses at the hub stop.
    pub is_layover: bool,
    pub layover_minutes: u32,
}

/// Everything a source returns in one fetch.
#[derive(Debug, Clone, Default)]
pub struct RawSchedule {
    pub route_details: Vec<RouteDetailRow>,
    pub trips: Vec<TripRow>,
    pub stops: Vec<StopRow>,
}
