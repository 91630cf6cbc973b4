//! Request and response types for the JSON API.

use serde::{Deserialize, Serialize};

use crate::domain::{ServiceDay, StopId, TimedJourney};
use crate::planner::{Anchor, Arrival};
use crate::schedule::RouteGraph;

/// Query parameters for the home page.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Stop id selected in the "nearest stop" form, or "none".
    #[serde(rename = "selectInitialStop")]
    pub select_initial_stop: Option<String>,

    /// Manual weekday/weekend override.
    #[serde(rename = "serviceType")]
    pub service_type: Option<ServiceDay>,
}

/// Form fields submitted by the route planner.
#[derive(Debug, Deserialize)]
pub struct RoutePlanForm {
    pub startpoint: String,
    pub endpoint: String,

    /// Optional target time "HH:MM"; defaults to now.
    #[serde(default)]
    pub when: Option<String>,

    /// Whether `when` is a wanted departure or arrival.
    #[serde(default)]
    pub anchor: Option<AnchorParam>,

    #[serde(rename = "serviceType", default)]
    pub service_type: Option<ServiceDay>,
}

/// Query parameters for `/api/arrivals`.
#[derive(Debug, Deserialize)]
pub struct ArrivalsQuery {
    pub route: u32,
    pub stop: u32,
    /// Reference time "HH:MM"; defaults to now.
    pub at: Option<String>,
}

/// Query parameters for `/api/plan`.
#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    pub start: u32,
    pub end: u32,
    pub at: Option<String>,
    pub anchor: Option<AnchorParam>,
}

/// Query parameters for `/api/routes`.
#[derive(Debug, Deserialize)]
pub struct RoutesQuery {
    pub start: u32,
    pub end: u32,
}

/// A route in a routes-between listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub id: u32,
    pub name: String,
    pub description: String,
}

impl RouteSummary {
    pub fn from_route(route: &crate::domain::Route) -> Self {
        Self {
            id: route.id.get(),
            name: route.name.clone(),
            description: route.description.clone(),
        }
    }
}

/// Wire form of [`Anchor`].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorParam {
    Depart,
    Arrive,
}

impl From<AnchorParam> for Anchor {
    fn from(value: AnchorParam) -> Self {
        match value {
            AnchorParam::Depart => Anchor::Departure,
            AnchorParam::Arrive => Anchor::Arrival,
        }
    }
}

/// A computed arrival at a stop.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalResponse {
    /// Clock-face arrival time, "HH:MM".
    pub time: String,

    /// 1 signals the arrival rolled to the next service day.
    pub day_offset: u8,
}

impl ArrivalResponse {
    pub fn from_arrival(arrival: &Arrival) -> Self {
        Self {
            time: arrival.time.to_string(),
            day_offset: u8::from(arrival.day_offset > 0),
        }
    }
}

/// A stop reference with its display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopInfo {
    pub id: u32,
    pub name: String,
}

impl StopInfo {
    fn lookup(graph: &RouteGraph, id: StopId) -> Self {
        Self {
            id: id.get(),
            name: graph.stop_name(id).unwrap_or_default().to_string(),
        }
    }
}

/// One timed leg of a planned journey.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegResult {
    pub route_id: u32,
    pub route_name: String,
    pub board: StopInfo,
    pub alight: StopInfo,
    pub depart: String,
    pub arrive: String,
}

/// A planned journey with concrete times.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyResult {
    pub legs: Vec<LegResult>,
    pub depart: String,
    pub arrive: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_stop: Option<StopInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_wait_mins: Option<i64>,
}

impl JourneyResult {
    pub fn from_timed(graph: &RouteGraph, timed: &TimedJourney) -> Self {
        let legs = timed
            .timings
            .iter()
            .map(|timing| LegResult {
                route_id: timing.route.get(),
                route_name: graph
                    .route(timing.route)
                    .map(|r| r.name.clone())
                    .unwrap_or_default(),
                board: StopInfo::lookup(graph, timing.board),
                alight: StopInfo::lookup(graph, timing.alight),
                depart: timing.depart.time_of_day().to_string(),
                arrive: timing.arrive.time_of_day().to_string(),
            })
            .collect();

        Self {
            legs,
            depart: timed.depart().time_of_day().to_string(),
            arrive: timed.arrive().time_of_day().to_string(),
            transfer_stop: timed
                .journey
                .transfer_stop()
                .map(|stop| StopInfo::lookup(graph, stop)),
            transfer_wait_mins: timed.transfer_wait_minutes(),
        }
    }
}

/// Response for `/api/plan`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub direct: Vec<JourneyResult>,
    pub transfer: Vec<JourneyResult>,
}

/// Error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
