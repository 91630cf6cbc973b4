//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use tracing::warn;

use crate::domain::{DayTime, RouteId, ServiceDay, StopId};
use crate::planner::{plan_journey, Anchor, ArrivalCalculator, PlanError, RouteFinder};
use crate::schedule::RouteGraph;
use crate::source::SourceError;

use super::dto::*;
use super::pages;
use super::state::AppState;
use super::widget::Page;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/shuttles", get(home))
        .route("/shuttles/route/:id", get(route_detail))
        .route("/shuttles/routeplanner", post(route_planner))
        .route("/api/arrivals", get(api_arrivals))
        .route("/api/routes", get(api_routes))
        .route("/api/plan", get(api_plan))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// A graph snapshot for the service day; a failed source fetch degrades to an
/// empty graph so pages render their "no buses" state instead of crashing
/// the request.
async fn graph_or_empty(state: &AppState, day: ServiceDay) -> Arc<RouteGraph> {
    match state.schedule.graph_for(day).await {
        Ok(graph) => graph,
        Err(err) => {
            warn!(%err, ?day, "schedule source unavailable, serving empty graph");
            Arc::new(RouteGraph::empty(day))
        }
    }
}

/// Resolve a stop reference from a form/query value: a numeric stop id or a
/// stop name.
fn resolve_stop(graph: &RouteGraph, value: &str) -> Option<StopId> {
    if let Ok(id) = value.parse::<u32>() {
        let id = StopId::new(id);
        if graph.stop(id).is_some() {
            return Some(id);
        }
    }
    graph
        .stops()
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(value))
        .map(|s| s.id)
}

/// Parse an optional "HH:MM" override, falling back to now.
fn target_time(override_value: Option<&str>, now: DayTime) -> Result<DayTime, AppError> {
    match override_value {
        None | Some("") => Ok(now),
        Some(value) => DayTime::parse(value).map_err(|_| AppError::BadRequest {
            message: format!("Invalid time: {value}"),
        }),
    }
}

/// Home page: service-day toggle, nearest-stop selector, and route cards.
async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<Json<Page>, AppError> {
    let (now, today) = state.local_now();
    let day = query.service_type.unwrap_or(today);
    let graph = graph_or_empty(&state, day).await;

    let selected = query
        .select_initial_stop
        .as_deref()
        .filter(|v| !v.is_empty() && *v != "none")
        .and_then(|v| resolve_stop(&graph, v));

    let mut page = pages::home_page(&graph, day, selected, now);

    // A request carrying form state is an ajax refresh of the card sets.
    if query.select_initial_stop.is_some() || query.service_type.is_some() {
        page.element_fields = pages::home_cards_fields(&graph, selected, now);
    }

    Ok(Json(page))
}

/// Route detail page with per-stop next arrivals.
async fn route_detail(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Page>, AppError> {
    let (now, today) = state.local_now();
    let graph = graph_or_empty(&state, today).await;

    let route = graph.route(RouteId::new(id)).ok_or(AppError::NotFound {
        message: format!("Route {id} not found"),
    })?;

    let page = pages::route_page(&graph, route, now, &state.updated_label());
    Ok(Json(page))
}

/// Route planner form submission.
async fn route_planner(
    State(state): State<AppState>,
    Form(form): Form<RoutePlanForm>,
) -> Result<Json<Page>, AppError> {
    let (now, today) = state.local_now();
    let day = form.service_type.unwrap_or(today);
    let graph = graph_or_empty(&state, day).await;

    let start = resolve_stop(&graph, &form.startpoint).ok_or_else(|| AppError::BadRequest {
        message: format!("Unknown starting point: {}", form.startpoint),
    })?;
    let end = resolve_stop(&graph, &form.endpoint).ok_or_else(|| AppError::BadRequest {
        message: format!("Unknown destination: {}", form.endpoint),
    })?;
    let target = target_time(form.when.as_deref(), now)?;
    let anchor = form.anchor.map_or(Anchor::Departure, Anchor::from);

    let page = pages::plan_page(&graph, &state.config, start, end, target, anchor)?;
    Ok(Json(page))
}

/// Next arrival for a route at a stop.
async fn api_arrivals(
    State(state): State<AppState>,
    Query(query): Query<ArrivalsQuery>,
) -> Result<Json<ArrivalResponse>, AppError> {
    let (now, today) = state.local_now();
    let graph = graph_or_empty(&state, today).await;

    let at = target_time(query.at.as_deref(), now)?;
    let calc = ArrivalCalculator::new(&graph);
    let arrival = calc.next_arrival(RouteId::new(query.route), StopId::new(query.stop), at)?;

    Ok(Json(ArrivalResponse::from_arrival(&arrival)))
}

/// Direct routes serving two stops in traversable order.
async fn api_routes(
    State(state): State<AppState>,
    Query(query): Query<RoutesQuery>,
) -> Result<Json<Vec<RouteSummary>>, AppError> {
    let (_, today) = state.local_now();
    let graph = graph_or_empty(&state, today).await;

    let routes = RouteFinder::new(&graph)
        .find_direct(StopId::new(query.start), StopId::new(query.end))?;

    Ok(Json(routes.iter().map(|r| RouteSummary::from_route(r)).collect()))
}

/// Journey plan between two stops.
async fn api_plan(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<PlanResponse>, AppError> {
    let (now, today) = state.local_now();
    let graph = graph_or_empty(&state, today).await;

    let target = target_time(query.at.as_deref(), now)?;
    let anchor = query.anchor.map_or(Anchor::Departure, Anchor::from);

    let plan = plan_journey(
        &graph,
        &state.config,
        StopId::new(query.start),
        StopId::new(query.end),
        target,
        anchor,
    )?;

    Ok(Json(PlanResponse {
        direct: plan
            .direct
            .iter()
            .map(|t| JourneyResult::from_timed(&graph, t))
            .collect(),
        transfer: plan
            .transfer
            .iter()
            .map(|t| JourneyResult::from_timed(&graph, t))
            .collect(),
    }))
}

/// Web-layer error, rendered as a JSON error payload.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<SourceError> for AppError {
    fn from(e: SourceError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidQuery | PlanError::StopNotOnRoute { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
            PlanError::RouteNotFound(_) | PlanError::NoTripsScheduled(_) => AppError::NotFound {
                message: e.to_string(),
            },
            PlanError::DataUnavailable => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse {
            error: message.clone(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{RawSchedule, RouteDetailRow, StopRow};

    fn graph() -> RouteGraph {
        RouteGraph::build(
            RawSchedule {
                route_details: vec![RouteDetailRow {
                    route_id: RouteId::new(1),
                    route_name: "C1".into(),
                    route_description: String::new(),
                    position: 1,
                    leg_minutes: 0,
                    stop: StopRow {
                        stop_id: StopId::new(6),
                        stop_name: "Transit Center".into(),
                    },
                }],
                trips: vec![],
                stops: vec![],
            },
            ServiceDay::Weekday,
            None,
        )
    }

    #[test]
    fn resolve_stop_by_id_or_name() {
        let graph = graph();

        assert_eq!(resolve_stop(&graph, "6"), Some(StopId::new(6)));
        assert_eq!(resolve_stop(&graph, "transit center"), Some(StopId::new(6)));
        assert_eq!(resolve_stop(&graph, "99"), None);
        assert_eq!(resolve_stop(&graph, "nowhere"), None);
    }

    #[test]
    fn target_time_falls_back_to_now() {
        let now = DayTime::parse("10:00").unwrap();

        assert_eq!(target_time(None, now).unwrap(), now);
        assert_eq!(target_time(Some(""), now).unwrap(), now);
        assert_eq!(
            target_time(Some("08:30"), now).unwrap(),
            DayTime::parse("08:30").unwrap()
        );
        assert!(target_time(Some("not a time"), now).is_err());
    }

    #[test]
    fn plan_errors_map_to_statuses() {
        assert!(matches!(
            AppError::from(PlanError::InvalidQuery),
            AppError::BadRequest { .. }
        ));
        assert!(matches!(
            AppError::from(PlanError::RouteNotFound(RouteId::new(1))),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            AppError::from(PlanError::DataUnavailable),
            AppError::Internal { .. }
        ));
    }
}
