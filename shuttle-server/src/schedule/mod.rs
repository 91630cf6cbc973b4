//! In-memory schedule model.
//!
//! [`RouteGraph`] is the normalized, immutable snapshot of routes, stops, and
//! trip starts that every planning call reads. It is built once from raw
//! source rows and replaced wholesale on rebuild; nothing mutates it in
//! place, so a snapshot can be shared freely across concurrent requests.

mod rows;

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::domain::{DayTime, Route, RouteId, RouteStop, ServiceDay, Stop, StopId, TripStart};

pub use rows::{RawSchedule, RouteDetailRow, StopRow, TripRow};

/// Immutable snapshot of the shuttle network for one service day.
#[derive(Debug, Clone)]
pub struct RouteGraph {
    routes: Vec<Route>,
    stops: Vec<Stop>,
    route_index: HashMap<RouteId, usize>,
    stop_index: HashMap<StopId, usize>,
    hub: Option<StopId>,
    service_day: ServiceDay,
}

impl RouteGraph {
    /// An empty graph. Planning against it yields empty results, never errors.
    pub fn empty(service_day: ServiceDay) -> Self {
        Self {
            routes: Vec::new(),
            stops: Vec::new(),
            route_index: HashMap::new(),
            stop_index: HashMap::new(),
            hub: None,
            service_day,
        }
    }

    /// Build a graph from raw source rows.
    ///
    /// Route-detail rows are grouped by route id in first-seen order, and each
    /// route's stop sequence is sorted by position. Trip rows are grouped by
    /// route id with duplicate trip ids within a route collapsed to the first
    /// occurrence, filtered to the requested service day, and sorted by start
    /// time. Rows referencing unknown routes or carrying unparseable times
    /// are dropped with a warning.
    ///
    /// The hub stop, if configured, is resolved here by case-insensitive name
    /// so that downstream layover arithmetic works from a stable identifier.
    ///
    /// Absent input yields an empty graph; callers must not assume non-empty
    /// results.
    pub fn build(raw: RawSchedule, service_day: ServiceDay, hub_stop_name: Option<&str>) -> Self {
        let mut routes: Vec<Route> = Vec::new();
        let mut route_index: HashMap<RouteId, usize> = HashMap::new();
        let mut derived_stops: Vec<StopRow> = Vec::new();
        let mut derived_seen: HashSet<StopId> = HashSet::new();

        for row in raw.route_details {
            let idx = *route_index.entry(row.route_id).or_insert_with(|| {
                routes.push(Route {
                    id: row.route_id,
                    name: row.route_name.clone(),
                    description: row.route_description.clone(),
                    stops: Vec::new(),
                    trips: Vec::new(),
                });
                routes.len() - 1
            });
            if derived_seen.insert(row.stop.stop_id) {
                derived_stops.push(row.stop.clone());
            }
            routes[idx].stops.push(RouteStop {
                position: row.position,
                stop: row.stop.stop_id,
                leg_minutes: row.leg_minutes,
            });
        }

        for route in &mut routes {
            route.stops.sort_by_key(|s| s.position);
        }

        // Stop directory: the source's stop table when present, otherwise
        // derived from the route details (first occurrence wins).
        let stop_rows = if raw.stops.is_empty() {
            derived_stops
        } else {
            raw.stops
        };
        let mut stops: Vec<Stop> = Vec::new();
        let mut stop_index: HashMap<StopId, usize> = HashMap::new();
        for row in stop_rows {
            if stop_index.contains_key(&row.stop_id) {
                continue;
            }
            stop_index.insert(row.stop_id, stops.len());
            stops.push(Stop::new(row.stop_id, row.stop_name));
        }

        // Trip rows: dedupe per route by trip id, keep the requested service
        // day, parse start times.
        let mut seen_trip_ids: HashMap<RouteId, HashSet<crate::domain::TripId>> = HashMap::new();
        for row in raw.trips {
            let Some(&idx) = route_index.get(&row.route_id) else {
                warn!(route = %row.route_id, trip = %row.trip_id, "trip references unknown route");
                continue;
            };
            if !service_day.matches(row.weekend) {
                continue;
            }
            if !seen_trip_ids
                .entry(row.route_id)
                .or_default()
                .insert(row.trip_id)
            {
                continue;
            }
            let start = match DayTime::parse(&row.start_time) {
                Ok(start) => start,
                Err(err) => {
                    warn!(
                        route = %row.route_id,
                        trip = %row.trip_id,
                        start_time = %row.start_time,
                        %err,
                        "skipping trip with unparseable start time"
                    );
                    continue;
                }
            };
            routes[idx].trips.push(TripStart {
                id: row.trip_id,
                start,
                is_layover: row.is_layover,
                layover_minutes: row.layover_minutes,
            });
        }

        // Source trip identifiers are not sort-stable with time; order
        // explicitly before anything searches the timetable.
        for route in &mut routes {
            route.trips.sort_by_key(|t| (t.start, t.id));
        }

        let hub = hub_stop_name.and_then(|name| {
            let found = stops
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(name))
                .map(|s| s.id);
            if found.is_none() {
                warn!(hub = name, "configured hub stop not found in stop directory");
            }
            found
        });

        debug!(
            routes = routes.len(),
            stops = stops.len(),
            ?service_day,
            hub = ?hub,
            "built route graph"
        );

        Self {
            routes,
            stops,
            route_index,
            stop_index,
            hub,
            service_day,
        }
    }

    /// Look up a route by id.
    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.route_index.get(&id).map(|&idx| &self.routes[idx])
    }

    /// All routes, in first-seen source order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Look up a stop by id.
    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stop_index.get(&id).map(|&idx| &self.stops[idx])
    }

    /// The stop directory, in source order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Display name for a stop, if known.
    pub fn stop_name(&self, id: StopId) -> Option<&str> {
        self.stop(id).map(|s| s.name.as_str())
    }

    /// Routes serving the given stop, in graph order.
    pub fn routes_serving(&self, stop: StopId) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(move |r| r.serves(stop))
    }

    /// The resolved hub/layover stop, if one is configured and present.
    pub fn hub(&self) -> Option<StopId> {
        self.hub
    }

    /// Which weekly timetable this graph was built for.
    pub fn service_day(&self) -> ServiceDay {
        self.service_day
    }

    /// True when no routes were built.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
