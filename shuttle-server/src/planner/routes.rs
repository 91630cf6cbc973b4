//! Direct route finding.

use crate::domain::{Route, StopId};
use crate::schedule::RouteGraph;

use super::PlanError;

/// Finds routes serving two stops in a traversable order.
pub struct RouteFinder<'g> {
    graph: &'g RouteGraph,
}

impl<'g> RouteFinder<'g> {
    pub fn new(graph: &'g RouteGraph) -> Self {
        Self { graph }
    }

    /// All routes that can carry a rider from `start` to `end` without a
    /// transfer, in graph (first-seen build) order.
    ///
    /// An empty result means no direct route — an expected outcome, not an
    /// error. Asking for a route from a stop to itself is rejected.
    pub fn find_direct(&self, start: StopId, end: StopId) -> Result<Vec<&'g Route>, PlanError> {
        if start == end {
            return Err(PlanError::InvalidQuery);
        }
        Ok(self
            .graph
            .routes()
            .iter()
            .filter(|route| route_connects(route, start, end))
            .collect())
    }
}

/// Directional validity of riding `route` from `from` to `to`.
///
/// Every occurrence pair is considered because a stop may repeat on loop
/// routes. A forward pair (`from` before `to`) always qualifies; a reversed
/// pair qualifies only when the route classifies as circular, in which case
/// the ride wraps around the loop.
pub(crate) fn route_connects(route: &Route, from: StopId, to: StopId) -> bool {
    let from_positions = route.positions_of(from);
    let to_positions = route.positions_of(to);
    if from_positions.is_empty() || to_positions.is_empty() {
        return false;
    }

    let forward = from_positions
        .iter()
        .any(|f| to_positions.iter().any(|t| f < t));
    if forward {
        return true;
    }

    route.is_circular()
        && from_positions
            .iter()
            .any(|f| to_positions.iter().any(|t| f > t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, ServiceDay};
    use crate::schedule::{RawSchedule, RouteDetailRow, StopRow};

    fn detail(route: u32, position: u32, stop: u32) -> RouteDetailRow {
        RouteDetailRow {
            route_id: RouteId::new(route),
            route_name: format!("C{route}"),
            route_description: String::new(),
            position,
            leg_minutes: if position == 1 { 0 } else { 4 },
            stop: StopRow {
                stop_id: StopId::new(stop),
                stop_name: format!("Stop {stop}"),
            },
        }
    }

    fn graph(details: Vec<RouteDetailRow>) -> RouteGraph {
        RouteGraph::build(
            RawSchedule {
                route_details: details,
                trips: vec![],
                stops: vec![],
            },
            ServiceDay::Weekday,
            None,
        )
    }

    #[test]
    fn same_start_and_end_is_invalid() {
        let graph = graph(vec![detail(1, 1, 10), detail(1, 2, 11)]);
        let finder = RouteFinder::new(&graph);

        assert!(matches!(
            finder.find_direct(StopId::new(10), StopId::new(10)),
            Err(PlanError::InvalidQuery)
        ));
    }

    #[test]
    fn finds_routes_serving_both_stops_forward() {
        let graph = graph(vec![
            detail(1, 1, 10),
            detail(1, 2, 11),
            detail(1, 3, 12),
            detail(2, 1, 11),
            detail(2, 2, 12),
            detail(3, 1, 10),
            detail(3, 2, 12),
        ]);
        let finder = RouteFinder::new(&graph);

        let routes = finder.find_direct(StopId::new(10), StopId::new(12)).unwrap();
        let names: Vec<_> = routes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C1", "C3"]);
    }

    #[test]
    fn excludes_routes_missing_a_stop() {
        let graph = graph(vec![
            detail(1, 1, 10),
            detail(1, 2, 11),
            detail(2, 1, 12),
            detail(2, 2, 13),
        ]);
        let finder = RouteFinder::new(&graph);

        assert!(finder
            .find_direct(StopId::new(10), StopId::new(13))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn loop_route_qualifies_via_terminal_repeat() {
        // Positions [1,2,3,4] where the stop at position 4 repeats position
        // 1's stop. Riding from position 3 reaches it on the wrap.
        let graph = graph(vec![
            detail(1, 1, 10),
            detail(1, 2, 11),
            detail(1, 3, 12),
            detail(1, 4, 10),
        ]);
        let finder = RouteFinder::new(&graph);

        let routes = finder.find_direct(StopId::new(12), StopId::new(10)).unwrap();
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn wraparound_pair_qualifies_on_circular_route() {
        // The destination only occurs before the origin; the circular
        // classification lets the reversed pair through.
        let graph = graph(vec![
            detail(1, 1, 10),
            detail(1, 2, 11),
            detail(1, 3, 12),
            detail(1, 4, 10),
        ]);
        let finder = RouteFinder::new(&graph);

        let routes = finder.find_direct(StopId::new(12), StopId::new(11)).unwrap();
        assert_eq!(routes.len(), 1);
    }
}
