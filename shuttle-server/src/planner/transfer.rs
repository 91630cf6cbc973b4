//! One-transfer journey planning.
//!
//! Used when no direct route serves a stop pair: candidate journeys ride one
//! route to a shared intermediate stop and a different route onward. The
//! planner itself is a pure function over the graph; the caller decides when
//! direct routes suppress it.

use std::collections::HashSet;

use crate::domain::{Journey, Leg, StopId};
use crate::schedule::RouteGraph;

use super::routes::route_connects;
use super::PlanError;

/// Finds single-transfer journeys between two stops.
pub struct TransferPlanner<'g> {
    graph: &'g RouteGraph,
}

impl<'g> TransferPlanner<'g> {
    pub fn new(graph: &'g RouteGraph) -> Self {
        Self { graph }
    }

    /// All journeys riding one route from `start` to a transfer stop and a
    /// different route from there to `end`.
    ///
    /// The transfer stop is never the start or end stop, and both legs must
    /// pass the same directional check as direct route finding. Equivalent
    /// route pairs may produce duplicate paths; only same-route pairs are
    /// excluded.
    pub fn find_one_transfer(
        &self,
        start: StopId,
        end: StopId,
    ) -> Result<Vec<Journey>, PlanError> {
        if start == end {
            return Err(PlanError::InvalidQuery);
        }

        let mut journeys = Vec::new();

        for first in self.graph.routes_serving(start) {
            // Unique stops on the first route, usable as a transfer point.
            let mut candidates: HashSet<StopId> = HashSet::new();
            for route_stop in &first.stops {
                let stop = route_stop.stop;
                if stop == start || stop == end {
                    continue;
                }
                if !candidates.insert(stop) {
                    continue;
                }
                if !route_connects(first, start, stop) {
                    continue;
                }

                for second in self.graph.routes_serving(stop) {
                    if second.id == first.id {
                        continue;
                    }
                    if !route_connects(second, stop, end) {
                        continue;
                    }
                    let legs = (
                        Leg::new(first.id, start, stop),
                        Leg::new(second.id, stop, end),
                    );
                    if let Ok(journey) = Journey::with_transfer(legs.0, legs.1) {
                        journeys.push(journey);
                    }
                }
            }
        }

        Ok(journeys)
    }
}
