//! Journey time resolution.
//!
//! Attaches concrete departure and arrival times to a journey's legs, walking
//! forward from a wanted departure or backward from a wanted arrival, then
//! validates every transfer wait against the acceptable window.

use crate::domain::{DayTime, Journey, LegTiming};
use crate::schedule::RouteGraph;

use super::arrivals::ArrivalCalculator;
use super::config::PlannerConfig;
use super::{Anchor, PlanError};

/// Resolves journeys to concrete per-leg times.
pub struct JourneyTimeCalculator<'g> {
    calc: ArrivalCalculator<'g>,
    config: PlannerConfig,
}

impl<'g> JourneyTimeCalculator<'g> {
    pub fn new(graph: &'g RouteGraph, config: PlannerConfig) -> Self {
        Self {
            calc: ArrivalCalculator::new(graph),
            config,
        }
    }

    /// Resolve a journey against a target time.
    ///
    /// Departure-anchored resolution walks legs forward: the first leg is
    /// anchored at `target`, each later leg at the previous leg's arrival.
    /// Arrival-anchored resolution walks backward from the final arrival,
    /// stepping the working target back by the transfer buffer before each
    /// preceding leg.
    ///
    /// Returns `Ok(None)` when the journey cannot be ridden as scheduled:
    /// a leg has no usable same-day trip, or a transfer wait falls outside
    /// the configured window. Single-leg journeys skip the window check.
    pub fn resolve(
        &self,
        journey: &Journey,
        target: DayTime,
        anchor: Anchor,
    ) -> Result<Option<Vec<LegTiming>>, PlanError> {
        let legs = journey.legs();
        let mut timings: Vec<LegTiming> = Vec::with_capacity(legs.len());

        match anchor {
            Anchor::Departure => {
                let mut at = target;
                for leg in legs {
                    let Some(timing) = self.calc.resolve_leg(leg, at, Anchor::Departure)? else {
                        return Ok(None);
                    };
                    at = timing.arrive;
                    timings.push(timing);
                }
            }
            Anchor::Arrival => {
                let mut by = target;
                for (i, leg) in legs.iter().rev().enumerate() {
                    let Some(timing) = self.calc.resolve_leg(leg, by, Anchor::Arrival)? else {
                        return Ok(None);
                    };
                    if i + 1 < legs.len() {
                        by = match timing
                            .depart
                            .checked_sub_minutes(self.config.transfer_buffer_mins)
                        {
                            Some(earlier) => earlier,
                            None => return Ok(None),
                        };
                    }
                    timings.push(timing);
                }
                timings.reverse();
            }
        }

        if timings.len() > 1 {
            for pair in timings.windows(2) {
                let wait = pair[0].arrive.minutes_until(pair[1].depart);
                if wait < self.config.min_transfer_mins || wait > self.config.max_transfer_mins {
                    return Ok(None);
                }
            }
        }

        Ok(Some(timings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Journey, Leg, RouteId, ServiceDay, StopId};
    use crate::schedule::{RawSchedule, RouteDetailRow, StopRow, TripRow};

    fn time(s: &str) -> DayTime {
        DayTime::parse(s).unwrap()
    }

    /// Two routes joined at stop 20: route 1 rides 10 -> 20 in ten minutes,
    /// route 2 rides 20 -> 30 in ten minutes. Route 1 departs 08:00; route
    /// 2's departures are per test.
    fn transfer_graph(second_leg_starts: &[&str]) -> RouteGraph {
        let mut route_details = Vec::new();
        for (route, stops) in [(1u32, [10u32, 20]), (2, [20, 30])] {
            for (i, stop) in stops.into_iter().enumerate() {
                route_details.push(RouteDetailRow {
                    route_id: RouteId::new(route),
                    route_name: format!("C{route}"),
                    route_description: String::new(),
                    position: i as u32 + 1,
                    leg_minutes: if i == 0 { 0 } else { 10 },
                    stop: StopRow {
                        stop_id: StopId::new(stop),
                        stop_name: format!("Stop {stop}"),
                    },
                });
            }
        }

        let mut trips = vec![TripRow {
            trip_id: crate::domain::TripId::new(1),
            route_id: RouteId::new(1),
            start_time: "08:00".into(),
            weekend: false,
            is_layover: false,
            layover_minutes: 0,
        }];
        for (i, start) in second_leg_starts.iter().enumerate() {
            trips.push(TripRow {
                trip_id: crate::domain::TripId::new(10 + i as u32),
                route_id: RouteId::new(2),
                start_time: (*start).into(),
                weekend: false,
                is_layover: false,
                layover_minutes: 0,
            });
        }

        RouteGraph::build(
            RawSchedule {
                route_details,
                trips,
                stops: vec![],
            },
            ServiceDay::Weekday,
            None,
        )
    }

    fn transfer_journey() -> Journey {
        Journey::with_transfer(
            Leg::new(RouteId::new(1), StopId::new(10), StopId::new(20)),
            Leg::new(RouteId::new(2), StopId::new(20), StopId::new(30)),
        )
        .unwrap()
    }

    fn resolve_with(starts: &[&str]) -> Option<Vec<LegTiming>> {
        let graph = transfer_graph(starts);
        let calc = JourneyTimeCalculator::new(&graph, PlannerConfig::default());
        calc.resolve(&transfer_journey(), time("07:50"), Anchor::Departure)
            .unwrap()
    }

    // First leg arrives at the transfer stop at 08:10; the second leg's
    // departure sets the wait.

    #[test]
    fn rejects_three_minute_transfer() {
        assert_eq!(resolve_with(&["08:13"]), None);
    }

    #[test]
    fn rejects_forty_five_minute_transfer() {
        assert_eq!(resolve_with(&["08:55"]), None);
    }

    #[test]
    fn accepts_exactly_five_minute_transfer() {
        let timings = resolve_with(&["08:15"]).unwrap();
        assert_eq!(timings[1].depart, time("08:15"));
        assert_eq!(timings[1].arrive, time("08:25"));
    }

    #[test]
    fn accepts_exactly_thirty_minute_transfer() {
        let timings = resolve_with(&["08:40"]).unwrap();
        assert_eq!(timings[0].arrive, time("08:10"));
        assert_eq!(timings[1].depart, time("08:40"));
    }

    #[test]
    fn forward_walk_chains_leg_times() {
        let timings = resolve_with(&["08:20"]).unwrap();
        assert_eq!(timings.len(), 2);
        assert_eq!(timings[0].depart, time("08:00"));
        assert_eq!(timings[0].arrive, time("08:10"));
        assert_eq!(timings[1].depart, time("08:20"));
        assert_eq!(timings[1].arrive, time("08:30"));
    }

    #[test]
    fn single_leg_skips_transfer_validation() {
        let graph = transfer_graph(&[]);
        let calc = JourneyTimeCalculator::new(&graph, PlannerConfig::default());
        let journey =
            Journey::direct(Leg::new(RouteId::new(1), StopId::new(10), StopId::new(20)))
                .unwrap();

        let timings = calc
            .resolve(&journey, time("07:00"), Anchor::Departure)
            .unwrap()
            .unwrap();
        assert_eq!(timings.len(), 1);
        assert_eq!(timings[0].depart, time("08:00"));
        assert_eq!(timings[0].arrive, time("08:10"));
    }

    #[test]
    fn unresolvable_leg_yields_none() {
        // Anchored after the last departure, the first leg wraps to the next
        // day and the journey cannot be ridden today.
        let graph = transfer_graph(&["07:00"]);
        let calc = JourneyTimeCalculator::new(&graph, PlannerConfig::default());

        let resolved = calc
            .resolve(&transfer_journey(), time("22:00"), Anchor::Departure)
            .unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn arrival_anchored_walks_backward_with_buffer() {
        let graph = transfer_graph(&["08:40"]);
        let calc = JourneyTimeCalculator::new(&graph, PlannerConfig::default());

        // Want to reach stop 30 by 09:00. Leg 2: latest arrival by 09:00 is
        // the 08:40 trip arriving 08:50. Working target steps back to 08:30,
        // and leg 1's 08:00 trip arrives at the transfer stop by then.
        let timings = calc
            .resolve(&transfer_journey(), time("09:00"), Anchor::Arrival)
            .unwrap()
            .unwrap();

        assert_eq!(timings[0].depart, time("08:00"));
        assert_eq!(timings[0].arrive, time("08:10"));
        assert_eq!(timings[1].depart, time("08:40"));
        assert_eq!(timings[1].arrive, time("08:50"));
    }

    #[test]
    fn arrival_anchored_rejects_when_no_trip_arrives_in_time() {
        let graph = transfer_graph(&["08:40"]);
        let calc = JourneyTimeCalculator::new(&graph, PlannerConfig::default());

        // Nothing arrives at stop 30 by 08:00.
        let resolved = calc
            .resolve(&transfer_journey(), time("08:00"), Anchor::Arrival)
            .unwrap();
        assert_eq!(resolved, None);
    }
}
