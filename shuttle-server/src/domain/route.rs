//! Route, route-stop, and trip-start types.
//!
//! A `Route` owns its ordered stop sequence and its timetable of trip starts.
//! Both collections are immutable after the schedule graph is built.

use serde::{Deserialize, Serialize};

use super::ids::{RouteId, StopId, TripId};
use super::time::DayTime;

/// Which weekly timetable a trip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceDay {
    Weekday,
    Weekend,
}

impl ServiceDay {
    /// The service day for a calendar weekday.
    pub fn from_weekday(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sat | chrono::Weekday::Sun => ServiceDay::Weekend,
            _ => ServiceDay::Weekday,
        }
    }

    /// Whether a trip row's weekend flag belongs to this service day.
    pub fn matches(&self, weekend: bool) -> bool {
        match self {
            ServiceDay::Weekday => !weekend,
            ServiceDay::Weekend => weekend,
        }
    }
}

/// One entry in a route's ordered stop sequence.
///
/// `position` is a dense 1-based ordering unique within the route. A stop may
/// appear at more than one position on circular routes. `leg_minutes` is the
/// travel time from the previous entry to this one, zero at position 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStop {
    pub position: u32,
    pub stop: StopId,
    pub leg_minutes: u32,
}

/// A scheduled trip start for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripStart {
    pub id: TripId,
    pub start: DayTime,
    /// Whether this trip pauses for a scheduled dwell at the hub stop.
    pub is_layover: bool,
    pub layover_minutes: u32,
}

/// A shuttle route: ordered stop sequence plus timetable.
///
/// Invariants established by the schedule builder: `stops` is sorted by
/// position, `trips` is sorted by start time (ties by id), and trip ids are
/// unique within the route.
#[derive(Debug, Clone)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub description: String,
    pub stops: Vec<RouteStop>,
    pub trips: Vec<TripStart>,
}

impl Route {
    /// Whether this route serves the given stop at any position.
    pub fn serves(&self, stop: StopId) -> bool {
        self.stops.iter().any(|s| s.stop == stop)
    }

    /// All positions at which the stop occurs, ascending.
    pub fn positions_of(&self, stop: StopId) -> Vec<u32> {
        self.stops
            .iter()
            .filter(|s| s.stop == stop)
            .map(|s| s.position)
            .collect()
    }

    /// The first position at which the stop occurs.
    pub fn first_position_of(&self, stop: StopId) -> Option<u32> {
        self.stops
            .iter()
            .find(|s| s.stop == stop)
            .map(|s| s.position)
    }

    /// Cumulative ride time from the trip start to the given position: the
    /// sum of each entry's leg up to and including that position. Position 1
    /// contributes nothing, so the first stop's arrival equals the trip start.
    pub fn ride_minutes_to(&self, position: u32) -> u32 {
        self.stops
            .iter()
            .filter(|s| s.position <= position)
            .map(|s| s.leg_minutes)
            .sum()
    }

    /// Trips ordered by start time. The builder sorts `trips`, but source
    /// identifiers are not sort-stable with time, so callers go through this
    /// accessor rather than assuming input order.
    pub fn trips_by_start(&self) -> &[TripStart] {
        &self.trips
    }

    /// Positional-range circularity heuristic: the stop sequence spans a
    /// range at least as wide as its entry count minus one. Loop routes list
    /// their terminal stop twice, which is what this is meant to catch; see
    /// the planner docs for the known over-approximation.
    pub fn is_circular(&self) -> bool {
        let (min, max) = match (
            self.stops.iter().map(|s| s.position).min(),
            self.stops.iter().map(|s| s.position).max(),
        ) {
            (Some(min), Some(max)) => (min, max),
            _ => return false,
        };
        let count = self.stops.len() as u32;
        count > 0 && max - min >= count - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> DayTime {
        DayTime::parse(s).unwrap()
    }

    fn route_with_stops(entries: &[(u32, u32, u32)]) -> Route {
        Route {
            id: RouteId::new(1),
            name: "C1".into(),
            description: "Campus loop".into(),
            stops: entries
                .iter()
                .map(|&(position, stop, leg_minutes)| RouteStop {
                    position,
                    stop: StopId::new(stop),
                    leg_minutes,
                })
                .collect(),
            trips: vec![TripStart {
                id: TripId::new(1),
                start: time("08:00"),
                is_layover: false,
                layover_minutes: 0,
            }],
        }
    }

    #[test]
    fn service_day_from_weekday() {
        assert_eq!(
            ServiceDay::from_weekday(chrono::Weekday::Mon),
            ServiceDay::Weekday
        );
        assert_eq!(
            ServiceDay::from_weekday(chrono::Weekday::Sat),
            ServiceDay::Weekend
        );
        assert_eq!(
            ServiceDay::from_weekday(chrono::Weekday::Sun),
            ServiceDay::Weekend
        );
    }

    #[test]
    fn service_day_matches_weekend_flag() {
        assert!(ServiceDay::Weekday.matches(false));
        assert!(!ServiceDay::Weekday.matches(true));
        assert!(ServiceDay::Weekend.matches(true));
    }

    #[test]
    fn positions_of_repeated_stop() {
        let route = route_with_stops(&[(1, 10, 0), (2, 11, 5), (3, 12, 5), (4, 10, 5)]);
        assert_eq!(route.positions_of(StopId::new(10)), vec![1, 4]);
        assert_eq!(route.first_position_of(StopId::new(10)), Some(1));
        assert_eq!(route.first_position_of(StopId::new(99)), None);
    }

    #[test]
    fn ride_minutes_accumulate_through_position() {
        let route = route_with_stops(&[(1, 10, 0), (2, 11, 5), (3, 12, 10)]);
        assert_eq!(route.ride_minutes_to(1), 0);
        assert_eq!(route.ride_minutes_to(2), 5);
        assert_eq!(route.ride_minutes_to(3), 15);
    }

    #[test]
    fn circular_heuristic() {
        // Terminal stop repeated: classic loop shape
        let loop_route = route_with_stops(&[(1, 10, 0), (2, 11, 5), (3, 12, 5), (4, 10, 5)]);
        assert!(loop_route.is_circular());

        // No stops at all
        let mut empty = loop_route.clone();
        empty.stops.clear();
        assert!(!empty.is_circular());
    }
}
