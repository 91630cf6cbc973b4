//! Journey types.
//!
//! A `Journey` is the shape of a trip between two stops: a single direct leg,
//! or two legs on different routes joined at a transfer stop. Concrete
//! departure and arrival times are attached later by the journey time
//! resolver as [`LegTiming`] values.

use super::ids::{RouteId, StopId};
use super::time::DayTime;

/// Journey construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JourneyError {
    /// A leg that boards and alights at the same stop
    #[error("leg boards and alights at the same stop {0}")]
    DegenerateLeg(StopId),

    /// Consecutive legs do not share the transfer stop
    #[error("legs do not connect: first alights at {0}, second boards at {1}")]
    LegsNotConnected(StopId, StopId),

    /// Both legs ride the same route
    #[error("transfer between two legs of route {0}")]
    SameRouteTransfer(RouteId),
}

/// One continuous ride on a single route between two stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub route: RouteId,
    pub board: StopId,
    pub alight: StopId,
}

impl Leg {
    pub fn new(route: RouteId, board: StopId, alight: StopId) -> Self {
        Self {
            route,
            board,
            alight,
        }
    }
}

/// A complete journey: one direct leg or two legs joined at a transfer stop.
///
/// # Invariants
///
/// - No leg boards where it alights
/// - Consecutive legs connect (first alight = second board)
/// - The two legs of a transfer journey ride distinct routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    legs: Vec<Leg>,
}

impl Journey {
    /// A direct, single-leg journey.
    pub fn direct(leg: Leg) -> Result<Self, JourneyError> {
        validate_leg(&leg)?;
        Ok(Self { legs: vec![leg] })
    }

    /// A one-transfer journey.
    ///
    /// # Examples
    ///
    /// ```
    /// use shuttle_server::domain::{Journey, Leg, RouteId, StopId};
    ///
    /// let first = Leg::new(RouteId::new(1), StopId::new(10), StopId::new(20));
    /// let second = Leg::new(RouteId::new(2), StopId::new(20), StopId::new(30));
    /// let journey = Journey::with_transfer(first, second).unwrap();
    ///
    /// assert_eq!(journey.transfer_stop(), Some(StopId::new(20)));
    /// assert!(!journey.is_direct());
    /// ```
    pub fn with_transfer(first: Leg, second: Leg) -> Result<Self, JourneyError> {
        validate_leg(&first)?;
        validate_leg(&second)?;
        if first.alight != second.board {
            return Err(JourneyError::LegsNotConnected(first.alight, second.board));
        }
        if first.route == second.route {
            return Err(JourneyError::SameRouteTransfer(first.route));
        }
        Ok(Self {
            legs: vec![first, second],
        })
    }

    /// The legs in riding order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// True for a single-leg journey.
    pub fn is_direct(&self) -> bool {
        self.legs.len() == 1
    }

    /// The shared stop of a transfer journey, `None` when direct.
    pub fn transfer_stop(&self) -> Option<StopId> {
        match self.legs.as_slice() {
            [first, _second] => Some(first.alight),
            _ => None,
        }
    }

    /// The boarding stop of the first leg.
    pub fn origin(&self) -> StopId {
        // Safe: constructors guarantee at least one leg
        self.legs.first().unwrap().board
    }

    /// The alighting stop of the last leg.
    pub fn destination(&self) -> StopId {
        self.legs.last().unwrap().alight
    }
}

fn validate_leg(leg: &Leg) -> Result<(), JourneyError> {
    if leg.board == leg.alight {
        return Err(JourneyError::DegenerateLeg(leg.board));
    }
    Ok(())
}

/// Concrete times for one leg of a resolved journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegTiming {
    pub route: RouteId,
    pub board: StopId,
    pub alight: StopId,
    pub depart: DayTime,
    pub arrive: DayTime,
}

impl LegTiming {
    /// Whole minutes spent riding this leg.
    pub fn ride_minutes(&self) -> i64 {
        self.depart.minutes_until(self.arrive)
    }
}

/// A journey with concrete per-leg times attached.
#[derive(Debug, Clone)]
pub struct TimedJourney {
    pub journey: Journey,
    pub timings: Vec<LegTiming>,
}

impl TimedJourney {
    /// Departure time of the first leg.
    pub fn depart(&self) -> DayTime {
        self.timings.first().unwrap().depart
    }

    /// Arrival time of the last leg.
    pub fn arrive(&self) -> DayTime {
        self.timings.last().unwrap().arrive
    }

    /// The wait at the transfer stop, `None` for direct journeys.
    pub fn transfer_wait_minutes(&self) -> Option<i64> {
        match self.timings.as_slice() {
            [first, second] => Some(first.arrive.minutes_until(second.depart)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(route: u32, board: u32, alight: u32) -> Leg {
        Leg::new(RouteId::new(route), StopId::new(board), StopId::new(alight))
    }

    #[test]
    fn direct_journey() {
        let journey = Journey::direct(leg(1, 10, 20)).unwrap();
        assert!(journey.is_direct());
        assert_eq!(journey.origin(), StopId::new(10));
        assert_eq!(journey.destination(), StopId::new(20));
        assert_eq!(journey.transfer_stop(), None);
    }

    #[test]
    fn degenerate_leg_rejected() {
        assert!(matches!(
            Journey::direct(leg(1, 10, 10)),
            Err(JourneyError::DegenerateLeg(_))
        ));
    }

    #[test]
    fn transfer_journey_connects() {
        let journey = Journey::with_transfer(leg(1, 10, 20), leg(2, 20, 30)).unwrap();
        assert_eq!(journey.transfer_stop(), Some(StopId::new(20)));
        assert_eq!(journey.origin(), StopId::new(10));
        assert_eq!(journey.destination(), StopId::new(30));
        assert_eq!(journey.legs().len(), 2);
    }

    #[test]
    fn disconnected_legs_rejected() {
        assert!(matches!(
            Journey::with_transfer(leg(1, 10, 20), leg(2, 21, 30)),
            Err(JourneyError::LegsNotConnected(_, _))
        ));
    }

    #[test]
    fn same_route_transfer_rejected() {
        assert!(matches!(
            Journey::with_transfer(leg(1, 10, 20), leg(1, 20, 30)),
            Err(JourneyError::SameRouteTransfer(_))
        ));
    }

    #[test]
    fn timed_journey_accessors() {
        let journey = Journey::with_transfer(leg(1, 10, 20), leg(2, 20, 30)).unwrap();
        let timings = vec![
            LegTiming {
                route: RouteId::new(1),
                board: StopId::new(10),
                alight: StopId::new(20),
                depart: DayTime::parse("08:00").unwrap(),
                arrive: DayTime::parse("08:15").unwrap(),
            },
            LegTiming {
                route: RouteId::new(2),
                board: StopId::new(20),
                alight: StopId::new(30),
                depart: DayTime::parse("08:25").unwrap(),
                arrive: DayTime::parse("08:40").unwrap(),
            },
        ];
        let timed = TimedJourney { journey, timings };

        assert_eq!(timed.depart().to_string(), "08:00");
        assert_eq!(timed.arrive().to_string(), "08:40");
        assert_eq!(timed.transfer_wait_minutes(), Some(10));
        assert_eq!(timed.timings[0].ride_minutes(), 15);
    }
}
