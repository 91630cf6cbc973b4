//! Domain types for the shuttle planner.
//!
//! Core model types representing validated schedule data. Invariants are
//! enforced at construction time, so code receiving these types can trust
//! their validity.

mod ids;
mod journey;
mod route;
mod stop;
mod time;

pub use ids::{RouteId, StopId, TripId};
pub use journey::{Journey, JourneyError, Leg, LegTiming, TimedJourney};
pub use route::{Route, RouteStop, ServiceDay, TripStart};
pub use stop::Stop;
pub use time::{DayTime, TimeError};
