//! Identifier newtypes.
//!
//! Routes, stops, and trip starts are keyed by small numeric identifiers in
//! the schedule source. Wrapping them keeps the three id spaces from being
//! mixed up at call sites.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw source identifier.
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// The raw identifier value.
            pub const fn get(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type! {
    /// Stable identifier of a route.
    RouteId
}

id_type! {
    /// Stable identifier of a stop. Shared across routes.
    StopId
}

id_type! {
    /// Identifier of a trip start, unique within its route.
    TripId
}
