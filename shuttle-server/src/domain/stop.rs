//! Stop records.

use super::ids::StopId;

/// A named shuttle stop.
///
/// Stops are derived once from source data and shared by reference across
/// routes. When the source lacks explicit identifiers, the file source
/// assigns them deterministically from the deduplicated stop names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
