//! Schedule data sources.
//!
//! The core never fetches anything itself: a source delivers the raw row
//! sets ([`RawSchedule`](crate::schedule::RawSchedule)) and the graph is
//! built from them before any planning runs. Two sources are provided: a
//! PostgREST-style HTTP API ([`RestScheduleSource`]) and a static weekly
//! schedule file ([`FileScheduleSource`]) for development and offline
//! deployments.

mod file;
mod rest;

use crate::schedule::RawSchedule;

pub use file::FileScheduleSource;
pub use rest::{RestConfig, RestScheduleSource};

/// Errors from a schedule source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Invalid API key or missing credentials
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Reading the schedule file failed
    #[error("failed to read schedule file: {0}")]
    Io(#[from] std::io::Error),
}

/// A configured schedule source.
///
/// Concrete variants rather than a trait object: the set of sources is closed
/// and the async methods stay plain.
pub enum ScheduleSource {
    Rest(RestScheduleSource),
    File(FileScheduleSource),
}

impl ScheduleSource {
    /// Fetch the full raw schedule: route details, trips, and stops.
    pub async fn fetch(&self) -> Result<RawSchedule, SourceError> {
        match self {
            ScheduleSource::Rest(rest) => rest.fetch().await,
            ScheduleSource::File(file) => file.fetch(),
        }
    }
}
