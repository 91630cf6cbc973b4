//! PostgREST-style schedule source.
//!
//! Fetches the `route_details`, `schedules`, and `stops` tables from a
//! PostgREST-compatible endpoint (the schedule database exposes one), using
//! per-table `select=` queries with embedded foreign rows. Authentication is
//! a plain `apikey` header plus the matching bearer token.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{RouteId, StopId, TripId};
use crate::schedule::{RawSchedule, RouteDetailRow, StopRow, TripRow};

use super::SourceError;

/// Default maximum concurrent requests against the schedule API.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the REST schedule source.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL of the PostgREST endpoint (without the `/rest/v1` suffix).
    pub base_url: String,
    /// API key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Maximum concurrent requests.
    pub max_concurrent: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl RestConfig {
    /// Create a new config for the given endpoint and key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP client for the schedule database's REST endpoint.
pub struct RestScheduleSource {
    http: reqwest::Client,
    base_url: String,
    semaphore: Semaphore,
}

impl RestScheduleSource {
    /// Create a new source with the given configuration.
    pub fn new(config: RestConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| SourceError::Api {
            status: 0,
            message: "invalid API key format".to_string(),
        })?;
        headers.insert("apikey", api_key);

        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|_| {
            SourceError::Api {
                status: 0,
                message: "invalid API key format".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Semaphore::new(config.max_concurrent),
        })
    }

    /// Fetch all three row sets concurrently.
    pub async fn fetch(&self) -> Result<RawSchedule, SourceError> {
        let (route_details, trips, stops) = futures::try_join!(
            self.list_route_details(),
            self.list_trips(),
            self.list_stops()
        )?;

        debug!(
            route_details = route_details.len(),
            trips = trips.len(),
            stops = stops.len(),
            "fetched schedule rows"
        );

        Ok(RawSchedule {
            route_details,
            trips,
            stops,
        })
    }

    /// The per-route stop sequences with embedded stop and route rows.
    pub async fn list_route_details(&self) -> Result<Vec<RouteDetailRow>, SourceError> {
        let dtos: Vec<RouteDetailDto> = self
            .get(
                "route_details",
                "route_id,route_name,stop_number,leg_minutes,\
                 stops(stop_id,stop_name),routes(route_description)",
            )
            .await?;
        Ok(dtos.into_iter().map(RouteDetailDto::into_row).collect())
    }

    /// The trip-start rows.
    pub async fn list_trips(&self) -> Result<Vec<TripRow>, SourceError> {
        let dtos: Vec<ScheduleDto> = self
            .get(
                "schedules",
                "schedule_id,route_id,start_time,weekend,is_break,break_min",
            )
            .await?;
        Ok(dtos.into_iter().map(ScheduleDto::into_row).collect())
    }

    /// The stop directory.
    pub async fn list_stops(&self) -> Result<Vec<StopRow>, SourceError> {
        let dtos: Vec<StopDto> = self.get("stops", "stop_id,stop_name").await?;
        Ok(dtos.into_iter().map(StopDto::into_row).collect())
    }

    /// GET one table with a PostgREST `select=` projection.
    async fn get<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
    ) -> Result<Vec<T>, SourceError> {
        let _permit = self.semaphore.acquire().await.map_err(|_| SourceError::Api {
            status: 0,
            message: "semaphore closed".to_string(),
        })?;

        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let response = self.http.get(&url).query(&[("select", select)]).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SourceError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

// Wire DTOs matching the REST schema's column names. Optional columns default
// so a sparse row never sinks the whole fetch.

#[derive(Debug, Deserialize)]
struct StopDto {
    stop_id: u32,
    stop_name: String,
}

impl StopDto {
    fn into_row(self) -> StopRow {
        StopRow {
            stop_id: StopId::new(self.stop_id),
            stop_name: self.stop_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RouteDescDto {
    #[serde(default)]
    route_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RouteDetailDto {
    route_id: u32,
    route_name: String,
    stop_number: u32,
    #[serde(default)]
    leg_minutes: Option<u32>,
    stops: StopDto,
    routes: RouteDescDto,
}

impl RouteDetailDto {
    fn into_row(self) -> RouteDetailRow {
        RouteDetailRow {
            route_id: RouteId::new(self.route_id),
            route_name: self.route_name,
            route_description: self.routes.route_description.unwrap_or_default(),
            position: self.stop_number,
            leg_minutes: self.leg_minutes.unwrap_or(0),
            stop: self.stops.into_row(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScheduleDto {
    schedule_id: u32,
    route_id: u32,
    start_time: String,
    #[serde(default)]
    weekend: Option<bool>,
    #[serde(default)]
    is_break: Option<bool>,
    #[serde(default)]
    break_min: Option<u32>,
}

impl ScheduleDto {
    fn into_row(self) -> TripRow {
        TripRow {
            trip_id: TripId::new(self.schedule_id),
            route_id: RouteId::new(self.route_id),
            start_time: self.start_time,
            weekend: self.weekend.unwrap_or(false),
            is_layover: self.is_break.unwrap_or(false),
            layover_minutes: self.break_min.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_detail_dto_flattens_embedded_rows() {
        let json = r#"{
            "route_id": 2,
            "route_name": "C2",
            "stop_number": 3,
            "leg_minutes": 5,
            "stops": {"stop_id": 6, "stop_name": "Transit Center"},
            "routes": {"route_description": "Campus circulator"}
        }"#;
        let dto: RouteDetailDto = serde_json::from_str(json).unwrap();
        let row = dto.into_row();

        assert_eq!(row.route_id, RouteId::new(2));
        assert_eq!(row.position, 3);
        assert_eq!(row.leg_minutes, 5);
        assert_eq!(row.stop.stop_id, StopId::new(6));
        assert_eq!(row.stop.stop_name, "Transit Center");
        assert_eq!(row.route_description, "Campus circulator");
    }

    #[test]
    fn schedule_dto_defaults_optional_columns() {
        let json = r#"{
            "route_id": 1,
            "schedule_id": 9,
            "start_time": "07:30:00"
        }"#;
        let dto: ScheduleDto = serde_json::from_str(json).unwrap();
        let row = dto.into_row();

        assert_eq!(row.trip_id, TripId::new(9));
        assert_eq!(row.start_time, "07:30:00");
        assert!(!row.weekend);
        assert!(!row.is_layover);
        assert_eq!(row.layover_minutes, 0);
    }

    #[test]
    fn null_description_becomes_empty() {
        let json = r#"{
            "route_id": 1,
            "route_name": "C1",
            "stop_number": 1,
            "leg_minutes": null,
            "stops": {"stop_id": 1, "stop_name": "Library"},
            "routes": {"route_description": null}
        }"#;
        let dto: RouteDetailDto = serde_json::from_str(json).unwrap();
        let row = dto.into_row();

        assert_eq!(row.leg_minutes, 0);
        assert_eq!(row.route_description, "");
    }
}
