//! Static schedule-file source.
//!
//! Reads the weekly schedule export: a JSON array of routes, each with a
//! `weekday` and/or `weekend` list of stops and their departure times. The
//! format carries no numeric identifiers or leg durations, so this source
//! derives them the same way every time: stop ids from the alphabetical
//! order of unique stop names, route ids from file order, and a fixed
//! assumed leg duration between consecutive stops.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::{RouteId, StopId, TripId};
use crate::schedule::{RawSchedule, RouteDetailRow, StopRow, TripRow};

use super::SourceError;

/// Assumed travel minutes between consecutive stops when the file format
/// carries none.
const DEFAULT_ASSUMED_LEG_MINUTES: u32 = 3;

#[derive(Debug, Deserialize)]
struct RouteEntry {
    route: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    weekday: Option<Vec<StopTimesEntry>>,
    #[serde(default)]
    weekend: Option<Vec<StopTimesEntry>>,
}

#[derive(Debug, Deserialize)]
struct StopTimesEntry {
    stop: String,
    #[serde(default)]
    times: Vec<String>,
}

/// Schedule source backed by a static JSON file.
pub struct FileScheduleSource {
    path: PathBuf,
    assumed_leg_minutes: u32,
}

impl FileScheduleSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            assumed_leg_minutes: DEFAULT_ASSUMED_LEG_MINUTES,
        }
    }

    /// Override the assumed inter-stop leg duration.
    pub fn with_leg_minutes(mut self, minutes: u32) -> Self {
        self.assumed_leg_minutes = minutes;
        self
    }

    /// Read and derive the full raw schedule.
    pub fn fetch(&self) -> Result<RawSchedule, SourceError> {
        let json = std::fs::read_to_string(&self.path)?;
        let entries: Vec<RouteEntry> =
            serde_json::from_str(&json).map_err(|e| SourceError::Json {
                message: e.to_string(),
                body: None,
            })?;

        // Stop ids from the alphabetical order of unique names, so rebuilds
        // from the same file assign the same ids.
        let mut names: BTreeSet<&str> = BTreeSet::new();
        for entry in &entries {
            for stop_times in entry.weekday.iter().chain(entry.weekend.iter()).flatten() {
                names.insert(&stop_times.stop);
            }
        }
        let stop_ids: HashMap<&str, StopId> = names
            .iter()
            .enumerate()
            .map(|(i, &name)| (name, StopId::new(i as u32 + 1)))
            .collect();
        let stops: Vec<StopRow> = names
            .iter()
            .map(|&name| StopRow {
                stop_id: stop_ids[name],
                stop_name: name.to_string(),
            })
            .collect();

        let mut route_details = Vec::new();
        let mut trips = Vec::new();
        let mut next_trip_id = 1u32;

        for (index, entry) in entries.iter().enumerate() {
            let route_id = RouteId::new(index as u32 + 1);
            let description = entry
                .description
                .clone()
                .unwrap_or_else(|| entry.route.clone());

            // The stop sequence comes from whichever timetable is present,
            // weekday preferred; both timetables contribute trips.
            let sequence = entry.weekday.as_ref().or(entry.weekend.as_ref());
            let Some(sequence) = sequence else {
                continue;
            };

            for (i, stop_times) in sequence.iter().enumerate() {
                route_details.push(RouteDetailRow {
                    route_id,
                    route_name: entry.route.clone(),
                    route_description: description.clone(),
                    position: i as u32 + 1,
                    leg_minutes: if i == 0 { 0 } else { self.assumed_leg_minutes },
                    stop: StopRow {
                        stop_id: stop_ids[stop_times.stop.as_str()],
                        stop_name: stop_times.stop.clone(),
                    },
                });
            }

            for (timetable, weekend) in [(&entry.weekday, false), (&entry.weekend, true)] {
                let Some(timetable) = timetable else {
                    continue;
                };
                // Trip starts are the unique departure times across all of
                // the route's stops, in time order.
                let mut seen: HashSet<&str> = HashSet::new();
                let mut starts: Vec<&str> = timetable
                    .iter()
                    .flat_map(|st| st.times.iter())
                    .map(String::as_str)
                    .filter(|&t| seen.insert(t))
                    .collect();
                starts.sort_unstable();

                for start in starts {
                    trips.push(TripRow {
                        trip_id: TripId::new(next_trip_id),
                        route_id,
                        start_time: start.to_string(),
                        weekend,
                        is_layover: false,
                        layover_minutes: 0,
                    });
                    next_trip_id += 1;
                }
            }
        }

        debug!(
            path = %self.path.display(),
            routes = entries.len(),
            stops = stops.len(),
            trips = trips.len(),
            "derived schedule from file"
        );

        Ok(RawSchedule {
            route_details,
            trips,
            stops,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_schedule(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const SAMPLE: &str = r#"[
        {
            "route": "C1",
            "description": "Campus loop",
            "weekday": [
                {"stop": "Library", "times": ["07:00", "08:00"]},
                {"stop": "Gym", "times": ["07:05", "08:05"]}
            ]
        },
        {
            "route": "E1",
            "weekend": [
                {"stop": "Apartments", "times": ["10:00"]},
                {"stop": "Library", "times": ["10:10"]}
            ]
        }
    ]"#;

    #[test]
    fn stop_ids_are_alphabetical() {
        let file = write_schedule(SAMPLE);
        let raw = FileScheduleSource::new(file.path()).fetch().unwrap();

        let names: Vec<_> = raw.stops.iter().map(|s| s.stop_name.as_str()).collect();
        assert_eq!(names, vec!["Apartments", "Gym", "Library"]);
        assert_eq!(raw.stops[0].stop_id, StopId::new(1));
        assert_eq!(raw.stops[2].stop_id, StopId::new(3));
    }

    #[test]
    fn route_ids_follow_file_order() {
        let file = write_schedule(SAMPLE);
        let raw = FileScheduleSource::new(file.path()).fetch().unwrap();

        assert_eq!(raw.route_details[0].route_id, RouteId::new(1));
        assert_eq!(raw.route_details[0].route_name, "C1");
        let e1: Vec<_> = raw
            .route_details
            .iter()
            .filter(|r| r.route_id == RouteId::new(2))
            .collect();
        assert_eq!(e1[0].route_name, "E1");
        // No description in the file: falls back to the route name
        assert_eq!(e1[0].route_description, "E1");
    }

    #[test]
    fn leg_minutes_default_after_first_stop() {
        let file = write_schedule(SAMPLE);
        let raw = FileScheduleSource::new(file.path()).fetch().unwrap();

        let c1: Vec<_> = raw
            .route_details
            .iter()
            .filter(|r| r.route_id == RouteId::new(1))
            .collect();
        assert_eq!(c1[0].position, 1);
        assert_eq!(c1[0].leg_minutes, 0);
        assert_eq!(c1[1].position, 2);
        assert_eq!(c1[1].leg_minutes, DEFAULT_ASSUMED_LEG_MINUTES);
    }

    #[test]
    fn leg_minutes_override() {
        let file = write_schedule(SAMPLE);
        let raw = FileScheduleSource::new(file.path())
            .with_leg_minutes(7)
            .fetch()
            .unwrap();

        let gym = raw
            .route_details
            .iter()
            .find(|r| r.stop.stop_name == "Gym")
            .unwrap();
        assert_eq!(gym.leg_minutes, 7);
    }

    #[test]
    fn trips_are_unique_sorted_and_flagged() {
        let file = write_schedule(SAMPLE);
        let raw = FileScheduleSource::new(file.path()).fetch().unwrap();

        let c1_trips: Vec<_> = raw
            .trips
            .iter()
            .filter(|t| t.route_id == RouteId::new(1))
            .collect();
        // Four distinct times across the two stops
        let starts: Vec<_> = c1_trips.iter().map(|t| t.start_time.as_str()).collect();
        assert_eq!(starts, vec!["07:00", "07:05", "08:00", "08:05"]);
        assert!(c1_trips.iter().all(|t| !t.weekend));

        let e1_trips: Vec<_> = raw
            .trips
            .iter()
            .filter(|t| t.route_id == RouteId::new(2))
            .collect();
        assert!(e1_trips.iter().all(|t| t.weekend));
    }

    #[test]
    fn duplicate_times_collapse() {
        let file = write_schedule(
            r#"[{
                "route": "C1",
                "weekday": [
                    {"stop": "A", "times": ["07:00", "07:00"]},
                    {"stop": "B", "times": ["07:00"]}
                ]
            }]"#,
        );
        let raw = FileScheduleSource::new(file.path()).fetch().unwrap();
        assert_eq!(raw.trips.len(), 1);
    }

    #[test]
    fn trip_ids_are_unique_across_routes() {
        let file = write_schedule(SAMPLE);
        let raw = FileScheduleSource::new(file.path()).fetch().unwrap();

        let mut ids: Vec<_> = raw.trips.iter().map(|t| t.trip_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), raw.trips.len());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = FileScheduleSource::new("/nonexistent/routes.json").fetch();
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let file = write_schedule("{not json");
        let result = FileScheduleSource::new(file.path()).fetch();
        assert!(matches!(result, Err(SourceError::Json { .. })));
    }
}
