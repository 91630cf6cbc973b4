//! Shuttle wall-clock time handling.
//!
//! The timetable stores times as "HH:MM" or "HH:MM:SS" strings in the shuttle
//! system's fixed civil timezone. This module represents them as integer
//! seconds since local midnight, so schedule arithmetic is plain integer math
//! with explicit day-rollover handling instead of calendar-date juggling.

use std::cmp::Ordering;
use std::fmt;

/// Seconds in one civil day.
const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A wall-clock instant on the service-day timeline, stored as seconds since
/// local midnight.
///
/// Values at or past 24:00 are legal: they represent an event that rolls past
/// midnight (a trip that departs at 23:50 and arrives twenty minutes later
/// arrives at raw 24:10). [`DayTime::day_offset`] reports how many midnights
/// a value has crossed and [`DayTime::time_of_day`] folds it back onto the
/// clock face. Ordering compares raw seconds, so a rolled-over arrival sorts
/// after everything earlier in the same service day.
///
/// # Examples
///
/// ```
/// use shuttle_server::domain::DayTime;
///
/// let t = DayTime::parse("14:30").unwrap();
/// assert_eq!(t.to_string(), "14:30");
///
/// let late = DayTime::parse("23:50").unwrap().plus_minutes(20);
/// assert_eq!(late.day_offset(), 1);
/// assert_eq!(late.time_of_day().to_string(), "00:10");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayTime(u32);

impl DayTime {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: DayTime = DayTime(0);

    /// Create a time from raw seconds since local midnight.
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Create a time from clock components.
    ///
    /// Returns `None` when a component is out of range.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self(hour * 3600 + minute * 60 + second))
    }

    /// Parse a time from "HH:MM" or "HH:MM:SS" format.
    ///
    /// A single-digit hour is accepted ("7:05"), matching the loose format
    /// found in schedule exports.
    ///
    /// # Examples
    ///
    /// ```
    /// use shuttle_server::domain::DayTime;
    ///
    /// assert!(DayTime::parse("00:00").is_ok());
    /// assert!(DayTime::parse("23:59:59").is_ok());
    /// assert!(DayTime::parse("7:05").is_ok());
    ///
    /// assert!(DayTime::parse("24:00").is_err());
    /// assert!(DayTime::parse("12:60").is_err());
    /// assert!(DayTime::parse("noon").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');

        let hour = parse_component(parts.next(), 1, 2)
            .ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_component(parts.next(), 2, 2)
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let second = match parts.next() {
            None => 0,
            Some(sec) => {
                let sec = parse_component(Some(sec), 2, 2)
                    .ok_or_else(|| TimeError::new("invalid second digits"))?;
                if sec > 59 {
                    return Err(TimeError::new("second must be 0-59"));
                }
                sec
            }
        };

        if parts.next().is_some() {
            return Err(TimeError::new("expected HH:MM or HH:MM:SS"));
        }

        Ok(Self(hour * 3600 + minute * 60 + second))
    }

    /// Raw seconds since local midnight (may be ≥ 24h after arithmetic).
    pub const fn seconds(&self) -> u32 {
        self.0
    }

    /// How many midnights this value has rolled past.
    pub const fn day_offset(&self) -> u8 {
        (self.0 / SECONDS_PER_DAY) as u8
    }

    /// The clock-face time, folded back into a single day.
    pub const fn time_of_day(&self) -> DayTime {
        DayTime(self.0 % SECONDS_PER_DAY)
    }

    /// Returns the hour on the clock face (0-23).
    pub const fn hour(&self) -> u32 {
        (self.0 % SECONDS_PER_DAY) / 3600
    }

    /// Returns the minute on the clock face (0-59).
    pub const fn minute(&self) -> u32 {
        (self.0 % 3600) / 60
    }

    /// Add whole minutes, rolling past midnight when needed.
    pub const fn plus_minutes(&self, minutes: u32) -> DayTime {
        DayTime(self.0 + minutes * 60)
    }

    /// Subtract whole minutes; `None` if the result would precede midnight of
    /// the service day.
    pub fn checked_sub_minutes(&self, minutes: u32) -> Option<DayTime> {
        self.0.checked_sub(minutes * 60).map(DayTime)
    }

    /// Signed whole minutes from `self` to `other` on the raw timeline.
    ///
    /// Negative when `other` is earlier. Seconds are truncated toward zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use shuttle_server::domain::DayTime;
    ///
    /// let a = DayTime::parse("10:00").unwrap();
    /// let b = DayTime::parse("10:45").unwrap();
    /// assert_eq!(a.minutes_until(b), 45);
    /// assert_eq!(b.minutes_until(a), -45);
    /// ```
    pub fn minutes_until(&self, other: DayTime) -> i64 {
        (i64::from(other.0) - i64::from(self.0)) / 60
    }
}

impl Ord for DayTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for DayTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DayTime({:02}:{:02}:{:02}+{}d)",
            self.hour(),
            self.minute(),
            self.0 % 60,
            self.day_offset()
        )
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse a decimal component of `min_len..=max_len` ASCII digits.
fn parse_component(part: Option<&str>, min_len: usize, max_len: usize) -> Option<u32> {
    let part = part?;
    if part.len() < min_len || part.len() > max_len {
        return None;
    }
    let mut value = 0u32;
    for b in part.bytes() {
        value = value * 10 + (b as char).to_digit(10)?;
    }
    Some(value)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_hm()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    proptest! {
        /// Any valid HH:MM string parses successfully
        #[test]
        fn valid_hhmm_parses(s in valid_hm()) {
            prop_assert!(DayTime::parse(&s).is_ok());
        }

        /// Parse then display roundtrips
        #[test]
        fn parse_display_roundtrip(s in valid_hm()) {
            let parsed = DayTime::parse(&s).unwrap();
            prop_assert_eq!(parsed.to_string(), s);
        }

        /// Invalid hour is rejected
        #[test]
        fn invalid_hour_rejected(hour in 24u32..100, minute in 0u32..60) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(DayTime::parse(&s).is_err());
        }

        /// Invalid minute is rejected
        #[test]
        fn invalid_minute_rejected(hour in 0u32..24, minute in 60u32..100) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(DayTime::parse(&s).is_err());
        }

        /// Adding then subtracting the same minutes returns the original
        #[test]
        fn add_sub_identity(secs in 0u32..200_000, minutes in 0u32..2_000) {
            let t = DayTime::from_seconds(secs);
            prop_assert_eq!(t.plus_minutes(minutes).checked_sub_minutes(minutes), Some(t));
        }

        /// minutes_until is consistent with ordering
        #[test]
        fn minutes_until_consistent(a in 0u32..200_000, b in 0u32..200_000) {
            let ta = DayTime::from_seconds(a);
            let tb = DayTime::from_seconds(b);
            let mins = ta.minutes_until(tb);
            if ta < tb {
                prop_assert!(mins >= 0);
            } else if ta > tb {
                prop_assert!(mins <= 0);
            } else {
                prop_assert_eq!(mins, 0);
            }
        }

        /// day_offset and time_of_day decompose the raw value
        #[test]
        fn rollover_decomposition(secs in 0u32..500_000) {
            let t = DayTime::from_seconds(secs);
            let rebuilt = u32::from(t.day_offset()) * 24 * 60 * 60 + t.time_of_day().seconds();
            prop_assert_eq!(rebuilt, secs);
        }
    }
}
