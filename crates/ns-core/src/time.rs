//! Immutable calendar time values
//!
//! A [`Time`] is either a whole calendar day (a *date-only* value) or a point
//! in time with second resolution. There is no timezone: everything is naive
//! local-date arithmetic on the proleptic Gregorian calendar.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

const SECONDS_PER_DAY: i64 = 86_400;

/// Earliest year a [`Time`] can hold
pub const MIN_YEAR: i32 = 0;
/// Latest year a [`Time`] can hold; keeps the canonical form at four digits
pub const MAX_YEAR: i32 = 9999;

/// A calendar date with an optional time of day
///
/// Values are validated on construction and never change afterwards.
/// Equality, ordering and hashing all go through [`Time::instant`], so a
/// date-only value and the midnight date-time of the same day compare equal.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    is_date: bool,
}

impl Time {
    /// Create a new time value
    ///
    /// `is_date` defaults to `true` exactly when `hour` is `None`. For
    /// date-only values the time-of-day fields are stored as zero.
    ///
    /// # Errors
    /// `Error::InvalidDate` when the year (0..=9999), month, day or time of
    /// day is out of range.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: Option<u32>,
        minute: u32,
        second: u32,
        is_date: Option<bool>,
    ) -> Result<Self> {
        let is_date = is_date.unwrap_or(hour.is_none());

        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::InvalidDate(format!(
                "year {} out of range ({}..={})",
                year, MIN_YEAR, MAX_YEAR
            )));
        }

        let max_day = checked_days_in_month(month, year)?;
        if day == 0 || day > max_day {
            return Err(Error::InvalidDate(format!(
                "day {} out of range for {:04}-{:02} (1..={})",
                day, year, month, max_day
            )));
        }

        if is_date {
            return Ok(Self {
                year,
                month,
                day,
                hour: 0,
                minute: 0,
                second: 0,
                is_date,
            });
        }

        let hour = hour.unwrap_or(0);
        if hour > 23 || minute > 59 || second > 59 {
            return Err(Error::InvalidDate(format!(
                "time {:02}:{:02}:{:02} out of range",
                hour, minute, second
            )));
        }

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            is_date,
        })
    }

    /// Create a date-only value
    pub fn build_date(year: i32, month: u32, day: u32) -> Result<Self> {
        Self::new(year, month, day, None, 0, 0, Some(true))
    }

    /// Create a date-time value
    pub fn date_time(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self> {
        Self::new(year, month, day, Some(hour), minute, second, Some(false))
    }

    /// Today's local date
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        Self::date_unchecked(now.year(), now.month(), now.day())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    /// True when this value represents a whole day
    pub fn is_date(&self) -> bool {
        self.is_date
    }

    /// The date component of this value
    pub fn date(&self) -> Self {
        Self {
            hour: 0,
            minute: 0,
            second: 0,
            is_date: true,
            ..*self
        }
    }

    /// Whether both values fall on the same calendar day
    pub fn same_day(&self, other: &Self) -> bool {
        self.year == other.year && self.month == other.month && self.day == other.day
    }

    /// Days since 1970-01-01 (negative before)
    pub fn days_since_epoch(&self) -> i64 {
        let year = i64::from(self.year);

        let days_before_year =
            365 * (year - 1970) + leap_years_through(year - 1) - leap_years_through(1969);
        let days_before_month: i64 = (1..self.month)
            .map(|m| i64::from(days_in_month(m, self.year)))
            .sum();

        days_before_year + days_before_month + i64::from(self.day) - 1
    }

    /// Seconds since 1970-01-01T00:00:00, used for ordering
    pub fn instant(&self) -> i64 {
        self.days_since_epoch() * SECONDS_PER_DAY
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// Compare two values by instant
    pub fn compare(&self, other: &Self) -> Ordering {
        self.instant().cmp(&other.instant())
    }

    /// Zero-based weekday, Monday = 0 … Sunday = 6
    pub fn weekday(&self) -> u32 {
        // 1970-01-01 was a Thursday
        (self.days_since_epoch() + 3).rem_euclid(7) as u32
    }

    /// The following calendar day (date-only); `None` after 9999-12-31
    pub fn next_day(&self) -> Option<Self> {
        let (year, month, day) = if self.day < days_in_month(self.month, self.year) {
            (self.year, self.month, self.day + 1)
        } else if self.month < 12 {
            (self.year, self.month + 1, 1)
        } else if self.year < MAX_YEAR {
            (self.year + 1, 1, 1)
        } else {
            return None;
        };
        Some(Self::date_unchecked(year, month, day))
    }

    /// The preceding calendar day (date-only); `None` before 0000-01-01
    pub fn previous_day(&self) -> Option<Self> {
        let (year, month, day) = if self.day > 1 {
            (self.year, self.month, self.day - 1)
        } else if self.month > 1 {
            (self.year, self.month - 1, days_in_month(self.month - 1, self.year))
        } else if self.year > MIN_YEAR {
            (self.year - 1, 12, 31)
        } else {
            return None;
        };
        Some(Self::date_unchecked(year, month, day))
    }

    /// `HH:MM` of this value
    pub fn hour_minute(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// Human-readable date, e.g. `10. Februar 2024`
    ///
    /// `month_names` is indexed by `month - 1`; a missing name falls back to
    /// the month number.
    pub fn to_localized_string<S: AsRef<str>>(
        &self,
        month_names: &[S],
        between_day_month: &str,
        between_month_year: &str,
    ) -> String {
        let month = month_names
            .get(self.month as usize - 1)
            .map(|name| name.as_ref().to_string())
            .unwrap_or_else(|| self.month.to_string());

        format!(
            "{:02}{}{}{}{}",
            self.day, between_day_month, month, between_month_year, self.year
        )
    }

    /// [`Time::to_localized_string`] with the default `". "` / `" "` separators
    pub fn to_localized_string_default<S: AsRef<str>>(&self, month_names: &[S]) -> String {
        self.to_localized_string(month_names, ". ", " ")
    }

    // Only for arithmetic that stays inside the calendar by construction.
    fn date_unchecked(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            is_date: true,
        }
    }
}

impl TryFrom<NaiveDate> for Time {
    type Error = Error;

    fn try_from(date: NaiveDate) -> Result<Self> {
        Self::build_date(date.year(), date.month(), date.day())
    }
}

impl TryFrom<NaiveDateTime> for Time {
    type Error = Error;

    fn try_from(dt: NaiveDateTime) -> Result<Self> {
        Self::date_time(
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
        )
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.instant() == other.instant()
    }
}

impl Eq for Time {}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Time {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant().hash(state);
    }
}

impl fmt::Display for Time {
    /// `YYYY-MM-DD` for dates, `YYYY-MM-DDTHH:MM:SS` otherwise
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if !self.is_date {
            write!(f, "T{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        }
        Ok(())
    }
}

impl FromStr for Time {
    type Err = Error;

    /// Parse `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]`
    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (date, time) = match raw.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (raw, None),
        };

        let date_segments: Vec<&str> = date.split('-').collect();
        let [year, month, day] = date_segments.as_slice() else {
            return Err(Error::MalformedTimestamp(format!(
                "expected YYYY-MM-DD date part in {:?}",
                raw
            )));
        };
        let year: i32 = parse_segment(year, raw)?;
        let month: u32 = parse_segment(month, raw)?;
        let day: u32 = parse_segment(day, raw)?;

        let Some(time) = time else {
            return Self::build_date(year, month, day);
        };

        let time_segments: Vec<&str> = time.split(':').collect();
        let (hour, minute, second) = match time_segments.as_slice() {
            [hour, minute] => (parse_segment(hour, raw)?, parse_segment(minute, raw)?, 0),
            [hour, minute, second] => (
                parse_segment(hour, raw)?,
                parse_segment(minute, raw)?,
                parse_segment(second, raw)?,
            ),
            _ => {
                return Err(Error::MalformedTimestamp(format!(
                    "expected HH:MM:SS time part in {:?}",
                    raw
                )));
            }
        };

        Self::date_time(year, month, day, hour, minute, second)
    }
}

fn parse_segment<T: FromStr>(segment: &str, raw: &str) -> Result<T> {
    segment.parse().map_err(|_| {
        Error::MalformedTimestamp(format!("non-numeric segment {:?} in {:?}", segment, raw))
    })
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`; 0 for a month outside 1..=12
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// [`days_in_month`] that rejects months outside 1..=12
pub fn checked_days_in_month(month: u32, year: i32) -> Result<u32> {
    match days_in_month(month, year) {
        0 => Err(Error::InvalidDate(format!("month {} out of range (1..=12)", month))),
        days => Ok(days),
    }
}

// Leap years in (0, year]; extends to negative years with floor division.
fn leap_years_through(year: i64) -> i64 {
    year.div_euclid(4) - year.div_euclid(100) + year.div_euclid(400)
}
