//! Calendar events as delivered by the event API and after parsing

use serde::{Deserialize, Serialize};

use crate::time::Time;
use crate::Result;

/// Event directly converted from the API JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawEvent {
    /// Event title (iCal summary)
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
    pub start: String,
    pub end: String,
}

/// Parsed event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Event title (iCal summary)
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub start: Time,
    pub end: Time,
}

impl Event {
    /// Create a new event
    pub fn new(title: impl Into<String>, start: Time, end: Time) -> Self {
        Self {
            title: title.into(),
            description: None,
            location: None,
            start,
            end,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// True when the event takes place on the given calendar day
    ///
    /// Only the date components are compared; the time of day is ignored.
    pub fn affects_date(&self, date: &Time) -> bool {
        let date = date.date();
        self.start.date() <= date && date <= self.end.date()
    }

    /// True when the event ends before it starts
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// True when either bound is a whole day
    pub fn is_all_day(&self) -> bool {
        self.start.is_date() || self.end.is_date()
    }
}

/// Parse a raw API timestamp
pub fn parse_time(raw: &str) -> Result<Time> {
    raw.parse()
}

/// Convert a [`RawEvent`] into an [`Event`]
pub fn parse_event(raw: RawEvent) -> Result<Event> {
    Ok(Event {
        start: parse_time(&raw.start)?,
        end: parse_time(&raw.end)?,
        title: raw.title,
        description: non_empty(raw.description),
        location: non_empty(raw.location),
    })
}

/// Convert a batch of raw events, failing on the first malformed one
pub fn parse_events(raw: Vec<RawEvent>) -> Result<Vec<Event>> {
    raw.into_iter().map(parse_event).collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
