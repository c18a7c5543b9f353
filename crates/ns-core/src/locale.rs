//! Localized names and labels used when presenting a grid

use serde::{Deserialize, Serialize};

/// Weekday names, Monday first
pub const DEFAULT_DAYS: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];

/// Month names, January first
pub const DEFAULT_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

pub const DEFAULT_EVENT_SINGULAR: &str = "Ein Termin";
pub const DEFAULT_EVENT_PLURAL: &str = "$num Termine";
pub const DEFAULT_EVENT_NONE: &str = "Keine Termine";

/// Names and labels for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Exactly 7 weekday names, Monday first
    pub days: Vec<String>,
    /// Exactly 12 month names
    pub months: Vec<String>,
    /// Label for a day with one event
    pub event_singular: String,
    /// Label for a day with several events; `$num` is replaced by the count
    pub event_plural: String,
    /// Label for a day without events
    pub event_none: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS.iter().map(|d| d.to_string()).collect(),
            months: DEFAULT_MONTHS.iter().map(|m| m.to_string()).collect(),
            event_singular: DEFAULT_EVENT_SINGULAR.to_string(),
            event_plural: DEFAULT_EVENT_PLURAL.to_string(),
            event_none: DEFAULT_EVENT_NONE.to_string(),
        }
    }
}

impl Locale {
    /// Name of a month (1-based); empty for an unknown month
    pub fn month_name(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|i| self.months.get(i as usize))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// `Februar 2024`
    pub fn month_title(&self, month: u32, year: i32) -> String {
        format!("{} {}", self.month_name(month), year)
    }

    /// `Feb 2024`
    pub fn short_heading(&self, month: u32, year: i32) -> String {
        let short: String = self.month_name(month).chars().take(3).collect();
        format!("{} {}", short, year)
    }

    /// Two-letter weekday abbreviations, Monday first
    pub fn weekday_abbreviations(&self) -> Vec<String> {
        self.days
            .iter()
            .map(|d| d.chars().take(2).collect())
            .collect()
    }
}
