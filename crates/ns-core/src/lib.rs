//! ns-core: calendar date and grid engine
//!
//! Provides the immutable [`Time`] value, month grid construction,
//! parsing of raw API events and the assignment of events to the days
//! they span. Everything in this crate is synchronous and pure.

pub mod agenda;
pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod locale;
pub mod time;

pub use agenda::{day_agenda, event_count_label, Timespan};
pub use config::WidgetConfig;
pub use error::{Error, Result};
pub use event::{parse_event, parse_events, parse_time, Event, RawEvent};
pub use grid::{assign_events, build_grid, DayCell, Grid, Placement, Week};
pub use locale::Locale;
pub use time::{days_in_month, is_leap_year, Time};
