//! ns-calendar: event fetching and month navigation
//!
//! This crate connects the grid engine of `ns-core` to the calendar
//! event API.
//!
//! ## Features
//!
//! - `EventSource` trait for anything that delivers raw events per month
//! - HTTP client for the calendar API
//! - `CalendarWidget` navigation that drops superseded responses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ns_calendar::{CalendarWidget, HttpEventSource};
//! use ns_core::WidgetConfig;
//!
//! let config = WidgetConfig::load()?;
//! let source = HttpEventSource::new(&config)?;
//! let widget = CalendarWidget::new(config, source);
//!
//! if let Some(grid) = widget.show(2, 2024).await? {
//!     for week in &grid.weeks {
//!         // render
//!     }
//! }
//! ```

pub mod client;
pub mod error;
pub mod source;
pub mod widget;

pub use client::HttpEventSource;
pub use error::{CalendarError, Result};
pub use source::{fetch_and_assign, EventSource};
pub use widget::{CalendarWidget, RequestToken};
