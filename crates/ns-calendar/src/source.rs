//! Event source abstraction
//!
//! The grid engine does not care where events come from; anything that can
//! deliver the raw events of a month implements [`EventSource`].

use async_trait::async_trait;
use ns_core::{assign_events, build_grid, parse_events, Grid, RawEvent};
use tracing::debug;

use crate::error::Result;

/// Provider of raw events for one month
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch the raw events of a month
    ///
    /// # Arguments
    /// * `month` - 1-based month
    /// * `year` - four-digit year
    async fn fetch_month(&self, month: u32, year: i32) -> Result<Vec<RawEvent>>;
}

/// Build the grid for a month and fill it with the source's events
///
/// The range check happens before any request is made.
pub async fn fetch_and_assign<S: EventSource + ?Sized>(
    source: &S,
    month: u32,
    year: i32,
) -> Result<Grid> {
    let grid = build_grid(month, year)?;

    let raw = source.fetch_month(month, year).await?;
    let events = parse_events(raw)?;
    debug!(month, year, events = events.len(), "Assigning events to grid");

    Ok(assign_events(grid, &events))
}
