//! Month grid construction and event assignment
//!
//! A [`Grid`] covers one target month padded to whole Monday-first weeks
//! with days of the neighbouring months. Building the grid and assigning
//! events are pure functions of (month, year, events).

use serde::Serialize;
use tracing::{debug, warn};

use crate::event::Event;
use crate::time::{days_in_month, Time};
use crate::{Error, Result};

/// Earliest year a grid can be built for
pub const MIN_YEAR: i32 = 1970;
/// Latest year a grid can be built for
pub const MAX_YEAR: i32 = 2100;

const DAYS_PER_WEEK: u32 = 7;

/// Where a cell lies relative to the grid's target month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    Current,
    After,
}

/// One calendar day of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: Time,
    /// Events taking place on this day, in input order
    pub events: Vec<Event>,
}

impl DayCell {
    fn new(date: Time) -> Self {
        Self {
            date,
            events: Vec::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// Position of this cell relative to the given target month
    pub fn placement(&self, month: u32, year: i32) -> Placement {
        match (self.year(), self.month()).cmp(&(year, month)) {
            std::cmp::Ordering::Less => Placement::Before,
            std::cmp::Ordering::Equal => Placement::Current,
            std::cmp::Ordering::Greater => Placement::After,
        }
    }

    pub fn is_today(&self, today: &Time) -> bool {
        self.date.same_day(today)
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// One Monday-first week of exactly seven cells
pub type Week = Vec<DayCell>;

/// Day cells for one month view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub month: u32,
    pub year: i32,
    pub weeks: Vec<Week>,
}

impl Grid {
    /// All cells in display order
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flatten()
    }

    /// Look up the cell for a calendar date
    pub fn cell(&self, year: i32, month: u32, day: u32) -> Option<&DayCell> {
        self.days()
            .find(|c| c.year() == year && c.month() == month && c.day() == day)
    }

    /// Placement of a cell relative to this grid's month
    pub fn placement(&self, cell: &DayCell) -> Placement {
        cell.placement(self.month, self.year)
    }

    /// The (month, year) before this grid's month
    pub fn previous_month(&self) -> (u32, i32) {
        previous_month(self.month, self.year)
    }

    /// The (month, year) after this grid's month
    pub fn next_month(&self) -> (u32, i32) {
        next_month(self.month, self.year)
    }
}

/// The (month, year) preceding the given one
pub fn previous_month(month: u32, year: i32) -> (u32, i32) {
    if month <= 1 { (12, year - 1) } else { (month - 1, year) }
}

/// The (month, year) following the given one
pub fn next_month(month: u32, year: i32) -> (u32, i32) {
    if month >= 12 { (1, year + 1) } else { (month + 1, year) }
}

/// Check that a grid can be built for (month, year)
pub fn check_range(month: u32, year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
        return Err(Error::InvalidRange { month, year });
    }
    Ok(())
}

/// Build the empty grid for a month
///
/// Week 0 starts with the days of the previous month that precede the 1st
/// in its week; the last week is completed with days of the next month.
///
/// # Errors
/// `Error::InvalidRange` when `year` is outside 1970..=2100 or `month`
/// outside 1..=12.
pub fn build_grid(month: u32, year: i32) -> Result<Grid> {
    check_range(month, year)?;

    let first = Time::build_date(year, month, 1)?;
    let first_weekday = first.weekday();
    let month_days = days_in_month(month, year);

    let mut leading = Vec::with_capacity(first_weekday as usize);
    let mut cursor = first;
    for _ in 0..first_weekday {
        cursor = cursor
            .previous_day()
            .ok_or(Error::InvalidRange { month, year })?;
        leading.push(DayCell::new(cursor));
    }
    leading.reverse();

    let days_in_first_week = DAYS_PER_WEEK - first_weekday;
    let week_count = 1 + (month_days - days_in_first_week).div_ceil(DAYS_PER_WEEK);

    let mut weeks = Vec::with_capacity(week_count as usize);
    let mut week = leading;
    let mut cursor = first;
    for _ in 0..week_count {
        while week.len() < DAYS_PER_WEEK as usize {
            week.push(DayCell::new(cursor));
            cursor = cursor.next_day().ok_or(Error::InvalidRange { month, year })?;
        }
        weeks.push(std::mem::replace(
            &mut week,
            Vec::with_capacity(DAYS_PER_WEEK as usize),
        ));
    }

    debug!(month, year, weeks = weeks.len(), "Built month grid");

    Ok(Grid { month, year, weeks })
}

/// Attach every event to each cell whose date it spans
///
/// An event lands on a cell when `start.date() <= cell date <= end.date()`.
/// Events ending before they start are never attached.
pub fn assign_events(mut grid: Grid, events: &[Event]) -> Grid {
    for event in events.iter().filter(|e| e.is_inverted()) {
        warn!(
            title = %event.title,
            start = %event.start,
            end = %event.end,
            "Event ends before it starts, skipping"
        );
    }

    for cell in grid.weeks.iter_mut().flatten() {
        cell.events = events
            .iter()
            .filter(|e| !e.is_inverted() && e.affects_date(&cell.date))
            .cloned()
            .collect();
    }

    grid
}
