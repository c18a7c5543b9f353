//! Month navigation for the calendar widget
//!
//! Every navigation issues a new [`RequestToken`]. A fetch whose token has
//! been superseded by a newer navigation is dropped when it completes, so a
//! slow response for an old month can never replace a newer grid.

use std::sync::atomic::{AtomicU64, Ordering};

use ns_core::grid::{next_month, previous_month};
use ns_core::{Grid, Locale, Time, WidgetConfig};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::source::{fetch_and_assign, EventSource};

/// Identity of one month request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Calendar widget state: configuration, event source and displayed month
pub struct CalendarWidget<S> {
    config: WidgetConfig,
    locale: Locale,
    source: S,
    /// Most recently issued token
    latest: AtomicU64,
    /// (month, year) of the last grid handed out
    displayed: RwLock<(u32, i32)>,
}

impl<S: EventSource> CalendarWidget<S> {
    /// Create a widget showing the current month
    pub fn new(config: WidgetConfig, source: S) -> Self {
        let today = Time::today();
        Self::starting_at(config, source, today.month(), today.year())
    }

    /// Create a widget positioned at a given month
    pub fn starting_at(config: WidgetConfig, source: S, month: u32, year: i32) -> Self {
        Self {
            locale: config.locale(),
            config,
            source,
            latest: AtomicU64::new(0),
            displayed: RwLock::new((month, year)),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Issue a new token, superseding every earlier one
    pub fn request(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer request has been issued since `token`
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// The (month, year) currently displayed
    pub async fn displayed(&self) -> (u32, i32) {
        *self.displayed.read().await
    }

    /// Fetch and assign the grid for a month
    ///
    /// Returns `Ok(None)` when a newer request was issued while this one
    /// was in flight; its result, including any error, is discarded.
    pub async fn show(&self, month: u32, year: i32) -> Result<Option<Grid>> {
        let token = self.request();
        debug!(?token, month, year, "Requesting month");

        let result = fetch_and_assign(&self.source, month, year).await;

        // Check and update under one guard so the order of writes follows
        // the order of tokens.
        let mut displayed = self.displayed.write().await;
        if !self.is_current(token) {
            debug!(?token, month, year, "Discarding superseded response");
            return Ok(None);
        }

        let grid = result?;
        *displayed = (month, year);
        drop(displayed);
        info!(
            month,
            year,
            eventful_days = grid.days().filter(|c| c.has_events()).count(),
            "Month ready"
        );

        Ok(Some(grid))
    }

    /// Reload the displayed month
    pub async fn current(&self) -> Result<Option<Grid>> {
        let (month, year) = self.displayed().await;
        self.show(month, year).await
    }

    /// Show the month after the displayed one
    pub async fn next(&self) -> Result<Option<Grid>> {
        let (month, year) = self.displayed().await;
        let (month, year) = next_month(month, year);
        self.show(month, year).await
    }

    /// Show the month before the displayed one
    pub async fn previous(&self) -> Result<Option<Grid>> {
        let (month, year) = self.displayed().await;
        let (month, year) = previous_month(month, year);
        self.show(month, year).await
    }

    /// Show the month containing today
    pub async fn today(&self) -> Result<Option<Grid>> {
        let today = Time::today();
        self.show(today.month(), today.year()).await
    }

    /// Titles of the previous/next buttons, e.g. `("Januar 2024", "März 2024")`
    pub fn nav_titles(&self, month: u32, year: i32) -> (String, String) {
        let (prev_month, prev_year) = previous_month(month, year);
        let (next_month, next_year) = next_month(month, year);
        (
            self.locale.month_title(prev_month, prev_year),
            self.locale.month_title(next_month, next_year),
        )
    }

    /// Short heading of a month, e.g. `Feb 2024`
    pub fn heading(&self, month: u32, year: i32) -> String {
        self.locale.short_heading(month, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalendarError;
    use async_trait::async_trait;
    use ns_core::RawEvent;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Source answering each month after a configurable delay
    #[derive(Default)]
    struct DelayedSource {
        delays_ms: HashMap<(u32, i32), u64>,
        failing: Vec<(u32, i32)>,
    }

    #[async_trait]
    impl EventSource for DelayedSource {
        async fn fetch_month(&self, month: u32, year: i32) -> Result<Vec<RawEvent>> {
            let delay = self.delays_ms.get(&(month, year)).copied().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if self.failing.contains(&(month, year)) {
                return Err(CalendarError::NetworkFailure("unreachable".to_string()));
            }

            Ok(vec![RawEvent {
                title: format!("Termin {}/{}", month, year),
                description: None,
                location: None,
                start: format!("{}-{:02}-15", year, month),
                end: format!("{}-{:02}-15", year, month),
            }])
        }
    }

    fn widget(source: DelayedSource, month: u32, year: i32) -> CalendarWidget<DelayedSource> {
        CalendarWidget::starting_at(WidgetConfig::default(), source, month, year)
    }

    #[test]
    fn test_tokens_supersede() {
        let w = widget(DelayedSource::default(), 2, 2024);
        let first = w.request();
        assert!(w.is_current(first));

        let second = w.request();
        assert!(second > first);
        assert!(!w.is_current(first));
        assert!(w.is_current(second));
    }

    #[tokio::test]
    async fn test_show_updates_displayed_month() {
        let w = widget(DelayedSource::default(), 2, 2024);

        let grid = w.show(3, 2024).await.unwrap().unwrap();
        assert_eq!((grid.month, grid.year), (3, 2024));
        assert_eq!(grid.cell(2024, 3, 15).unwrap().events.len(), 1);
        assert_eq!(w.displayed().await, (3, 2024));
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let source = DelayedSource {
            delays_ms: HashMap::from([((1, 2024), 200), ((2, 2024), 10)]),
            ..Default::default()
        };
        let w = widget(source, 12, 2023);

        let (slow, fast) = tokio::join!(w.show(1, 2024), w.show(2, 2024));

        assert!(slow.unwrap().is_none());
        let grid = fast.unwrap().unwrap();
        assert_eq!(grid.month, 2);
        assert_eq!(w.displayed().await, (2, 2024));
    }

    #[tokio::test]
    async fn test_superseded_error_is_discarded() {
        let source = DelayedSource {
            delays_ms: HashMap::from([((1, 2024), 100)]),
            failing: vec![(1, 2024)],
        };
        let w = widget(source, 12, 2023);

        let (failed, ok) = tokio::join!(w.show(1, 2024), w.show(2, 2024));
        assert!(failed.unwrap().is_none());
        assert!(ok.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_request_issued_while_waiting_for_lock_supersedes() {
        let w = widget(DelayedSource::default(), 12, 2023);
        let w = &w;

        // A reader keeps the displayed month locked while a newer request
        // is issued.
        let reader = w.displayed.read().await;
        let (shown, newer) = tokio::join!(w.show(1, 2024), async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let token = w.request();
            drop(reader);
            token
        });

        assert!(shown.unwrap().is_none());
        assert!(w.is_current(newer));
        assert_eq!(w.displayed().await, (12, 2023));
    }

    #[tokio::test]
    async fn test_failure_keeps_displayed_month() {
        let source = DelayedSource {
            failing: vec![(3, 2024)],
            ..Default::default()
        };
        let w = widget(source, 2, 2024);

        let result = w.next().await;
        assert!(matches!(result, Err(CalendarError::NetworkFailure(_))));
        assert_eq!(w.displayed().await, (2, 2024));
    }

    #[tokio::test]
    async fn test_navigation_wraps_years() {
        let w = widget(DelayedSource::default(), 12, 2024);

        let grid = w.next().await.unwrap().unwrap();
        assert_eq!((grid.month, grid.year), (1, 2025));

        let grid = w.previous().await.unwrap().unwrap();
        assert_eq!((grid.month, grid.year), (12, 2024));

        let grid = w.current().await.unwrap().unwrap();
        assert_eq!((grid.month, grid.year), (12, 2024));
    }

    #[tokio::test]
    async fn test_navigation_past_supported_range() {
        let w = widget(DelayedSource::default(), 12, 2100);
        let result = w.next().await;
        assert!(matches!(
            result,
            Err(CalendarError::Core(ns_core::Error::InvalidRange { month: 1, year: 2101 }))
        ));
        assert_eq!(w.displayed().await, (12, 2100));
    }

    #[test]
    fn test_titles() {
        let w = widget(DelayedSource::default(), 1, 2024);
        assert_eq!(
            w.nav_titles(1, 2024),
            ("Dezember 2023".to_string(), "Februar 2024".to_string())
        );
        assert_eq!(w.heading(2, 2024), "Feb 2024");
    }
}
