//! HTTP event API client

use std::time::Duration;

use async_trait::async_trait;
use ns_core::{RawEvent, WidgetConfig};
use reqwest::Client;
use tracing::{debug, error, info};

use crate::error::{CalendarError, Result};
use crate::source::EventSource;

/// Event source backed by the calendar HTTP API
///
/// Requests `GET <base_url><year>/<month>` and expects a JSON array of raw
/// events. The base URL is used verbatim, so it normally ends with `/`.
#[derive(Clone)]
pub struct HttpEventSource {
    client: Client,
    base_url: String,
}

impl HttpEventSource {
    /// Create a client from the widget configuration
    pub fn new(config: &WidgetConfig) -> Result<Self> {
        let base_url = config
            .require_url()
            .map_err(|e| CalendarError::Configuration(e.to_string()))?;

        Self::with_timeout(base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Create a client for a base URL with a request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CalendarError::Configuration(e.to_string()))?;

        info!("Event API client initialized for: {}", base_url);

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// URL of the events of one month (month not zero-padded)
    pub fn month_url(&self, month: u32, year: i32) -> String {
        format!("{}{}/{}", self.base_url, year, month)
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_month(&self, month: u32, year: i32) -> Result<Vec<RawEvent>> {
        let url = self.month_url(month, year);

        debug!("Fetching events from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CalendarError::NetworkFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Event API request failed: {} - {}", status, error_text);
            return Err(CalendarError::NetworkFailure(format!(
                "Request failed: {} - {}",
                status, error_text
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| CalendarError::NetworkFailure(e.to_string()))?;
        let events: Vec<RawEvent> = serde_json::from_str(&text).map_err(|e| {
            CalendarError::NetworkFailure(format!("Invalid event JSON from {}: {}", url, e))
        })?;

        info!("Fetched {} events for {}/{}", events.len(), month, year);
        Ok(events)
    }
}
