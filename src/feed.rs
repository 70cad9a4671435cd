//! Feed client: fetches the live event collection over HTTP
//!
//! Builds a GET query over a fixed `[now - window, now]` time range and
//! a magnitude floor, then parses the feature collection. A failed fetch
//! means "no update" for the caller: previous view state is retained,
//! never replaced with an empty set.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::core::{parse_feed_body, Event};

/// Default FDSN event query endpoint (override with QUAKE_FEED_URL).
pub const DEFAULT_FEED_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Retry attempts per scheduled fetch.
const RETRY_ATTEMPTS: u32 = 3;
/// Initial backoff delay; doubles per failed attempt.
const RETRY_INITIAL_DELAY: std::time::Duration = std::time::Duration::from_millis(500);

/// A fetch failure. Either way the caller keeps its previous events.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network failure, or the endpoint answered with an error status
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The body is not a feature collection
    #[error("feed response is not a feature collection: {0}")]
    Parse(#[from] serde_json::Error),
}

/// HTTP client for the event feed.
pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Client against the default public endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_FEED_URL)
    }

    /// Client against a specific endpoint (tests, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Query URL for a magnitude floor and a window ending at `now`.
    pub fn query_url(&self, min_magnitude: f64, window_days: u32, now: DateTime<Utc>) -> String {
        let start = now - Duration::days(i64::from(window_days));
        format!(
            "{}?format=geojson&starttime={}&endtime={}&minmagnitude={}",
            self.base_url,
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
            min_magnitude,
        )
    }

    /// Fetch one batch of events. Single attempt.
    pub async fn fetch(&self, min_magnitude: f64, window_days: u32) -> Result<Vec<Event>, FeedError> {
        let url = self.query_url(min_magnitude, window_days, Utc::now());
        debug!(%url, "Fetching feed");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let events = parse_feed_body(&body)?;

        debug!(count = events.len(), "Feed fetch complete");
        Ok(events)
    }

    /// Fetch with bounded retry and doubling backoff.
    ///
    /// Returns the last error when every attempt fails.
    pub async fn fetch_with_retry(
        &self,
        min_magnitude: f64,
        window_days: u32,
    ) -> Result<Vec<Event>, FeedError> {
        let mut delay = RETRY_INITIAL_DELAY;
        let mut attempt = 1;
        loop {
            match self.fetch(min_magnitude, window_days).await {
                Ok(events) => return Ok(events),
                Err(err) if attempt < RETRY_ATTEMPTS => {
                    warn!(attempt, error = %err, retry_in_ms = delay.as_millis() as u64, "Feed fetch failed, retrying");
                    sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(attempt, error = %err, "Feed fetch failed, giving up");
                    return Err(err);
                }
            }
        }
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new()
    }
}
