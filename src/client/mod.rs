mod error;

pub use error::FetchError;

use std::future::Future;

use log::error;
use serde::de::DeserializeOwned;

use crate::models::{HistoryEntry, MetricsSnapshot};

pub const CURRENT_METRICS_PATH: &str = "/api/current_metrics";
pub const HISTORY_PATH: &str = "/api/history";
pub const DEFAULT_HISTORY_HOURS: u32 = 24;

/// Where the update loop gets its snapshots from.
pub trait MetricsSource: Send + Sync + 'static {
    /// One attempt. `None` means "no data this time"; the failure is already logged.
    fn fetch_metrics(&self) -> impl Future<Output = Option<MetricsSnapshot>> + Send;
}

/// HTTP client for the burnout monitor backend. Single attempt per call, no
/// retries, no caching.
#[derive(Clone)]
pub struct MetricsClient {
    client: reqwest::Client,
    base_url: String,
}

impl MetricsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("burnout-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn current_metrics_url(&self) -> String {
        format!("{}{}", self.base_url, CURRENT_METRICS_PATH)
    }

    /// Zero hours is treated as one; the backend window must be positive.
    pub fn history_url(&self, hours: u32) -> String {
        format!("{}{}?hours={}", self.base_url, HISTORY_PATH, hours.max(1))
    }

    pub async fn try_fetch_metrics(&self) -> Result<MetricsSnapshot, FetchError> {
        self.get_json(self.current_metrics_url()).await
    }

    pub async fn try_fetch_history(&self, hours: u32) -> Result<Vec<HistoryEntry>, FetchError> {
        self.get_json(self.history_url(hours)).await
    }

    /// Current snapshot, or `None` after logging why it could not be fetched.
    pub async fn fetch_metrics(&self) -> Option<MetricsSnapshot> {
        match self.try_fetch_metrics().await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                error!("Error fetching current metrics: {err}");
                None
            }
        }
    }

    pub async fn fetch_history(&self, hours: u32) -> Option<Vec<HistoryEntry>> {
        match self.try_fetch_history(hours).await {
            Ok(entries) => Some(entries),
            Err(err) => {
                error!("Error fetching {hours}h history: {err}");
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

impl MetricsSource for MetricsClient {
    fn fetch_metrics(&self) -> impl Future<Output = Option<MetricsSnapshot>> + Send {
        MetricsClient::fetch_metrics(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_without_double_slashes() {
        let client = MetricsClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.current_metrics_url(),
            "http://localhost:8000/api/current_metrics"
        );
        assert_eq!(
            client.history_url(DEFAULT_HISTORY_HOURS),
            "http://localhost:8000/api/history?hours=24"
        );
    }

    #[test]
    fn history_window_is_at_least_one_hour() {
        let client = MetricsClient::new("http://localhost:8000");
        assert_eq!(client.history_url(0), "http://localhost:8000/api/history?hours=1");
    }

    #[tokio::test]
    async fn unreachable_backend_yields_no_data() {
        // Port 9 (discard) on loopback is not expected to have an HTTP listener.
        let client = MetricsClient::new("http://127.0.0.1:9");
        let err = client.try_fetch_metrics().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.url(), "http://127.0.0.1:9/api/current_metrics");
        assert!(client.fetch_metrics().await.is_none());
    }
}
