//! Upstream HTTP Fetch Module
//!
//! Thin JSON fetch capability over reqwest. A non-2xx status or malformed
//! body is surfaced as an upstream failure; timeouts are enforced here so
//! handlers never hang on a dead upstream.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{GatewayError, Result};

/// Per-request timeout for upstream calls.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

// == Fetcher Trait ==
/// JSON fetch capability injected into the handlers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns the response body as JSON.
    ///
    /// # Errors
    /// Returns [`GatewayError::Upstream`] on transport failure, non-2xx
    /// status, or a body that is not valid JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

// == HTTP Fetcher ==
/// Production fetcher on a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    // == Constructor ==
    /// Creates a fetcher with connection pooling and a fixed request timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .user_agent(concat!("rsguide-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("upstream request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Upstream(format!(
                "upstream returned status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(format!("invalid upstream JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Trait-object usability check: handlers hold `Arc<dyn Fetcher>`
    struct CannedFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for CannedFetcher {
        async fn fetch_json(&self, _url: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::json!({"ok": true}))
        }
    }

    #[tokio::test]
    async fn test_fetcher_as_trait_object() {
        let fetcher: std::sync::Arc<dyn Fetcher> = std::sync::Arc::new(CannedFetcher {
            calls: AtomicUsize::new(0),
        });

        let body = fetcher.fetch_json("https://example.invalid/data").await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_http_fetcher_reports_transport_failure() {
        // Reserved TLD, never resolves
        let fetcher = HttpFetcher::new();
        let result = fetcher.fetch_json("http://gateway-test.invalid/profile").await;

        match result {
            Err(GatewayError::Upstream(msg)) => {
                assert!(msg.contains("upstream request failed"))
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
