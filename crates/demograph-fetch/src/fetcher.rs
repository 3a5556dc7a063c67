//! Concurrent HTTP image fetcher.

use std::collections::HashMap;
use std::time::Duration;

use futures_util::future::join_all;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::error::{FetchError, FetcherResult};

/// Fetcher configuration.
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// Optional per-request timeout. Unset means a request can wait on the
    /// remote host indefinitely, so one slow host prolongs the whole batch.
    pub request_timeout: Option<Duration>,
}

impl FetchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            request_timeout: std::env::var("FETCH_REQUEST_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
        }
    }
}

/// How a single URL retrieval ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// HTTP 200 with a body.
    Ok,
    /// Any other HTTP status.
    Http(u16),
    /// Transport-level failure (DNS, refused, reset, timeout).
    Connection,
}

/// Outcome of one URL retrieval. Exactly one exists per distinct URL.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    /// Body bytes, present only on [`FetchStatus::Ok`].
    pub payload: Option<Vec<u8>>,
    pub status: FetchStatus,
}

/// Concurrent image fetcher.
pub struct ImageFetcher {
    http: Client,
}

impl ImageFetcher {
    /// Create a new fetcher.
    pub fn new(config: FetchConfig) -> FetcherResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(FetchError::ClientBuild)?;
        Ok(Self { http })
    }

    /// Create from environment variables.
    pub fn from_env() -> FetcherResult<Self> {
        Self::new(FetchConfig::from_env())
    }

    /// Retrieve every URL concurrently.
    ///
    /// All requests are launched together and the call returns once each
    /// has completed or failed. Completion order is arbitrary; the result
    /// map always holds exactly one entry per requested URL, and a failed
    /// URL is recorded rather than dropped or raised.
    pub async fn fetch_all(&self, urls: &[String]) -> HashMap<String, FetchResult> {
        let tasks = urls.iter().map(|url| self.fetch_one(url.clone()));
        join_all(tasks)
            .await
            .into_iter()
            .map(|result| (result.url.clone(), result))
            .collect()
    }

    async fn fetch_one(&self, url: String) -> FetchResult {
        match self.http.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                match response.bytes().await {
                    Ok(body) => {
                        debug!(%url, bytes = body.len(), "fetched image");
                        FetchResult {
                            url,
                            payload: Some(body.to_vec()),
                            status: FetchStatus::Ok,
                        }
                    }
                    Err(e) => {
                        warn!(%url, "failed to read response body: {e}");
                        FetchResult {
                            url,
                            payload: None,
                            status: FetchStatus::Connection,
                        }
                    }
                }
            }
            Ok(response) => {
                let status = response.status().as_u16();
                warn!(%url, status, "image fetch returned non-200 status");
                FetchResult {
                    url,
                    payload: None,
                    status: FetchStatus::Http(status),
                }
            }
            Err(e) => {
                warn!(%url, "connection error: {e}");
                FetchResult {
                    url,
                    payload: None,
                    status: FetchStatus::Connection,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_config_defaults() {
        let config = FetchConfig::default();
        assert!(config.request_timeout.is_none());
    }

    #[tokio::test]
    async fn test_fetch_all_returns_payload_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
            .mount(&server)
            .await;

        let fetcher = ImageFetcher::new(FetchConfig::default()).unwrap();
        let url = format!("{}/1.jpg", server.uri());
        let results = fetcher.fetch_all(&[url.clone()]).await;

        let result = &results[&url];
        assert_eq!(result.status, FetchStatus::Ok);
        assert_eq!(result.payload.as_deref(), Some(b"jpeg-bytes".as_slice()));
    }

    #[tokio::test]
    async fn test_fetch_all_records_http_error_without_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = ImageFetcher::new(FetchConfig::default()).unwrap();
        let url = format!("{}/missing.jpg", server.uri());
        let results = fetcher.fetch_all(&[url.clone()]).await;

        let result = &results[&url];
        assert_eq!(result.status, FetchStatus::Http(404));
        assert!(result.payload.is_none());
    }

    #[tokio::test]
    async fn test_fetch_all_classifies_connection_failure() {
        // Nothing listens on this port.
        let fetcher = ImageFetcher::new(FetchConfig::default()).unwrap();
        let url = "http://127.0.0.1:9/unreachable.jpg".to_string();
        let results = fetcher.fetch_all(&[url.clone()]).await;

        assert_eq!(results[&url].status, FetchStatus::Connection);
        assert!(results[&url].payload.is_none());
    }

    #[tokio::test]
    async fn test_fetch_all_covers_every_url_despite_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/good.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bad.jpg"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = ImageFetcher::new(FetchConfig::default()).unwrap();
        let urls = vec![
            format!("{}/good.jpg", server.uri()),
            format!("{}/bad.jpg", server.uri()),
            "http://127.0.0.1:9/gone.jpg".to_string(),
        ];
        let results = fetcher.fetch_all(&urls).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[&urls[0]].status, FetchStatus::Ok);
        assert_eq!(results[&urls[1]].status, FetchStatus::Http(500));
        assert_eq!(results[&urls[2]].status, FetchStatus::Connection);
    }
}
