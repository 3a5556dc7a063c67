//! Analyzer service HTTP client.

use std::io::Cursor;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::types::{Action, AnalyzeRequest, DetectorBackend, FaceAttributes, HealthResponse};

/// Configuration for the analyzer client.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Base URL of the analysis service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Face detector backend to request
    pub detector: DetectorBackend,
    /// Max retries for transport-level failures
    pub max_retries: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8501".to_string(),
            timeout: Duration::from_secs(120),
            detector: DetectorBackend::default(),
            max_retries: 2,
        }
    }
}

impl AnalyzerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ANALYZER_URL")
                .unwrap_or_else(|_| "http://localhost:8501".to_string()),
            timeout: Duration::from_secs(
                std::env::var("ANALYZER_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            detector: std::env::var("ANALYZER_DETECTOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            max_retries: std::env::var("ANALYZER_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the face-attribute analysis service.
pub struct AnalyzerClient {
    http: Client,
    config: AnalyzerConfig,
}

impl AnalyzerClient {
    /// Create a new analyzer client.
    pub fn new(config: AnalyzerConfig) -> AnalyzerResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AnalyzerError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> AnalyzerResult<Self> {
        Self::new(AnalyzerConfig::from_env())
    }

    /// Check if the analysis service is healthy.
    pub async fn health_check(&self) -> AnalyzerResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("analyzer health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("analyzer health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Analyze one decoded image for age and gender.
    ///
    /// A 422 from the service means it found no usable face and maps to
    /// [`AnalyzerError::NoFace`]; that outcome is terminal for the image
    /// and never retried.
    pub async fn analyze(&self, image: &DynamicImage) -> AnalyzerResult<FaceAttributes> {
        let request = self.build_request(image)?;
        let url = format!("{}/analyze", self.config.base_url);

        debug!("sending analysis request to {}", url);

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(AnalyzerError::Network)
            })
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<FaceAttributes>().await?),
            StatusCode::UNPROCESSABLE_ENTITY => Err(AnalyzerError::NoFace),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AnalyzerError::RequestFailed(format!(
                    "analyzer returned {}: {}",
                    status, body
                )))
            }
        }
    }

    fn build_request(&self, image: &DynamicImage) -> AnalyzerResult<AnalyzeRequest> {
        let mut buffer = Vec::new();
        image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;

        Ok(AnalyzeRequest {
            image: BASE64.encode(&buffer),
            actions: Action::ALL.to_vec(),
            detector_backend: self.config.detector,
        })
    }

    /// Execute with retry logic for transport-level failures.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> AnalyzerResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = AnalyzerResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "analyzer request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| AnalyzerError::RequestFailed("Unknown error".to_string())))
    }
}
