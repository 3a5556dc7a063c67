//! Callback delivery.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use demograph_pipeline::BatchReport;

use crate::error::{WorkerError, WorkerResult};

/// Callback client configuration.
#[derive(Debug, Clone)]
pub struct CallbackConfig {
    /// Request timeout
    pub timeout: Duration,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl CallbackConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            timeout: Duration::from_secs(
                std::env::var("CALLBACK_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// Message envelope the callback endpoint expects.
#[derive(Debug, Serialize)]
struct CallbackPayload {
    msgtype: &'static str,
    text: CallbackText,
}

#[derive(Debug, Serialize)]
struct CallbackText {
    content: String,
}

/// Fire-and-forget result delivery.
///
/// One POST per job; a failed delivery is the end of the road for that
/// job's result (no retry, no dead-letter).
pub struct CallbackClient {
    http: Client,
}

impl CallbackClient {
    /// Create a new callback client.
    pub fn new(config: CallbackConfig) -> WorkerResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http })
    }

    /// Create from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        Self::new(CallbackConfig::from_env())
    }

    /// POST the summary content to the callback URL.
    pub async fn deliver(&self, url: &str, content: String) -> WorkerResult<()> {
        let payload = CallbackPayload {
            msgtype: "text",
            text: CallbackText { content },
        };

        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| WorkerError::callback_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkerError::callback_failed(format!(
                "callback endpoint returned {}",
                response.status()
            )));
        }

        debug!(%url, "callback delivered");
        Ok(())
    }
}

/// Human-readable summary embedding the full mapping and phase timings.
pub fn summary_content(report: &BatchReport) -> WorkerResult<String> {
    let predictions = serde_json::to_string(&report.predictions)?;
    Ok(format!(
        "Prediction: {}. It took {:.2} seconds to get the images and {:.2} to make the predictions",
        predictions,
        report.fetch_elapsed.as_secs_f64(),
        report.analyze_elapsed.as_secs_f64(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use indexmap::IndexMap;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use demograph_models::Prediction;

    fn report() -> BatchReport {
        let mut predictions = IndexMap::new();
        predictions.insert(
            "a".to_string(),
            Prediction {
                age: Some(30),
                gender: Some("Man".to_string()),
            },
        );
        predictions.insert("b".to_string(), Prediction::null());
        BatchReport {
            predictions,
            detection_rate: 50.0,
            fetch_elapsed: Duration::from_millis(1500),
            analyze_elapsed: Duration::from_millis(2250),
        }
    }

    #[test]
    fn test_summary_content_embeds_mapping_and_timings() {
        let content = summary_content(&report()).unwrap();
        assert!(content.starts_with("Prediction: {\"a\":{\"age\":30,\"gender\":\"Man\"}"));
        assert!(content.contains("\"b\":{\"age\":null,\"gender\":null}"));
        assert!(content.contains("1.50 seconds to get the images"));
        assert!(content.contains("2.25 to make the predictions"));
    }

    #[tokio::test]
    async fn test_deliver_posts_json_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(serde_json::json!({ "msgtype": "text" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = CallbackClient::new(CallbackConfig::default()).unwrap();
        client
            .deliver(&format!("{}/hook", server.uri()), "hello".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_deliver_reports_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = CallbackClient::new(CallbackConfig::default()).unwrap();
        let error = client
            .deliver(&format!("{}/hook", server.uri()), "hello".to_string())
            .await
            .unwrap_err();
        assert!(matches!(error, WorkerError::CallbackFailed(_)));
    }
}
