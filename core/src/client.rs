use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, instrument};

use crate::config::CheckerConfig;
use crate::errors::{CheckerError, CheckerResult};
use crate::types::{ErrorBody, HistoryResponse, SymptomAnalysis, SymptomCheckRequest};

/// The two backend calls the client makes
#[async_trait]
pub trait SymptomBackend: Send + Sync + Debug {
    /// `POST /check-symptoms` with already-trimmed symptom text
    async fn check_symptoms(&self, symptoms: &str) -> CheckerResult<SymptomAnalysis>;

    /// `GET /history`
    async fn fetch_history(&self) -> CheckerResult<HistoryResponse>;
}

/// Type alias for Arc-wrapped SymptomBackend trait objects
pub type SymptomBackendRef = Arc<dyn SymptomBackend>;

/// HTTP client for the symptom checker backend
#[derive(Debug, Clone)]
pub struct SymptomClient {
    client: Client,
    base_url: String,
}

impl SymptomClient {
    /// Create a client from configuration
    pub fn new(config: &CheckerConfig) -> CheckerResult<Self> {
        Self::with_timeout(&config.base_url()?, config.request_timeout()?)
    }

    /// Create a client against `base_url` with a fixed per-request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> CheckerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckerError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-2xx response into a backend error carrying its detail, if any
    async fn backend_error(response: Response) -> CheckerError {
        let status_code = response.status().as_u16();
        let detail = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.message()),
            Err(e) => {
                debug!(status_code, error = %e, "Failed to read error response body");
                None
            }
        };
        CheckerError::Backend {
            status_code,
            detail,
        }
    }
}

fn transport_error(e: reqwest::Error) -> CheckerError {
    if e.is_timeout() {
        CheckerError::Transport(format!("Request timed out: {}", e))
    } else {
        CheckerError::Transport(format!("Failed to send request: {}", e))
    }
}

#[async_trait]
impl SymptomBackend for SymptomClient {
    #[instrument(skip(self, symptoms), fields(symptoms_len = symptoms.len()))]
    async fn check_symptoms(&self, symptoms: &str) -> CheckerResult<SymptomAnalysis> {
        let request = SymptomCheckRequest {
            symptoms: symptoms.to_string(),
        };

        let response = self
            .client
            .post(self.url("/check-symptoms"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(%status, "Received symptom check response");
        if !status.is_success() {
            return Err(Self::backend_error(response).await);
        }

        let body = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice::<SymptomAnalysis>(&body)
            .map_err(|e| CheckerError::Response(format!("Failed to parse analysis: {}", e)))
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self) -> CheckerResult<HistoryResponse> {
        let response = self
            .client
            .get(self.url("/history"))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(%status, "Received history response");
        if !status.is_success() {
            return Err(Self::backend_error(response).await);
        }

        let body = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice::<HistoryResponse>(&body)
            .map_err(|e| CheckerError::Response(format!("Failed to parse history: {}", e)))
    }
}
