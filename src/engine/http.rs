//! HTTP client for the query-execution service.
//!
//! Implements the QueryEngine trait over a single JSON POST to the
//! configured endpoint.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::engine::{QueryEngine, QueryOutcome, QueryRequest};
use crate::error::{HarvestError, Result};

/// Default timeout for execution requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query engine client configuration.
#[derive(Debug, Clone)]
pub struct QueryEngineConfig {
    /// Endpoint accepting execution requests.
    pub endpoint: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl QueryEngineConfig {
    /// Creates a new config for the given endpoint.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// HTTP query engine client.
#[derive(Debug, Clone)]
pub struct HttpQueryEngine {
    config: QueryEngineConfig,
    client: Client,
}

impl HttpQueryEngine {
    /// Creates a new client with the given configuration.
    pub fn new(config: QueryEngineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                HarvestError::query_execution(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl QueryEngine for HttpQueryEngine {
    async fn execute(&self, request: &QueryRequest) -> Result<QueryOutcome> {
        debug!("Submitting execution request to {}", self.config.endpoint);

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HarvestError::query_execution("Execution request timed out")
                } else if e.is_connect() {
                    HarvestError::query_execution(format!(
                        "Failed to connect to query engine at {}",
                        self.config.endpoint
                    ))
                } else {
                    HarvestError::query_execution(format!("Execution request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            HarvestError::query_execution(format!("Failed to read query engine response: {e}"))
        })?;

        if !status.is_success() {
            // Surface the HTTP status through the outcome so the trigger
            // composes a single diagnostic.
            let mut outcome = serde_json::from_str::<QueryOutcome>(&body).unwrap_or_default();
            outcome.success = false;
            outcome.status_code = Some(status.as_u16());
            if outcome.error.is_none() {
                let trimmed = body.trim();
                outcome.error = Some(if trimmed.is_empty() {
                    format!("query engine returned HTTP {status}")
                } else {
                    trimmed.to_string()
                });
            }
            return Ok(outcome);
        }

        serde_json::from_str(&body).map_err(|e| {
            HarvestError::query_execution(format!("Failed to parse query engine response: {e}"))
        })
    }
}
