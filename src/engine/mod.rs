//! Remote query-execution boundary.
//!
//! The query engine runs the signed query against the refiner's data and
//! materializes results into the local snapshot. This module models only
//! the trigger call and its reported outcome; the engine itself is
//! opaque.

mod http;
mod mock;

pub use http::{HttpQueryEngine, QueryEngineConfig};
pub use mock::MockQueryEngine;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One invocation of the remote query engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    /// Query text to run against the refiner's data.
    pub query: String,

    /// Signature authorizing the query.
    pub query_signature: String,

    /// Snapshot path the engine materializes results into.
    pub data_source: String,

    /// Compute job identifier.
    pub compute_job_id: u64,

    /// Data refiner identifier.
    pub data_refiner_id: u64,

    /// Query parameters, forwarded verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// Outcome reported by the query engine for a single execution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryOutcome {
    /// Whether the engine accepted and completed the execution.
    #[serde(default)]
    pub success: bool,

    /// Error message for a failed execution.
    #[serde(default)]
    pub error: Option<String>,

    /// Status code accompanying a failure, when the transport has one.
    #[serde(default)]
    pub status_code: Option<u16>,

    /// Structured response payload, when the engine returned one.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl QueryOutcome {
    /// Composes the operator-facing diagnostic for a failed execution.
    ///
    /// Combines the error message with the status code and the response
    /// payload when present.
    pub fn diagnostic(&self) -> String {
        let mut msg = format!(
            "Error executing query: {}",
            self.error.as_deref().unwrap_or("unknown error")
        );
        if let Some(code) = self.status_code {
            msg.push_str(&format!(" (status code: {code})"));
        }
        if let Some(data) = &self.data {
            let body = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
            msg.push_str(&format!("\nResponse data: {body}"));
        }
        msg
    }
}

/// Trait defining the interface to the query-execution service.
///
/// Implementations issue exactly one call per `execute` invocation and
/// never retry.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Issues one execution call and returns the reported outcome.
    async fn execute(&self, request: &QueryRequest) -> Result<QueryOutcome>;
}
