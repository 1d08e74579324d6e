//! Run configuration for Harvest.
//!
//! Holds the immutable parameter set for a single run, resolved once
//! from CLI arguments and environment variables before any work starts.

use crate::engine::QueryRequest;
use crate::error::{HarvestError, Result};
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Run variant: trigger the remote query first, or read a pre-existing
/// local snapshot directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RunMode {
    /// Skip remote execution and extract from a local snapshot.
    Development,
    /// Execute the remote query before extraction.
    #[default]
    Production,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// How extracted rows are keyed in the report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtractionShape {
    /// Rows in result-set order, serialized as a JSON array.
    #[default]
    Sequential,
    /// Rows keyed by an identifier column, serialized as a JSON object.
    Keyed { column: String },
}

/// Validated configuration for one run. Immutable once resolved.
///
/// Query-related fields are unused in development mode.
#[derive(Debug, Clone)]
pub struct RunParameters {
    /// Run mode.
    pub mode: RunMode,

    /// Path to the snapshot database produced by the upstream query job.
    pub data_source_path: PathBuf,

    /// Path the JSON report is written to.
    pub output_path: PathBuf,

    /// Result relation to extract.
    pub relation: String,

    /// Active extraction shape.
    pub shape: ExtractionShape,

    /// Optional projection of columns to extract; all columns when absent.
    pub columns: Option<Vec<String>>,

    /// Optional cap on the number of extracted rows.
    pub limit: Option<u32>,

    /// Query text submitted to the query engine.
    pub query: Option<String>,

    /// Signature authorizing the query.
    pub query_signature: Option<String>,

    /// Compute job identifier.
    pub compute_job_id: Option<u64>,

    /// Data refiner identifier.
    pub data_refiner_id: Option<u64>,

    /// Query parameters forwarded to the engine verbatim.
    pub query_params: Option<serde_json::Value>,

    /// Query engine endpoint.
    pub engine_endpoint: Option<Url>,

    /// Query engine request timeout in seconds.
    pub engine_timeout_secs: u64,
}

impl RunParameters {
    /// Lists production-required query fields that are absent.
    pub fn missing_production_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.query.is_none() {
            missing.push("query");
        }
        if self.query_signature.is_none() {
            missing.push("query signature");
        }
        if self.compute_job_id.is_none() {
            missing.push("compute job id");
        }
        if self.data_refiner_id.is_none() {
            missing.push("data refiner id");
        }
        missing
    }

    /// Builds the execution request once all production fields are present.
    pub fn to_query_request(&self) -> Option<QueryRequest> {
        Some(QueryRequest {
            query: self.query.clone()?,
            query_signature: self.query_signature.clone()?,
            data_source: self.data_source_path.display().to_string(),
            compute_job_id: self.compute_job_id?,
            data_refiner_id: self.data_refiner_id?,
            parameters: self.query_params.clone(),
        })
    }
}

/// Validates that a relation or column name is a plain SQL identifier.
///
/// Identifiers come from configuration and are interpolated into the
/// extraction SELECT, so anything beyond `[A-Za-z_][A-Za-z0-9_]*` is
/// rejected at resolution time.
pub fn ensure_identifier(name: &str, what: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(HarvestError::parameter(format!(
            "Invalid {what} '{name}': expected a plain identifier"
        )))
    }
}
