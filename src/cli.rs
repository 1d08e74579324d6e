//! Command-line argument parsing for Harvest.
//!
//! Every flag has an environment-variable fallback so the worker can be
//! driven entirely by its container environment. Resolution turns the
//! raw arguments into a validated RunParameters.

use crate::config::{ensure_identifier, ExtractionShape, RunMode, RunParameters};
use crate::error::{HarvestError, Result};
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// A single-shot worker that exports query results from a local
/// snapshot to a JSON report.
#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Run mode
    #[arg(long, value_enum, env = "HARVEST_MODE", default_value = "production")]
    pub mode: RunMode,

    /// Path to the snapshot database produced by the upstream query job
    #[arg(long, value_name = "PATH", env = "HARVEST_DATA_SOURCE")]
    pub data_source: Option<PathBuf>,

    /// Path the JSON report is written to
    #[arg(long, value_name = "PATH", env = "HARVEST_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Result relation to extract
    #[arg(
        long,
        value_name = "NAME",
        env = "HARVEST_RELATION",
        default_value = "results"
    )]
    pub relation: String,

    /// Key the report by this identifier column instead of emitting a list
    #[arg(long, value_name = "COLUMN", env = "HARVEST_KEY_COLUMN")]
    pub key_column: Option<String>,

    /// Comma-separated projection of columns to extract
    #[arg(
        long,
        value_name = "COLUMNS",
        env = "HARVEST_COLUMNS",
        value_delimiter = ','
    )]
    pub columns: Option<Vec<String>>,

    /// Maximum number of rows to extract
    #[arg(long, value_name = "N", env = "HARVEST_LIMIT")]
    pub limit: Option<u32>,

    /// Query text submitted to the query engine (production mode)
    #[arg(long, env = "HARVEST_QUERY")]
    pub query: Option<String>,

    /// Signature authorizing the query (production mode)
    #[arg(long, env = "HARVEST_QUERY_SIGNATURE")]
    pub query_signature: Option<String>,

    /// Compute job identifier (production mode)
    #[arg(long, value_name = "ID", env = "HARVEST_COMPUTE_JOB_ID")]
    pub compute_job_id: Option<u64>,

    /// Data refiner identifier (production mode)
    #[arg(long, value_name = "ID", env = "HARVEST_DATA_REFINER_ID")]
    pub data_refiner_id: Option<u64>,

    /// Query parameters as a JSON value (production mode)
    #[arg(long, value_name = "JSON", env = "HARVEST_QUERY_PARAMS")]
    pub query_params: Option<String>,

    /// Query engine endpoint (production mode)
    #[arg(long, value_name = "URL", env = "HARVEST_ENGINE_URL")]
    pub engine_url: Option<String>,

    /// Query engine request timeout in seconds
    #[arg(
        long,
        value_name = "SECS",
        env = "HARVEST_ENGINE_TIMEOUT",
        default_value_t = 30
    )]
    pub engine_timeout: u64,
}

impl Cli {
    /// Parses command-line arguments, exiting directly for --help and
    /// --version.
    ///
    /// Usage errors are returned as parameter errors so the caller can
    /// surface the parameter exit code instead of clap's default.
    pub fn parse_args() -> Result<Self> {
        match Self::try_parse() {
            Ok(cli) => Ok(cli),
            Err(e) if !e.use_stderr() => e.exit(),
            Err(e) => Err(HarvestError::parameter(e.to_string())),
        }
    }

    /// Resolves the arguments into a validated parameter set.
    pub fn to_run_parameters(&self) -> Result<RunParameters> {
        let data_source_path = self
            .data_source
            .clone()
            .ok_or_else(|| HarvestError::parameter("Data source path is required"))?;
        let output_path = self
            .output
            .clone()
            .ok_or_else(|| HarvestError::parameter("Output path is required"))?;

        ensure_identifier(&self.relation, "relation name")?;

        let shape = match &self.key_column {
            Some(column) => {
                ensure_identifier(column, "key column")?;
                ExtractionShape::Keyed {
                    column: column.clone(),
                }
            }
            None => ExtractionShape::Sequential,
        };

        if let Some(columns) = &self.columns {
            for column in columns {
                ensure_identifier(column, "projection column")?;
            }
            if let ExtractionShape::Keyed { column } = &shape {
                if !columns.contains(column) {
                    return Err(HarvestError::parameter(format!(
                        "Key column '{column}' is missing from the projection"
                    )));
                }
            }
        }

        let query_params = self
            .query_params
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| HarvestError::parameter(format!("Invalid query parameters: {e}")))?;

        let engine_endpoint = self
            .engine_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| HarvestError::parameter(format!("Invalid query engine URL: {e}")))?;

        Ok(RunParameters {
            mode: self.mode,
            data_source_path,
            output_path,
            relation: self.relation.clone(),
            shape,
            columns: self.columns.clone(),
            limit: self.limit,
            query: self.query.clone(),
            query_signature: self.query_signature.clone(),
            compute_job_id: self.compute_job_id,
            data_refiner_id: self.data_refiner_id,
            query_params,
            engine_endpoint,
            engine_timeout_secs: self.engine_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    fn base_args() -> Vec<&'static str> {
        vec![
            "harvest",
            "--data-source",
            "/data/snapshot.db",
            "--output",
            "/data/stats.json",
        ]
    }

    #[test]
    fn test_parse_defaults() {
        let cli = parse_args(&base_args());
        assert_eq!(cli.mode, RunMode::Production);
        assert_eq!(cli.relation, "results");
        assert!(cli.key_column.is_none());
        assert_eq!(cli.engine_timeout, 30);
    }

    #[test]
    fn test_parse_development_mode() {
        let mut args = base_args();
        args.extend(["--mode", "development"]);
        let cli = parse_args(&args);
        assert_eq!(cli.mode, RunMode::Development);
    }

    #[test]
    fn test_parse_columns_delimiter() {
        let mut args = base_args();
        args.extend(["--columns", "SubmissionID,UserID,SubmissionDate"]);
        let cli = parse_args(&args);
        assert_eq!(
            cli.columns,
            Some(vec![
                "SubmissionID".to_string(),
                "UserID".to_string(),
                "SubmissionDate".to_string(),
            ])
        );
    }

    #[test]
    fn test_resolve_basic_parameters() {
        let params = parse_args(&base_args()).to_run_parameters().unwrap();
        assert_eq!(params.data_source_path, PathBuf::from("/data/snapshot.db"));
        assert_eq!(params.output_path, PathBuf::from("/data/stats.json"));
        assert_eq!(params.shape, ExtractionShape::Sequential);
    }

    #[test]
    fn test_resolve_requires_data_source() {
        let cli = parse_args(&["harvest", "--output", "/data/stats.json"]);
        let err = cli.to_run_parameters().unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Data source"));
    }

    #[test]
    fn test_resolve_requires_output() {
        let cli = parse_args(&["harvest", "--data-source", "/data/snapshot.db"]);
        let err = cli.to_run_parameters().unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Output"));
    }

    #[test]
    fn test_resolve_keyed_shape() {
        let mut args = base_args();
        args.extend(["--key-column", "MessageID"]);
        let params = parse_args(&args).to_run_parameters().unwrap();
        assert_eq!(
            params.shape,
            ExtractionShape::Keyed {
                column: "MessageID".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_rejects_bad_relation() {
        let mut args = base_args();
        args.extend(["--relation", "results; DROP TABLE x"]);
        let err = parse_args(&args).to_run_parameters().unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_resolve_rejects_key_outside_projection() {
        let mut args = base_args();
        args.extend(["--key-column", "UserID", "--columns", "SubmissionID"]);
        let err = parse_args(&args).to_run_parameters().unwrap_err();
        assert!(err.to_string().contains("missing from the projection"));
    }

    #[test]
    fn test_resolve_accepts_key_inside_projection() {
        let mut args = base_args();
        args.extend(["--key-column", "UserID", "--columns", "UserID,SubmissionID"]);
        assert!(parse_args(&args).to_run_parameters().is_ok());
    }

    #[test]
    fn test_resolve_parses_query_params() {
        let mut args = base_args();
        args.extend(["--query-params", r#"{"window": "7d"}"#]);
        let params = parse_args(&args).to_run_parameters().unwrap();
        assert_eq!(params.query_params, Some(json!({"window": "7d"})));
    }

    #[test]
    fn test_resolve_rejects_bad_query_params() {
        let mut args = base_args();
        args.extend(["--query-params", "not json"]);
        let err = parse_args(&args).to_run_parameters().unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("query parameters"));
    }

    #[test]
    fn test_resolve_parses_engine_url() {
        let mut args = base_args();
        args.extend(["--engine-url", "http://engine:8000/query"]);
        let params = parse_args(&args).to_run_parameters().unwrap();
        assert_eq!(
            params.engine_endpoint.unwrap().as_str(),
            "http://engine:8000/query"
        );
    }

    #[test]
    fn test_resolve_rejects_bad_engine_url() {
        let mut args = base_args();
        args.extend(["--engine-url", "not a url"]);
        let err = parse_args(&args).to_run_parameters().unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
