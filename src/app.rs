//! Top-level orchestration for a single run.
//!
//! Walks the phases in order: optional remote query trigger, snapshot
//! extraction, report writing. Each phase failure carries its own exit
//! code through the error taxonomy, so the binary maps outcomes without
//! inspecting messages.

use crate::config::{RunMode, RunParameters};
use crate::engine::{HttpQueryEngine, QueryEngine, QueryEngineConfig};
use crate::error::{HarvestError, Result};
use crate::report::write_report;
use crate::source::SnapshotReader;
use crate::trigger;
use tracing::info;

/// Runs one extraction-and-dump pass, constructing the HTTP query
/// engine from parameters when production mode needs it.
pub async fn run(params: &RunParameters) -> Result<()> {
    if params.mode == RunMode::Production {
        let engine = production_engine(params)?;
        trigger::execute_query(params, engine.as_ref()).await?;
    } else {
        info!("Running in development mode: skipping remote query execution");
    }

    extract_and_write(params).await
}

/// Same pass with an injected query engine. Development mode never
/// touches the engine.
pub async fn run_with_engine(params: &RunParameters, engine: &dyn QueryEngine) -> Result<()> {
    if params.mode == RunMode::Production {
        trigger::execute_query(params, engine).await?;
    } else {
        info!("Running in development mode: skipping remote query execution");
    }

    extract_and_write(params).await
}

fn production_engine(params: &RunParameters) -> Result<Box<dyn QueryEngine>> {
    let endpoint = params
        .engine_endpoint
        .clone()
        .ok_or_else(|| HarvestError::query_execution("Query engine endpoint is not configured"))?;

    let config = QueryEngineConfig::new(endpoint).with_timeout(params.engine_timeout_secs);
    Ok(Box::new(HttpQueryEngine::new(config)?))
}

async fn extract_and_write(params: &RunParameters) -> Result<()> {
    let reader = SnapshotReader::open(&params.data_source_path).await?;
    let result = reader.read(params).await;
    reader.close().await;
    let report = result?;

    if report.is_empty() {
        info!("No rows found in relation '{}'", params.relation);
    } else {
        info!(
            "Found {} rows in relation '{}'",
            report.len(),
            params.relation
        );
    }

    write_report(&report, &params.output_path)
}
