//! Query Trigger: one remote execution attempt per run.
//!
//! Re-validates production parameters, issues a single call to the query
//! engine, and turns a failed outcome into a diagnostic. A failed
//! attempt is terminal for the run; nothing is retried.

use crate::config::RunParameters;
use crate::engine::QueryEngine;
use crate::error::{HarvestError, Result};
use tracing::{error, info};

/// Executes the remote query for a production run.
///
/// Fails without touching the boundary when any production-required
/// field is missing, naming the absent fields in the diagnostic.
pub async fn execute_query(params: &RunParameters, engine: &dyn QueryEngine) -> Result<()> {
    let request = match params.to_query_request() {
        Some(request) => request,
        None => {
            return Err(HarvestError::query_execution(format!(
                "Missing required production parameters: {}",
                params.missing_production_fields().join(", ")
            )));
        }
    };

    info!("Executing query: {}", request.query);
    let outcome = engine.execute(&request).await?;

    if !outcome.success {
        let diagnostic = outcome.diagnostic();
        error!("{diagnostic}");
        return Err(HarvestError::query_execution(diagnostic));
    }

    info!(
        "Query executed successfully, processing results from {}",
        params.data_source_path.display()
    );
    Ok(())
}
