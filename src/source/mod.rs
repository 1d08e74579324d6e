//! Read-only access to the snapshot database.
//!
//! Opens the SQLite snapshot produced by the upstream query job, fetches
//! the configured result relation, and shapes the rows into a report.

mod types;

pub use types::{ReportRow, Value};

use crate::config::{ExtractionShape, RunParameters};
use crate::error::{HarvestError, Result};
use crate::report::Report;
use indexmap::IndexMap;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Read-only handle on the snapshot database.
pub struct SnapshotReader {
    pool: SqlitePool,
}

impl SnapshotReader {
    /// Opens the snapshot read-only. The file must already exist.
    pub async fn open(path: &Path) -> Result<Self> {
        let conn_str = format!("sqlite:{}?mode=ro", path.display());
        let options = SqliteConnectOptions::from_str(&conn_str)
            .map_err(|e| HarvestError::extraction(format!("Invalid snapshot path: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                HarvestError::extraction(format!(
                    "Failed to open snapshot {}: {e}",
                    path.display()
                ))
            })?;

        Ok(Self { pool })
    }

    /// Fetches the result relation and shapes it into a report.
    ///
    /// Column names and order come from the result set verbatim; values
    /// keep SQLite's native storage classes.
    pub async fn read(&self, params: &RunParameters) -> Result<Report> {
        let sql = select_statement(params);
        debug!("Fetching result rows: {sql}");

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await.map_err(|e| {
            HarvestError::extraction(format!(
                "Failed to read relation '{}': {e}",
                params.relation
            ))
        })?;

        match &params.shape {
            ExtractionShape::Sequential => Ok(Report::Rows(rows.iter().map(convert_row).collect())),
            ExtractionShape::Keyed { column } => {
                let mut keyed = IndexMap::with_capacity(rows.len());
                for row in &rows {
                    let converted = convert_row(row);
                    let key = report_key(&converted, column)?;
                    keyed.insert(key, converted);
                }
                Ok(Report::Keyed(keyed))
            }
        }
    }

    /// Closes the snapshot connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Assembles the extraction SELECT from validated identifiers.
fn select_statement(params: &RunParameters) -> String {
    let projection = match &params.columns {
        Some(columns) => columns
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", "),
        None => "*".to_string(),
    };

    let mut sql = format!("SELECT {projection} FROM \"{}\"", params.relation);
    if let Some(limit) = params.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    sql
}

/// Renders the identifier column of a row as its report key.
fn report_key(row: &ReportRow, column: &str) -> Result<String> {
    let value = row.get(column).ok_or_else(|| {
        HarvestError::extraction(format!(
            "Key column '{column}' is not present in the result relation"
        ))
    })?;

    value.to_key_string().ok_or_else(|| {
        HarvestError::extraction(format!(
            "Key column '{column}' holds {} which cannot identify a row",
            value.to_display_string()
        ))
    })
}

/// Converts a sqlx SqliteRow to our ReportRow type.
fn convert_row(row: &SqliteRow) -> ReportRow {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let value = convert_value(row, i, col.type_info().name());
            (col.name().to_string(), value)
        })
        .collect()
}

/// Converts a single column value from a SqliteRow to our Value type.
fn convert_value(row: &SqliteRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "INTEGER" | "INT" | "INT4" | "INT8" | "BIGINT" | "BOOLEAN" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Blob)
            .unwrap_or(Value::Null),

        // For all other types, try to get as text
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::Text)
            .unwrap_or(Value::Null),
    }
}
