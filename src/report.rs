//! Report shaping and durable JSON output.
//!
//! A report is either a sequential list of rows or a mapping keyed by an
//! identifier column, serialized as a plain JSON array or object. The
//! writer lands the serialized report in a sibling temp file and renames
//! it over the output path, so a failed run never leaves a partial
//! artifact.

use crate::error::{HarvestError, Result};
use crate::source::ReportRow;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// The shaped output of one run. Constructed fresh each run and
/// discarded after writing.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    /// Rows in result-set order.
    Rows(Vec<ReportRow>),
    /// Rows keyed by the configured identifier column.
    Keyed(IndexMap<String, ReportRow>),
}

impl Report {
    /// Returns the number of entries in the report.
    pub fn len(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Keyed(rows) => rows.len(),
        }
    }

    /// Returns true if the report has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writes the report as indented JSON at the given path, whole-or-fail.
///
/// Missing ancestor directories are created first. An empty report still
/// produces a file holding the empty JSON structure.
pub fn write_report(report: &Report, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                HarvestError::serialization(format!(
                    "Failed to create output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }

    let json = to_pretty_json(report)?;

    let file_name = output_path.file_name().ok_or_else(|| {
        HarvestError::serialization(format!(
            "Invalid output path: {}",
            output_path.display()
        ))
    })?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = output_path.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp_path, &json) {
        let _ = fs::remove_file(&tmp_path);
        return Err(HarvestError::serialization(format!(
            "Failed to write report to {}: {e}",
            tmp_path.display()
        )));
    }

    if let Err(e) = fs::rename(&tmp_path, output_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(HarvestError::serialization(format!(
            "Failed to move report into place at {}: {e}",
            output_path.display()
        )));
    }

    info!("Report saved to {}", output_path.display());
    Ok(())
}

/// Serializes the report with four-space indentation.
fn to_pretty_json(report: &Report) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report
        .serialize(&mut serializer)
        .map_err(|e| HarvestError::serialization(format!("Failed to encode report: {e}")))?;
    Ok(buf)
}
