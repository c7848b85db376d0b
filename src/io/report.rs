use crate::batch::BatchSummary;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;

// Row of the batch run report
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    field: &'a str,
    command: &'a str,
    status: i32,
    datasets: Option<usize>,
    started: String,
    elapsed_ms: u64,
}

// Write one CSV row per invocation, headers taken from ReportRow
pub fn write_report(path: &Path, summary: &BatchSummary) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to create report: {:?}", path))?;

    for outcome in &summary.outcomes {
        wtr.serialize(ReportRow {
            field: &outcome.field,
            command: &outcome.command,
            status: outcome.status,
            datasets: outcome.datasets,
            started: outcome.started.to_rfc3339(),
            elapsed_ms: outcome.elapsed_ms,
        })?;
    }

    wtr.flush().context("Failed to flush report writer")?;
    Ok(())
}
