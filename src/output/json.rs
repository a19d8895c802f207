// JSON export of weekly reports and history series, for downstream renderers.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::analytics::AnalyticsResult;
use crate::pipeline::weekly::WeeklyReport;

pub fn to_json(report: &WeeklyReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize weekly report")
}

/// Write the report as pretty JSON. Returns the path written.
pub fn write_report(report: &WeeklyReport, output_path: &str) -> Result<String> {
    write_pretty(report, output_path)
}

/// Write a week-by-week series as a pretty JSON array. Returns the path written.
pub fn write_history(history: &[AnalyticsResult], output_path: &str) -> Result<String> {
    write_pretty(history, output_path)
}

fn write_pretty<T: Serialize + ?Sized>(value: &T, output_path: &str) -> Result<String> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize JSON for {output_path}"))?;
    if let Some(parent) = std::path::Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write {output_path}"))?;
    info!(path = output_path, "Wrote JSON export");
    Ok(output_path.to_string())
}
