use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::reviews::models::parse_instant;

/// Default location of the markdown report.
pub const DEFAULT_REPORT_PATH: &str = "output/weekly-report.md";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every value
/// has a default; CLI flags override whatever is loaded here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Review export to read (REVIEWPULSE_INPUT)
    pub input_path: PathBuf,
    /// Where the markdown report goes (REVIEWPULSE_REPORT_PATH)
    pub report_path: String,
    /// Topics to tag, comma separated (REVIEWPULSE_TOPICS)
    pub topics: Vec<String>,
    /// Fixed reference instant for reproducible reports (REVIEWPULSE_NOW).
    /// Unset means "now".
    pub reference_time: Option<DateTime<Utc>>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let reference_time = match env::var("REVIEWPULSE_NOW") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_reference_time(&raw)
                .context("REVIEWPULSE_NOW is set but is not a valid timestamp")?),
            _ => None,
        };

        Ok(Self {
            input_path: env::var("REVIEWPULSE_INPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./reviews.json")),
            report_path: env::var("REVIEWPULSE_REPORT_PATH")
                .unwrap_or_else(|_| DEFAULT_REPORT_PATH.to_string()),
            topics: env::var("REVIEWPULSE_TOPICS")
                .map(|raw| split_topics(&raw))
                .unwrap_or_default(),
            reference_time,
        })
    }

    /// Check that the review export exists before doing any work.
    pub fn require_input(&self) -> Result<()> {
        if !self.input_path.exists() {
            anyhow::bail!(
                "Review export not found at {}\n\
                 Pass a path (e.g. `reviewpulse report data.json`) or set REVIEWPULSE_INPUT.",
                self.input_path.display()
            );
        }
        Ok(())
    }

    /// The instant the report is computed against: the configured one, or
    /// the wall clock. Only the CLI should call this.
    pub fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }
}

/// Parse a user-supplied reference instant (RFC 3339 or `YYYY-MM-DD`).
pub fn parse_reference_time(raw: &str) -> Result<DateTime<Utc>> {
    parse_instant(raw).with_context(|| {
        format!("Invalid timestamp {raw:?} (expected RFC 3339, e.g. 2025-12-28T12:00:00Z)")
    })
}

/// Split a comma-separated topic list, dropping blanks.
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
