// Review source trait: where a report's reviews come from.
//
// The pipeline never reaches for a file path or an embedded blob on its own;
// callers hand it a source. The CLI uses `JsonFileSource`. Tests and embedding
// callers use `InMemorySource`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::models::{Dataset, RawDataset, Review};

/// Trait for anything that can supply a validated review dataset.
pub trait ReviewSource {
    /// Load and validate the dataset. Fails on the first malformed record.
    fn load(&self) -> Result<Dataset>;

    /// Short human-readable description for logs and report footers.
    fn describe(&self) -> String;
}

/// Parse an export document without validating individual records.
pub fn parse_raw(json: &str) -> Result<RawDataset> {
    serde_json::from_str(json).context(
        "Review export is not valid JSON (expected {\"company\", \"reviews\"} or an array of reviews)",
    )
}

/// Parse and validate an export document.
pub fn parse_dataset(json: &str) -> Result<Dataset> {
    let raw = parse_raw(json)?;
    Ok(Dataset::from_raw(raw)?)
}

/// Reads a scraper export from disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file and parse it, leaving record validation to the caller.
    pub fn load_raw(&self) -> Result<RawDataset> {
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read review export {}", self.path.display()))?;
        debug!(path = %self.path.display(), bytes = json.len(), "Read review export");
        parse_raw(&json).with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}

impl ReviewSource for JsonFileSource {
    fn load(&self) -> Result<Dataset> {
        let raw = self.load_raw()?;
        let dataset = Dataset::from_raw(raw)
            .with_context(|| format!("Malformed review in {}", self.path.display()))?;
        info!(
            path = %self.path.display(),
            reviews = dataset.reviews.len(),
            "Loaded review export"
        );
        Ok(dataset)
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

/// A dataset already in memory, e.g. built by a test or embedded at build
/// time by the caller via `include_str!` and `InMemorySource::from_json`.
pub struct InMemorySource {
    dataset: Dataset,
}

impl InMemorySource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        Self::new(Dataset {
            company: None,
            reviews,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(parse_dataset(json)?))
    }
}

impl ReviewSource for InMemorySource {
    fn load(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} reviews)", self.dataset.reviews.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_has_no_company() {
        let dataset =
            parse_dataset(r#"[{"rating": 5, "publishedDate": "2025-12-01T10:00:00Z"}]"#).unwrap();
        assert!(dataset.company.is_none());
        assert_eq!(dataset.reviews.len(), 1);
    }

    #[test]
    fn first_bad_record_fails_the_load() {
        let json = r#"{"reviews": [
            {"rating": 5, "publishedDate": "2025-12-01T10:00:00Z"},
            {"rating": 9, "publishedDate": "2025-12-01T10:00:00Z"}
        ]}"#;
        let err = parse_dataset(json).unwrap_err();
        assert!(err.to_string().contains("#1"), "got: {err}");
    }

    #[test]
    fn file_source_describes_itself_by_path() {
        let source = JsonFileSource::new("exports/ketogo.json");
        assert_eq!(source.path(), Path::new("exports/ketogo.json"));
        assert_eq!(source.describe(), "exports/ketogo.json");
    }

    #[test]
    fn missing_file_has_path_in_error() {
        let source = JsonFileSource::new("/nonexistent/reviews.json");
        let err = source.load().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/reviews.json"));
    }
}
