// Weekly report pipeline: source → windows → aggregates → topic tags and themes.
//
// This is the only place the stages are wired together. It is still pure
// given its inputs: the source is injected and the reference instant is a
// parameter, so two runs with the same source and `now` produce identical
// reports.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analytics::aggregate::{aggregate, AnalyticsResult};
use crate::analytics::window::split_weeks;
use crate::reviews::{Company, Dataset, ReviewSource};
use crate::topics::{ThemeExtractor, TopicClassifier, TopicReport, WeekThemes};

/// Everything a renderer needs for one weekly report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub company: Option<Company>,
    /// Where the reviews came from (file path or description)
    pub source: String,
    /// Reviews in the whole dataset, not just this week
    pub reviews_in_dataset: usize,
    pub analytics: AnalyticsResult,
    pub topics: TopicReport,
    /// Most used words in this week's positive and negative reviews
    pub themes: WeekThemes,
}

impl WeeklyReport {
    pub fn brand_name(&self) -> &str {
        self.company
            .as_ref()
            .map(|c| c.brand_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown brand")
    }
}

/// Build a report from an already-loaded dataset.
pub fn build_report(
    dataset: &Dataset,
    source: &str,
    classifier: &dyn TopicClassifier,
    themes: &ThemeExtractor,
    topics: &[String],
    now: DateTime<Utc>,
) -> WeeklyReport {
    let buckets = split_weeks(&dataset.reviews, now);
    let analytics = aggregate(&buckets);
    let topic_report = classifier.classify(&buckets.current.new, topics);
    let week_themes = themes.week_themes(&buckets.current.new);

    info!(
        week = %analytics.iso_week,
        new = analytics.current.count,
        updated = analytics.current.updated_count,
        previous = analytics.previous.count,
        topics_tagged = topic_report.mentions.len(),
        "Computed weekly analytics"
    );

    WeeklyReport {
        company: dataset.company.clone(),
        source: source.to_string(),
        reviews_in_dataset: dataset.reviews.len(),
        analytics,
        topics: topic_report,
        themes: week_themes,
    }
}

/// Load from `source` and build the report.
pub fn run(
    source: &dyn ReviewSource,
    classifier: &dyn TopicClassifier,
    themes: &ThemeExtractor,
    topics: &[String],
    now: DateTime<Utc>,
) -> Result<WeeklyReport> {
    let dataset = source.load()?;
    Ok(build_report(
        &dataset,
        &source.describe(),
        classifier,
        themes,
        topics,
        now,
    ))
}

/// Pick the topic list: explicit labels first, then the dataset's own
/// top mentions. Blank labels are dropped.
pub fn resolve_topics(explicit: &[String], dataset: &Dataset) -> Vec<String> {
    let chosen = if explicit.iter().any(|t| !t.trim().is_empty()) {
        explicit
    } else {
        dataset.top_mentions()
    };
    chosen
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
