// Weekly aggregates: counts, averages, distributions, response metrics.
//
// Every metric is computed over this week's new reviews unless noted. Empty
// inputs produce zeros and empty maps, never NaN and never an error, so
// renderers can format any field unconditionally.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::sentiment::SentimentCounts;
use super::window::{split_weeks, WeekWindow, WeeklyBuckets};
use crate::reviews::Review;

/// How a review reached the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Organic,
    Verified,
    Invited,
}

impl SourceKind {
    /// Verified wins over the source label; "invited" (any case) is invited;
    /// every other label, or none, is organic.
    pub fn of(review: &Review) -> Self {
        if review.is_verified {
            SourceKind::Verified
        } else if review
            .source
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("invited"))
        {
            SourceKind::Invited
        } else {
            SourceKind::Organic
        }
    }
}

/// Review counts per acquisition channel. The three keys are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceBreakdown {
    pub organic: usize,
    pub verified: usize,
    pub invited: usize,
}

impl SourceBreakdown {
    pub fn total(&self) -> usize {
        self.organic + self.verified + self.invited
    }
}

/// Counts of 1-star through 5-star ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RatingDistribution(pub [usize; 5]);

impl RatingDistribution {
    pub fn count(&self, stars: u8) -> usize {
        match stars {
            1..=5 => self.0[stars as usize - 1],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn max(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(0)
    }
}

/// Full metrics for the reporting week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodMetrics {
    pub count: usize,
    pub updated_count: usize,
    pub avg_rating: f64,
    pub sentiment: SentimentCounts,
    pub rating_distribution: RatingDistribution,
    /// Uppercased language code (or "UNKNOWN") → count
    pub languages: BTreeMap<String, usize>,
    pub sources: SourceBreakdown,
    pub replied_count: usize,
    /// Percentage (0-100) of reviews with a reply
    pub response_rate: f64,
    /// Mean reply delay in days over dated replies; may be negative
    pub avg_response_time_days: f64,
}

/// The comparison baseline for last week. Deliberately thin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPeriodMetrics {
    pub count: usize,
    pub updated_count: usize,
    pub avg_rating: f64,
}

/// This week minus last week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOverWeek {
    pub count_delta: i64,
    pub updated_delta: i64,
    pub avg_rating_delta: f64,
    /// Relative change in review volume; `None` when last week had no reviews
    pub count_change_pct: Option<f64>,
}

impl WeekOverWeek {
    pub fn between(current: &PeriodMetrics, previous: &PreviousPeriodMetrics) -> Self {
        let count_delta = current.count as i64 - previous.count as i64;
        let count_change_pct = if previous.count == 0 {
            None
        } else {
            Some(count_delta as f64 / previous.count as f64 * 100.0)
        };

        Self {
            count_delta,
            updated_delta: current.updated_count as i64 - previous.updated_count as i64,
            avg_rating_delta: current.avg_rating - previous.avg_rating,
            count_change_pct,
        }
    }
}

/// Everything computed for one reference instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub generated_at: DateTime<Utc>,
    pub iso_week: String,
    pub current_window: WeekWindow,
    pub previous_window: WeekWindow,
    pub current: PeriodMetrics,
    pub previous: PreviousPeriodMetrics,
    pub comparison: WeekOverWeek,
}

/// Mean star rating. Returns 0.0 for an empty set.
pub fn average_rating(reviews: &[&Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    total as f64 / reviews.len() as f64
}

pub fn rating_distribution(reviews: &[&Review]) -> RatingDistribution {
    let mut dist = RatingDistribution::default();
    for review in reviews {
        if (1..=5).contains(&review.rating) {
            dist.0[review.rating as usize - 1] += 1;
        }
    }
    dist
}

pub fn language_distribution(reviews: &[&Review]) -> BTreeMap<String, usize> {
    reviews.iter().fold(BTreeMap::new(), |mut langs, review| {
        *langs.entry(review.language_code()).or_insert(0) += 1;
        langs
    })
}

pub fn source_breakdown(reviews: &[&Review]) -> SourceBreakdown {
    let mut sources = SourceBreakdown::default();
    for review in reviews {
        match SourceKind::of(review) {
            SourceKind::Organic => sources.organic += 1,
            SourceKind::Verified => sources.verified += 1,
            SourceKind::Invited => sources.invited += 1,
        }
    }
    sources
}

/// Percentage of reviews that received a reply. Returns 0.0 for an empty set.
pub fn response_rate(reviews: &[&Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let replied = reviews.iter().filter(|r| r.has_reply()).count();
    replied as f64 / reviews.len() as f64 * 100.0
}

/// Mean reply delay in fractional days over reviews with a dated reply.
/// Returns 0.0 when none have one. Negative delays are kept as-is.
pub fn avg_response_time_days(reviews: &[&Review]) -> f64 {
    let delays: Vec<f64> = reviews
        .iter()
        .filter_map(|r| r.response_time_days())
        .collect();
    if delays.is_empty() {
        return 0.0;
    }
    delays.iter().sum::<f64>() / delays.len() as f64
}

/// Compute this week's full metrics from its new and updated reviews.
pub fn period_metrics(new: &[&Review], updated: &[&Review]) -> PeriodMetrics {
    PeriodMetrics {
        count: new.len(),
        updated_count: updated.len(),
        avg_rating: average_rating(new),
        sentiment: SentimentCounts::from_reviews(new.iter().copied()),
        rating_distribution: rating_distribution(new),
        languages: language_distribution(new),
        sources: source_breakdown(new),
        replied_count: new.iter().filter(|r| r.has_reply()).count(),
        response_rate: response_rate(new),
        avg_response_time_days: avg_response_time_days(new),
    }
}

pub fn previous_metrics(new: &[&Review], updated: &[&Review]) -> PreviousPeriodMetrics {
    PreviousPeriodMetrics {
        count: new.len(),
        updated_count: updated.len(),
        avg_rating: average_rating(new),
    }
}

/// Aggregate pre-split weekly buckets.
pub fn aggregate(buckets: &WeeklyBuckets<'_>) -> AnalyticsResult {
    let current = period_metrics(&buckets.current.new, &buckets.current.updated);
    let previous = previous_metrics(&buckets.previous.new, &buckets.previous.updated);
    let comparison = WeekOverWeek::between(&current, &previous);

    AnalyticsResult {
        generated_at: buckets.now,
        iso_week: buckets.current.window.iso_week_label(),
        current_window: buckets.current.window,
        previous_window: buckets.previous.window,
        current,
        previous,
        comparison,
    }
}

/// Window and aggregate `reviews` relative to `now` in one step.
pub fn analyze(reviews: &[Review], now: DateTime<Utc>) -> AnalyticsResult {
    aggregate(&split_weeks(reviews, now))
}
