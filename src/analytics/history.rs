// Week-by-week history: the weekly report as it would have looked at each
// earlier reference instant, stepping back seven days at a time.
//
// Entry k is exactly `analyze(reviews, now - 7k days)`, so a review dated on
// a boundary day is "new" in two neighbouring entries, the same overlap the
// closed current window has with the previous report's current window.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use super::aggregate::{analyze, AnalyticsResult};
use super::window::{WeekWindow, WEEK_DAYS};
use crate::reviews::Review;

/// Reports for every week from the one holding the earliest review up to
/// `now`, oldest first. `max_weeks` keeps only the most recent weeks.
pub fn analyze_history(
    reviews: &[Review],
    now: DateTime<Utc>,
    max_weeks: Option<usize>,
) -> Vec<AnalyticsResult> {
    let Some(earliest) = earliest_date(reviews) else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut at = now;
    while WeekWindow::current(at).end >= earliest {
        if max_weeks.is_some_and(|max| series.len() >= max) {
            break;
        }
        series.push(analyze(reviews, at));
        at -= Duration::days(WEEK_DAYS);
    }
    series.reverse();

    debug!(weeks = series.len(), %earliest, "Built weekly history");
    series
}

fn earliest_date(reviews: &[Review]) -> Option<NaiveDate> {
    reviews.iter().map(|r| r.published_at.date_naive()).min()
}
