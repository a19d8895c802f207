// Week windows: splitting reviews into this week and last week.
//
// All comparisons happen on UTC calendar dates, not instants: a review
// published any time on the boundary day is inside the window. The current
// window is closed at both ends; the previous window is half-open and stops
// the day before the current window starts. Keep the two in sync with
// `WindowBounds` rather than comparing dates ad hoc.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::reviews::Review;

/// Length of a reporting week.
pub const WEEK_DAYS: i64 = 7;

/// How a window treats its end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowBounds {
    /// `[start, end]`
    Closed,
    /// `[start, end)`
    HalfOpen,
}

/// A week of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub bounds: WindowBounds,
}

impl WeekWindow {
    /// The 7 days ending at `now`, both ends included.
    pub fn current(now: DateTime<Utc>) -> Self {
        let end = now.date_naive();
        Self {
            start: end - Duration::days(WEEK_DAYS),
            end,
            bounds: WindowBounds::Closed,
        }
    }

    /// The 7 days immediately before `current`, excluding `current.start`.
    pub fn preceding(current: &WeekWindow) -> Self {
        Self {
            start: current.start - Duration::days(WEEK_DAYS),
            end: current.start,
            bounds: WindowBounds::HalfOpen,
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        match self.bounds {
            WindowBounds::Closed => self.start <= date && date <= self.end,
            WindowBounds::HalfOpen => self.start <= date && date < self.end,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.contains_date(at.date_naive())
    }

    /// ISO week label (`2025-W52`) of the window's end date.
    pub fn iso_week_label(&self) -> String {
        let week = self.end.iso_week();
        format!("{}-W{:02}", week.year(), week.week())
    }
}

/// Reviews that fall into one window, split into new and updated.
#[derive(Debug, Clone)]
pub struct WeekPartition<'a> {
    pub window: WeekWindow,
    /// Published inside the window
    pub new: Vec<&'a Review>,
    /// Updated inside the window but published outside it
    pub updated: Vec<&'a Review>,
}

impl<'a> WeekPartition<'a> {
    /// Partition `reviews` against `window`, preserving input order.
    ///
    /// A review whose publish date is in the window is "new" even if it was
    /// also edited in the window; it never appears in both lists.
    pub fn collect(reviews: &'a [Review], window: WeekWindow) -> Self {
        let mut new = Vec::new();
        let mut updated = Vec::new();

        for review in reviews {
            if window.contains(review.published_at) {
                new.push(review);
            } else if review.updated_at.is_some_and(|at| window.contains(at)) {
                updated.push(review);
            }
        }

        Self {
            window,
            new,
            updated,
        }
    }
}

/// This week's and last week's partitions for one reference instant.
#[derive(Debug, Clone)]
pub struct WeeklyBuckets<'a> {
    pub now: DateTime<Utc>,
    pub current: WeekPartition<'a>,
    pub previous: WeekPartition<'a>,
}

/// Split `reviews` into current and previous week relative to `now`.
pub fn split_weeks(reviews: &[Review], now: DateTime<Utc>) -> WeeklyBuckets<'_> {
    let current_window = WeekWindow::current(now);
    let previous_window = WeekWindow::preceding(&current_window);

    WeeklyBuckets {
        now,
        current: WeekPartition::collect(reviews, current_window),
        previous: WeekPartition::collect(reviews, previous_window),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 28, 15, 30, 0).unwrap()
    }

    #[test]
    fn current_window_spans_eight_calendar_dates() {
        let w = WeekWindow::current(now());
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2025, 12, 21).unwrap());
        assert_eq!(w.end, NaiveDate::from_ymd_opt(2025, 12, 28).unwrap());
    }

    #[test]
    fn previous_window_ends_where_current_starts() {
        let current = WeekWindow::current(now());
        let previous = WeekWindow::preceding(&current);
        assert_eq!(previous.end, current.start);
        assert_eq!(previous.start, NaiveDate::from_ymd_opt(2025, 12, 14).unwrap());
        assert!(!previous.contains_date(current.start));
        assert!(previous.contains_date(previous.start));
    }

    #[test]
    fn same_day_after_now_is_still_current() {
        // Date granularity: later on the same day as `now` is inside.
        let w = WeekWindow::current(now());
        let later_today = Utc.with_ymd_and_hms(2025, 12, 28, 23, 59, 59).unwrap();
        assert!(w.contains(later_today));
    }

    #[test]
    fn iso_week_label() {
        assert_eq!(WeekWindow::current(now()).iso_week_label(), "2025-W52");
    }
}
