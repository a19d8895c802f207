// Weekly review analytics: week windows and the metrics computed over them.

pub mod aggregate;
pub mod history;
pub mod sentiment;
pub mod window;

pub use aggregate::{analyze, AnalyticsResult, PeriodMetrics, PreviousPeriodMetrics};
pub use history::analyze_history;
pub use sentiment::{Sentiment, SentimentCounts};
pub use window::{split_weeks, WeekWindow, WeeklyBuckets};
