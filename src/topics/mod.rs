// Topic tagging: which recurring topics reviewers feel good or bad about.

pub mod classify;
pub mod themes;
pub mod traits;

pub use classify::{classify_topics, KeywordClassifier, TopicClassification, TopicReport};
pub use themes::{Theme, ThemeExtractor, WeekThemes, DEFAULT_MAX_THEMES};
pub use traits::TopicClassifier;
