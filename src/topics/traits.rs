// Topic classifier trait: swap-ready abstraction.
//
// The default implementation is a keyword heuristic. Anything smarter
// (phrase matching, embeddings) can slot in here without touching the
// pipeline or the renderers.

use crate::reviews::Review;

use super::classify::TopicReport;

/// Trait for tagging topic labels with the sentiment of the reviews that
/// mention them.
pub trait TopicClassifier {
    /// Classify `topics` against `reviews`. Output order follows `topics`.
    fn classify(&self, reviews: &[&Review], topics: &[String]) -> TopicReport;
}
