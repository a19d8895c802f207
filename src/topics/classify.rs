// Keyword topic classification.
//
// A topic label like "shipping speed" becomes the keywords {shipping, speed}.
// A review mentions the topic if ANY keyword occurs as a substring of its
// lowercased text and title. This is approximate on purpose: "customer
// service" matches a review that only says "service", and "speed" matches
// "speedy". Mentions are tallied by sentiment and the topic is tagged by
// whichever side holds a clear majority.

use serde::Serialize;
use tracing::debug;

use crate::analytics::sentiment::{Sentiment, SentimentCounts};
use crate::reviews::Review;

use super::traits::TopicClassifier;

/// Mention tallies for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicMentions {
    pub topic: String,
    pub mentions: SentimentCounts,
}

impl TopicMentions {
    pub fn total(&self) -> usize {
        self.mentions.total()
    }
}

/// Topics grouped by verdict, each list in input topic order.
/// Topics nobody mentioned are left out entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopicClassification {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
}

impl TopicClassification {
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty() && self.neutral.is_empty()
    }

    pub fn get(&self, sentiment: Sentiment) -> &[String] {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Negative => &self.negative,
            Sentiment::Neutral => &self.neutral,
        }
    }

    fn push(&mut self, sentiment: Sentiment, topic: String) {
        match sentiment {
            Sentiment::Positive => self.positive.push(topic),
            Sentiment::Negative => self.negative.push(topic),
            Sentiment::Neutral => self.neutral.push(topic),
        }
    }
}

/// Classification plus the tallies behind it (mentioned topics only).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopicReport {
    pub classification: TopicClassification,
    pub mentions: Vec<TopicMentions>,
}

/// Keyword-substring classifier.
pub struct KeywordClassifier {
    /// A side needs strictly more than this share of mentions to win
    pub dominant_ratio: f64,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            dominant_ratio: 0.6,
        }
    }
}

impl KeywordClassifier {
    /// Verdict for one topic's tallies. `None` if nobody mentioned it.
    pub fn verdict(&self, mentions: &SentimentCounts) -> Option<Sentiment> {
        if mentions.total() == 0 {
            return None;
        }
        if mentions.ratio(Sentiment::Negative) > self.dominant_ratio {
            Some(Sentiment::Negative)
        } else if mentions.ratio(Sentiment::Positive) > self.dominant_ratio {
            Some(Sentiment::Positive)
        } else {
            Some(Sentiment::Neutral)
        }
    }
}

impl TopicClassifier for KeywordClassifier {
    fn classify(&self, reviews: &[&Review], topics: &[String]) -> TopicReport {
        // Lowercase each review once, not once per topic.
        let haystacks: Vec<(Sentiment, String)> = reviews
            .iter()
            .map(|r| (Sentiment::of(r), searchable_text(r)))
            .collect();

        let mut report = TopicReport::default();

        for topic in topics {
            let keywords = topic_keywords(topic);
            let mut mentions = SentimentCounts::default();
            for (sentiment, haystack) in &haystacks {
                if mentions_any(haystack, &keywords) {
                    mentions.add(*sentiment);
                }
            }

            let Some(verdict) = self.verdict(&mentions) else {
                debug!(topic = %topic, "Topic not mentioned this week");
                continue;
            };

            debug!(
                topic = %topic,
                total = mentions.total(),
                verdict = %verdict,
                "Classified topic"
            );
            report.classification.push(verdict, topic.clone());
            report.mentions.push(TopicMentions {
                topic: topic.clone(),
                mentions,
            });
        }

        report
    }
}

/// Lowercased whitespace-separated words of a topic label.
pub fn topic_keywords(topic: &str) -> Vec<String> {
    topic.split_whitespace().map(str::to_lowercase).collect()
}

/// Lowercased text and title joined by a space.
pub fn searchable_text(review: &Review) -> String {
    format!(
        "{} {}",
        review.text.to_lowercase(),
        review.title.to_lowercase()
    )
}

fn mentions_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

/// Does `review` mention any word of `topic`?
pub fn mentions_topic(review: &Review, topic: &str) -> bool {
    mentions_any(&searchable_text(review), &topic_keywords(topic))
}

/// Tag `topics` with the default keyword classifier.
pub fn classify_topics(reviews: &[&Review], topics: &[String]) -> TopicClassification {
    KeywordClassifier::default()
        .classify(reviews, topics)
        .classification
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8, text: &str) -> Review {
        Review {
            rating,
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn keywords_are_lowercased_words() {
        assert_eq!(topic_keywords("  Shipping   Speed "), vec!["shipping", "speed"]);
        assert!(topic_keywords("   ").is_empty());
    }

    #[test]
    fn any_single_word_is_a_mention() {
        let r = review(1, "Terrible service, never again");
        assert!(mentions_topic(&r, "Customer service"));
    }

    #[test]
    fn title_is_searched_too() {
        let r = Review {
            title: "Slow SHIPPING".to_string(),
            ..review(2, "")
        };
        assert!(mentions_topic(&r, "shipping"));
    }

    #[test]
    fn exactly_sixty_percent_is_not_dominant() {
        let classifier = KeywordClassifier::default();
        let counts = SentimentCounts {
            positive: 3,
            neutral: 0,
            negative: 2,
        };
        assert_eq!(classifier.verdict(&counts), Some(Sentiment::Neutral));
    }

    #[test]
    fn unmentioned_topic_has_no_verdict() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.verdict(&SentimentCounts::default()), None);
    }
}
