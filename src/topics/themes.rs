// Weekly themes: the words reviewers use most, split by how they felt.
//
// Where topic tagging checks labels someone chose in advance, themes are
// discovered from the week's text: lowercase title and body, take every run
// of 4+ ASCII letters, drop English stop words, rank by frequency. Positive
// (4-5 stars) and negative (1-2 stars) reviews are ranked separately.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use regex_lite::Regex;
use serde::Serialize;
use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::analytics::sentiment::Sentiment;
use crate::reviews::Review;

/// How many themes a report keeps per side.
pub const DEFAULT_MAX_THEMES: usize = 10;

/// One recurring word and how often it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub word: String,
    pub count: usize,
}

/// Top words from this week's positive and negative reviews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekThemes {
    pub positive: Vec<Theme>,
    pub negative: Vec<Theme>,
}

impl WeekThemes {
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// Word-frequency theme extractor.
pub struct ThemeExtractor {
    /// Themes kept per side, most frequent first
    pub max_themes: usize,
    word: Regex,
    stop_words: HashSet<String>,
}

impl ThemeExtractor {
    pub fn new(max_themes: usize) -> Result<Self> {
        let word = Regex::new(r"\b[a-z]{4,}\b").context("Failed to compile theme word pattern")?;
        let stop_words: Vec<String> = get(LANGUAGE::English);

        Ok(Self {
            max_themes,
            word,
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
        })
    }

    /// Candidate theme words in `text`, which must already be lowercase.
    pub fn words<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.word
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|w| !self.stop_words.contains(*w))
    }

    /// Rank words across `reviews`. Ties keep the order words first appeared.
    pub fn extract<'a>(&self, reviews: impl IntoIterator<Item = &'a Review>) -> Vec<Theme> {
        // word -> (first seen, count)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

        for review in reviews {
            let text = format!("{} {}", review.title, review.text).to_lowercase();
            for word in self.words(&text) {
                let next = counts.len();
                counts.entry(word.to_string()).or_insert((next, 0)).1 += 1;
            }
        }

        let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .1.cmp(&a.1 .1).then(a.1 .0.cmp(&b.1 .0)));
        ranked.truncate(self.max_themes);

        ranked
            .into_iter()
            .map(|(word, (_, count))| Theme { word, count })
            .collect()
    }

    /// Themes for the positive and negative reviews in `reviews`.
    pub fn week_themes(&self, reviews: &[&Review]) -> WeekThemes {
        let with = |sentiment: Sentiment| {
            self.extract(reviews.iter().copied().filter(move |r| Sentiment::of(r) == sentiment))
        };
        let themes = WeekThemes {
            positive: with(Sentiment::Positive),
            negative: with(Sentiment::Negative),
        };

        debug!(
            positive = themes.positive.len(),
            negative = themes.negative.len(),
            top_negative = themes.negative.first().map(|t| t.word.as_str()).unwrap_or(""),
            "Extracted weekly themes"
        );
        themes
    }
}
