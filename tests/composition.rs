// Composition tests: verifying that the stages chain together correctly.
//
// These tests exercise the data flow between modules:
//   ReviewSource -> split_weeks -> aggregate -> topics/themes -> markdown/JSON
// without touching the wall clock. Report generation writes to the system
// temp directory.

use chrono::{DateTime, Duration, TimeZone, Utc};

use reviewpulse::analytics::analyze_history;
use reviewpulse::output::json::{write_history, write_report};
use reviewpulse::output::markdown::{generate_report, render_report};
use reviewpulse::pipeline::weekly::{build_report, resolve_topics, run};
use reviewpulse::reviews::models::{AiSummary, Company};
use reviewpulse::reviews::{Dataset, InMemorySource, JsonFileSource, Reply, Review, ReviewSource};
use reviewpulse::topics::{KeywordClassifier, ThemeExtractor, DEFAULT_MAX_THEMES};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 18, 12, 0, 0).unwrap()
}

fn review(rating: u8, days_ago: i64, text: &str) -> Review {
    Review {
        rating,
        published_at: now() - Duration::days(days_ago),
        text: text.to_string(),
        language: Some("en".to_string()),
        ..Default::default()
    }
}

fn sample_dataset() -> Dataset {
    let mut answered = review(1, 1, "Cancelling the subscription was impossible");
    answered.reply = Some(Reply {
        published_at: Some(answered.published_at + Duration::hours(6)),
        message: Some("Sorry, we've cancelled it for you.".to_string()),
    });

    Dataset {
        company: Some(Company {
            brand_name: "KetoGo".to_string(),
            trust_score: Some(4.2),
            total_reviews: Some(5120),
            top_mentions: vec!["Subscription".to_string(), "Recipes".to_string()],
            ai_summary: Some(AiSummary::Text(
                "Customers love the recipes.\n\nSome struggle to cancel.".to_string(),
            )),
            ..Default::default()
        }),
        reviews: vec![
            review(5, 0, "Delicious recipes and easy plan"),
            review(4, 2, "Recipes are varied"),
            answered,
            review(2, 3, "Subscription renewed without warning"),
            review(3, 10, "Okay recipes"),
            Review {
                updated_at: Some(now() - Duration::days(1)),
                ..review(2, 45, "Changed my mind about the subscription")
            },
        ],
    }
}

fn themes() -> ThemeExtractor {
    ThemeExtractor::new(DEFAULT_MAX_THEMES).unwrap()
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// Chain: Dataset -> WeeklyReport
// ============================================================

#[test]
fn pipeline_combines_analytics_and_topics() {
    let dataset = sample_dataset();
    let topics = resolve_topics(&[], &dataset);
    let report = build_report(
        &dataset,
        "fixture",
        &KeywordClassifier::default(),
        &themes(),
        &topics,
        now(),
    );

    let cur = &report.analytics.current;
    assert_eq!(cur.count, 4);
    assert_eq!(cur.updated_count, 1);
    assert_eq!(cur.avg_rating, 3.0);
    assert_eq!(cur.response_rate, 25.0);
    assert_eq!(cur.avg_response_time_days, 0.25);
    assert_eq!(report.analytics.previous.count, 1);
    assert_eq!(report.reviews_in_dataset, 6);

    // Subscription: two negative mentions this week (the updated review
    // isn't part of the new-review set).
    assert_eq!(report.topics.classification.negative, vec!["Subscription"]);
    assert_eq!(report.topics.classification.positive, vec!["Recipes"]);
}

#[test]
fn pipeline_extracts_themes_from_new_reviews_only() {
    let dataset = sample_dataset();
    let report = build_report(
        &dataset,
        "fixture",
        &KeywordClassifier::default(),
        &themes(),
        &[],
        now(),
    );

    let positive = &report.themes.positive;
    let negative = &report.themes.negative;
    assert_eq!((positive[0].word.as_str(), positive[0].count), ("recipes", 2));
    assert_eq!((negative[0].word.as_str(), negative[0].count), ("subscription", 2));

    // Last week's "Okay recipes" and the updated review's text don't count.
    assert!(!negative.iter().any(|t| t.word == "changed"));
}

#[test]
fn explicit_topics_override_top_mentions() {
    let dataset = sample_dataset();
    let topics = resolve_topics(&labels(&["  plan ", ""]), &dataset);
    assert_eq!(topics, vec!["plan"]);

    let blank_only = resolve_topics(&labels(&["   "]), &dataset);
    assert_eq!(blank_only, vec!["Subscription", "Recipes"]);
}

#[test]
fn same_inputs_same_report() {
    let source = InMemorySource::new(sample_dataset());
    let topics = labels(&["recipes"]);
    let classifier = KeywordClassifier::default();

    let a = run(&source, &classifier, &themes(), &topics, now()).unwrap();
    let b = run(&source, &classifier, &themes(), &topics, now()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn reference_instant_moves_the_window() {
    let source = InMemorySource::new(sample_dataset());
    let classifier = KeywordClassifier::default();

    // Eight days on, this week's four reviews are the comparison baseline.
    let later = run(&source, &classifier, &themes(), &[], now() + Duration::days(8)).unwrap();
    assert_eq!(later.analytics.current.count, 0);
    assert_eq!(later.analytics.previous.count, 4);
    assert_eq!(later.analytics.current.avg_rating, 0.0);
}

// ============================================================
// File source -> pipeline
// ============================================================

#[test]
fn json_file_source_feeds_the_pipeline() {
    let path = std::env::temp_dir().join("reviewpulse_test_export.json");
    std::fs::write(
        &path,
        r#"{"company": {"brand_name": "FileCo", "top_mentions": ["delivery"]},
            "reviews": [
              {"rating": 1, "text": "delivery never came", "dates": {"publishedDate": "2026-03-17T10:00:00Z"}},
              {"rating": 2, "text": "late delivery", "dates": {"publishedDate": "2026-03-16T10:00:00Z"}}
            ]}"#,
    )
    .unwrap();

    let source = JsonFileSource::new(&path);
    let dataset = source.load().unwrap();
    let topics = resolve_topics(&[], &dataset);
    let report = build_report(
        &dataset,
        &source.describe(),
        &KeywordClassifier::default(),
        &themes(),
        &topics,
        now(),
    );

    assert_eq!(report.brand_name(), "FileCo");
    assert_eq!(report.analytics.current.sentiment.negative, 2);
    assert_eq!(report.topics.classification.negative, vec!["delivery"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn json_file_with_bad_record_fails_load() {
    let path = std::env::temp_dir().join("reviewpulse_test_bad_export.json");
    std::fs::write(&path, r#"[{"rating": 4}]"#).unwrap();

    let err = JsonFileSource::new(&path).load().unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("missing publishedDate"), "got: {msg}");
    assert!(msg.contains("#0"), "got: {msg}");

    let _ = std::fs::remove_file(&path);
}

// ============================================================
// Rendering
// ============================================================

#[test]
fn markdown_contains_all_sections() {
    let dataset = sample_dataset();
    let topics = resolve_topics(&[], &dataset);
    let report = build_report(
        &dataset,
        "fixture",
        &KeywordClassifier::default(),
        &themes(),
        &topics,
        now(),
    );
    let md = render_report(&report);

    assert!(md.contains("# KetoGo"));
    assert!(md.contains("2026-W12"));
    assert!(md.contains("## AI-Generated Insights"));
    assert!(md.contains("> Some struggle to cancel."));
    assert!(md.contains("| Trust Score | 4.2/5 |"));
    assert!(md.contains("| Total Reviews | 5,120 |"));
    assert!(md.contains("| New This Week | 4 |"));
    assert!(md.contains("| Average Rating | 3.00/5 |"));
    assert!(md.contains("| New Reviews | 4 | 1 | +3 (+300.0%) |"));
    assert!(md.contains("| Positive | 2 | 50.0% |"));
    assert!(md.contains("| EN | 4 | 100.0% |"));
    assert!(md.contains("| Organic | 4 |"));
    assert!(md.contains("| Subscription | negative | 2 | 0 / 0 / 2 |"));
    assert!(md.contains("| Recipes | positive | 2 | 2 / 0 / 0 |"));
    assert!(md.contains("### Recurring Words"));
    assert!(md.contains("recipes (2)"));
    assert!(md.contains("subscription (2)"));
}

#[test]
fn table_cells_escape_pipes() {
    let dataset = sample_dataset();
    let report = build_report(
        &dataset,
        "fixture",
        &KeywordClassifier::default(),
        &themes(),
        &labels(&["recipes | plan"]),
        now(),
    );
    let md = render_report(&report);

    assert!(md.contains(r"| recipes \| plan | positive |"), "got:\n{md}");
}

#[test]
fn markdown_for_empty_week() {
    let report = build_report(
        &Dataset::default(),
        "empty",
        &KeywordClassifier::default(),
        &themes(),
        &[],
        now(),
    );
    let md = render_report(&report);

    assert!(md.contains("# Unknown brand"));
    assert!(md.contains("No reviews this week."));
    assert!(md.contains("No tracked topics were mentioned this week."));
    assert!(md.contains("| Average Rating | 0.00/5 |"));
    assert!(!md.contains("NaN"));
    assert!(!md.contains("## Languages"));
}

#[test]
fn generate_report_writes_file() {
    let dir = std::env::temp_dir().join("reviewpulse_test_report");
    let path = dir.join("weekly.md");
    let path_str = path.to_string_lossy().to_string();

    let source = InMemorySource::new(sample_dataset());
    let report = run(&source, &KeywordClassifier::default(), &themes(), &[], now()).unwrap();
    let written = generate_report(&report, &path_str).unwrap();
    assert_eq!(written, path_str);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("## Week over Week"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn json_export_uses_camel_case() {
    let source = InMemorySource::new(sample_dataset());
    let report = run(&source, &KeywordClassifier::default(), &themes(), &labels(&["recipes"]), now()).unwrap();
    let json = reviewpulse::output::json::to_json(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let current = &value["analytics"]["current"];
    assert_eq!(current["count"], 4);
    assert_eq!(current["avgRating"], 3.0);
    assert_eq!(current["sources"]["organic"], 4);
    assert_eq!(value["analytics"]["currentWindow"]["start"], "2026-03-11");
    assert_eq!(value["topics"]["classification"]["positive"][0], "recipes");
}

#[test]
fn json_report_and_history_files() {
    let dir = std::env::temp_dir().join("reviewpulse_test_json");
    let report_path = dir.join("report.json").to_string_lossy().to_string();
    let history_path = dir.join("history.json").to_string_lossy().to_string();

    let dataset = sample_dataset();
    let source = InMemorySource::new(dataset.clone());
    let report = run(&source, &KeywordClassifier::default(), &themes(), &[], now()).unwrap();
    write_report(&report, &report_path).unwrap();

    let history = analyze_history(&dataset.reviews, now(), Some(3));
    write_history(&history, &history_path).unwrap();

    let report_json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report_json["themes"]["negative"][0]["word"], "subscription");

    let history_json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&history_path).unwrap()).unwrap();
    let weeks = history_json.as_array().unwrap();
    assert_eq!(weeks.len(), 3);
    assert_eq!(weeks[2]["isoWeek"], "2026-W12");
    assert_eq!(weeks[2]["current"]["count"], 4);
    assert_eq!(weeks[1]["current"]["count"], 1);

    let _ = std::fs::remove_dir_all(&dir);
}
