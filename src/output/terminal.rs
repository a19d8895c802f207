// Colored terminal output for weekly summaries and topic tags.
//
// Everything main.rs prints about a report goes through here. Report files
// live in `markdown` and `json`.

use colored::Colorize;

use super::{bar, percent, signed_count, signed_float, truncate_chars};
use crate::analytics::sentiment::Sentiment;
use crate::analytics::AnalyticsResult;
use crate::error::InvalidReviewError;
use crate::pipeline::weekly::WeeklyReport;
use crate::topics::{TopicReport, WeekThemes};

/// Display the weekly summary in the terminal.
pub fn display_summary(report: &WeeklyReport) {
    let a = &report.analytics;
    let cur = &a.current;

    println!(
        "\n{}",
        format!(
            "=== {} · {} ({} to {}) ===",
            report.brand_name(),
            a.iso_week,
            a.current_window.start,
            a.current_window.end
        )
        .bold()
    );
    println!();

    if let Some(summary) = report
        .company
        .as_ref()
        .and_then(|c| c.ai_summary.as_ref())
    {
        let preview = truncate_chars(summary.text().trim(), 160);
        if !preview.is_empty() {
            println!("  {}", preview.dimmed());
            println!();
        }
    }

    println!(
        "  New this week:     {:>5}  ({} vs last week)",
        cur.count,
        colorize_delta(a.comparison.count_delta as f64, signed_count(a.comparison.count_delta))
    );
    println!("  Updated this week: {:>5}", cur.updated_count);
    println!(
        "  Average rating:    {:>5.2}  ({} vs last week)",
        cur.avg_rating,
        colorize_delta(
            a.comparison.avg_rating_delta,
            signed_float(a.comparison.avg_rating_delta, 2)
        )
    );
    println!(
        "  Response rate:     {:>5.1}%  ({} of {} replied)",
        cur.response_rate, cur.replied_count, cur.count
    );
    println!(
        "  Avg response time: {:>5.1} days",
        cur.avg_response_time_days
    );
    println!();

    display_sentiment(report);

    if !cur.languages.is_empty() {
        let langs: Vec<String> = cur
            .languages
            .iter()
            .map(|(code, n)| format!("{code} {n}"))
            .collect();
        println!("  Languages: {}", langs.join(", ").dimmed());
    }
    println!(
        "  Sources:   organic {}, verified {}, invited {}",
        cur.sources.organic, cur.sources.verified, cur.sources.invited
    );

    display_topics(&report.topics);
    display_themes(&report.themes);
}

fn display_sentiment(report: &WeeklyReport) {
    let sentiment = &report.analytics.current.sentiment;
    let total = sentiment.total();
    if total == 0 {
        println!("  {}", "No reviews this week.".dimmed());
        println!();
        return;
    }

    for s in [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative] {
        let n = sentiment.get(s);
        let line = format!("{} {:>4}", bar(n, total, 20), n);
        println!(
            "  {:<9} {} {:>5.1}%",
            s.as_str(),
            colorize_sentiment(s, &line),
            percent(n, total)
        );
    }
    println!();
}

/// Display topic tags with their mention counts.
pub fn display_topics(topics: &TopicReport) {
    if topics.mentions.is_empty() {
        println!("\n  {}", "No tracked topics mentioned this week.".dimmed());
        return;
    }

    println!("\n{}", "=== Topics ===".bold());
    for s in [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral] {
        let labels = topics.classification.get(s);
        if labels.is_empty() {
            continue;
        }
        println!("  {}", colorize_sentiment(s, s.as_str()).bold());
        for label in labels {
            let total = topics
                .mentions
                .iter()
                .find(|m| &m.topic == label)
                .map(|m| m.total())
                .unwrap_or(0);
            println!("    {:<32} {}", label, format!("{total} mentions").dimmed());
        }
    }
    println!();
}

/// Display the week's most used words, positive side first.
pub fn display_themes(themes: &WeekThemes) {
    if themes.is_empty() {
        return;
    }

    println!("{}", "=== Recurring words ===".bold());
    for (sentiment, list) in [
        (Sentiment::Positive, &themes.positive),
        (Sentiment::Negative, &themes.negative),
    ] {
        if list.is_empty() {
            continue;
        }
        let words: Vec<String> = list
            .iter()
            .map(|t| format!("{} ({})", t.word, t.count))
            .collect();
        println!(
            "  {:<9} {}",
            colorize_sentiment(sentiment, sentiment.as_str()),
            words.join(", ")
        );
    }
    println!();
}

/// Display a week-by-week series, one row per week, oldest first.
pub fn display_history(history: &[AnalyticsResult]) {
    if history.is_empty() {
        println!("  {}", "No reviews to build a history from.".dimmed());
        return;
    }

    println!("\n{}", "=== Weekly history ===".bold());
    println!(
        "  {:<9} {:<23} {:>5} {:>7} {:>6} {:>6}",
        "Week", "Window", "New", "Avg", "+", "-"
    );
    let busiest = history.iter().map(|a| a.current.count).max().unwrap_or(0);
    for a in history {
        let cur = &a.current;
        println!(
            "  {:<9} {:<23} {:>5} {:>7.2} {:>6} {:>6} {}",
            a.iso_week,
            format!("{} to {}", a.current_window.start, a.current_window.end),
            cur.count,
            cur.avg_rating,
            cur.sentiment.positive.to_string().green(),
            cur.sentiment.negative.to_string().red(),
            bar(cur.count, busiest, 20).dimmed()
        );
    }
    println!();
}

/// Display records rejected by `validate`.
pub fn display_invalid_reviews(errors: &[InvalidReviewError], checked: usize) {
    if errors.is_empty() {
        println!(
            "{} All {} reviews are valid.",
            "ok".green().bold(),
            checked
        );
        return;
    }

    println!(
        "\n{}",
        format!("=== {} of {} reviews are invalid ===", errors.len(), checked).bold()
    );
    for err in errors {
        println!("  {} {}", "!".red().bold(), err);
    }
    println!();
}

fn colorize_sentiment(sentiment: Sentiment, text: &str) -> colored::ColoredString {
    match sentiment {
        Sentiment::Positive => text.green(),
        Sentiment::Neutral => text.yellow(),
        Sentiment::Negative => text.red(),
    }
}

fn colorize_delta(delta: f64, text: String) -> colored::ColoredString {
    if delta > 0.0 {
        text.green()
    } else if delta < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}
