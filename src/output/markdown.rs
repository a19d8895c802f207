// Markdown report generation.
//
// Renders a WeeklyReport into a standalone markdown document, from headline
// numbers and the week-over-week table down to topic tags and recurring
// words. `render_report` is pure; `generate_report` also writes it.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracing::info;

use super::{bar, group_thousands, percent, signed_count, signed_float, table_cell};
use crate::topics::Theme;
use crate::analytics::sentiment::Sentiment;
use crate::pipeline::weekly::WeeklyReport;

/// Render the report as markdown.
pub fn render_report(report: &WeeklyReport) -> String {
    let mut md = String::new();
    let a = &report.analytics;
    let cur = &a.current;

    // `write!` into a String can't fail.
    let _ = writeln!(md, "# {}: Weekly Review Report", report.brand_name());
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "**{}** · {} – {}",
        a.iso_week,
        a.current_window.start.format("%B %d, %Y"),
        a.current_window.end.format("%B %d, %Y"),
    );
    let _ = writeln!(md);

    if let Some(summary) = report
        .company
        .as_ref()
        .and_then(|c| c.ai_summary.as_ref())
        .map(|s| s.text().trim())
        .filter(|s| !s.is_empty())
    {
        let _ = writeln!(md, "## AI-Generated Insights\n");
        for para in summary.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            let _ = writeln!(md, "> {}\n", para.replace('\n', " "));
        }
    }

    // Summary
    let _ = writeln!(md, "## Summary\n");
    let _ = writeln!(md, "| Metric | Value |");
    let _ = writeln!(md, "|---|---|");
    if let Some(company) = &report.company {
        if let Some(score) = company.trust_score {
            let _ = writeln!(md, "| Trust Score | {score}/5 |");
        }
        if let Some(total) = company.total_reviews {
            let _ = writeln!(md, "| Total Reviews | {} |", group_thousands(total));
        }
    }
    let _ = writeln!(md, "| New This Week | {} |", cur.count);
    let _ = writeln!(md, "| Updated This Week | {} |", cur.updated_count);
    let _ = writeln!(md, "| Average Rating | {:.2}/5 |", cur.avg_rating);
    let _ = writeln!(md, "| Response Rate | {:.1}% |", cur.response_rate);
    let _ = writeln!(
        md,
        "| Avg Response Time | {:.1} days |",
        cur.avg_response_time_days
    );
    let _ = writeln!(md);

    // Week over week
    let prev = &a.previous;
    let cmp = &a.comparison;
    let _ = writeln!(md, "## Week over Week\n");
    let _ = writeln!(md, "| Metric | This Week | Last Week | Change |");
    let _ = writeln!(md, "|---|---|---|---|");
    let change_pct = cmp
        .count_change_pct
        .map(|p| format!(" ({}%)", signed_float(p, 1)))
        .unwrap_or_default();
    let _ = writeln!(
        md,
        "| New Reviews | {} | {} | {}{} |",
        cur.count,
        prev.count,
        signed_count(cmp.count_delta),
        change_pct
    );
    let _ = writeln!(
        md,
        "| Updated Reviews | {} | {} | {} |",
        cur.updated_count,
        prev.updated_count,
        signed_count(cmp.updated_delta)
    );
    let _ = writeln!(
        md,
        "| Average Rating | {:.2} | {:.2} | {} |",
        cur.avg_rating,
        prev.avg_rating,
        signed_float(cmp.avg_rating_delta, 2)
    );
    let _ = writeln!(md);

    // Sentiment
    let _ = writeln!(md, "## Sentiment Analysis\n");
    let total = cur.sentiment.total();
    if total == 0 {
        let _ = writeln!(md, "No reviews this week.\n");
    } else {
        let _ = writeln!(md, "| Sentiment | Reviews | Share |");
        let _ = writeln!(md, "|---|---|---|");
        for (label, sentiment) in [
            ("Positive", Sentiment::Positive),
            ("Neutral", Sentiment::Neutral),
            ("Negative", Sentiment::Negative),
        ] {
            let n = cur.sentiment.get(sentiment);
            let _ = writeln!(md, "| {label} | {n} | {:.1}% |", percent(n, total));
        }
        let _ = writeln!(md);
    }

    // Ratings
    let _ = writeln!(md, "## Rating Distribution\n");
    let _ = writeln!(md, "```");
    let max = cur.rating_distribution.max();
    for stars in (1..=5u8).rev() {
        let n = cur.rating_distribution.count(stars);
        let _ = writeln!(md, "{stars}★ {} {n}", bar(n, max, 20));
    }
    let _ = writeln!(md, "```\n");

    // Languages
    if !cur.languages.is_empty() {
        let _ = writeln!(md, "## Languages\n");
        let _ = writeln!(md, "| Language | Reviews | Share |");
        let _ = writeln!(md, "|---|---|---|");
        let mut langs: Vec<(&String, &usize)> = cur.languages.iter().collect();
        langs.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (code, n) in langs {
            let _ = writeln!(
                md,
                "| {} | {n} | {:.1}% |",
                table_cell(code),
                percent(*n, cur.count)
            );
        }
        let _ = writeln!(md);
    }

    // Sources
    let _ = writeln!(md, "## Review Sources\n");
    let _ = writeln!(md, "| Source | Reviews |");
    let _ = writeln!(md, "|---|---|");
    let _ = writeln!(md, "| Organic | {} |", cur.sources.organic);
    let _ = writeln!(md, "| Verified | {} |", cur.sources.verified);
    let _ = writeln!(md, "| Invited | {} |", cur.sources.invited);
    let _ = writeln!(md);

    // Topics
    let _ = writeln!(md, "## Topics\n");
    if report.topics.mentions.is_empty() {
        let _ = writeln!(md, "No tracked topics were mentioned this week.\n");
    } else {
        let _ = writeln!(md, "| Topic | Verdict | Mentions | + / = / − |");
        let _ = writeln!(md, "|---|---|---|---|");
        let classification = &report.topics.classification;
        for m in &report.topics.mentions {
            let verdict = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
                .into_iter()
                .find(|s| classification.get(*s).contains(&m.topic))
                .unwrap_or(Sentiment::Neutral);
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} / {} / {} |",
                table_cell(&m.topic),
                verdict,
                m.total(),
                m.mentions.positive,
                m.mentions.neutral,
                m.mentions.negative
            );
        }
        let _ = writeln!(md);
        let _ = writeln!(
            md,
            "_Topic matching is approximate: a review counts as a mention if it contains any word of the topic._\n"
        );
    }

    if !report.themes.is_empty() {
        let _ = writeln!(md, "### Recurring Words\n");
        for (label, themes) in [
            ("Positive reviews", &report.themes.positive),
            ("Negative reviews", &report.themes.negative),
        ] {
            if !themes.is_empty() {
                let _ = writeln!(md, "- **{label}:** {}", theme_list(themes));
            }
        }
        let _ = writeln!(md);
    }

    let _ = writeln!(md, "---\n");
    let _ = writeln!(
        md,
        "_Generated {} from {} ({} reviews in dataset)._",
        a.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.source,
        report.reviews_in_dataset
    );

    md
}

fn theme_list(themes: &[Theme]) -> String {
    themes
        .iter()
        .map(|t| format!("{} ({})", t.word, t.count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the report and write it to `output_path`, creating parent
/// directories as needed. Returns the path written.
pub fn generate_report(report: &WeeklyReport, output_path: &str) -> Result<String> {
    let md = render_report(report);

    if let Some(parent) = std::path::Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    std::fs::write(output_path, md)
        .with_context(|| format!("Failed to write report to {output_path}"))?;
    info!(path = output_path, "Wrote markdown report");

    Ok(output_path.to_string())
}
