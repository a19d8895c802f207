use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use reviewpulse::analytics::analyze_history;
use reviewpulse::config::{parse_reference_time, Config};
use reviewpulse::pipeline::weekly;
use reviewpulse::reviews::{JsonFileSource, ReviewSource};
use reviewpulse::topics::{KeywordClassifier, ThemeExtractor, DEFAULT_MAX_THEMES};

/// reviewpulse: weekly analytics for customer review exports.
///
/// Reads a review export, compares this week against last week, tags
/// recurring topics by sentiment, and writes a report.
#[derive(Parser)]
#[command(name = "reviewpulse", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the weekly report (terminal summary + markdown file)
    Report {
        /// Review export to read (default: REVIEWPULSE_INPUT or ./reviews.json)
        input: Option<PathBuf>,

        /// Markdown report path (default: output/weekly-report.md)
        #[arg(long, short)]
        output: Option<String>,

        /// Topic to tag; repeat for several (default: the export's top mentions)
        #[arg(long = "topic")]
        topics: Vec<String>,

        /// Reference instant, RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Also write the full report as JSON to this path
        #[arg(long)]
        json: Option<String>,
    },

    /// Show only the topic sentiment tags and recurring words for this week
    Topics {
        /// Review export to read (default: REVIEWPULSE_INPUT or ./reviews.json)
        input: Option<PathBuf>,

        /// Topic to tag; repeat for several (default: the export's top mentions)
        #[arg(long = "topic")]
        topics: Vec<String>,

        /// Reference instant, RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Show the weekly numbers for every week since the first review
    History {
        /// Review export to read (default: REVIEWPULSE_INPUT or ./reviews.json)
        input: Option<PathBuf>,

        /// Only show the most recent N weeks
        #[arg(long)]
        weeks: Option<usize>,

        /// Reference instant, RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Also write the series as JSON to this path
        #[arg(long)]
        json: Option<String>,
    },

    /// Check every review record and list the invalid ones
    Validate {
        /// Review export to read (default: REVIEWPULSE_INPUT or ./reviews.json)
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reviewpulse=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            output,
            topics,
            now,
            json,
        } => {
            let config = load_config(input, &topics, now.as_deref())?;
            config.require_input()?;

            let source = JsonFileSource::new(config.input_path.clone());
            let dataset = source.load()?;
            let topics = weekly::resolve_topics(&config.topics, &dataset);
            if topics.is_empty() {
                info!("No topics configured and none in the export; skipping topic tags");
            }

            let now = config.now();
            let report = weekly::build_report(
                &dataset,
                &source.describe(),
                &KeywordClassifier::default(),
                &ThemeExtractor::new(DEFAULT_MAX_THEMES)?,
                &topics,
                now,
            );

            reviewpulse::output::terminal::display_summary(&report);

            let report_path = output.unwrap_or(config.report_path);
            let written = reviewpulse::output::markdown::generate_report(&report, &report_path)?;
            println!(
                "\n{}",
                format!("Markdown report saved to: {written}").bold()
            );

            if let Some(json_path) = json {
                let written = reviewpulse::output::json::write_report(&report, &json_path)?;
                println!("{}", format!("JSON export saved to: {written}").bold());
            }
        }

        Commands::Topics { input, topics, now } => {
            let config = load_config(input, &topics, now.as_deref())?;
            config.require_input()?;

            let source = JsonFileSource::new(config.input_path.clone());
            let dataset = source.load()?;
            let topics = weekly::resolve_topics(&config.topics, &dataset);
            if topics.is_empty() {
                println!(
                    "No topics to tag. Pass --topic, set REVIEWPULSE_TOPICS, \
                     or use an export with top_mentions."
                );
            }

            let report = weekly::build_report(
                &dataset,
                &source.describe(),
                &KeywordClassifier::default(),
                &ThemeExtractor::new(DEFAULT_MAX_THEMES)?,
                &topics,
                config.now(),
            );
            println!(
                "{} new reviews in {} ({} topics checked)",
                report.analytics.current.count,
                report.analytics.iso_week,
                topics.len()
            );
            reviewpulse::output::terminal::display_topics(&report.topics);
            reviewpulse::output::terminal::display_themes(&report.themes);
        }

        Commands::History {
            input,
            weeks,
            now,
            json,
        } => {
            let config = load_config(input, &[], now.as_deref())?;
            config.require_input()?;

            let source = JsonFileSource::new(config.input_path.clone());
            let dataset = source.load()?;
            let history = analyze_history(&dataset.reviews, config.now(), weeks);
            info!(weeks = history.len(), "Computed weekly history");

            reviewpulse::output::terminal::display_history(&history);

            if let Some(json_path) = json {
                let written = reviewpulse::output::json::write_history(&history, &json_path)?;
                println!("{}", format!("JSON export saved to: {written}").bold());
            }
        }

        Commands::Validate { input } => {
            let config = load_config(input, &[], None)?;
            config.require_input()?;

            let source = JsonFileSource::new(config.input_path.clone());
            let raw = source.load_raw()?;
            let errors = raw.validate_all();
            let checked = raw.reviews().len();

            reviewpulse::output::terminal::display_invalid_reviews(&errors, checked);

            if !errors.is_empty() {
                warn!(invalid = errors.len(), checked, "Export has invalid reviews");
                anyhow::bail!(
                    "{} invalid review(s) in {}",
                    errors.len(),
                    source.describe()
                );
            }
        }
    }

    Ok(())
}

/// Load env config and apply CLI overrides on top.
fn load_config(input: Option<PathBuf>, topics: &[String], now: Option<&str>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(input) = input {
        config.input_path = input;
    }
    if !topics.is_empty() {
        config.topics = topics.to_vec();
    }
    if let Some(raw) = now {
        config.reference_time = Some(parse_reference_time(raw)?);
    }
    Ok(config)
}
