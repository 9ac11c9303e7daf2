use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::args::{Args, OutputFormat};
use crate::html::render_html_report;
use crate::input::{self, ParsedData};
use crate::lexicon::{self, Lexicon};
use crate::sentiment::{self, TokenMode};
use crate::stats::{self, AnalysisResult};
use crate::tabs::TabSet;
use crate::trends;
use crate::utils::{format_metric, format_website};

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub mode: TokenMode,
    pub seed: Option<u64>,
    pub top_words: usize,
    pub today: NaiveDate,
}

impl AnalysisOptions {
    pub fn from_args(args: &Args) -> Self {
        AnalysisOptions {
            mode: if args.strip_punctuation {
                TokenMode::StripPunctuation
            } else {
                TokenMode::Literal
            },
            seed: args.seed,
            top_words: args.top_words,
            // UTC day, matching the ISO date labels the page derives
            today: Utc::now().date_naive(),
        }
    }
}

/// One "Analyze" pass: score, build trends, compute metrics. Input issues are
/// recorded on the result, never raised here.
pub fn analyze(data: ParsedData, lexicon: &Lexicon, options: &AnalysisOptions) -> AnalysisResult {
    let start_time = Instant::now();
    info!(action = "start", component = "analysis", "Starting ranking analysis");

    let issues = input::validate(&data);
    for issue in &issues {
        warn!(action = "validate", component = "input", issue = %issue, "Input issue");
    }

    let sentiments = sentiment::score_all(&data.reviews, lexicon, options.mode);

    let trend_dates = trends::trend_dates(options.today);
    let series = match options.seed {
        Some(seed) => build_trends(&data, &mut StdRng::seed_from_u64(seed)),
        None => build_trends(&data, &mut rand::thread_rng()),
    };

    let metrics = stats::compute_metrics(&data, &sentiments, &series);
    let advanced = stats::advanced_stats(&data, &sentiments, &series, options.top_words);

    info!(
        action = "complete",
        component = "analysis",
        issues = issues.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Analysis completed"
    );

    AnalysisResult {
        data,
        sentiments,
        trend_dates,
        trends: series,
        metrics,
        advanced,
        issues,
    }
}

fn build_trends<R: Rng>(data: &ParsedData, rng: &mut R) -> Vec<trends::TrendSeries> {
    data.websites
        .iter()
        .enumerate()
        .map(|(i, website)| trends::build_series(website, data.ranking_at(i), rng))
        .collect()
}

/// Load lexicon and inputs named by `args`, then analyze. `--strict` turns
/// any input issue into an error.
pub fn run_analysis(args: &Args) -> Result<AnalysisResult> {
    let lexicon = lexicon::load_lexicon(args.lexicon.as_deref())?;
    let data = input::load_input(
        args.websites.as_deref(),
        args.rankings.as_deref(),
        args.reviews.as_deref(),
    )?;

    if args.strict {
        let issues = input::validate(&data);
        if !issues.is_empty() {
            let listed: Vec<String> = issues.iter().map(|i| format!("  - {}", i)).collect();
            anyhow::bail!("Input rejected (--strict):\n{}", listed.join("\n"));
        }
    }

    Ok(analyze(data, &lexicon, &AnalysisOptions::from_args(args)))
}

pub fn write_html_report(result: &AnalysisResult, initial_tab: &str, path: &Path) -> Result<()> {
    let start_time = Instant::now();
    let mut tabs = TabSet::standard();
    if !tabs.switch_tab(initial_tab) {
        warn!(action = "select", component = "tabs", tab = initial_tab, "Unknown tab, no pane will be active");
    }

    let html = render_html_report(result, &tabs);
    fs::write(path, html).with_context(|| format!("Failed to write report to {:?}", path))?;

    info!(
        action = "complete",
        component = "html_report",
        path = ?path,
        duration_ms = start_time.elapsed().as_millis(),
        "HTML report written"
    );
    Ok(())
}

pub fn render_text_summary(result: &AnalysisResult) -> String {
    let mut lines = Vec::new();
    let ranking = &result.metrics.ranking;
    let sentiment = &result.metrics.sentiment;

    lines.push("--- Website Ranking Analysis ---".to_string());
    lines.push(format!(
        "Websites: {}, rankings: {}, reviews: {}",
        result.data.websites.len(),
        result.data.rankings.len(),
        result.data.reviews.len()
    ));
    lines.push(format!("Average ranking: {}", format_metric(ranking.average, 1)));
    lines.push(format!("Best ranking: {}", format_metric(ranking.best, 0)));
    lines.push(format!("Worst ranking: {}", format_metric(ranking.worst, 0)));
    lines.push(format!("Average sentiment: {}", format_metric(sentiment.average, 1)));
    lines.push(format!(
        "Most positive: {}",
        format_website(sentiment.most_positive.as_deref())
    ));
    lines.push(format!(
        "Most negative: {}",
        format_website(sentiment.most_negative.as_deref())
    ));

    if !result.metrics.trends.is_empty() {
        lines.push("\nTrends:".to_string());
        for trend in &result.metrics.trends {
            lines.push(format!(
                "- {}: {} ({}), mean {}",
                trend.website,
                trend.label,
                format_metric(trend.change, 2),
                format_metric(trend.mean, 2)
            ));
        }
    }

    if !result.advanced.top_words.is_empty() {
        lines.push(format!(
            "\nTop {} most frequent words:",
            result.advanced.top_words.len()
        ));
        for (word, count) in &result.advanced.top_words {
            lines.push(format!("- {}: {}", word, count));
        }
    }

    if !result.issues.is_empty() {
        lines.push("\nInput issues:".to_string());
        for issue in &result.issues {
            lines.push(format!("- {}", issue));
        }
    }

    lines.join("\n")
}

pub fn print_analysis_results(result: &AnalysisResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("\n{}", render_text_summary(result)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(result).context("Failed to serialize analysis")?
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::TrendLabel;

    fn options(mode: TokenMode) -> AnalysisOptions {
        AnalysisOptions {
            mode,
            seed: Some(9),
            top_words: 5,
            today: NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
        }
    }

    #[test]
    fn test_sample_literal_analysis() {
        let lexicon = Lexicon::builtin().unwrap();
        let result = analyze(ParsedData::sample(), &lexicon, &options(TokenMode::Literal));
        assert_eq!(result.sentiments, vec![2, 1, 0, 1, 1]);
        assert_eq!(result.metrics.sentiment.average, 1.0);
        assert_eq!(result.metrics.sentiment.most_positive.as_deref(), Some("amazon.com"));
        assert_eq!(result.metrics.sentiment.most_negative.as_deref(), Some("walmart.com"));
        assert_eq!(result.metrics.trends.len(), 5);
        assert!(result.metrics.trends.iter().all(|t| t.label != TrendLabel::Unknown));
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_seeded_analysis_is_reproducible() {
        let lexicon = Lexicon::builtin().unwrap();
        let a = analyze(ParsedData::sample(), &lexicon, &options(TokenMode::Literal));
        let b = analyze(ParsedData::sample(), &lexicon, &options(TokenMode::Literal));
        assert_eq!(a.trends, b.trends);
        assert_eq!(a.trend_dates.last(), Some(&NaiveDate::from_ymd_opt(2024, 1, 30).unwrap()));
    }

    #[test]
    fn test_text_summary_shows_degraded_values() {
        let lexicon = Lexicon::builtin().unwrap();
        let data = input::parse_input("a\nb", "1\nX", "bad");
        let summary = render_text_summary(&analyze(data, &lexicon, &options(TokenMode::Literal)));
        assert!(summary.contains("Average ranking: NaN"));
        assert!(summary.contains("Most positive: a"));
        assert!(summary.contains("- b: Unknown (NaN), mean NaN"));
        assert!(summary.contains("ranking on line 2 is not a number"));
    }

    #[test]
    fn test_options_use_utc_day() {
        use clap::Parser;
        let before = Utc::now().date_naive();
        let options = AnalysisOptions::from_args(&Args::parse_from(["rankview", "--seed", "3"]));
        let after = Utc::now().date_naive();
        assert!(options.today == before || options.today == after);
        assert_eq!(options.seed, Some(3));
    }

    #[test]
    fn test_text_summary_rounds_halves_up() {
        let lexicon = Lexicon::builtin().unwrap();
        let data = input::parse_input("a\nb\nc\nd", "1\n1\n1\n2", "great\nx\ny\nz");
        let result = analyze(data, &lexicon, &options(TokenMode::Literal));
        assert_eq!(result.metrics.ranking.average, 1.25);
        assert_eq!(result.metrics.sentiment.average, 0.25);

        let summary = render_text_summary(&result);
        assert!(summary.contains("Average ranking: 1.3"));
        assert!(summary.contains("Average sentiment: 0.3"));
    }

    #[test]
    fn test_analysis_fills_trend_statistics() {
        let lexicon = Lexicon::builtin().unwrap();
        let result = analyze(ParsedData::sample(), &lexicon, &options(TokenMode::Literal));

        for (metric, ranking) in result.metrics.trends.iter().zip(1..) {
            assert!((metric.mean - ranking as f64).abs() <= 0.25);
        }
        assert_eq!(result.advanced.correlations.len(), 5);
        assert_eq!(
            result.advanced.sentiment_distribution,
            vec![(0, 1), (1, 3), (2, 1)]
        );
    }
}
