//! HTML report generation
//!
//! Generates a single self-contained page: inline CSS, inline SVG charts and a
//! small script for tab switching. The report works offline.

use std::fmt::Write;

use crate::charts::{
    ranking_chart, render_bar_svg, render_line_svg, sentiment_chart, trend_chart,
};
use crate::stats::{AdvancedStats, AnalysisResult, MetricsResult};
use crate::tabs::{TabPane, TabSet};
use crate::utils::{element_id, format_metric, format_website, html_escape};

/// Render an analysis as an HTML report
pub fn render_html_report(result: &AnalysisResult, tabs: &TabSet) -> String {
    let ranking_svg = render_bar_svg(&ranking_chart(&result.data));
    let sentiment_svg = render_bar_svg(&sentiment_chart(&result.data, &result.sentiments));
    let trend_svg = render_line_svg(&trend_chart(&result.trend_dates, &result.trends));

    let panes = tabs
        .panes()
        .iter()
        .map(|pane| {
            let body = match pane.id.as_str() {
                "ranking" => render_ranking_pane(&ranking_svg, &result.metrics, &result.advanced),
                "sentiment" => {
                    render_sentiment_pane(&sentiment_svg, &result.metrics, &result.advanced)
                }
                "trends" => render_trends_pane(&trend_svg, &result.metrics, &result.advanced),
                "advanced" => render_advanced_pane(&result.advanced),
                _ => String::new(),
            };
            render_pane(pane, &body)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Website Ranking Analysis</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <header>
            <h1>Website Ranking Analysis</h1>
            <p class="subtitle">{websites} websites, {reviews} reviews</p>
        </header>
        {issues}
        <nav class="tabs">{buttons}</nav>
        {panes}
        <footer>Trend lines are synthetic: daily jitter around each static ranking.</footer>
    </div>
    <script>{js}</script>
</body>
</html>"#,
        css = inline_css(),
        js = inline_javascript(),
        websites = result.data.websites.len(),
        reviews = result.data.reviews.len(),
        issues = render_issues(result),
        buttons = render_tab_buttons(tabs),
        panes = panes,
    )
}

fn active_class(pane: &TabPane) -> &'static str {
    if pane.active {
        " active"
    } else {
        ""
    }
}

fn render_tab_buttons(tabs: &TabSet) -> String {
    tabs.panes()
        .iter()
        .map(|pane| {
            format!(
                r#"<button class="tab-btn{active}" data-tab="{id}">{title}</button>"#,
                active = active_class(pane),
                id = html_escape(&pane.id),
                title = html_escape(&pane.title),
            )
        })
        .collect()
}

fn render_pane(pane: &TabPane, body: &str) -> String {
    format!(
        r#"<section class="tab-pane{active}" id="{id}">
<h2>{title}</h2>
{body}
</section>"#,
        active = active_class(pane),
        id = html_escape(&pane.id),
        title = html_escape(&pane.title),
    )
}

fn render_issues(result: &AnalysisResult) -> String {
    if result.issues.is_empty() {
        return String::new();
    }
    let items: String = result
        .issues
        .iter()
        .map(|issue| format!("<li>{}</li>", html_escape(&issue.to_string())))
        .collect();
    format!(
        r#"<div class="issues"><strong>Input issues</strong><ul>{}</ul></div>"#,
        items
    )
}

fn metric_card(id: &str, label: &str, value: &str) -> String {
    format!(
        r#"<div class="metric"><span class="metric-label">{label}</span><span class="metric-value" id="{id}">{value}</span></div>"#,
        id = id,
        label = html_escape(label),
        value = html_escape(value),
    )
}

fn render_ranking_pane(svg: &str, metrics: &MetricsResult, advanced: &AdvancedStats) -> String {
    let ranking = &metrics.ranking;
    let mut distribution = String::new();
    for (value, count) in &advanced.distribution {
        let _ = write!(distribution, "<tr><td>{}</td><td>{}</td></tr>", value, count);
    }

    format!(
        r#"<div class="chart-row">
<div class="chart-box" id="rankingChart">{svg}</div>
<div class="metrics">
<h3>Key Metrics</h3>
{avg}{best}{worst}
<h3>Ranking Distribution</h3>
<table><thead><tr><th>Ranking</th><th>Websites</th></tr></thead><tbody>{distribution}</tbody></table>
</div>
</div>"#,
        avg = metric_card("avgRanking", "Average Ranking", &format_metric(ranking.average, 1)),
        best = metric_card("bestRanking", "Best Ranking", &format_metric(ranking.best, 0)),
        worst = metric_card("worstRanking", "Worst Ranking", &format_metric(ranking.worst, 0)),
    )
}

fn render_sentiment_pane(svg: &str, metrics: &MetricsResult, advanced: &AdvancedStats) -> String {
    let sentiment = &metrics.sentiment;
    let mut distribution = String::new();
    for (score, count) in &advanced.sentiment_distribution {
        let _ = write!(distribution, "<tr><td>{}</td><td>{}</td></tr>", score, count);
    }

    format!(
        r#"<div class="chart-row">
<div class="chart-box" id="sentimentChart">{svg}</div>
<div class="metrics">
<h3>Sentiment Metrics</h3>
{avg}{pos}{neg}
<h3>Sentiment Distribution</h3>
<table id="sentimentDistribution"><thead><tr><th>Score</th><th>Reviews</th></tr></thead><tbody>{distribution}</tbody></table>
</div>
</div>"#,
        avg = metric_card("avgSentiment", "Average Sentiment", &format_metric(sentiment.average, 1)),
        pos = metric_card(
            "mostPositive",
            "Most Positive",
            format_website(sentiment.most_positive.as_deref())
        ),
        neg = metric_card(
            "mostNegative",
            "Most Negative",
            format_website(sentiment.most_negative.as_deref())
        ),
    )
}

fn render_trends_pane(svg: &str, metrics: &MetricsResult, advanced: &AdvancedStats) -> String {
    let mut rows = String::new();
    for (i, trend) in metrics.trends.iter().enumerate() {
        let _ = write!(
            rows,
            r#"<tr><td>{website}</td><td id="{id}" class="trend-{class}">{label}</td><td>{change}</td><td>{mean}</td></tr>"#,
            website = html_escape(&trend.website),
            id = element_id("trend", i, &trend.website),
            class = trend.label.to_string().to_lowercase(),
            label = trend.label,
            change = format_change(trend.change),
            mean = format_metric(trend.mean, 2),
        );
    }

    format!(
        r#"<div class="chart-box" id="trendChart">{svg}</div>
<h3>Trend Metrics</h3>
<table><thead><tr><th>Website</th><th>Trend</th><th>Change</th><th>Mean</th></tr></thead><tbody>{rows}</tbody></table>
<h3>Ranking Correlations</h3>
{correlations}"#,
        correlations = render_correlation_table(metrics, &advanced.correlations),
    )
}

/// Correlation matrix as a table, rows and columns in website order.
fn render_correlation_table(metrics: &MetricsResult, correlations: &[Vec<f64>]) -> String {
    let names: Vec<String> = metrics.trends.iter().map(|t| html_escape(&t.website)).collect();
    let header: String = names.iter().map(|n| format!("<th>{}</th>", n)).collect();

    let mut rows = String::new();
    for (name, row) in names.iter().zip(correlations) {
        let cells: String = row
            .iter()
            .map(|v| format!("<td>{}</td>", format_metric(*v, 2)))
            .collect();
        let _ = write!(rows, "<tr><th>{}</th>{}</tr>", name, cells);
    }

    format!(
        r#"<table id="correlationMatrix"><thead><tr><th></th>{header}</tr></thead><tbody>{rows}</tbody></table>"#
    )
}

fn format_change(change: f64) -> String {
    if change.is_finite() {
        format!("{:+.2}", change)
    } else {
        format_metric(change, 2)
    }
}

fn render_advanced_pane(advanced: &AdvancedStats) -> String {
    let d = &advanced.rankings;
    let stats_rows = [
        ("Count", d.count.to_string()),
        ("Mean", format_metric(d.mean, 2)),
        ("Median", format_metric(d.median, 2)),
        (
            "Mode",
            d.mode.map(|m| m.to_string()).unwrap_or_else(|| "NaN".to_string()),
        ),
        ("Standard Deviation", format_metric(d.std_dev, 2)),
        ("Skewness", format_metric(d.skewness, 2)),
    ]
    .iter()
    .map(|(metric, value)| format!("<tr><td>{}</td><td>{}</td></tr>", metric, value))
    .collect::<String>();

    let word_rows = advanced
        .top_words
        .iter()
        .map(|(word, count)| format!("<tr><td>{}</td><td>{}</td></tr>", html_escape(word), count))
        .collect::<String>();

    format!(
        r#"<div class="chart-row">
<div class="metrics">
<h3>Statistical Analysis</h3>
<table><thead><tr><th>Metric</th><th>Value</th></tr></thead><tbody>{stats_rows}</tbody></table>
</div>
<div class="metrics">
<h3>Most Frequent Words</h3>
<table><thead><tr><th>Word</th><th>Count</th></tr></thead><tbody>{word_rows}</tbody></table>
</div>
</div>"#
    )
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f8f9fa; color: #1d1d1f; }
.container { max-width: 1100px; margin: 0 auto; padding: 24px; }
header h1 { margin: 0 0 4px; }
.subtitle { margin: 0 0 16px; color: #6e6e73; }
.issues { background: #fff4e5; border: 1px solid #ff9500; border-radius: 10px; padding: 12px 16px; margin-bottom: 16px; }
.issues ul { margin: 6px 0 0; padding-left: 20px; }
.tabs { display: flex; gap: 8px; margin-bottom: 16px; }
.tab-btn { border: none; border-radius: 20px; padding: 10px 20px; background: #e5e5ea; cursor: pointer; font-size: 14px; }
.tab-btn.active { background: #007aff; color: #fff; }
.tab-pane { display: none; background: #fff; border-radius: 10px; padding: 20px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
.tab-pane.active { display: block; }
.chart-row { display: flex; gap: 20px; flex-wrap: wrap; }
.chart-box { flex: 2 1 480px; }
.metrics { flex: 1 1 240px; }
.metric { display: flex; justify-content: space-between; padding: 10px 0; border-bottom: 1px solid #e5e5ea; }
.metric-label { color: #6e6e73; }
.metric-value { font-weight: 600; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #e5e5ea; }
.trend-improving { color: #34c759; }
.trend-declining { color: #ff3b30; }
.trend-unknown { color: #8e8e93; }
svg.chart { width: 100%; height: auto; }
.chart-title { font-size: 16px; font-weight: 600; }
.axis-title { font-size: 12px; fill: #6e6e73; }
.tick, .legend { font-size: 10px; fill: #6e6e73; }
.legend { font-weight: 600; }
.grid { stroke: #e5e5ea; stroke-width: 0.5; }
.baseline { stroke: #8e8e93; stroke-width: 1; }
footer { margin-top: 24px; color: #8e8e93; font-size: 12px; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
(function () {
    var buttons = document.querySelectorAll('.tab-btn');
    var panes = document.querySelectorAll('.tab-pane');
    function switchTab(tabId) {
        buttons.forEach(function (btn) {
            btn.classList.toggle('active', btn.dataset.tab === tabId);
        });
        panes.forEach(function (pane) {
            pane.classList.toggle('active', pane.id === tabId);
        });
    }
    buttons.forEach(function (btn) {
        btn.addEventListener('click', function () { switchTab(btn.dataset.tab); });
    });
})();
"#
}
