use serde::Serialize;
use std::collections::HashMap;

use crate::input::{InputIssue, ParsedData};
use crate::trends::{TrendLabel, TrendSeries};

/// Ranking metrics carry IEEE semantics: a non-numeric ranking makes every
/// value NaN, an empty list gives NaN / +inf / -inf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankingMetrics {
    pub average: f64,
    pub best: f64,
    pub worst: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentMetrics {
    pub average: f64,
    pub most_positive: Option<String>,
    pub most_negative: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendMetric {
    pub website: String,
    pub label: TrendLabel,
    pub change: f64,
    /// Mean of the synthetic series, the per-site "Trend" figure.
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsResult {
    pub ranking: RankingMetrics,
    pub sentiment: SentimentMetrics,
    pub trends: Vec<TrendMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: Option<i64>,
    pub std_dev: f64,
    pub skewness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedStats {
    pub rankings: Description,
    pub distribution: Vec<(i64, usize)>,
    pub sentiment_distribution: Vec<(i64, usize)>,
    pub top_words: Vec<(String, usize)>,
    /// Pearson correlation between every pair of trend series, in website
    /// order. Undefined pairs are NaN.
    pub correlations: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub data: ParsedData,
    pub sentiments: Vec<i64>,
    pub trend_dates: Vec<chrono::NaiveDate>,
    pub trends: Vec<TrendSeries>,
    pub metrics: MetricsResult,
    pub advanced: AdvancedStats,
    pub issues: Vec<InputIssue>,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Min and max that propagate NaN instead of skipping it.
fn extremes(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            if v.is_nan() || lo.is_nan() {
                (f64::NAN, f64::NAN)
            } else {
                (lo.min(v), hi.max(v))
            }
        })
}

pub fn ranking_metrics(data: &ParsedData) -> RankingMetrics {
    let values: Vec<f64> = data.rankings.iter().map(|r| r.as_f64()).collect();
    let (best, worst) = extremes(&values);
    RankingMetrics {
        average: mean(&values),
        best,
        worst,
    }
}

/// First index holding the extreme; ties go to the earliest.
fn first_index_of<F>(values: &[i64], better: F) -> Option<usize>
where
    F: Fn(i64, i64) -> bool,
{
    let mut best: Option<(usize, i64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, current)) if !better(v, current) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn sentiment_metrics(data: &ParsedData, sentiments: &[i64]) -> SentimentMetrics {
    let as_f64: Vec<f64> = sentiments.iter().map(|&s| s as f64).collect();
    let website_at = |index: Option<usize>| index.and_then(|i| data.websites.get(i)).cloned();

    SentimentMetrics {
        average: mean(&as_f64),
        most_positive: website_at(first_index_of(sentiments, |v, cur| v > cur)),
        most_negative: website_at(first_index_of(sentiments, |v, cur| v < cur)),
    }
}

pub fn compute_metrics(
    data: &ParsedData,
    sentiments: &[i64],
    trends: &[TrendSeries],
) -> MetricsResult {
    MetricsResult {
        ranking: ranking_metrics(data),
        sentiment: sentiment_metrics(data, sentiments),
        trends: trends
            .iter()
            .map(|t| TrendMetric {
                website: t.website.clone(),
                label: t.label,
                change: t.change,
                mean: series_mean(&t.values),
            })
            .collect(),
    }
}

/// Summary statistics over the numeric values. Sample standard deviation and
/// adjusted Fisher-Pearson skewness; undefined entries are NaN.
pub fn describe(values: &[i64]) -> Description {
    let count = values.len();
    let floats: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    let mean = mean(&floats);

    let mut sorted = floats.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = match count {
        0 => f64::NAN,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    };

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let mode = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(&v, _)| v);

    let n = count as f64;
    let std_dev = if count < 2 {
        f64::NAN
    } else {
        (floats.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    };

    let skewness = if count < 3 || std_dev == 0.0 {
        f64::NAN
    } else {
        let m3 = floats.iter().map(|v| ((v - mean) / std_dev).powi(3)).sum::<f64>();
        m3 * n / ((n - 1.0) * (n - 2.0))
    };

    Description {
        count,
        mean,
        median,
        mode,
        std_dev,
        skewness,
    }
}

pub fn series_mean(values: &[f64]) -> f64 {
    mean(values)
}

/// Pearson correlation of two equal-length series. NaN when either series is
/// constant, contains NaN, or the lengths differ.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }
    let (mx, my) = (mean(xs), mean(ys));
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        var_x += (x - mx).powi(2);
        var_y += (y - my).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x * var_y).sqrt()
}

pub fn correlation_matrix(trends: &[TrendSeries]) -> Vec<Vec<f64>> {
    trends
        .iter()
        .map(|a| trends.iter().map(|b| pearson(&a.values, &b.values)).collect())
        .collect()
}

fn value_counts(values: &[i64]) -> Vec<(i64, usize)> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let mut distribution: Vec<(i64, usize)> = counts.into_iter().collect();
    distribution.sort_unstable();
    distribution
}

/// Histogram of ranking values, ascending.
pub fn ranking_distribution(values: &[i64]) -> Vec<(i64, usize)> {
    value_counts(values)
}

/// Histogram of sentiment scores, ascending.
pub fn sentiment_distribution(sentiments: &[i64]) -> Vec<(i64, usize)> {
    value_counts(sentiments)
}

/// Most frequent lower-cased whitespace tokens across all reviews. Ties keep
/// first-appearance order.
pub fn word_frequencies(reviews: &[String], top: usize) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for word in reviews.iter().flat_map(|r| r.split_whitespace()) {
        let word = word.to_lowercase();
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut words: Vec<(String, usize)> = order
        .into_iter()
        .map(|w| {
            let c = counts[&w];
            (w, c)
        })
        .collect();
    // stable sort keeps first appearance among equal counts
    words.sort_by(|a, b| b.1.cmp(&a.1));
    words.truncate(top);
    words
}

pub fn advanced_stats(
    data: &ParsedData,
    sentiments: &[i64],
    trends: &[TrendSeries],
    top_words: usize,
) -> AdvancedStats {
    let numeric: Vec<i64> = data.rankings.iter().filter_map(|r| r.value()).collect();
    AdvancedStats {
        rankings: describe(&numeric),
        distribution: ranking_distribution(&numeric),
        sentiment_distribution: sentiment_distribution(sentiments),
        top_words: word_frequencies(&data.reviews, top_words),
        correlations: correlation_matrix(trends),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{parse_input, parse_rankings};
    use crate::trends::classify;

    fn series(website: &str, values: Vec<f64>) -> TrendSeries {
        let (label, change) = classify(&values);
        TrendSeries {
            website: website.to_string(),
            values,
            label,
            change,
        }
    }

    fn data_with_rankings(raw: &str) -> ParsedData {
        ParsedData {
            rankings: parse_rankings(raw),
            ..ParsedData::default()
        }
    }

    #[test]
    fn test_ranking_metrics_one_to_five() {
        let metrics = ranking_metrics(&ParsedData::sample());
        assert_eq!(metrics.average, 3.0);
        assert_eq!(metrics.best, 1.0);
        assert_eq!(metrics.worst, 5.0);
    }

    #[test]
    fn test_ranking_metrics_nan_propagates() {
        let metrics = ranking_metrics(&data_with_rankings("1\nX\n3"));
        assert!(metrics.average.is_nan());
        assert!(metrics.best.is_nan());
        assert!(metrics.worst.is_nan());
    }

    #[test]
    fn test_ranking_metrics_empty() {
        let metrics = ranking_metrics(&ParsedData::default());
        assert!(metrics.average.is_nan());
        assert_eq!(metrics.best, f64::INFINITY);
        assert_eq!(metrics.worst, f64::NEG_INFINITY);
    }

    #[test]
    fn test_sentiment_extremes_first_occurrence() {
        let data = parse_input("a\nb\nc\nd", "1\n2\n3\n4", "w\nx\ny\nz");
        let metrics = sentiment_metrics(&data, &[1, 3, 3, -2]);
        assert_eq!(metrics.average, 1.25);
        assert_eq!(metrics.most_positive.as_deref(), Some("b"));
        assert_eq!(metrics.most_negative.as_deref(), Some("d"));
    }

    #[test]
    fn test_sentiment_extreme_past_websites() {
        let data = parse_input("a", "1", "w\nx");
        let metrics = sentiment_metrics(&data, &[0, 5]);
        assert_eq!(metrics.most_positive, None);
        assert_eq!(metrics.most_negative.as_deref(), Some("a"));
    }

    #[test]
    fn test_sentiment_empty() {
        let metrics = sentiment_metrics(&ParsedData::default(), &[]);
        assert!(metrics.average.is_nan());
        assert_eq!(metrics.most_positive, None);
        assert_eq!(metrics.most_negative, None);
    }

    #[test]
    fn test_describe() {
        let d = describe(&[1, 2, 2, 3, 7]);
        assert_eq!(d.count, 5);
        assert_eq!(d.mean, 3.0);
        assert_eq!(d.median, 2.0);
        assert_eq!(d.mode, Some(2));
        assert!((d.std_dev - 5.5f64.sqrt()).abs() < 1e-9);
        assert!(d.skewness > 0.0);

        let even = describe(&[4, 1, 3, 2]);
        assert_eq!(even.median, 2.5);
        assert_eq!(even.mode, Some(1));

        let empty = describe(&[]);
        assert!(empty.mean.is_nan() && empty.median.is_nan() && empty.std_dev.is_nan());
        assert_eq!(empty.mode, None);
    }

    #[test]
    fn test_symmetric_skew_is_zero() {
        assert!(describe(&[1, 2, 3, 4, 5]).skewness.abs() < 1e-12);
        assert!(describe(&[2, 2, 2]).skewness.is_nan());
    }

    #[test]
    fn test_distribution() {
        assert_eq!(ranking_distribution(&[3, 1, 3]), vec![(1, 1), (3, 2)]);
    }

    #[test]
    fn test_sentiment_distribution() {
        assert_eq!(sentiment_distribution(&[2, 1, 0, 1, 1]), vec![(0, 1), (1, 3), (2, 1)]);
        assert_eq!(sentiment_distribution(&[-1, -1]), vec![(-1, 2)]);
        assert!(sentiment_distribution(&[]).is_empty());
    }

    #[test]
    fn test_series_mean() {
        assert_eq!(series_mean(&[1.0, 2.0, 3.0, 6.0]), 3.0);
        assert!(series_mean(&[]).is_nan());
        assert!(series_mean(&[1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_compute_metrics_carries_series_mean() {
        let data = parse_input("a", "2", "great");
        let trends = vec![series("a", vec![1.5, 2.0, 2.5])];
        let metrics = compute_metrics(&data, &[1], &trends);
        assert_eq!(metrics.trends[0].mean, 2.0);
    }

    #[test]
    fn test_pearson() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0, f64::NAN], &[1.0, 2.0]).is_nan());
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_nan());
    }

    #[test]
    fn test_correlation_matrix() {
        let trends = vec![
            series("a", vec![1.0, 2.0, 3.0, 4.0]),
            series("b", vec![8.0, 6.0, 4.0, 2.0]),
            series("c", vec![f64::NAN; 4]),
        ];
        let matrix = correlation_matrix(&trends);
        assert_eq!(matrix.len(), 3);
        assert!(matrix.iter().all(|row| row.len() == 3));
        assert!((matrix[0][0] - 1.0).abs() < 1e-12);
        assert!((matrix[0][1] + 1.0).abs() < 1e-12);
        assert_eq!(matrix[0][1], matrix[1][0]);
        assert!(matrix[2].iter().all(|v| v.is_nan()));
        assert!(correlation_matrix(&[]).is_empty());
    }

    #[test]
    fn test_word_frequencies() {
        let reviews = vec!["Battery is great".to_string(), "battery is fine".to_string()];
        let words = word_frequencies(&reviews, 3);
        assert_eq!(
            words,
            vec![
                ("battery".to_string(), 2),
                ("is".to_string(), 2),
                ("great".to_string(), 1)
            ]
        );
    }
}
