//! Synthetic ranking trends
//!
//! There is no historical ranking data, so each website's trend line is its
//! static ranking jittered by uniform noise, one value per day over a fixed
//! window. The label attached to each line is derived from that same series.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Number of days in the trend window, today included
pub const TREND_DAYS: usize = 30;

/// Half-width of the uniform jitter around the ranking
pub const TREND_JITTER: f64 = 0.25;

/// Minimum first-to-last movement that counts as a change
pub const TREND_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Stable,
    Improving,
    Declining,
    Unknown,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendLabel::Stable => "Stable",
            TrendLabel::Improving => "Improving",
            TrendLabel::Declining => "Declining",
            TrendLabel::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub website: String,
    pub values: Vec<f64>,
    pub label: TrendLabel,
    /// first - last; positive means the ranking number went down (better)
    pub change: f64,
}

/// `TREND_DAYS` dates ending at `today`, oldest first.
pub fn trend_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..TREND_DAYS as i64)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

/// One value per day in `[ranking - 0.25, ranking + 0.25)`. A NaN ranking
/// yields an all-NaN series.
pub fn synthetic_series<R: Rng>(ranking: f64, rng: &mut R) -> Vec<f64> {
    (0..TREND_DAYS)
        .map(|_| ranking + rng.gen_range(-TREND_JITTER..TREND_JITTER))
        .collect()
}

/// Lower rankings are better, so a falling series is improving.
pub fn classify(values: &[f64]) -> (TrendLabel, f64) {
    let (first, last) = match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if first.is_finite() && last.is_finite() => (first, last),
        _ => return (TrendLabel::Unknown, f64::NAN),
    };

    let change = first - last;
    let label = if change > TREND_EPSILON {
        TrendLabel::Improving
    } else if change < -TREND_EPSILON {
        TrendLabel::Declining
    } else {
        TrendLabel::Stable
    };
    (label, change)
}

pub fn build_series<R: Rng>(website: &str, ranking: f64, rng: &mut R) -> TrendSeries {
    let values = synthetic_series(ranking, rng);
    let (label, change) = classify(&values);
    TrendSeries {
        website: website.to_string(),
        values,
        label,
        change,
    }
}
