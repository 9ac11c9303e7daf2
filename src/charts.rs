//! Chart shaping and SVG rendering
//!
//! Builders turn parsed data into chart models; the `render_*_svg` functions
//! draw those models as inline SVG for the HTML report. Non-finite values are
//! kept in the models and skipped when drawing.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

use crate::input::ParsedData;
use crate::trends::TrendSeries;
use crate::utils::html_escape;

pub const RANKING_COLOR: &str = "#007aff";
pub const POSITIVE_COLOR: &str = "#34c759";
pub const NEGATIVE_COLOR: &str = "#ff3b30";

const SERIES_PALETTE: [&str; 8] = [
    "#007aff", "#ff9500", "#34c759", "#af52de", "#ff3b30", "#5ac8fa", "#ffcc00", "#8e8e93",
];

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 64.0;
const Y_TICKS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub x_labels: Vec<String>,
    pub series: Vec<LineSeries>,
}

/// One bar per website; a website without a ranking at its index gets a NaN bar.
pub fn ranking_chart(data: &ParsedData) -> BarChart {
    BarChart {
        title: "Website Rankings".to_string(),
        x_title: "Website".to_string(),
        y_title: "Ranking (Lower is Better)".to_string(),
        bars: data
            .websites
            .iter()
            .enumerate()
            .map(|(i, website)| Bar {
                label: website.clone(),
                value: data.ranking_at(i),
                color: RANKING_COLOR,
            })
            .collect(),
    }
}

pub fn sentiment_chart(data: &ParsedData, sentiments: &[i64]) -> BarChart {
    BarChart {
        title: "Review Sentiment Analysis".to_string(),
        x_title: "Website".to_string(),
        y_title: "Sentiment Score".to_string(),
        bars: data
            .websites
            .iter()
            .enumerate()
            .map(|(i, website)| {
                let value = sentiments.get(i).map(|&s| s as f64).unwrap_or(f64::NAN);
                Bar {
                    label: website.clone(),
                    value,
                    color: if value >= 0.0 {
                        POSITIVE_COLOR
                    } else {
                        NEGATIVE_COLOR
                    },
                }
            })
            .collect(),
    }
}

pub fn trend_chart(dates: &[NaiveDate], trends: &[TrendSeries]) -> LineChart {
    LineChart {
        title: "Ranking Trends Over Time".to_string(),
        x_title: "Date".to_string(),
        y_title: "Ranking".to_string(),
        x_labels: dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect(),
        series: trends
            .iter()
            .enumerate()
            .map(|(i, t)| LineSeries {
                name: t.website.clone(),
                values: t.values.clone(),
                color: SERIES_PALETTE[i % SERIES_PALETTE.len()],
            })
            .collect(),
    }
}

/// Vertical value range covering every finite value and zero.
fn value_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi - lo < f64::EPSILON {
        (lo, lo + 1.0)
    } else {
        (lo, hi)
    }
}

struct Frame {
    lo: f64,
    hi: f64,
}

impl Frame {
    fn plot_width(&self) -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height(&self) -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + (self.hi - value) / (self.hi - self.lo) * self.plot_height()
    }
}

fn open_svg(out: &mut String, title: &str, x_title: &str, y_title: &str) {
    let _ = write!(
        out,
        r#"<svg class="chart" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" role="img" aria-label="{title}">
<text class="chart-title" x="{cx}" y="22" text-anchor="middle">{title}</text>
<text class="axis-title" x="{cx}" y="{xy}" text-anchor="middle">{x_title}</text>
<text class="axis-title" x="14" y="{cy}" text-anchor="middle" transform="rotate(-90 14 {cy})">{y_title}</text>
"#,
        w = WIDTH,
        h = HEIGHT,
        cx = WIDTH / 2.0,
        cy = MARGIN_TOP + (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) / 2.0,
        xy = HEIGHT - 8.0,
        title = html_escape(title),
        x_title = html_escape(x_title),
        y_title = html_escape(y_title),
    );
}

fn draw_grid(out: &mut String, frame: &Frame) {
    for i in 0..=Y_TICKS {
        let value = frame.lo + (frame.hi - frame.lo) * i as f64 / Y_TICKS as f64;
        let y = frame.y(value);
        let _ = writeln!(
            out,
            r#"<line class="grid" x1="{x1}" y1="{y:.1}" x2="{x2}" y2="{y:.1}"/><text class="tick" x="{tx}" y="{ty:.1}" text-anchor="end">{value:.1}</text>"#,
            x1 = MARGIN_LEFT,
            x2 = WIDTH - MARGIN_RIGHT,
            tx = MARGIN_LEFT - 6.0,
            ty = y + 4.0,
        );
    }
    let zero = frame.y(0.0);
    let _ = writeln!(
        out,
        r#"<line class="baseline" x1="{x1}" y1="{zero:.1}" x2="{x2}" y2="{zero:.1}"/>"#,
        x1 = MARGIN_LEFT,
        x2 = WIDTH - MARGIN_RIGHT,
    );
}

pub fn render_bar_svg(chart: &BarChart) -> String {
    let mut out = String::new();
    open_svg(&mut out, &chart.title, &chart.x_title, &chart.y_title);

    let (lo, hi) = value_range(chart.bars.iter().map(|b| &b.value));
    let frame = Frame { lo, hi };
    draw_grid(&mut out, &frame);

    let slot = frame.plot_width() / chart.bars.len().max(1) as f64;
    let zero = frame.y(0.0);
    for (i, bar) in chart.bars.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
        if bar.value.is_finite() {
            let top = frame.y(bar.value);
            let _ = writeln!(
                out,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}"><title>{label}: {value}</title></rect>"#,
                x = center - slot * 0.3,
                y = top.min(zero),
                w = slot * 0.6,
                h = (top - zero).abs(),
                color = bar.color,
                label = html_escape(&bar.label),
                value = bar.value,
            );
        }
        let _ = writeln!(
            out,
            r#"<text class="tick" x="{center:.1}" y="{y:.1}" text-anchor="middle">{label}</text>"#,
            y = HEIGHT - MARGIN_BOTTOM + 18.0,
            label = html_escape(&bar.label),
        );
    }

    out.push_str("</svg>");
    out
}

pub fn render_line_svg(chart: &LineChart) -> String {
    let mut out = String::new();
    open_svg(&mut out, &chart.title, &chart.x_title, &chart.y_title);

    let (lo, hi) = value_range(chart.series.iter().flat_map(|s| s.values.iter()));
    let frame = Frame { lo, hi };
    draw_grid(&mut out, &frame);

    let points = chart.x_labels.len().max(2);
    let step = frame.plot_width() / (points - 1) as f64;
    let x = |i: usize| MARGIN_LEFT + step * i as f64;

    // a label every week keeps 30 dates readable
    for (i, label) in chart.x_labels.iter().enumerate().step_by(7) {
        let _ = writeln!(
            out,
            r#"<text class="tick" x="{x:.1}" y="{y:.1}" text-anchor="middle">{label}</text>"#,
            x = x(i),
            y = HEIGHT - MARGIN_BOTTOM + 18.0,
            label = html_escape(label),
        );
    }

    for (n, series) in chart.series.iter().enumerate() {
        let _ = writeln!(
            out,
            r#"<g class="series" stroke="{color}" fill="{color}"><title>{name}</title>"#,
            color = series.color,
            name = html_escape(&series.name),
        );
        // NaN breaks the line into separate segments
        for segment in series
            .values
            .iter()
            .enumerate()
            .collect::<Vec<_>>()
            .split(|(_, v)| !v.is_finite())
            .filter(|s| !s.is_empty())
        {
            let pts: Vec<String> = segment
                .iter()
                .map(|(i, v)| format!("{:.1},{:.1}", x(*i), frame.y(**v)))
                .collect();
            let _ = writeln!(
                out,
                r#"<polyline points="{}" fill="none" stroke-width="1.5"/>"#,
                pts.join(" ")
            );
            for (i, v) in segment {
                let _ = writeln!(
                    out,
                    r#"<circle cx="{:.1}" cy="{:.1}" r="2.5"/>"#,
                    x(*i),
                    frame.y(**v)
                );
            }
        }
        out.push_str("</g>\n");

        let legend_y = MARGIN_TOP + 14.0 * n as f64;
        let _ = writeln!(
            out,
            r#"<text class="legend" x="{lx:.1}" y="{legend_y:.1}" fill="{color}" text-anchor="end">{name}</text>"#,
            lx = WIDTH - MARGIN_RIGHT - 4.0,
            color = series.color,
            name = html_escape(&series.name),
        );
    }

    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_input;
    use crate::trends::TrendLabel;

    #[test]
    fn test_ranking_chart_one_bar_per_website() {
        let chart = ranking_chart(&parse_input("a\nb\nc", "3\n1", ""));
        assert_eq!(chart.bars.len(), 3);
        assert_eq!(chart.bars[0].value, 3.0);
        assert_eq!(chart.bars[1].value, 1.0);
        assert!(chart.bars[2].value.is_nan());
        assert!(chart.bars.iter().all(|b| b.color == RANKING_COLOR));
    }

    #[test]
    fn test_sentiment_chart_colors_by_sign() {
        let data = parse_input("a\nb\nc\nd", "", "");
        let chart = sentiment_chart(&data, &[2, 0, -1]);
        let colors: Vec<&str> = chart.bars.iter().map(|b| b.color).collect();
        assert_eq!(
            colors,
            vec![POSITIVE_COLOR, POSITIVE_COLOR, NEGATIVE_COLOR, NEGATIVE_COLOR]
        );
        assert!(chart.bars[3].value.is_nan());
    }

    #[test]
    fn test_bar_svg_skips_missing_values() {
        let chart = ranking_chart(&parse_input("a\n<b>", "2\nX", ""));
        let svg = render_bar_svg(&chart);
        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains("&lt;b&gt;"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_negative_bar_hangs_below_baseline() {
        let data = parse_input("a", "", "");
        let svg = render_bar_svg(&sentiment_chart(&data, &[-2]));
        assert!(svg.contains(NEGATIVE_COLOR));
    }

    #[test]
    fn test_line_svg_breaks_on_nan() {
        let dates: Vec<NaiveDate> = (1..=4)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
            .collect();
        let trends = vec![TrendSeries {
            website: "a".to_string(),
            values: vec![1.0, f64::NAN, 1.1, 1.2],
            label: TrendLabel::Unknown,
            change: f64::NAN,
        }];
        let chart = trend_chart(&dates, &trends);
        assert_eq!(chart.x_labels[0], "2024-01-01");
        let svg = render_line_svg(&chart);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn test_value_range_includes_zero() {
        assert_eq!(value_range([2.0, 5.0].iter()), (0.0, 5.0));
        assert_eq!(value_range([-3.0, f64::NAN].iter()), (-3.0, 0.0));
        assert_eq!(value_range([].iter()), (0.0, 1.0));
    }
}
