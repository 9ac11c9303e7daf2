use anyhow::{Context, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

pub const SAMPLE_WEBSITES: [&str; 5] = [
    "amazon.com",
    "bestbuy.com",
    "walmart.com",
    "apple.com",
    "bhphotovideo.com",
];

pub const SAMPLE_RANKINGS: [i64; 5] = [1, 2, 3, 4, 5];

pub const SAMPLE_REVIEWS: [&str; 5] = [
    "Great product! The M2 chip is amazing. Battery life is excellent. Perfect for professional work.",
    "Best MacBook I've ever used. Display is stunning. Performance is incredible.",
    "Good value for money. Performance is top-notch. Battery life could be better.",
    "Perfect for professional work. Build quality is exceptional. M2 chip is powerful.",
    "Excellent customer service. Product meets expectations. Display quality is great.",
];

/// A single ranking line. Lines that do not start with an integer are kept
/// as `NotANumber` so the index alignment with websites and reviews survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ranking {
    Value(i64),
    NotANumber(String),
}

impl Ranking {
    pub fn as_f64(&self) -> f64 {
        match self {
            Ranking::Value(v) => *v as f64,
            Ranking::NotANumber(_) => f64::NAN,
        }
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Ranking::Value(v) => Some(*v),
            Ranking::NotANumber(_) => None,
        }
    }
}

impl Serialize for Ranking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ranking::Value(v) => serializer.serialize_i64(*v),
            Ranking::NotANumber(_) => serializer.serialize_none(),
        }
    }
}

/// Three index-aligned sequences. Nothing enforces equal lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedData {
    pub websites: Vec<String>,
    pub rankings: Vec<Ranking>,
    pub reviews: Vec<String>,
}

impl ParsedData {
    pub fn sample() -> Self {
        ParsedData {
            websites: SAMPLE_WEBSITES.iter().map(|s| s.to_string()).collect(),
            rankings: SAMPLE_RANKINGS.iter().map(|&r| Ranking::Value(r)).collect(),
            reviews: SAMPLE_REVIEWS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn ranking_at(&self, index: usize) -> f64 {
        self.rankings
            .get(index)
            .map(Ranking::as_f64)
            .unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Websites,
    Rankings,
    Reviews,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Websites => "websites",
            Field::Rankings => "rankings",
            Field::Reviews => "reviews",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputIssue {
    #[error("{field} input is empty")]
    EmptyInput { field: Field },

    #[error("ranking on line {line} is not a number: {value:?}")]
    NonNumericRanking { line: usize, value: String },

    #[error("length mismatch: {websites} websites, {rankings} rankings, {reviews} reviews")]
    LengthMismatch {
        websites: usize,
        rankings: usize,
        reviews: usize,
    },
}

fn non_blank_lines(raw: &str) -> Vec<String> {
    raw.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_websites(raw: &str) -> Vec<String> {
    non_blank_lines(raw)
}

pub fn parse_reviews(raw: &str) -> Vec<String> {
    non_blank_lines(raw)
}

/// Every line yields an entry, blank ones included.
pub fn parse_rankings(raw: &str) -> Vec<Ranking> {
    raw.split('\n').map(|line| parse_ranking(line.trim())).collect()
}

/// Integer prefix parse: optional sign followed by leading digits, the rest
/// of the line is ignored.
pub fn parse_ranking(text: &str) -> Ranking {
    let unsigned = text.trim_start_matches(|c: char| c == '+' || c == '-');
    let sign_len = text.len() - unsigned.len();
    let digits = unsigned
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(unsigned.len());

    if sign_len > 1 || digits == 0 {
        return Ranking::NotANumber(text.to_string());
    }

    match text[..sign_len + digits].parse::<i64>() {
        Ok(value) => Ranking::Value(value),
        Err(_) => Ranking::NotANumber(text.to_string()),
    }
}

pub fn parse_input(websites: &str, rankings: &str, reviews: &str) -> ParsedData {
    let start_time = Instant::now();
    let data = ParsedData {
        websites: parse_websites(websites),
        rankings: parse_rankings(rankings),
        reviews: parse_reviews(reviews),
    };
    info!(
        action = "complete",
        component = "input_parse",
        websites = data.websites.len(),
        rankings = data.rankings.len(),
        reviews = data.reviews.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Parsed input sources"
    );
    data
}

/// Collect every input problem instead of stopping at the first one.
pub fn validate(data: &ParsedData) -> Vec<InputIssue> {
    let mut issues = Vec::new();

    if data.websites.is_empty() {
        issues.push(InputIssue::EmptyInput {
            field: Field::Websites,
        });
    }
    if data
        .rankings
        .iter()
        .all(|r| matches!(r, Ranking::NotANumber(raw) if raw.is_empty()))
    {
        issues.push(InputIssue::EmptyInput {
            field: Field::Rankings,
        });
    } else {
        for (index, ranking) in data.rankings.iter().enumerate() {
            if let Ranking::NotANumber(raw) = ranking {
                if !raw.is_empty() {
                    issues.push(InputIssue::NonNumericRanking {
                        line: index + 1,
                        value: raw.clone(),
                    });
                }
            }
        }
    }
    if data.reviews.is_empty() {
        issues.push(InputIssue::EmptyInput {
            field: Field::Reviews,
        });
    }

    let (websites, rankings, reviews) = (
        data.websites.len(),
        data.rankings.len(),
        data.reviews.len(),
    );
    if websites != rankings || websites != reviews {
        issues.push(InputIssue::LengthMismatch {
            websites,
            rankings,
            reviews,
        });
    }

    issues
}

/// Read one text source. `-` reads stdin. Line endings are normalized to
/// `\n` and a single terminating newline is dropped so a file ending in a
/// newline does not grow an extra blank ranking.
pub fn read_source(path: &Path) -> Result<String> {
    let start_time = Instant::now();
    info!(action = "start", component = "source_read", path = ?path, "Reading input source");

    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read input from stdin")?;
        buf
    } else {
        if !path.exists() {
            anyhow::bail!("Input file not found: {:?}", path);
        }
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?
    };

    let mut content = content.replace("\r\n", "\n");
    if content.ends_with('\n') {
        content.pop();
    }

    info!(
        action = "complete",
        component = "source_read",
        path = ?path,
        bytes = content.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Input source read"
    );
    Ok(content)
}

/// Load the three sources, falling back to the built-in sample dataset when
/// none are given.
pub fn load_input(
    websites: Option<&Path>,
    rankings: Option<&Path>,
    reviews: Option<&Path>,
) -> Result<ParsedData> {
    match (websites, rankings, reviews) {
        (Some(w), Some(r), Some(v)) => {
            let websites = read_source(w)?;
            let rankings = read_source(r)?;
            let reviews = read_source(v)?;
            Ok(parse_input(&websites, &rankings, &reviews))
        }
        (None, None, None) => {
            warn!(
                action = "fallback",
                component = "input",
                "No input sources given, using the sample dataset"
            );
            Ok(ParsedData::sample())
        }
        _ => anyhow::bail!("--websites, --rankings and --reviews must be given together"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_blank_websites_dropped() {
        assert_eq!(parse_websites("a\n\nb\n"), vec!["a", "b"]);
        assert_eq!(parse_websites("a\n   \n\tb"), vec!["a", "\tb"]);
    }

    #[test]
    fn test_rankings_keep_not_a_number() {
        let rankings = parse_rankings("1\nX\n3");
        assert_eq!(
            rankings,
            vec![
                Ranking::Value(1),
                Ranking::NotANumber("X".to_string()),
                Ranking::Value(3)
            ]
        );
        assert!(rankings[1].as_f64().is_nan());
    }

    #[test]
    fn test_rankings_blank_lines_are_entries() {
        let rankings = parse_rankings("1\n\n2\n");
        assert_eq!(rankings.len(), 4);
        assert_eq!(rankings[1], Ranking::NotANumber(String::new()));
    }

    #[test]
    fn test_integer_prefix_parse() {
        assert_eq!(parse_ranking("12abc"), Ranking::Value(12));
        assert_eq!(parse_ranking("-3"), Ranking::Value(-3));
        assert_eq!(parse_ranking("+7"), Ranking::Value(7));
        assert_eq!(parse_ranking("4.9"), Ranking::Value(4));
        assert!(matches!(parse_ranking("abc"), Ranking::NotANumber(_)));
        assert!(matches!(parse_ranking("--1"), Ranking::NotANumber(_)));
        assert!(matches!(parse_ranking("-"), Ranking::NotANumber(_)));
    }

    #[test]
    fn test_validate_sample_is_clean() {
        assert!(validate(&ParsedData::sample()).is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let data = parse_input("a\nb", "1\nX\n3", "");
        let issues = validate(&data);
        assert_eq!(
            issues,
            vec![
                InputIssue::NonNumericRanking {
                    line: 2,
                    value: "X".to_string()
                },
                InputIssue::EmptyInput {
                    field: Field::Reviews
                },
                InputIssue::LengthMismatch {
                    websites: 2,
                    rankings: 3,
                    reviews: 0
                },
            ]
        );
    }

    #[test]
    fn test_validate_empty_rankings() {
        let data = parse_input("", "", "");
        let issues = validate(&data);
        assert!(issues.contains(&InputIssue::EmptyInput {
            field: Field::Rankings
        }));
        assert!(!issues
            .iter()
            .any(|i| matches!(i, InputIssue::NonNumericRanking { .. })));
    }

    #[test]
    fn test_read_source_drops_terminating_newline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1\r\n2\r\n").unwrap();
        let content = read_source(file.path()).unwrap();
        assert_eq!(content, "1\n2");
        assert_eq!(parse_rankings(&content).len(), 2);
    }

    #[test]
    fn test_load_input_requires_all_sources() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_input(Some(file.path()), None, None).is_err());
        assert_eq!(load_input(None, None, None).unwrap(), ParsedData::sample());
    }
}
