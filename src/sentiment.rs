use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

use crate::lexicon::Lexicon;

/// How a space-delimited token is prepared before lexicon lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenMode {
    /// Exact token match: `"great!"` does not match `great`.
    #[default]
    Literal,
    /// Trim leading/trailing non-alphanumeric characters from each token.
    StripPunctuation,
}

fn normalize_token(token: &str, mode: TokenMode) -> &str {
    match mode {
        TokenMode::Literal => token,
        TokenMode::StripPunctuation => token.trim_matches(|c: char| !c.is_alphanumeric()),
    }
}

/// Keyword-count sentiment: lower-case, split on single spaces, +1 per
/// positive token, -1 per negative token.
pub fn score(text: &str, lexicon: &Lexicon, mode: TokenMode) -> i64 {
    text.to_lowercase()
        .split(' ')
        .map(|token| lexicon.weight(normalize_token(token, mode)))
        .sum()
}

/// Scores in review order.
pub fn score_all(reviews: &[String], lexicon: &Lexicon, mode: TokenMode) -> Vec<i64> {
    let start_time = Instant::now();
    let scores: Vec<i64> = reviews
        .par_iter()
        .map(|review| score(review, lexicon, mode))
        .collect();

    info!(
        action = "complete",
        component = "sentiment_scoring",
        reviews = reviews.len(),
        mode = ?mode,
        duration_ms = start_time.elapsed().as_millis(),
        "Scored review sentiment"
    );
    scores
}
