use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

// Include default word lists at compile time
const DEFAULT_LEXICON_BYTES: &[u8] = include_bytes!("../default_sentiment_lexicon.txt");

pub const DEFAULT_LEXICON_FILE: &str = "sentiment_lexicon.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    pub positive: BTreeSet<String>,
    pub negative: BTreeSet<String>,
}

impl Lexicon {
    pub fn builtin() -> Result<Self> {
        let content = std::str::from_utf8(DEFAULT_LEXICON_BYTES)
            .context("Failed to decode embedded default lexicon")?;
        parse_lexicon(content, true)
    }

    /// Score contribution of a single token: +1, -1 or 0. An entry present in
    /// both lists cancels out.
    pub fn weight(&self, token: &str) -> i64 {
        let mut weight = 0;
        if self.positive.contains(token) {
            weight += 1;
        }
        if self.negative.contains(token) {
            weight -= 1;
        }
        weight
    }

    /// Entries containing a space. Tokens are split on spaces, so these can
    /// never score.
    pub fn unreachable_phrases(&self) -> Vec<&str> {
        self.positive
            .iter()
            .chain(self.negative.iter())
            .filter(|entry| entry.contains(' '))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse `+word` / `-word` lines. With `lenient`, malformed lines are logged
/// and skipped; otherwise the first one is an error.
pub fn parse_lexicon(content: &str, lenient: bool) -> Result<Lexicon> {
    let mut lexicon = Lexicon::default();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut chars = line.chars();
        let sign = chars.next();
        let entry = chars.as_str().trim().to_lowercase();
        let target = match sign {
            Some('+') if !entry.is_empty() => &mut lexicon.positive,
            Some('-') if !entry.is_empty() => &mut lexicon.negative,
            _ if lenient => {
                warn!(action = "parse", component = "lexicon_entry", line_number = line_num + 1, line = line, "Invalid lexicon entry");
                continue;
            }
            _ => anyhow::bail!(
                "Invalid lexicon entry at line {}: expected \"+word\" or \"-word\", got {:?}",
                line_num + 1,
                line
            ),
        };
        target.insert(entry);
    }

    Ok(lexicon)
}

pub fn load_lexicon(lexicon_file_path: Option<&Path>) -> Result<Lexicon> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "lexicon_loading",
        "Starting sentiment lexicon loading"
    );

    let lexicon = if let Some(path) = lexicon_file_path {
        info!(action = "load", component = "lexicon_file", file_path = ?path, "Loading lexicon from specified file");
        if !path.exists() {
            anyhow::bail!("Lexicon file not found: {:?}", path);
        }

        let content = fs::read_to_string(path)?;
        parse_lexicon(&content, false).with_context(|| format!("Failed to load {:?}", path))?
    } else {
        // Try default file
        let default_file = Path::new(DEFAULT_LEXICON_FILE);
        let mut lexicon = Lexicon::default();
        if default_file.exists() {
            info!(action = "load", component = "default_lexicon_file", file_path = ?default_file, "Loading lexicon from default file");
            let content = fs::read_to_string(default_file)?;
            lexicon = parse_lexicon(&content, true)?;
        }

        // If nothing loaded, use embedded defaults
        if lexicon.is_empty() {
            info!(
                action = "load",
                component = "embedded_lexicon",
                "Using embedded default lexicon"
            );
            lexicon = Lexicon::builtin()?;
        }
        lexicon
    };

    for phrase in lexicon.unreachable_phrases() {
        warn!(
            action = "check",
            component = "lexicon_entry",
            phrase = phrase,
            "Unreachable phrase: reviews are matched one space-delimited token at a time"
        );
    }

    info!(
        action = "complete",
        component = "lexicon_loading",
        positive = lexicon.positive.len(),
        negative = lexicon.negative.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Loaded sentiment lexicon"
    );
    Ok(lexicon)
}

pub fn init_default_lexicon(dir: &Path) -> Result<()> {
    let default_file = dir.join(DEFAULT_LEXICON_FILE);

    if default_file.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first if you want to reinitialize.",
            DEFAULT_LEXICON_FILE
        );
    }

    let default_content = std::str::from_utf8(DEFAULT_LEXICON_BYTES)
        .context("Failed to decode embedded default lexicon")?;

    fs::write(&default_file, default_content)?;
    println!("Created {} with default word lists", default_file.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_word_lists() {
        let lexicon = Lexicon::builtin().unwrap();
        for word in [
            "great",
            "best",
            "excellent",
            "perfect",
            "amazing",
            "incredible",
            "powerful",
        ] {
            assert_eq!(lexicon.weight(word), 1, "{word}");
        }
        for word in ["could be better", "not good", "poor", "bad", "terrible"] {
            assert_eq!(lexicon.weight(word), -1, "{word}");
        }
        assert_eq!(lexicon.len(), 12);
    }

    #[test]
    fn test_unreachable_phrases() {
        let lexicon = Lexicon::builtin().unwrap();
        assert_eq!(
            lexicon.unreachable_phrases(),
            vec!["could be better", "not good"]
        );
    }

    #[test]
    fn test_strict_parse_rejects_bad_line() {
        let err = parse_lexicon("+good\nbad\n", false).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_lenient_parse_skips_bad_line() {
        let lexicon = parse_lexicon("# comment\n+Good\n?\n-\n-awful\n", true).unwrap();
        assert!(lexicon.positive.contains("good"));
        assert!(lexicon.negative.contains("awful"));
        assert_eq!(lexicon.len(), 2);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "+solid\n-flimsy\n").unwrap();
        let lexicon = load_lexicon(Some(&path)).unwrap();
        assert_eq!(lexicon.weight("solid"), 1);
        assert_eq!(lexicon.weight("flimsy"), -1);
        assert_eq!(lexicon.weight("great"), 0);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_lexicon(Some(&dir.path().join("missing.txt"))).is_err());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_default_lexicon(dir.path()).unwrap();
        let written = fs::read_to_string(dir.path().join(DEFAULT_LEXICON_FILE)).unwrap();
        assert_eq!(parse_lexicon(&written, false).unwrap(), Lexicon::builtin().unwrap());
        assert!(init_default_lexicon(dir.path()).is_err());
    }
}
