use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rankview",
    about = "Chart website rankings and review sentiment into a self-contained HTML report",
    version,
    long_about = None
)]
pub struct Args {
    /// File with website names, one per line ("-" for stdin)
    #[arg(long)]
    pub websites: Option<PathBuf>,

    /// File with integer rankings, one per line ("-" for stdin)
    #[arg(long)]
    pub rankings: Option<PathBuf>,

    /// File with free-text reviews, one per line ("-" for stdin)
    #[arg(long)]
    pub reviews: Option<PathBuf>,

    /// Path to custom sentiment lexicon file
    #[arg(short, long)]
    pub lexicon: Option<PathBuf>,

    /// Initialize sentiment_lexicon.txt with the default word lists
    #[arg(long)]
    pub init: bool,

    /// Trim punctuation from review tokens before lexicon lookup
    #[arg(long)]
    pub strip_punctuation: bool,

    /// Reject input with empty fields, non-numeric rankings or mismatched lengths
    #[arg(long)]
    pub strict: bool,

    /// Where to write the HTML report
    #[arg(short, long, default_value = "rankview_report.html")]
    pub output: PathBuf,

    /// Skip writing the HTML report
    #[arg(long)]
    pub no_html: bool,

    /// Summary format printed to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Seed for the synthetic trend jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tab shown when the report is opened
    #[arg(long, default_value = "ranking")]
    pub tab: String,

    /// Number of most frequent review words to report
    #[arg(long, default_value_t = 5)]
    pub top_words: usize,

    /// Number of worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
