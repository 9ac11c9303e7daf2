pub mod args;
pub mod charts;
pub mod html;
pub mod input;
pub mod lexicon;
pub mod report;
pub mod sentiment;
pub mod stats;
pub mod tabs;
pub mod trends;
pub mod utils;

pub use args::{Args, OutputFormat};
pub use html::render_html_report;
pub use input::{parse_input, InputIssue, ParsedData, Ranking};
pub use lexicon::{init_default_lexicon, load_lexicon, Lexicon};
pub use report::{analyze, run_analysis, AnalysisOptions};
pub use sentiment::{score, TokenMode};
pub use stats::{compute_metrics, AnalysisResult, MetricsResult};
pub use tabs::TabSet;
