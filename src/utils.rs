use regex::Regex;
use std::sync::LazyLock;
use time::macros::format_description;
use tracing::info;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

static NON_ID_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("static id pattern compiles")
});

/// `RUST_LOG` wins; otherwise `-v` selects info and the default is errors only.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = LocalTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(std::io::stderr)
        .init();
}

/// Exact ties at `decimals` places round away from zero, the way a browser's
/// `toFixed` does; `{:.*}` alone would round them to even.
fn round_half_away(value: f64, decimals: usize) -> f64 {
    // a binary value sits exactly on a tie only if value * 2^(decimals + 1)
    // is an odd integer; scaling by a power of two is exact
    let halves = value * 2f64.powi(decimals as i32 + 1);
    if halves.fract() == 0.0 && halves.abs() % 2.0 == 1.0 {
        let factor = 10f64.powi(decimals as i32);
        (value * factor).round() / factor
    } else {
        value
    }
}

/// Number text as a browser would print it: `NaN`, `Infinity`, `-Infinity`,
/// otherwise fixed to `decimals` places.
pub fn format_metric(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        format!("{:.*}", decimals, round_half_away(value, decimals))
    }
}

pub fn format_website(website: Option<&str>) -> &str {
    website.unwrap_or("undefined")
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Stable element id for a per-website node. The index keeps duplicate
/// website names apart.
pub fn element_id(prefix: &str, index: usize, name: &str) -> String {
    let lower = name.to_lowercase();
    let slug = NON_ID_CHARS.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        format!("{}-{}", prefix, index)
    } else {
        format!("{}-{}-{}", prefix, index, slug)
    }
}

/// Size the global rayon pool; defaults to the CPU count capped at 8.
pub fn configure_workers(workers: Option<usize>) -> anyhow::Result<usize> {
    let max_workers = workers.unwrap_or_else(|| {
        let cpu_count = num_cpus::get();
        std::cmp::min(cpu_count, 8)
    });

    rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .build_global()?;
    info!(action = "configure", component = "thread_pool", workers = max_workers, "Using workers");
    Ok(max_workers)
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be greater than 0");
        }
    }

    if args.top_words == 0 {
        anyhow::bail!("--top-words must be greater than 0");
    }

    let stdin_sources = [&args.websites, &args.rankings, &args.reviews]
        .iter()
        .filter(|source| source.as_deref().is_some_and(|p| p.as_os_str() == "-"))
        .count();
    if stdin_sources > 1 {
        anyhow::bail!("Only one of --websites, --rankings and --reviews can read stdin (\"-\")");
    }

    if args.init && (args.websites.is_some() || args.rankings.is_some() || args.reviews.is_some())
    {
        anyhow::bail!("--init cannot be combined with input files");
    }

    Ok(())
}
