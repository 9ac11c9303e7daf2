use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::error;

use rankview::report::{print_analysis_results, write_html_report};
use rankview::utils::{configure_workers, setup_logging, validate_args};
use rankview::{init_default_lexicon, run_analysis, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    validate_args(&args)?;

    if args.init {
        return init_default_lexicon(Path::new("."));
    }

    configure_workers(args.workers)?;

    let outcome = run_analysis(&args).and_then(|result| {
        if !args.no_html {
            write_html_report(&result, &args.tab, &args.output)?;
        }
        print_analysis_results(&result, args.format)?;
        if !args.no_html {
            println!("\nReport written to {}", args.output.display());
        }
        Ok(())
    });

    if let Err(e) = outcome {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
