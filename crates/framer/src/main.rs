//! framer CLI - compact slide markup to LaTeX.
//!
//! Runs the bibliography cleaner, the include assembler and the expansion
//! pipeline over one document. Without stage flags every stage runs.

mod error;
mod output;
mod run;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use output::Output;
use run::RunArgs;

/// framer - expand compact slide markup into LaTeX.
#[derive(Parser)]
#[command(name = "framer", version, about, disable_version_flag = true)]
struct Cli {
    /// Print version.
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    #[command(flatten)]
    run: RunArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.run.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = cli.run.execute(&output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
