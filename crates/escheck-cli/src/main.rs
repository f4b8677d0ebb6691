//! es-check CLI tool.
//!
//! Usage:
//! ```bash
//! es-check [OPTIONS] [ECMA_VERSION] [FILES]...
//! es-check es5 './dist/**/*.js' --not vendor
//! ```
//!
//! Exit status is 0 when every file matches the version, 1 when violations
//! were found and 2 when the check could not run.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

use commands::check::CheckArgs;

/// Checks that JavaScript files only use syntax from a given ECMAScript version
#[derive(Parser)]
#[command(name = "es-check")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    check: CheckArgs,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

const EXIT_VIOLATIONS: u8 = 1;
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match commands::check::run(&cli.check, cli.format) {
        Ok(report) if report.passed() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_VIOLATIONS),
        Err(err) => {
            report_error(err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Engine errors carry diagnostic codes and help, so they go through miette.
fn report_error(err: anyhow::Error) {
    match err.downcast::<escheck_core::CheckError>() {
        Ok(check_error) => eprintln!("{:?}", miette::Report::new(check_error)),
        Err(other) => eprintln!("Error: {other:#}"),
    }
}
