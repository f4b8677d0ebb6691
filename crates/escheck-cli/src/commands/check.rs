//! Check command implementation.

use anyhow::{Context, Result};
use escheck_core::{CheckConfig, CheckReport, ConfigLayer, StringList};
use std::path::{Path, PathBuf};

use crate::config_resolver;
use crate::OutputFormat;

/// Arguments of a check run.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// ECMAScript version to check against (es3, es4, es5, es6/es2015 ... es10/es2019)
    pub ecma_version: Option<String>,

    /// Files or glob patterns to check
    pub files: Vec<String>,

    /// Parse files as ES modules
    #[arg(long)]
    pub module: bool,

    /// Allow a leading hashbang (`#!`) line
    #[arg(long)]
    pub allow_hash_bang: bool,

    /// Skip files whose path contains any of these strings (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub not: Vec<String>,

    /// Path to configuration file (default: ./.escheckrc)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl CheckArgs {
    /// The explicit configuration tier. Flags that were not given stay unset
    /// so the config file can still provide them.
    fn layer(&self) -> ConfigLayer {
        let non_empty = |v: &Vec<String>| (!v.is_empty()).then(|| StringList::Many(v.clone()));
        ConfigLayer {
            files: non_empty(&self.files),
            ecma_version: self.ecma_version.clone(),
            module: self.module.then_some(true),
            allow_hash_bang: self.allow_hash_bang.then_some(true),
            not: non_empty(&self.not),
            jobs: self.jobs,
        }
    }
}

/// Runs the check command and prints the report.
pub fn run(args: &CheckArgs, format: OutputFormat) -> Result<CheckReport> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let config = build_config(args, &cwd)?;

    tracing::info!(
        "ES-Check: checking {} pattern(s) using {}",
        config.files.len(),
        config.ecma_version
    );
    if !config.not.is_empty() {
        tracing::debug!("Skipping paths containing: {}", config.not.join(", "));
    }

    let report = escheck_core::check(config)?;

    super::output::print(&report, format)?;
    Ok(report)
}

/// Merges defaults, the resolved config file and `args`.
pub fn build_config(args: &CheckArgs, cwd: &Path) -> Result<CheckConfig> {
    let source = config_resolver::resolve(cwd, args.config.as_deref());
    let file_layer = source.load().with_context(|| match source.path() {
        Some(p) => format!("Failed to load config: {}", p.display()),
        None => "Failed to load config".to_string(),
    })?;
    Ok(CheckConfig::merge(
        CheckConfig::defaults(cwd),
        file_layer,
        args.layer(),
    ))
}
