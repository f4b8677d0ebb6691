//! Check pipeline: version resolution, file expansion, parsing and remapping.

use crate::config::CheckConfig;
use crate::files::resolve_files;
use crate::sourcemap::remap_violation;
use crate::syntax::{self, ParseOptions, SourceType};
use crate::types::{CheckReport, ViolationRecord};
use crate::version::EcmaVersion;

use miette::Diagnostic;
use rayon::prelude::*;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Worker stack size. The recognizer is recursive and stops at a fixed
/// nesting depth; this leaves room for that depth in unoptimized builds.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Errors that stop a check before it produces a report.
#[derive(Debug, Error, Diagnostic)]
pub enum CheckError {
    /// The configured grammar version is not a known alias.
    #[error("invalid grammar version `{version}`")]
    #[diagnostic(
        code(escheck::invalid_version),
        help("expected one of: es3, es4, es5, es6, es2015, es7, es2016, es8, es2017, es9, es2018, es10, es2019")
    )]
    InvalidVersion {
        /// The rejected alias.
        version: String,
    },

    /// No file patterns were configured.
    #[error("No files were passed in")]
    #[diagnostic(
        code(escheck::no_patterns),
        help("pass file patterns on the command line or set `files` in .escheckrc")
    )]
    NoPatterns,

    /// A pattern matched no regular file.
    #[error("ES-Check: Did not find any files to check for {pattern}")]
    #[diagnostic(code(escheck::no_match))]
    NoMatch {
        /// The pattern that matched nothing.
        pattern: String,
    },

    /// A pattern is not a valid glob.
    #[error("Invalid glob pattern `{pattern}`: {source}")]
    #[diagnostic(code(escheck::invalid_pattern))]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        source: glob::PatternError,
    },

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(escheck::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    #[diagnostic(code(escheck::thread_pool))]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Checks the configured files against one grammar version.
///
/// Construction resolves the version, so an invalid alias fails before any
/// file is touched.
#[derive(Debug, Clone)]
pub struct Checker {
    config: CheckConfig,
    options: ParseOptions,
}

impl Checker {
    /// Creates a checker for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidVersion`] for an unknown version alias.
    pub fn new(config: CheckConfig) -> Result<Self, CheckError> {
        let version = EcmaVersion::resolve(&config.ecma_version)
            .map_err(|e| CheckError::InvalidVersion { version: e.0 })?;
        let source_type = if config.module {
            SourceType::Module
        } else {
            SourceType::Script
        };
        let options = ParseOptions::new(version)
            .source_type(source_type)
            .allow_hash_bang(config.allow_hash_bang);
        Ok(Self { config, options })
    }

    /// The resolved grammar version.
    #[must_use]
    pub fn version(&self) -> EcmaVersion {
        self.options.ecma_version
    }

    /// The configuration this checker runs with.
    #[must_use]
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Runs the check.
    ///
    /// Files are parsed in parallel; violations come back in file
    /// resolution order regardless of completion order.
    ///
    /// # Errors
    ///
    /// Returns an error if file expansion fails or a file cannot be read.
    /// Syntax violations are not errors; they are part of the report.
    pub fn check(&self) -> Result<CheckReport, CheckError> {
        let files = resolve_files(&self.config.base_dir, &self.config.files, &self.config.not)?;
        debug!(
            "Checking {} file(s) against {}",
            files.len(),
            self.version().label()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs.unwrap_or(0))
            .stack_size(WORKER_STACK_SIZE)
            .build()?;
        pool.install(|| self.check_files(&files))
    }

    fn check_files(&self, files: &[PathBuf]) -> Result<CheckReport, CheckError> {
        let outcomes = files
            .par_iter()
            .map(|path| self.check_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        let violations: Vec<ViolationRecord> = outcomes
            .into_par_iter()
            .flatten()
            .map(remap_violation)
            .collect();

        debug!(
            "{} of {} file(s) failed",
            violations.len(),
            files.len()
        );
        Ok(CheckReport {
            violations,
            files_checked: files.len(),
        })
    }

    /// Parses one file, returning its violation if it has one.
    ///
    /// The returned record has not been remapped.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Io`] if the file cannot be read.
    pub fn check_file(&self, path: &Path) -> Result<Option<ViolationRecord>, CheckError> {
        let bytes = std::fs::read(path).map_err(|e| CheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let source = decode_source(&bytes);
        match syntax::parse(&source, &self.options) {
            Ok(()) => Ok(None),
            Err(err) => {
                debug!("{}: {err}", path.display());
                Ok(Some(ViolationRecord::new(
                    path.to_path_buf(),
                    err.line(),
                    err.column(),
                    err.message,
                )))
            }
        }
    }
}

/// Lossy UTF-8 decoding with a leading byte order mark removed.
fn decode_source(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}

/// Resolves, parses and remaps in one call.
///
/// # Errors
///
/// See [`Checker::new`] and [`Checker::check`].
pub fn check(config: CheckConfig) -> Result<CheckReport, CheckError> {
    Checker::new(config)?.check()
}
