//! # escheck-core
//!
//! Engine that checks JavaScript files against an ECMAScript grammar
//! version, for build pipelines that must not ship syntax newer than their
//! targets support.
//!
//! A run goes through four stages:
//!
//! - [`EcmaVersion::resolve`] turns the configured alias into a grammar version
//! - [`resolve_files`] expands glob patterns and drops ignored paths
//! - [`Checker`] parses every file with the built-in [`syntax`] recognizer
//! - [`remap_violation`] points violations back at original sources through
//!   `<file>.map`
//!
//! ## Example
//!
//! ```no_run
//! use escheck_core::{check, CheckConfig};
//!
//! let config = CheckConfig::defaults("/path/to/project")
//!     .with_files(["dist/**/*.js"])
//!     .with_ecma_version("es5");
//!
//! let report = check(config)?;
//! for violation in &report.violations {
//!     println!("{violation}");
//! }
//! # Ok::<(), escheck_core::CheckError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod checker;
mod config;
mod files;
mod sourcemap;
mod types;
mod version;

/// Grammar-versioned JavaScript recognizer.
pub mod syntax;

pub use checker::{check, CheckError, Checker};
pub use config::{CheckConfig, ConfigError, ConfigLayer, StringList, CONFIG_FILE_NAME};
pub use files::resolve_files;
pub use sourcemap::{map_path_for, remap_violation, OriginalPosition, SourceMap, SourceMapError};
pub use types::{CheckReport, ViolationRecord, UNKNOWN};
pub use version::{EcmaVersion, InvalidVersion};
