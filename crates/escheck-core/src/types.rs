//! Core types for violations and check results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sentinel for fields that could not be recovered from a source map.
pub const UNKNOWN: &str = "unknown";

/// One file that failed to parse under the configured grammar.
///
/// Every field is always present. When no source map could be applied,
/// `source` and `code_snippet` hold [`UNKNOWN`] and the original
/// coordinates repeat the generated ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    /// File that failed to parse.
    pub file: PathBuf,
    /// Line reported by the parser (1-indexed).
    pub line: u32,
    /// Column reported by the parser (1-indexed, UTF-16 units).
    pub column: u32,
    /// Parser diagnostic, without location.
    pub raw_message: String,
    /// Original source path after remapping, or [`UNKNOWN`].
    pub source: String,
    /// Remapped line (1-indexed).
    pub original_line: u32,
    /// Remapped column (1-indexed).
    pub original_column: u32,
    /// Line of original source text at the remapped location, or [`UNKNOWN`].
    pub code_snippet: String,
}

impl ViolationRecord {
    /// Creates a record from a parser failure, with remap fields degraded.
    #[must_use]
    pub fn new(file: PathBuf, line: u32, column: u32, raw_message: impl Into<String>) -> Self {
        Self {
            file,
            line,
            column,
            raw_message: raw_message.into(),
            source: UNKNOWN.to_string(),
            original_line: line,
            original_column: column,
            code_snippet: UNKNOWN.to_string(),
        }
    }

    /// Fills the remap fields.
    #[must_use]
    pub fn with_original(
        mut self,
        source: impl Into<String>,
        line: u32,
        column: u32,
        code_snippet: impl Into<String>,
    ) -> Self {
        self.source = source.into();
        self.original_line = line;
        self.original_column = column;
        self.code_snippet = code_snippet.into();
        self
    }

    /// Whether a source map was applied.
    #[must_use]
    pub fn is_remapped(&self) -> bool {
        self.source != UNKNOWN
    }
}

impl std::fmt::Display for ViolationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file.display(),
            self.line,
            self.column,
            self.raw_message
        )
    }
}

/// Result of one check run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    /// Violations, in file resolution order.
    pub violations: Vec<ViolationRecord>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl CheckReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no file violated the grammar.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.passed() {
            format!("There were no ES version matching errors in {} file(s)", self.files_checked)
        } else {
            format!(
                "Found {} ES version matching error(s) in {} file(s)",
                self.violations.len(),
                self.files_checked
            )
        }
    }
}
