//! Check configuration and the three-tier merge.
//!
//! A [`CheckConfig`] is assembled once per run from built-in defaults, an
//! optional `.escheckrc` layer and the caller's explicit options, in that
//! order of increasing precedence. The engine never looks anything up on
//! its own; locating the configuration file is the caller's job.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name, looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = ".escheckrc";

/// Keys a [`ConfigLayer`] reads. Anything else in `.escheckrc` is skipped.
const KNOWN_KEYS: &[&str] = &["files", "ecmaVersion", "module", "allowHashBang", "not", "jobs"];

/// Fully merged, immutable input of one check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Root that relative file patterns are expanded against.
    pub base_dir: PathBuf,

    /// Glob patterns, in reporting order.
    pub files: Vec<String>,

    /// Grammar version alias (`es5`, `es6`, `es2018`, ...).
    pub ecma_version: String,

    /// Parse files as ES modules.
    pub module: bool,

    /// Tolerate a leading `#!` line.
    pub allow_hash_bang: bool,

    /// Files whose path contains any of these substrings are skipped.
    pub not: Vec<String>,

    /// Worker pool size; `None` uses one worker per CPU.
    pub jobs: Option<usize>,
}

impl CheckConfig {
    /// Built-in defaults: es5 scripts, no hashbang, nothing ignored.
    #[must_use]
    pub fn defaults(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            files: Vec::new(),
            ecma_version: crate::EcmaVersion::DEFAULT_ALIAS.to_string(),
            module: false,
            allow_hash_bang: false,
            not: Vec::new(),
            jobs: None,
        }
    }

    /// Merges the three tiers field by field: `explicit` wins over `file`,
    /// which wins over `defaults`.
    #[must_use]
    pub fn merge(defaults: Self, file: ConfigLayer, explicit: ConfigLayer) -> Self {
        let layered = file.overlay(explicit);
        Self {
            base_dir: defaults.base_dir,
            files: layered.files.map_or(defaults.files, StringList::into_vec),
            ecma_version: layered.ecma_version.unwrap_or(defaults.ecma_version),
            module: layered.module.unwrap_or(defaults.module),
            allow_hash_bang: layered.allow_hash_bang.unwrap_or(defaults.allow_hash_bang),
            not: layered.not.map_or(defaults.not, StringList::into_vec),
            jobs: layered.jobs.or(defaults.jobs),
        }
    }

    /// Sets the file patterns.
    #[must_use]
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the grammar version alias.
    #[must_use]
    pub fn with_ecma_version(mut self, alias: impl Into<String>) -> Self {
        self.ecma_version = alias.into();
        self
    }

    /// Enables or disables module parsing.
    #[must_use]
    pub fn with_module(mut self, module: bool) -> Self {
        self.module = module;
        self
    }

    /// Enables or disables hashbang tolerance.
    #[must_use]
    pub fn with_allow_hash_bang(mut self, allow: bool) -> Self {
        self.allow_hash_bang = allow;
        self
    }

    /// Sets the ignore substrings.
    #[must_use]
    pub fn with_not<I, S>(mut self, not: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not = not.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the worker pool size.
    #[must_use]
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }
}

/// One partial configuration tier. Every field is optional; unset fields
/// fall through to the tier below. Unknown keys are ignored, so files
/// written for other versions of the tool keep loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    /// File patterns.
    #[serde(default)]
    pub files: Option<StringList>,

    /// Grammar version alias.
    #[serde(default)]
    pub ecma_version: Option<String>,

    /// Module parsing.
    #[serde(default)]
    pub module: Option<bool>,

    /// Hashbang tolerance.
    #[serde(default)]
    pub allow_hash_bang: Option<bool>,

    /// Ignore substrings.
    #[serde(default)]
    pub not: Option<StringList>,

    /// Worker pool size.
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl ConfigLayer {
    /// Loads a layer from a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Parses a layer from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid, is not an object, or a
    /// known key has the wrong type.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse {
            path: None,
            message,
        };
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
        let Some(object) = value.as_object() else {
            return Err(parse_error("expected a JSON object".to_string()));
        };
        for key in object.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            debug!("Ignoring unknown config key {key:?}");
        }
        serde_json::from_value(value).map_err(|e| parse_error(e.to_string()))
    }

    /// Returns `self` with every field set in `upper` replaced.
    #[must_use]
    pub fn overlay(self, upper: Self) -> Self {
        Self {
            files: upper.files.or(self.files),
            ecma_version: upper.ecma_version.or(self.ecma_version),
            module: upper.module.or(self.module),
            allow_hash_bang: upper.allow_hash_bang.or(self.allow_hash_bang),
            not: upper.not.or(self.not),
            jobs: upper.jobs.or(self.jobs),
        }
    }
}

/// A string or a list of strings.
///
/// `.escheckrc` accepts `"files": "dist/*.js"` as well as
/// `"files": ["dist/*.js", "lib/*.js"]`. A single string is split on commas,
/// matching the command line form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    /// Comma-separated entries.
    One(String),
    /// Explicit entries.
    Many(Vec<String>),
}

impl StringList {
    /// Flattens to a list, dropping empty entries.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        let entries = match self {
            Self::One(s) => s.split(',').map(str::to_string).collect(),
            Self::Many(v) => v,
        };
        entries
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl From<Vec<String>> for StringList {
    fn from(v: Vec<String>) -> Self {
        Self::Many(v)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config{}: {message}", .path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default())]
    Parse {
        /// File that failed to parse, when known.
        path: Option<PathBuf>,
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_es5_scripts() {
        let config = CheckConfig::defaults("/work");
        assert_eq!(config.ecma_version, "es5");
        assert!(!config.module);
        assert!(!config.allow_hash_bang);
        assert!(config.files.is_empty());
        assert!(config.not.is_empty());
        assert_eq!(config.base_dir, PathBuf::from("/work"));
    }

    #[test]
    fn parses_escheckrc() {
        let layer = ConfigLayer::parse(
            r#"{
                "ecmaVersion": "es6",
                "files": ["dist/*.js", "lib/*.js"],
                "module": true,
                "allowHashBang": true,
                "not": "vendor,fixtures"
            }"#,
        )
        .unwrap();
        assert_eq!(layer.ecma_version.as_deref(), Some("es6"));
        assert_eq!(layer.module, Some(true));
        assert_eq!(layer.allow_hash_bang, Some(true));
        assert_eq!(
            layer.not.unwrap().into_vec(),
            vec!["vendor".to_string(), "fixtures".to_string()]
        );
        assert_eq!(layer.files.unwrap().into_vec().len(), 2);
    }

    #[test]
    fn single_string_files() {
        let layer = ConfigLayer::parse(r#"{"files": "a.js, b.js,"}"#).unwrap();
        assert_eq!(
            layer.files.unwrap().into_vec(),
            vec!["a.js".to_string(), "b.js".to_string()]
        );
    }

    #[test]
    fn ignores_unknown_keys() {
        let layer = ConfigLayer::parse(
            r#"{"ecmaVersoin": "es6", "context": "node", "module": true, "extra": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(
            layer,
            ConfigLayer {
                module: Some(true),
                ..ConfigLayer::default()
            }
        );
    }

    #[test]
    fn rejects_bad_json_and_mistyped_keys() {
        for content in ["{ not json", "[]", "\"es6\"", r#"{"module": "yes"}"#, r#"{"jobs": -1}"#] {
            assert!(
                matches!(ConfigLayer::parse(content), Err(ConfigError::Parse { .. })),
                "{content} parsed"
            );
        }
    }

    #[test]
    fn explicit_beats_file_beats_defaults() {
        let file = ConfigLayer {
            files: Some(StringList::Many(vec!["from-file.js".into()])),
            ecma_version: Some("es6".into()),
            module: Some(true),
            not: Some(StringList::One("vendor".into())),
            ..ConfigLayer::default()
        };
        let explicit = ConfigLayer {
            ecma_version: Some("es2018".into()),
            allow_hash_bang: Some(true),
            ..ConfigLayer::default()
        };
        let config = CheckConfig::merge(CheckConfig::defaults("/work"), file, explicit);
        assert_eq!(config.ecma_version, "es2018");
        assert_eq!(config.files, vec!["from-file.js".to_string()]);
        assert!(config.module);
        assert!(config.allow_hash_bang);
        assert_eq!(config.not, vec!["vendor".to_string()]);
        assert_eq!(config.jobs, None);
    }

    #[test]
    fn explicit_files_replace_file_layer() {
        let file = ConfigLayer {
            files: Some(StringList::Many(vec!["a.js".into(), "b.js".into()])),
            ..ConfigLayer::default()
        };
        let explicit = ConfigLayer {
            files: Some(StringList::Many(vec!["c.js".into()])),
            ..ConfigLayer::default()
        };
        let config = CheckConfig::merge(CheckConfig::defaults("."), file, explicit);
        assert_eq!(config.files, vec!["c.js".to_string()]);
    }

    #[test]
    fn from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[]").unwrap();
        let err = ConfigLayer::from_file(&path).unwrap_err();
        assert!(err.to_string().contains(".escheckrc"));

        let missing = ConfigLayer::from_file(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
