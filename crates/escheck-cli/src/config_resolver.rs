//! Configuration file resolution.
//!
//! Resolves the configuration file path in priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `.escheckrc` in the working directory
//! 3. No config found → defaults

use escheck_core::{ConfigError, ConfigLayer, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the working directory.
    Project(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the file layer. [`ConfigSource::Default`] yields an empty layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. An explicit
    /// path that does not exist is an error too.
    pub fn load(&self) -> Result<ConfigLayer, ConfigError> {
        match self.path() {
            Some(path) => ConfigLayer::from_file(path),
            None => Ok(ConfigLayer::default()),
        }
    }
}

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    let candidate = project_dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        tracing::debug!("Found project config: {}", candidate.display());
        return ConfigSource::Project(candidate);
    }

    ConfigSource::Default
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_takes_priority_over_project() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.json");
        fs::write(&explicit, "{}").unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        let result = resolve(tmp.path(), Some(&explicit));
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn explicit_does_not_check_existence() {
        let result = resolve(Path::new("/tmp"), Some(Path::new("/nonexistent.json")));
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.json"))
        );
        assert!(matches!(result.load(), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn project_escheckrc_found() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), r#"{"ecmaVersion": "es6"}"#).unwrap();

        let result = resolve(tmp.path(), None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join(CONFIG_FILE_NAME))
        );
        assert_eq!(result.load().unwrap().ecma_version.as_deref(), Some("es6"));
    }

    #[test]
    fn directory_named_escheckrc_is_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(resolve(tmp.path(), None), ConfigSource::Default);
    }

    #[test]
    fn no_config_returns_default_layer() {
        let tmp = TempDir::new().unwrap();
        let result = resolve(tmp.path(), None);
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
        assert_eq!(result.load().unwrap(), ConfigLayer::default());
    }
}
