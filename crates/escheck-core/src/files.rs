//! Expansion of file patterns into the ordered set of files to check.

use crate::checker::CheckError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Expands `patterns` against `base_dir` and drops ignored paths.
///
/// Patterns are expanded one at a time, in order; each must match at least
/// one regular file before ignores are applied. The result keeps the first
/// occurrence of every file, comparing canonical paths so that spellings
/// such as `dist/../dist/a.js` and links to the same file collapse.
///
/// # Errors
///
/// - [`CheckError::NoPatterns`] when `patterns` is empty.
/// - [`CheckError::Pattern`] when a pattern does not compile.
/// - [`CheckError::NoMatch`] when a pattern matches no file.
/// - [`CheckError::Io`] when a matched entry cannot be read.
pub fn resolve_files(
    base_dir: &Path,
    patterns: &[String],
    ignore: &[String],
) -> Result<Vec<PathBuf>, CheckError> {
    if patterns.is_empty() {
        return Err(CheckError::NoPatterns);
    }

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for pattern in patterns {
        let matched = expand_pattern(base_dir, pattern)?;
        if matched.is_empty() {
            return Err(CheckError::NoMatch {
                pattern: pattern.clone(),
            });
        }
        debug!("Pattern {pattern:?} matched {} file(s)", matched.len());

        for path in matched {
            if is_ignored(&path, ignore) {
                trace!("Ignoring: {}", path.display());
                continue;
            }
            let identity = path.canonicalize().unwrap_or_else(|_| path.clone());
            if seen.insert(identity) {
                files.push(path);
            } else {
                trace!("Already queued: {}", path.display());
            }
        }
    }
    Ok(files)
}

/// Regular files matching one pattern, in glob order.
fn expand_pattern(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, CheckError> {
    let full = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let base = glob::Pattern::escape(&base_dir.to_string_lossy());
        format!("{}/{}", base.trim_end_matches('/'), pattern.trim_start_matches("./"))
    };

    let entries = glob::glob(&full).map_err(|source| CheckError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CheckError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Literal substring match on the whole path.
fn is_ignored(path: &Path, ignore: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    ignore
        .iter()
        .filter(|needle| !needle.is_empty())
        .any(|needle| path_str.contains(needle.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for path in ["dist/a.js", "dist/b.js", "dist/vendor/c.js", "lib/d.js"] {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, "var x;").unwrap();
        }
        dir
    }

    fn names(base: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(base).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn expands_in_pattern_order() {
        let dir = tree();
        let files = resolve_files(
            dir.path(),
            &["lib/*.js".into(), "dist/*.js".into()],
            &[],
        )
        .unwrap();
        assert_eq!(names(dir.path(), &files), ["lib/d.js", "dist/a.js", "dist/b.js"]);
    }

    #[test]
    fn directories_never_match() {
        let dir = tree();
        let files = resolve_files(dir.path(), &["dist/*".into()], &[]).unwrap();
        assert_eq!(names(dir.path(), &files), ["dist/a.js", "dist/b.js"]);
    }

    #[test]
    fn removes_ignored_substrings() {
        let dir = tree();
        let files = resolve_files(dir.path(), &["**/*.js".into()], &["vendor".into()]).unwrap();
        assert!(files.iter().all(|f| !f.to_string_lossy().contains("vendor")));
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn deduplicates_across_patterns() {
        let dir = tree();
        let files = resolve_files(
            dir.path(),
            &["dist/a.js".into(), "dist/*.js".into()],
            &[],
        )
        .unwrap();
        assert_eq!(names(dir.path(), &files), ["dist/a.js", "dist/b.js"]);
    }

    #[test]
    fn deduplicates_different_spellings_of_one_file() {
        let dir = tree();
        let absolute = dir.path().join("lib/d.js").to_string_lossy().into_owned();
        let files = resolve_files(
            dir.path(),
            &[
                "dist/a.js".into(),
                "dist/../dist/a.js".into(),
                "./dist/a.js".into(),
                "lib/d.js".into(),
                absolute,
            ],
            &[],
        )
        .unwrap();
        assert_eq!(names(dir.path(), &files), ["dist/a.js", "lib/d.js"]);
    }

    #[cfg(unix)]
    #[test]
    fn deduplicates_symlinked_files() {
        let dir = tree();
        std::os::unix::fs::symlink(dir.path().join("dist/a.js"), dir.path().join("lib/link.js"))
            .unwrap();
        let files = resolve_files(dir.path(), &["dist/a.js".into(), "lib/*.js".into()], &[]).unwrap();
        assert_eq!(names(dir.path(), &files), ["dist/a.js", "lib/d.js"]);
    }

    #[test]
    fn empty_match_is_fatal_even_after_matches() {
        let dir = tree();
        let err = resolve_files(
            dir.path(),
            &["dist/*.js".into(), "missing-*.js".into()],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, CheckError::NoMatch { pattern } if pattern == "missing-*.js"));
    }

    #[test]
    fn fully_ignored_pattern_is_not_an_error() {
        let dir = tree();
        let files =
            resolve_files(dir.path(), &["dist/vendor/*.js".into()], &["vendor".into()]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn empty_pattern_list_is_fatal() {
        let dir = tree();
        assert!(matches!(
            resolve_files(dir.path(), &[], &[]),
            Err(CheckError::NoPatterns)
        ));
    }

    #[test]
    fn invalid_pattern_is_fatal() {
        let dir = tree();
        assert!(matches!(
            resolve_files(dir.path(), &["dist/[.js".into()], &[]),
            Err(CheckError::Pattern { .. })
        ));
    }

    #[test]
    fn absolute_patterns_ignore_base() {
        let dir = tree();
        let absolute = dir.path().join("lib/d.js").to_string_lossy().into_owned();
        let files = resolve_files(Path::new("/nonexistent"), &[absolute], &[]).unwrap();
        assert_eq!(files.len(), 1);
    }
}
