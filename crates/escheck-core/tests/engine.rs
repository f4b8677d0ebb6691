//! Integration test: whole check runs against on-disk trees.
//!
//! Scenario trees are built in temp dirs; the remap fixtures live under
//! `tests/fixtures/remap/` next to their `.map` files.

use escheck_core::{check, CheckConfig, CheckError, Checker, UNKNOWN};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/remap")
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().expect("fixture path has a parent")).expect("mkdir");
    fs::write(&path, content).expect("write fixture");
    path
}

fn config(dir: &Path, version: &str, files: &[&str]) -> CheckConfig {
    CheckConfig::defaults(dir)
        .with_ecma_version(version)
        .with_files(files.iter().copied())
}

// ── Scenarios ──

#[test]
fn es5_rejects_arrow_and_const() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "a.js", "const x = () => 1;\n");

    let report = check(config(dir.path(), "es5", &["a.js"])).expect("check should run");
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.files_checked, 1);
    let violation = &report.violations[0];
    assert!(violation.file.ends_with("a.js"));
    assert_eq!((violation.line, violation.column), (1, 1));
    assert!(!report.passed());
}

#[test]
fn es6_accepts_arrow_and_const() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "a.js", "const x = () => 1;\n");

    let report = check(config(dir.path(), "es6", &["a.js"])).expect("check should run");
    assert!(report.passed());
    assert!(report.violations.is_empty());
}

#[test]
fn missing_pattern_is_no_match() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "a.js", "var a;\n");

    let err = check(config(dir.path(), "es5", &["a.js", "missing-*.js"])).unwrap_err();
    assert!(matches!(err, CheckError::NoMatch { ref pattern } if pattern == "missing-*.js"));
}

#[test]
fn invalid_version_is_configuration_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "a.js", "var a;\n");

    let err = check(config(dir.path(), "es99", &["a.js"])).unwrap_err();
    assert!(matches!(err, CheckError::InvalidVersion { .. }));
}

#[test]
fn hash_bang_is_tolerated_only_when_allowed() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "bin.js",
        "#!/usr/bin/env node\nvar args = process.argv.slice(2);\n",
    );

    let allowed = config(dir.path(), "es5", &["bin.js"]).with_allow_hash_bang(true);
    assert!(check(allowed).expect("check should run").passed());

    let report = check(config(dir.path(), "es5", &["bin.js"])).expect("check should run");
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].line, 1);
}

#[test]
fn module_mode_allows_import_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "mod.js",
        "import { a } from './a.js';\nexport default a;\n",
    );

    let script = check(config(dir.path(), "es6", &["mod.js"])).expect("check should run");
    assert_eq!(script.violations.len(), 1);

    let module = config(dir.path(), "es6", &["mod.js"]).with_module(true);
    assert!(check(module).expect("check should run").passed());
}

#[test]
fn empty_file_passes_every_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "empty.js", "");

    for version in escheck_core::EcmaVersion::ALIASES {
        let report = check(config(dir.path(), version, &["empty.js"])).expect("check should run");
        assert!(report.passed(), "empty file failed under {version}");
    }
}

// ── Ordering and filtering ──

#[test]
fn violations_follow_pattern_order_and_are_stable() {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in ["b/1.js", "b/2.js", "a/1.js", "a/2.js", "a/ok.js"] {
        let body = if name.ends_with("ok.js") {
            "var ok = true;\n"
        } else {
            "let broken = 1;\n"
        };
        write(dir.path(), name, body);
    }

    let run = || {
        check(config(dir.path(), "es5", &["b/*.js", "a/*.js"]).with_jobs(Some(4)))
            .expect("check should run")
    };
    let first = run();
    let files: Vec<String> = first
        .violations
        .iter()
        .map(|v| {
            v.file
                .strip_prefix(dir.path())
                .expect("under tempdir")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(files, ["b/1.js", "b/2.js", "a/1.js", "a/2.js"]);
    assert_eq!(first.files_checked, 5);

    for _ in 0..5 {
        assert_eq!(run(), first);
    }
}

#[test]
fn ignored_paths_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "dist/app.js", "var a = 1;\n");
    write(dir.path(), "dist/vendor/lib.js", "let b = 2;\n");

    let report = check(
        config(dir.path(), "es5", &["dist/**/*.js"]).with_not(["vendor"]),
    )
    .expect("check should run");
    assert!(report.passed());
    assert_eq!(report.files_checked, 1);
}

#[test]
fn one_bad_file_does_not_stop_the_others() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "1.js", "var a = ;\n");
    write(dir.path(), "2.js", "var b = 1;\n");
    write(dir.path(), "3.js", "class C {}\n");

    let report = check(config(dir.path(), "es5", &["*.js"])).expect("check should run");
    assert_eq!(report.violations.len(), 2);
    assert_eq!(report.files_checked, 3);
}

#[test]
fn pathological_nesting_is_a_violation_not_a_crash() {
    let dir = tempfile::tempdir().expect("tempdir");
    let depth = 20_000;
    write(
        dir.path(),
        "deep.js",
        &format!("var a = {}1{};\n", "[".repeat(depth), "]".repeat(depth)),
    );
    write(dir.path(), "fine.js", "var b = 1;\n");

    let report = check(config(dir.path(), "es5", &["*.js"])).expect("check should run");
    assert_eq!(report.files_checked, 2);
    assert_eq!(report.violations.len(), 1);
    let violation = &report.violations[0];
    assert!(violation.file.ends_with("deep.js"));
    assert!(violation.raw_message.contains("nesting depth"));
}

// ── Source maps ──

#[test]
fn remaps_through_sibling_map() {
    let root = fixture_root();
    let checker =
        Checker::new(config(&root, "es5", &["dist/app.js"])).expect("version should resolve");
    let report = checker.check().expect("check should run");

    assert_eq!(report.violations.len(), 1);
    let violation = &report.violations[0];
    assert_eq!((violation.line, violation.column), (2, 1));
    assert_eq!(violation.source, "src/app.js");
    assert_eq!((violation.original_line, violation.original_column), (5, 3));
    assert_eq!(violation.code_snippet, "  let y = () => 2;");
}

#[test]
fn no_map_keeps_generated_location() {
    let root = fixture_root();
    let report = check(config(&root, "es5", &["dist/nomap.js"])).expect("check should run");

    assert_eq!(report.violations.len(), 1);
    let violation = &report.violations[0];
    assert_eq!(violation.source, UNKNOWN);
    assert_eq!(violation.code_snippet, UNKNOWN);
    assert_eq!(
        (violation.original_line, violation.original_column),
        (violation.line, violation.column)
    );
    assert_eq!((violation.line, violation.column), (3, 9));
}

#[test]
fn malformed_map_degrades() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "a.js", "let a = 1;\n");
    write(dir.path(), "a.js.map", "{\"version\": 3, \"mappings\": 42}");

    let report = check(config(dir.path(), "es5", &["a.js"])).expect("check should run");
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].source, UNKNOWN);
}
