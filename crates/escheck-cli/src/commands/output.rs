//! Shared output formatting for check results.

use anyhow::Result;
use escheck_core::CheckReport;
use std::fmt::Write;
use std::io::IsTerminal;

use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(report: &CheckReport, format: OutputFormat) -> Result<()> {
    let color = format == OutputFormat::Text && std::io::stdout().is_terminal();
    print!("{}", render(report, format, color)?);
    Ok(())
}

/// Render check results in the specified format.
pub fn render(report: &CheckReport, format: OutputFormat, color: bool) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(report, color),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(report)?),
        OutputFormat::Compact => render_compact(report),
    })
}

fn render_text(report: &CheckReport, color: bool) -> String {
    let paint = |code: &str, text: &str| {
        if color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    };

    let mut out = String::new();
    for violation in &report.violations {
        let _ = writeln!(out, "{}", violation.file.display());
        let _ = writeln!(out, "  {}: {}", paint("31", "error"), violation.raw_message);
        let _ = writeln!(out, "  source: {}", violation.source);
        let _ = writeln!(
            out,
            "  location: {}:{}",
            violation.original_line, violation.original_column
        );
        let _ = writeln!(out, "  code: {}", violation.code_snippet.trim());
        out.push('\n');
    }

    let summary_color = if report.passed() { "32" } else { "31" };
    let _ = writeln!(out, "{}", paint(summary_color, &report.summary()));
    out
}

fn render_compact(report: &CheckReport) -> String {
    report
        .violations
        .iter()
        .map(|violation| format!("{violation}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use escheck_core::ViolationRecord;
    use std::path::PathBuf;

    fn report() -> CheckReport {
        CheckReport {
            violations: vec![
                ViolationRecord::new(
                    PathBuf::from("dist/app.js"),
                    2,
                    1,
                    "`let`/`const` declaration requires es6/es2015 or later",
                )
                .with_original("src/app.js", 5, 3, "  let y = () => 2;"),
                ViolationRecord::new(
                    PathBuf::from("dist/nomap.js"),
                    3,
                    9,
                    "arrow function requires es6/es2015 or later",
                ),
            ],
            files_checked: 3,
        }
    }

    #[test]
    fn text_lists_every_violation() {
        let text = render(&report(), OutputFormat::Text, false).unwrap();
        insta::assert_snapshot!(text, @r"
        dist/app.js
          error: `let`/`const` declaration requires es6/es2015 or later
          source: src/app.js
          location: 5:3
          code: let y = () => 2;

        dist/nomap.js
          error: arrow function requires es6/es2015 or later
          source: unknown
          location: 3:9
          code: unknown

        Found 2 ES version matching error(s) in 3 file(s)
        ");
    }

    #[test]
    fn text_without_violations_is_summary_only() {
        let report = CheckReport {
            violations: Vec::new(),
            files_checked: 4,
        };
        let text = render(&report, OutputFormat::Text, false).unwrap();
        insta::assert_snapshot!(text, @"There were no ES version matching errors in 4 file(s)");
    }

    #[test]
    fn color_wraps_summary() {
        let text = render(&CheckReport::new(), OutputFormat::Text, true).unwrap();
        assert!(text.starts_with("\x1b[32m"));
    }

    #[test]
    fn compact_is_one_line_per_violation() {
        let text = render(&report(), OutputFormat::Compact, false).unwrap();
        insta::assert_snapshot!(text, @r"
        dist/app.js:2:1: `let`/`const` declaration requires es6/es2015 or later
        dist/nomap.js:3:9: arrow function requires es6/es2015 or later
        ");
    }

    #[test]
    fn json_is_the_serialized_report() {
        let text = render(&report(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["filesChecked"], 3);
        assert_eq!(value["violations"][0]["source"], "src/app.js");
        assert_eq!(value["violations"][1]["codeSnippet"], "unknown");
    }
}
