//! Template rendering for CLI output using outstanding

use console::Style;
use logscopelib::{AnalyzeResult, FileOutcome, ReportTable};
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;

/// Include template at compile time
const REPORT_TEMPLATE: &str = include_str!("../templates/report.jinja");

/// Width of the label column, in characters
const LABEL_WIDTH: usize = 26;

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

/// Row data for template rendering (pre-formatted)
#[derive(Debug, Serialize)]
struct TemplateRow {
    /// Pre-padded label (left-aligned, padded to LABEL_WIDTH)
    label: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct TemplateSection {
    title: String,
    rows: Vec<TemplateRow>,
}

#[derive(Debug, Serialize)]
struct TemplateReport {
    title: String,
    /// Sections with at least one row
    sections: Vec<TemplateSection>,
}

/// Data context for the report template
#[derive(Debug, Serialize)]
struct ReportContext {
    reports: Vec<TemplateReport>,
    /// Closing line with the number of processed files
    summary: String,
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new()
        .add("title", Style::new().bold().underlined())
        .add("category", Style::new().bold())
        .add("summary", Style::new().dim())
}

fn to_template_report(table: ReportTable) -> TemplateReport {
    let sections = table
        .sections
        .into_iter()
        .filter(|section| !section.rows.is_empty())
        .map(|section| TemplateSection {
            title: section.title,
            rows: section
                .rows
                .into_iter()
                .map(|row| TemplateRow {
                    label: format!("{:<width$}", row.label, width = LABEL_WIDTH),
                    value: row.value,
                })
                .collect(),
        })
        .collect();

    TemplateReport {
        title: table.title,
        sections,
    }
}

/// "Processed 3 files (1 failed)"
pub fn summary_line(result: &AnalyzeResult) -> String {
    let total = result.files.len();
    let noun = if total == 1 { "file" } else { "files" };
    match result.failed_count() {
        0 => format!("Processed {} {}", total, noun),
        failed => format!("Processed {} {} ({} failed)", total, noun, failed),
    }
}

/// Render analysis results in the requested mode.
///
/// Structured modes serialize the whole [`AnalyzeResult`], per-file errors
/// included. Text modes render every analyzed file through the report
/// template.
pub fn render_result(
    result: &AnalyzeResult,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let theme = create_theme();

    if output_mode.is_structured() {
        return Ok(render_auto(REPORT_TEMPLATE, result, &theme, output_mode)?);
    }

    let context = ReportContext {
        reports: result
            .reports()
            .map(|report| to_template_report(ReportTable::from_report(report)))
            .collect(),
        summary: summary_line(result),
    };

    let rendered = render_with_output(REPORT_TEMPLATE, &context, &theme, output_mode)?;

    Ok(rendered)
}

/// One line per file that could not be analyzed.
pub fn render_failures(result: &AnalyzeResult) -> Vec<String> {
    result
        .files
        .iter()
        .filter_map(|outcome| match outcome {
            FileOutcome::Failed { path, error } => {
                Some(format!("Error: {}: {}", path.display(), error))
            }
            FileOutcome::Analyzed { .. } => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use logscopelib::AnalysisReport;
    use std::path::PathBuf;

    fn sample_result() -> AnalyzeResult {
        let mut report = AnalysisReport::default().with_file_name("access.log");
        report.total_entries = 3;
        report.total_traffic = 1536;

        AnalyzeResult {
            files: vec![
                FileOutcome::Analyzed {
                    path: PathBuf::from("logs/access.log"),
                    report,
                },
                FileOutcome::Failed {
                    path: PathBuf::from("logs/huge.log"),
                    error: "line too long".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_render_text() {
        let out = render_result(&sample_result(), OutputMode::Text).unwrap();

        assert!(out.contains("Results for access.log"));
        assert!(out.contains("Overview"));
        assert!(out.contains("Entries"));
        assert!(out.contains("1.50 KB"));
        // Empty OS shares are not rendered
        assert!(!out.contains("Operating systems"));
        assert!(out.contains("Processed 2 files (1 failed)"));
    }

    #[test]
    fn test_render_json() {
        let out = render_result(&sample_result(), OutputMode::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["files"][0]["status"], "analyzed");
        assert_eq!(parsed["files"][0]["report"]["total_traffic"], 1536);
        assert_eq!(parsed["files"][1]["status"], "failed");
    }

    #[test]
    fn test_summary_line() {
        let mut result = sample_result();
        assert_eq!(summary_line(&result), "Processed 2 files (1 failed)");

        result.files.pop();
        assert_eq!(summary_line(&result), "Processed 1 file");
    }

    #[test]
    fn test_render_failures() {
        let failures = render_failures(&sample_result());

        assert_eq!(failures, vec!["Error: logs/huge.log: line too long"]);
    }
}
