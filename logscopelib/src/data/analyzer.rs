//! High-level analysis API.
//!
//! Entry points that read log files from disk and run them through
//! [`Statistics`]. Each file is analyzed independently: state is reset
//! between files so no report carries data from another.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::report::AnalysisReport;
use crate::data::stats::Statistics;
use crate::source::filter::{discover_files, FilterConfig};
use crate::source::reader::{read_lines, MAX_LINE_LENGTH};
use crate::Result;

/// Options for analyzing log files.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Longest accepted line, in characters
    pub max_line_length: usize,
    /// Filter applied when a directory is expanded into files
    pub file_filter: FilterConfig,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_line_length: MAX_LINE_LENGTH,
            file_filter: FilterConfig::default(),
        }
    }
}

impl AnalyzeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum line length.
    pub fn max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.file_filter = filter;
        self
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The file was read and analyzed
    Analyzed { path: PathBuf, report: AnalysisReport },
    /// The file could not be read (missing, too-long line, I/O error)
    Failed { path: PathBuf, error: String },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Analyzed { path, .. } | FileOutcome::Failed { path, .. } => path,
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            FileOutcome::Analyzed { report, .. } => Some(report),
            FileOutcome::Failed { .. } => None,
        }
    }
}

/// Result of analyzing several inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResult {
    /// One entry per file, in input order
    pub files: Vec<FileOutcome>,
}

impl AnalyzeResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports of the files that were analyzed.
    pub fn reports(&self) -> impl Iterator<Item = &AnalysisReport> {
        self.files.iter().filter_map(FileOutcome::report)
    }

    /// Number of files that could not be analyzed.
    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f, FileOutcome::Failed { .. }))
            .count()
    }
}

/// Analyze a single log file.
///
/// # Example
///
/// ```rust,ignore
/// use logscopelib::{analyze_path, AnalyzeOptions};
///
/// let report = analyze_path("/var/log/nginx/access.log", &AnalyzeOptions::new())?;
/// println!("{} requests, {} from Googlebot", report.total_entries, report.googlebot_count);
/// ```
pub fn analyze_path(path: impl AsRef<Path>, options: &AnalyzeOptions) -> Result<AnalysisReport> {
    let mut stats = Statistics::new();
    analyze_into(&mut stats, path.as_ref(), options)
}

/// Analyze several inputs, each file on its own.
///
/// Directories are expanded with the configured filter. A file that cannot
/// be read is recorded as [`FileOutcome::Failed`] and the remaining files
/// are still analyzed.
pub fn analyze_paths<P: AsRef<Path>>(inputs: &[P], options: &AnalyzeOptions) -> AnalyzeResult {
    let mut result = AnalyzeResult::new();
    let mut stats = Statistics::new();

    for input in inputs {
        let input = input.as_ref();
        let files = if input.is_dir() {
            match discover_files(input, &options.file_filter) {
                Ok(files) => files,
                Err(err) => {
                    result.files.push(failed(input, &err));
                    continue;
                }
            }
        } else {
            vec![input.to_path_buf()]
        };

        for path in files {
            let outcome = match analyze_into(&mut stats, &path, options) {
                Ok(report) => FileOutcome::Analyzed { path, report },
                Err(err) => failed(&path, &err),
            };
            result.files.push(outcome);
            stats.reset();
        }
    }

    result
}

fn analyze_into(
    stats: &mut Statistics,
    path: &Path,
    options: &AnalyzeOptions,
) -> Result<AnalysisReport> {
    let lines = read_lines(path, options.max_line_length)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(stats.analyze_file(&name, &lines))
}

fn failed(path: &Path, err: &crate::LogscopeError) -> FileOutcome {
    debug!(path = %path.display(), error = %err, "skipping file");
    FileOutcome::Failed {
        path: path.to_path_buf(),
        error: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HUMAN: &str = r#"10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 512 "https://example.com/" "Mozilla/5.0 (Windows NT 10.0; rv:50.0) Gecko/20100101 Firefox/50.0""#;
    const BOT: &str = r#"66.249.66.1 - - [10/Oct/2023:14:55:36 +0000] "GET /robots.txt HTTP/1.1" 404 - "-" "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)""#;

    fn write_log(path: &Path, lines: &[&str]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, lines.join("\n")).unwrap();
    }

    #[test]
    fn test_analyze_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("access.log");
        write_log(&path, &[HUMAN, BOT, "broken"]);

        let report = analyze_path(&path, &AnalyzeOptions::new()).unwrap();

        assert_eq!(report.file_name.as_deref(), Some("access.log"));
        assert_eq!(report.total_entries, 2);
        assert_eq!(report.malformed_lines, 1);
        assert_eq!(report.googlebot_count, 1);
        assert_eq!(report.traffic_rate, 512.0);
        assert!(report.referer_domains.contains("example.com"));
    }

    #[test]
    fn test_analyze_path_line_too_long() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("access.log");
        write_log(&path, &[HUMAN, BOT]);

        let options = AnalyzeOptions::new().max_line_length(80);
        let err = analyze_path(&path, &options).unwrap_err();

        assert!(matches!(
            err,
            crate::LogscopeError::LineTooLong { line_number: 1, .. }
        ));
    }

    #[test]
    fn test_analyze_paths_resets_between_files() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a.log");
        let b = temp.path().join("b.log");
        write_log(&a, &[HUMAN, HUMAN, BOT]);
        write_log(&b, &[BOT]);

        let result = analyze_paths(&[&a, &b], &AnalyzeOptions::new());

        let reports: Vec<_> = result.reports().collect();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].total_entries, 3);
        assert_eq!(reports[1].total_entries, 1);
        assert_eq!(reports[1].human_visits, 0);
        assert_eq!(result.failed_count(), 0);
    }

    #[test]
    fn test_analyze_paths_continues_after_failure() {
        let temp = tempdir().unwrap();
        let good = temp.path().join("good.log");
        write_log(&good, &[HUMAN]);
        let missing = temp.path().join("missing.log");

        let result = analyze_paths(&[&missing, &good], &AnalyzeOptions::new());

        assert_eq!(result.files.len(), 2);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.files[0].path(), missing.as_path());
        assert!(result.files[0].report().is_none());
        assert_eq!(result.files[1].report().unwrap().total_entries, 1);
    }

    #[test]
    fn test_analyze_paths_expands_directories() {
        let temp = tempdir().unwrap();
        write_log(&temp.path().join("logs/access.log"), &[HUMAN]);
        write_log(&temp.path().join("logs/access.log.1"), &[HUMAN, BOT]);
        write_log(&temp.path().join("logs/notes.txt"), &["hello"]);

        let result = analyze_paths(&[temp.path().join("logs")], &AnalyzeOptions::new());

        let totals: Vec<u64> = result.reports().map(|r| r.total_entries).collect();
        assert_eq!(totals, vec![1, 2]);
    }

    #[test]
    fn test_analyze_paths_with_exclude_filter() {
        let temp = tempdir().unwrap();
        write_log(&temp.path().join("logs/access.log"), &[HUMAN]);
        write_log(&temp.path().join("logs/access.log.1"), &[HUMAN, BOT]);

        let filter = FilterConfig::new().exclude("**/*.log.1").unwrap();
        let options = AnalyzeOptions::new().filter(filter);
        let result = analyze_paths(&[temp.path().join("logs")], &options);

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path().ends_with("access.log"));
    }
}
