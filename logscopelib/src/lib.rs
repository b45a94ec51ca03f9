//! # logscopelib
//!
//! An access-log analysis library that parses combined-format web server
//! logs and reports traffic, bot and visitor statistics.
//!
//! ## Overview
//!
//! Each line of a log is parsed into a [`LogRecord`], its user-agent is
//! classified, and the record is folded into a [`Statistics`] accumulator.
//! A snapshot of the accumulator is an [`AnalysisReport`]:
//!
//! - **Bots**: Googlebot and YandexBot counts and shares
//! - **Traffic**: Total bytes served and bytes per hour
//! - **Visitors**: Human visits per hour, per user, peak per second
//! - **Errors**: 4xx/5xx responses and their rate
//! - **Pages**: Paths answered with 200 and with 404
//! - **Clients**: Referring domains, OS and browser shares
//!
//! ## Pipeline
//!
//! - [`source`]: find log files and read their lines
//! - [`data`]: parse, classify and accumulate
//! - [`output`]: format a report for display
//!
//! Lines that do not match the grammar are counted as malformed and
//! skipped. A line longer than the configured maximum aborts that file.
//!
//! ## Example
//!
//! ```rust
//! use logscopelib::{analyze_path, parse_line, AnalyzeOptions, Statistics};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let line = r#"10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 512 "-" "Mozilla/5.0 (Windows NT 10.0) Chrome/118.0""#;
//!
//! // Accumulate records directly
//! let mut stats = Statistics::new();
//! stats.add(&parse_line(line).unwrap());
//! assert_eq!(stats.snapshot().human_visits, 1);
//!
//! // Or analyze a file
//! let dir = tempdir().unwrap();
//! let path = dir.path().join("access.log");
//! fs::write(&path, format!("{}\nnot a log line\n", line)).unwrap();
//!
//! let report = analyze_path(&path, &AnalyzeOptions::new()).unwrap();
//! assert_eq!(report.total_entries, 1);
//! assert_eq!(report.malformed_lines, 1);
//! ```

pub mod data;
pub mod error;
pub mod output;
pub mod source;

#[cfg(test)]
mod test_support;

pub use data::{
    analyze_path, analyze_paths, classify, named_bot, parse_line, AgentInfo, AnalysisReport,
    AnalyzeOptions, AnalyzeResult, FileOutcome, HttpMethod, LogRecord, NamedBot, Statistics,
};
pub use error::LogscopeError;
pub use output::{format_bytes, ReportTable};
pub use source::{discover_files, read_lines, FilterConfig, MAX_LINE_LENGTH};

/// Result type for logscopelib operations
pub type Result<T> = std::result::Result<T, LogscopeError>;
