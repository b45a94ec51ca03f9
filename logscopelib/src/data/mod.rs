//! Data collection: parse lines and accumulate statistics.
//!
//! This module handles the second stage of the pipeline - turning raw log
//! lines into typed records and folding them into per-file statistics. It
//! provides:
//!
//! - **Classification**: user-agent rules (`classify`, `named_bot`)
//! - **Parsing**: the access-log line grammar (`parse_line`)
//! - **Statistics**: the accumulator and its report (`Statistics`, `AnalysisReport`)
//! - **Analysis**: high-level API over files (`analyze_path`, `analyze_paths`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use logscopelib::data::{parse_line, Statistics};
//!
//! let mut stats = Statistics::new();
//! stats.add(&parse_line(line)?);
//! println!("{} requests", stats.snapshot().total_entries);
//! ```

pub mod agent;
pub mod analyzer;
pub mod parser;
pub mod record;
pub mod report;
pub mod stats;

pub use agent::{classify, named_bot, AgentInfo, NamedBot};
pub use analyzer::{analyze_path, analyze_paths, AnalyzeOptions, AnalyzeResult, FileOutcome};
pub use parser::{parse_line, parse_response_size};
pub use record::{HttpMethod, LogRecord};
pub use report::AnalysisReport;
pub use stats::Statistics;
