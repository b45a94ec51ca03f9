//! Source discovery: find and read log files.
//!
//! This module handles the first stage of the pipeline - deciding which
//! files to analyze and reading their lines. It provides:
//!
//! - **File filtering**: Include/exclude files with glob patterns
//! - **Line reading**: Bounded line reading (`read_lines`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use logscopelib::source::{discover_files, read_lines, FilterConfig, MAX_LINE_LENGTH};
//!
//! let filter = FilterConfig::new().exclude("**/archive/**")?;
//! for path in discover_files("/var/log/nginx", &filter)? {
//!     let lines = read_lines(&path, MAX_LINE_LENGTH)?;
//! }
//! ```

pub mod filter;
pub mod reader;

pub use filter::{discover_files, FilterConfig};
pub use reader::{read_lines, validate_file, MAX_LINE_LENGTH};
