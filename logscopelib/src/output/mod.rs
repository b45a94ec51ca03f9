//! Output formatting: present reports as tables.
//!
//! This module handles the final stage of the pipeline - formatting an
//! [`AnalysisReport`](crate::AnalysisReport) for display. It provides:
//!
//! - **ReportTable**: Titled sections of label/value rows
//! - **format_bytes**: Human-readable byte counts
//!
//! ReportTable is a pure presentation layer - it only formats data into
//! strings. Drawing the table is left to the caller.
//!
//! ## Example
//!
//! ```rust,ignore
//! use logscopelib::output::ReportTable;
//!
//! let table = ReportTable::from_report(&report);
//! // table.title: "Results for access.log"
//! // table.sections[0]: ReportSection { title: "Overview", rows: [...] }
//! ```

pub mod table;

pub use table::{format_byte_rate, format_bytes, ReportSection, ReportTable, TableRow};
