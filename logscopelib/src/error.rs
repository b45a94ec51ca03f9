//! Error types for logscopelib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading and analyzing access logs
#[derive(Error, Debug)]
pub enum LogscopeError {
    /// A line does not match the access-log grammar, or its timestamp is invalid
    #[error("malformed log line: {line}")]
    MalformedLine { line: String },

    /// A line exceeds the configured maximum length
    #[error(
        "file '{path}' contains a line of {length} characters at line {line_number} (maximum is {max})"
    )]
    LineTooLong {
        path: PathBuf,
        line_number: usize,
        length: usize,
        max: usize,
    },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Path points to a directory where a file was expected
    #[error("path is a directory, not a file: {0}")]
    NotAFile(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogscopeError {
    pub(crate) fn malformed(line: &str) -> Self {
        LogscopeError::MalformedLine {
            line: line.to_string(),
        }
    }
}
