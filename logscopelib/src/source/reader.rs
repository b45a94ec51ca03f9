//! Line-oriented log reading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::LogscopeError;
use crate::Result;

/// Longest line accepted by default, in characters.
pub const MAX_LINE_LENGTH: usize = 1024;

/// Check that `path` exists and is a regular file.
pub fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(LogscopeError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(LogscopeError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

/// Read all lines of a log file.
///
/// Fails with [`LogscopeError::LineTooLong`] as soon as a line longer than
/// `max_line_length` characters is seen; the parser never receives such
/// lines. Invalid UTF-8 is replaced rather than rejected.
pub fn read_lines(path: impl AsRef<Path>, max_line_length: usize) -> Result<Vec<String>> {
    let path = path.as_ref();
    validate_file(path)?;

    let file = File::open(path).map_err(|source| LogscopeError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| LogscopeError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        let length = line.chars().count();
        if length > max_line_length {
            return Err(LogscopeError::LineTooLong {
                path: path.to_path_buf(),
                line_number: lines.len() + 1,
                length,
                max: max_line_length,
            });
        }
        lines.push(line.to_string());
    }

    Ok(lines)
}
