//! Access-log line parser.
//!
//! Lines are expected in the combined log format:
//!
//! ```text
//! 10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 512 "-" "Mozilla/5.0 ..."
//! ```
//!
//! A line either yields a fully populated [`LogRecord`] or a
//! [`LogscopeError::MalformedLine`]. Field-level defects that do not break the
//! grammar (a non-numeric response size) are absorbed with a warning.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::data::agent::classify;
use crate::data::record::{HttpMethod, LogRecord};
use crate::error::LogscopeError;
use crate::Result;

/// Timestamp layout inside the brackets, e.g. `10/Oct/2023:13:55:36 +0000`.
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(\S+) \S+ \S+ \[([^\]]*)\] "(\S*) (.*?) HTTP/[^"]*" (\d+) (\S*) "([^"]*)" "([^"]*)"$"#,
    )
    .expect("access log pattern is valid")
});

/// Parse one raw access-log line.
pub fn parse_line(line: &str) -> Result<LogRecord> {
    let caps = LINE_PATTERN
        .captures(line)
        .ok_or_else(|| LogscopeError::malformed(line))?;

    let timestamp = DateTime::parse_from_str(&caps[2], TIMESTAMP_FORMAT)
        .map_err(|_| LogscopeError::malformed(line))?;
    let status_code = caps[5]
        .parse::<u32>()
        .map_err(|_| LogscopeError::malformed(line))?;
    let agent_raw = caps[8].to_string();

    Ok(LogRecord {
        client_address: caps[1].to_string(),
        timestamp,
        method: HttpMethod::from_token(&caps[3]),
        path: caps[4].to_string(),
        status_code,
        response_size: parse_response_size(&caps[6]),
        referer: parse_referer(&caps[7]),
        agent: classify(&agent_raw),
        agent_raw,
    })
}

/// Normalize the response size field.
///
/// `-` and empty become 0, negative values clamp to 0, and anything that is
/// not a number is logged and treated as 0.
pub fn parse_response_size(token: &str) -> i64 {
    if token.is_empty() || token == "-" {
        return 0;
    }
    match token.parse::<i64>() {
        Ok(size) => size.max(0),
        Err(_) => {
            warn!(token, "invalid response size, using 0");
            0
        }
    }
}

fn parse_referer(token: &str) -> Option<String> {
    if token.is_empty() || token == "-" {
        None
    } else {
        Some(token.to_string())
    }
}
