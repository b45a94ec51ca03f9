//! Structured access-log records.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::data::agent::AgentInfo;

/// HTTP request method.
///
/// Unknown or empty method tokens map to [`HttpMethod::Unknown`] rather than
/// failing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Connect,
    Trace,
    Unknown,
}

impl HttpMethod {
    /// Parse a method token, case-insensitively.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            "PATCH" => HttpMethod::Patch,
            "CONNECT" => HttpMethod::Connect,
            "TRACE" => HttpMethod::Trace,
            _ => HttpMethod::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed access-log entry.
///
/// Records produced by [`parse_line`](crate::parse_line) always have a
/// non-negative `response_size`. The field is signed so that records built
/// elsewhere can still be guarded against by the accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Client address token, not validated
    pub client_address: String,
    /// Request time with the UTC offset written in the log
    pub timestamp: DateTime<FixedOffset>,
    /// Request method
    pub method: HttpMethod,
    /// Raw request target
    pub path: String,
    /// HTTP status code
    pub status_code: u32,
    /// Response body size in bytes
    pub response_size: i64,
    /// Referer, absent when logged as `-`
    pub referer: Option<String>,
    /// Verbatim user-agent field
    pub agent_raw: String,
    /// Classification of `agent_raw`
    pub agent: AgentInfo,
}

impl LogRecord {
    /// Whether the status code is a client or server error (400..=599).
    pub fn is_error(&self) -> bool {
        (400..=599).contains(&self.status_code)
    }

    /// Whether the request came from a human visitor rather than a bot.
    pub fn is_human(&self) -> bool {
        !self.agent.is_bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_from_token() {
        assert_eq!(HttpMethod::from_token("GET"), HttpMethod::Get);
        assert_eq!(HttpMethod::from_token("post"), HttpMethod::Post);
        assert_eq!(HttpMethod::from_token("Trace"), HttpMethod::Trace);
        assert_eq!(HttpMethod::from_token("PROPFIND"), HttpMethod::Unknown);
        assert_eq!(HttpMethod::from_token(""), HttpMethod::Unknown);
    }

    #[test]
    fn method_display() {
        assert_eq!(HttpMethod::Options.to_string(), "OPTIONS");
        assert_eq!("delete".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
    }
}
