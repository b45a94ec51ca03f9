//! Client agent classification.
//!
//! Maps a free-form user-agent string to a bot flag, an OS family and a
//! browser family using case-insensitive substring tables. Each table is
//! evaluated in order and the first matching rule wins, so the order of the
//! entries is part of the behavior: an Android agent usually also carries a
//! `Linux` token and resolves to Linux.

use serde::{Deserialize, Serialize};

/// OS family reported when no rule matches.
pub const UNKNOWN_OS: &str = "Unknown";

/// Browser family reported when no rule matches.
pub const OTHER_BROWSER: &str = "Other";

/// Substrings that mark an agent as automated.
const BOT_MARKERS: &[&str] = &[
    "bot",
    "googlebot",
    "yandexbot",
    "crawler",
    "spider",
    "indexer",
    "scraper",
];

/// A classification rule over a lowercased agent string.
struct Rule {
    label: &'static str,
    matches: fn(&str) -> bool,
}

const OS_RULES: &[Rule] = &[
    Rule {
        label: "Windows",
        matches: |ua| ua.contains("windows"),
    },
    Rule {
        label: "macOS",
        matches: |ua| ua.contains("mac"),
    },
    Rule {
        label: "Linux",
        matches: |ua| ua.contains("linux"),
    },
    Rule {
        label: "Android",
        matches: |ua| ua.contains("android"),
    },
    Rule {
        label: "iOS",
        matches: |ua| ua.contains("ios"),
    },
];

const BROWSER_RULES: &[Rule] = &[
    Rule {
        label: "Edge",
        matches: |ua| ua.contains("edg/") || ua.contains("edge/"),
    },
    Rule {
        label: "Firefox",
        matches: |ua| ua.contains("firefox"),
    },
    Rule {
        label: "Chrome",
        matches: |ua| ua.contains("chrome") && !ua.contains("chromium"),
    },
    Rule {
        label: "Safari",
        matches: |ua| ua.contains("safari") && !ua.contains("chrome"),
    },
    Rule {
        label: "Opera",
        matches: |ua| ua.contains("opera") || ua.contains("opr/"),
    },
];

fn first_match(rules: &[Rule], ua: &str, fallback: &'static str) -> &'static str {
    rules
        .iter()
        .find(|rule| (rule.matches)(ua))
        .map(|rule| rule.label)
        .unwrap_or(fallback)
}

/// What we know about the client that sent a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Whether the agent looks like a crawler, indexer or other bot
    pub is_bot: bool,
    /// Operating system family (e.g. "Windows", "Linux", "Unknown")
    pub os_family: String,
    /// Browser family (e.g. "Firefox", "Chrome", "Other")
    pub browser_family: String,
}

impl Default for AgentInfo {
    fn default() -> Self {
        Self {
            is_bot: false,
            os_family: UNKNOWN_OS.to_string(),
            browser_family: OTHER_BROWSER.to_string(),
        }
    }
}

/// Classify a raw user-agent string. Never fails.
pub fn classify(agent_raw: &str) -> AgentInfo {
    if agent_raw.is_empty() {
        return AgentInfo::default();
    }

    let ua = agent_raw.to_lowercase();
    AgentInfo {
        is_bot: BOT_MARKERS.iter().any(|marker| ua.contains(marker)),
        os_family: first_match(OS_RULES, &ua, UNKNOWN_OS).to_string(),
        browser_family: first_match(BROWSER_RULES, &ua, OTHER_BROWSER).to_string(),
    }
}

/// Search-engine crawlers that get their own counters in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedBot {
    Googlebot,
    YandexBot,
}

impl NamedBot {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamedBot::Googlebot => "Googlebot",
            NamedBot::YandexBot => "YandexBot",
        }
    }
}

/// Detect a named crawler in the raw agent string.
///
/// This is independent of [`AgentInfo::is_bot`]. Googlebot takes
/// precedence when an agent mentions both crawlers.
pub fn named_bot(agent_raw: &str) -> Option<NamedBot> {
    let ua = agent_raw.to_lowercase();
    if ua.contains("googlebot") {
        Some(NamedBot::Googlebot)
    } else if ua.contains("yandexbot") {
        Some(NamedBot::YandexBot)
    } else {
        None
    }
}
