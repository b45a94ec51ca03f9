//! Analysis report: an immutable snapshot of accumulated statistics.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Everything we report about one analyzed log.
///
/// Built by [`Statistics::snapshot`](crate::Statistics::snapshot). All derived
/// values (rates, averages, shares) are computed once at construction time;
/// sets and maps are sorted so two snapshots of the same state compare equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Name of the analyzed file, when produced by `analyze_file`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Number of records accepted into the statistics
    pub total_entries: u64,
    /// Lines that did not match the access-log grammar
    pub malformed_lines: u64,

    /// Requests whose agent mentions Googlebot
    pub googlebot_count: u64,
    /// Share of all entries attributed to Googlebot, in percent
    pub googlebot_percentage: f64,
    /// Requests whose agent mentions YandexBot
    pub yandexbot_count: u64,
    /// Share of all entries attributed to YandexBot, in percent
    pub yandexbot_percentage: f64,
    /// Requests classified as bots
    pub bot_requests: u64,
    /// Requests classified as human visits
    pub human_visits: u64,
    /// Share of all entries that are human visits, in percent
    pub human_visit_percentage: f64,

    /// Sum of response sizes in bytes
    pub total_traffic: u64,
    /// Average bytes per hour over the observed time range
    pub traffic_rate: f64,
    /// Earliest request time
    pub first_request: Option<DateTime<FixedOffset>>,
    /// Latest request time
    pub last_request: Option<DateTime<FixedOffset>>,
    /// Whole hours between the first and last request
    pub time_range_hours: i64,

    pub avg_visits_per_hour: f64,
    pub avg_error_requests_per_hour: f64,
    pub avg_visits_per_user: f64,
    pub unique_human_users: u64,

    /// Requests with a 4xx or 5xx status
    pub error_requests: u64,
    /// Share of all entries that are errors, in percent
    pub error_rate: f64,

    /// Paths answered with 200
    pub existing_pages: BTreeSet<String>,
    /// Paths answered with 404
    pub not_found_pages: BTreeSet<String>,

    /// Highest number of human visits within one second
    pub peak_visits_per_second: u64,
    /// Highest number of visits from one human address
    pub max_visits_per_user: u64,

    /// Host names seen in referers, lowercased as the URL parser normalizes them
    pub referer_domains: BTreeSet<String>,

    pub os_counts: BTreeMap<String, u64>,
    pub browser_counts: BTreeMap<String, u64>,
    /// OS family share of all entries (0..=1)
    pub os_statistics: BTreeMap<String, f64>,
    /// Browser family share of all entries (0..=1)
    pub browser_statistics: BTreeMap<String, f64>,
}

impl AnalysisReport {
    /// Whether any record was accepted.
    pub fn is_empty(&self) -> bool {
        self.total_entries == 0
    }

    /// Tag the report with the name of the file it describes.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}
