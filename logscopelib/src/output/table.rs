//! Presentation-ready report data.
//!
//! `ReportTable` turns an [`AnalysisReport`] into titled sections of
//! label/value rows with every number already formatted. It holds no logic
//! beyond formatting; the CLI decides how to draw it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::report::AnalysisReport;

/// How many paths or domains a list section shows before summarizing.
pub const LIST_LIMIT: usize = 10;

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;

/// A single label/value line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,
    pub value: String,
}

impl TableRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A titled group of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub rows: Vec<TableRow>,
}

impl ReportSection {
    fn new(title: &str, rows: Vec<TableRow>) -> Self {
        Self {
            title: title.to_string(),
            rows,
        }
    }
}

/// Table-ready report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    /// e.g. "Results for access.log"
    pub title: String,
    pub sections: Vec<ReportSection>,
}

impl ReportTable {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let title = match &report.file_name {
            Some(name) => format!("Results for {}", name),
            None => "Results".to_string(),
        };

        let overview = ReportSection::new(
            "Overview",
            vec![
                TableRow::new("Entries", report.total_entries.to_string()),
                TableRow::new("Malformed lines", report.malformed_lines.to_string()),
                TableRow::new("First request", format_time(report.first_request)),
                TableRow::new("Last request", format_time(report.last_request)),
                TableRow::new("Time range", format!("{} h", report.time_range_hours)),
            ],
        );

        let bots = ReportSection::new(
            "Bots",
            vec![
                TableRow::new(
                    "Googlebot",
                    count_with_share(report.googlebot_count, report.googlebot_percentage),
                ),
                TableRow::new(
                    "YandexBot",
                    count_with_share(report.yandexbot_count, report.yandexbot_percentage),
                ),
                TableRow::new(
                    "All bots",
                    count_with_share(
                        report.bot_requests,
                        100.0 - report.human_visit_percentage,
                    ),
                ),
                TableRow::new(
                    "Humans",
                    count_with_share(report.human_visits, report.human_visit_percentage),
                ),
            ],
        );

        let traffic = ReportSection::new(
            "Traffic",
            vec![
                TableRow::new("Total", format_bytes(report.total_traffic)),
                TableRow::new("Per hour", format_byte_rate(report.traffic_rate)),
            ],
        );

        let visitors = ReportSection::new(
            "Visitors",
            vec![
                TableRow::new("Unique users", report.unique_human_users.to_string()),
                TableRow::new("Visits per hour", format!("{:.2}", report.avg_visits_per_hour)),
                TableRow::new("Visits per user", format!("{:.2}", report.avg_visits_per_user)),
                TableRow::new("Peak visits per second", report.peak_visits_per_second.to_string()),
                TableRow::new("Most visits by one user", report.max_visits_per_user.to_string()),
            ],
        );

        let errors = ReportSection::new(
            "Errors",
            vec![
                TableRow::new(
                    "Error responses",
                    count_with_share(report.error_requests, report.error_rate),
                ),
                TableRow::new(
                    "Errors per hour",
                    format!("{:.2}", report.avg_error_requests_per_hour),
                ),
            ],
        );

        let mut sections = vec![overview, bots, traffic, visitors, errors];
        sections.push(list_section("Existing pages (200)", &report.existing_pages));
        sections.push(list_section("Missing pages (404)", &report.not_found_pages));
        sections.push(list_section("Referring domains", &report.referer_domains));
        sections.push(share_section("Operating systems", &report.os_statistics));
        sections.push(share_section("Browsers", &report.browser_statistics));

        ReportTable { title, sections }
    }
}

/// Format a byte count: plain bytes below 1 KB, two decimals above.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        scaled(bytes as f64)
    }
}

/// Format a bytes-per-hour rate.
pub fn format_byte_rate(bytes_per_hour: f64) -> String {
    if bytes_per_hour < KB {
        format!("{:.0} B/h", bytes_per_hour)
    } else {
        format!("{}/h", scaled(bytes_per_hour))
    }
}

fn scaled(bytes: f64) -> String {
    if bytes < MB {
        format!("{:.2} KB", bytes / KB)
    } else if bytes < GB {
        format!("{:.2} MB", bytes / MB)
    } else {
        format!("{:.2} GB", bytes / GB)
    }
}

fn count_with_share(count: u64, percentage: f64) -> String {
    format!("{} ({:.2}%)", count, percentage)
}

fn format_time(time: Option<chrono::DateTime<chrono::FixedOffset>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S %z").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn list_section(title: &str, items: &BTreeSet<String>) -> ReportSection {
    let mut rows = vec![TableRow::new("Count", items.len().to_string())];
    rows.extend(items.iter().take(LIST_LIMIT).map(|item| TableRow::new("", item.clone())));
    if items.len() > LIST_LIMIT {
        rows.push(TableRow::new(
            "",
            format!("... and {} more", items.len() - LIST_LIMIT),
        ));
    }
    ReportSection::new(title, rows)
}

/// Families sorted by share, largest first.
fn share_section(title: &str, shares: &BTreeMap<String, f64>) -> ReportSection {
    let mut entries: Vec<(&String, &f64)> = shares.iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let rows = entries
        .into_iter()
        .map(|(family, share)| TableRow::new(family.clone(), format!("{:.2}%", share * 100.0)))
        .collect();
    ReportSection::new(title, rows)
}
