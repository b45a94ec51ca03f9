//! Streaming statistics over parsed access-log records.
//!
//! [`Statistics`] is a single-pass accumulator: feed it records (or raw lines)
//! with [`Statistics::add`] / [`Statistics::add_line`], then take an
//! [`AnalysisReport`] with [`Statistics::snapshot`]. Only raw counters, sets
//! and maps are stored; every rate, average and share is derived at snapshot
//! time.
//!
//! Independent accumulators can be combined with [`Statistics::merge`] (or
//! `+=`), which sums counters, unions sets, widens the time range and adds up
//! the per-address and per-second maps.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::AddAssign;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info, warn};
use url::Url;

use crate::data::agent::{named_bot, NamedBot};
use crate::data::parser::parse_line;
use crate::data::record::LogRecord;
use crate::data::report::AnalysisReport;

/// Mutable accumulator state for one log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    total_entries: u64,
    malformed_lines: u64,
    total_traffic: u64,
    min_time: Option<DateTime<FixedOffset>>,
    max_time: Option<DateTime<FixedOffset>>,

    googlebot_count: u64,
    yandexbot_count: u64,

    existing_pages: HashSet<String>,
    not_found_pages: HashSet<String>,
    error_requests: u64,

    os_counts: HashMap<String, u64>,
    browser_counts: HashMap<String, u64>,

    human_visits: u64,
    unique_humans: HashSet<String>,
    /// Human visits keyed by client address
    visits_per_user: HashMap<String, u64>,
    /// Human visits keyed by UTC epoch second
    visits_per_second: HashMap<i64, u64>,

    referer_domains: HashSet<String>,
}

impl Statistics {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all state, as if freshly created.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of records accepted so far.
    pub fn total_entries(&self) -> u64 {
        self.total_entries
    }

    /// Number of lines rejected by the parser so far.
    pub fn malformed_lines(&self) -> u64 {
        self.malformed_lines
    }

    /// Add one parsed record.
    ///
    /// A record with a negative response size is skipped with a warning and
    /// leaves the state untouched.
    pub fn add(&mut self, record: &LogRecord) {
        if record.response_size < 0 {
            warn!(
                size = record.response_size,
                "skipping record with negative response size"
            );
            return;
        }

        self.total_entries += 1;
        self.total_traffic = self.total_traffic.saturating_add(record.response_size as u64);
        self.update_time_range(record.timestamp);
        self.count_agent(record);
        self.count_pages(record);
        if record.is_error() {
            self.error_requests += 1;
        }
        if record.is_human() {
            self.count_human_visit(record);
        }
        if let Some(referer) = &record.referer {
            if let Some(host) = referer_host(referer) {
                self.referer_domains.insert(host);
            }
        }
    }

    /// Parse a raw line and add it.
    ///
    /// Returns `false` and bumps the malformed-line counter when the line
    /// cannot be parsed.
    pub fn add_line(&mut self, line: &str) -> bool {
        match parse_line(line) {
            Ok(record) => {
                self.add(&record);
                true
            }
            Err(err) => {
                debug!(error = %err, "skipping line");
                self.malformed_lines += 1;
                false
            }
        }
    }

    /// Feed every line of a file and return the resulting report.
    ///
    /// Bad lines are counted and skipped; they never abort the batch. State
    /// is not reset first, callers analyzing independent files should call
    /// [`reset`](Self::reset) in between.
    pub fn analyze_file<I, S>(&mut self, name: &str, lines: I) -> AnalysisReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut processed = 0u64;
        let mut failed = 0u64;
        for line in lines {
            if self.add_line(line.as_ref()) {
                processed += 1;
            } else {
                failed += 1;
            }
        }
        info!(file = name, processed, failed, "analyzed log");

        self.snapshot().with_file_name(name)
    }

    /// Combine another accumulator into this one.
    pub fn merge(&mut self, other: Statistics) {
        self.total_entries += other.total_entries;
        self.malformed_lines += other.malformed_lines;
        self.total_traffic = self.total_traffic.saturating_add(other.total_traffic);
        if let Some(t) = other.min_time {
            self.update_time_range(t);
        }
        if let Some(t) = other.max_time {
            self.update_time_range(t);
        }

        self.googlebot_count += other.googlebot_count;
        self.yandexbot_count += other.yandexbot_count;

        self.existing_pages.extend(other.existing_pages);
        self.not_found_pages.extend(other.not_found_pages);
        self.error_requests += other.error_requests;

        merge_counts(&mut self.os_counts, other.os_counts);
        merge_counts(&mut self.browser_counts, other.browser_counts);

        self.human_visits += other.human_visits;
        self.unique_humans.extend(other.unique_humans);
        merge_counts(&mut self.visits_per_user, other.visits_per_user);
        merge_counts(&mut self.visits_per_second, other.visits_per_second);

        self.referer_domains.extend(other.referer_domains);
    }

    /// Build a report from the current state.
    pub fn snapshot(&self) -> AnalysisReport {
        let hours = self.hours_between();
        let total = self.total_entries;

        AnalysisReport {
            file_name: None,
            total_entries: total,
            malformed_lines: self.malformed_lines,

            googlebot_count: self.googlebot_count,
            googlebot_percentage: percentage(self.googlebot_count, total),
            yandexbot_count: self.yandexbot_count,
            yandexbot_percentage: percentage(self.yandexbot_count, total),
            bot_requests: total - self.human_visits,
            human_visits: self.human_visits,
            human_visit_percentage: percentage(self.human_visits, total),

            total_traffic: self.total_traffic,
            traffic_rate: per_hour(self.total_traffic, hours),
            first_request: self.min_time,
            last_request: self.max_time,
            time_range_hours: hours,

            avg_visits_per_hour: per_hour(self.human_visits, hours),
            avg_error_requests_per_hour: per_hour(self.error_requests, hours),
            avg_visits_per_user: self.avg_visits_per_user(),
            unique_human_users: self.unique_humans.len() as u64,

            error_requests: self.error_requests,
            error_rate: percentage(self.error_requests, total),

            existing_pages: self.existing_pages.iter().cloned().collect(),
            not_found_pages: self.not_found_pages.iter().cloned().collect(),

            peak_visits_per_second: self.visits_per_second.values().copied().max().unwrap_or(0),
            max_visits_per_user: self.visits_per_user.values().copied().max().unwrap_or(0),

            referer_domains: self.referer_domains.iter().cloned().collect(),

            os_counts: self.os_counts.clone().into_iter().collect(),
            browser_counts: self.browser_counts.clone().into_iter().collect(),
            os_statistics: shares(&self.os_counts, total),
            browser_statistics: shares(&self.browser_counts, total),
        }
    }

    fn update_time_range(&mut self, time: DateTime<FixedOffset>) {
        match (self.min_time, self.max_time) {
            (Some(min), Some(max)) => {
                if time < min {
                    self.min_time = Some(time);
                }
                if time > max {
                    self.max_time = Some(time);
                }
            }
            _ => {
                self.min_time = Some(time);
                self.max_time = Some(time);
            }
        }
    }

    fn count_agent(&mut self, record: &LogRecord) {
        match named_bot(&record.agent_raw) {
            Some(NamedBot::Googlebot) => self.googlebot_count += 1,
            Some(NamedBot::YandexBot) => self.yandexbot_count += 1,
            None => {}
        }
        *self
            .os_counts
            .entry(record.agent.os_family.clone())
            .or_insert(0) += 1;
        *self
            .browser_counts
            .entry(record.agent.browser_family.clone())
            .or_insert(0) += 1;
    }

    fn count_pages(&mut self, record: &LogRecord) {
        match record.status_code {
            200 => {
                self.existing_pages.insert(record.path.clone());
            }
            404 => {
                self.not_found_pages.insert(record.path.clone());
            }
            _ => {}
        }
    }

    fn count_human_visit(&mut self, record: &LogRecord) {
        self.human_visits += 1;
        self.unique_humans.insert(record.client_address.clone());
        *self
            .visits_per_user
            .entry(record.client_address.clone())
            .or_insert(0) += 1;
        *self
            .visits_per_second
            .entry(record.timestamp.timestamp())
            .or_insert(0) += 1;
    }

    /// Whole hours between the earliest and latest record, 0 when empty.
    fn hours_between(&self) -> i64 {
        match (self.min_time, self.max_time) {
            (Some(min), Some(max)) => {
                let (start, end) = if min <= max { (min, max) } else { (max, min) };
                (end - start).num_hours()
            }
            _ => 0,
        }
    }

    fn avg_visits_per_user(&self) -> f64 {
        if self.human_visits == 0 || self.unique_humans.is_empty() {
            0.0
        } else {
            self.human_visits as f64 / self.unique_humans.len() as f64
        }
    }
}

impl AddAssign for Statistics {
    fn add_assign(&mut self, other: Self) {
        self.merge(other);
    }
}

impl std::ops::Add for Statistics {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }
}

/// Host of a referer URL.
///
/// Hosts come back normalized by the URL parser: lowercased, and
/// internationalized names in their punycode form.
///
/// Relative references carry no host and are ignored quietly; anything the
/// URL parser rejects otherwise is logged.
fn referer_host(referer: &str) -> Option<String> {
    match Url::parse(referer) {
        Ok(url) => url
            .host_str()
            .filter(|host| !host.is_empty())
            .map(str::to_string),
        Err(url::ParseError::RelativeUrlWithoutBase) => None,
        Err(err) => {
            warn!(referer, error = %err, "invalid referer");
            None
        }
    }
}

/// Count per hour, falling back to the raw count for spans under an hour.
fn per_hour(count: u64, hours: i64) -> f64 {
    if hours <= 0 {
        count as f64
    } else {
        count as f64 / hours as f64
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn shares(counts: &HashMap<String, u64>, total: u64) -> BTreeMap<String, f64> {
    if total == 0 {
        return BTreeMap::new();
    }
    counts
        .iter()
        .map(|(family, count)| (family.clone(), *count as f64 / total as f64))
        .collect()
}

fn merge_counts<K>(into: &mut HashMap<K, u64>, from: HashMap<K, u64>)
where
    K: std::hash::Hash + Eq,
{
    for (key, count) in from {
        *into.entry(key).or_insert(0) += count;
    }
}
