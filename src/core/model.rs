// relaydash - core/model.rs
//
// Core data model types for the telemetry feeds. Pure data definitions
// with no I/O and no transport dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::core::dedup;
use crate::util::constants::{LOG_CACHE_HEADER, LOG_EVENT_HEADER};
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

// =============================================================================
// Severity
// =============================================================================

/// Tor runlevels carried on the wire as lowercase tags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Notice,
    Warn,
    Err,
}

impl Severity {
    /// Returns all variants in runlevel order.
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Debug,
            Severity::Info,
            Severity::Notice,
            Severity::Warn,
            Severity::Err,
        ]
    }

    /// Parse the wire tag. Unrecognised tags yield `None` and the
    /// surrounding record is treated as invalid.
    pub fn from_wire(tag: &str) -> Option<Severity> {
        match tag {
            "debug" => Some(Severity::Debug),
            "info" => Some(Severity::Info),
            "notice" => Some(Severity::Notice),
            "warn" => Some(Severity::Warn),
            "err" => Some(Severity::Err),
            _ => None,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Notice => "Notice",
            Severity::Warn => "Warn",
            Severity::Err => "Err",
        }
    }

    /// Fixed-width label for column-aligned console output.
    pub fn short_label(&self) -> &'static str {
        match self {
            Severity::Debug => "DBG",
            Severity::Info => "INF",
            Severity::Notice => "NOT",
            Severity::Warn => "WRN",
            Severity::Err => "ERR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Raw log record (wire shape)
// =============================================================================

/// Raw deserialised shape of one inbound log frame.
///
/// Every field is optional; validation is a separate, explicit step
/// (`validate`) rather than presence checks scattered through callers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLogRecord {
    /// Frame discriminator: single event or batched cache reply.
    pub header: Option<String>,

    /// Unix timestamp in seconds.
    pub time: Option<i64>,

    /// Severity tag (`debug` / `info` / `notice` / `warn` / `err`).
    #[serde(rename = "type")]
    pub runlevel: Option<String>,

    /// Free-text log message.
    pub message: Option<String>,

    /// Sub-records of a cache reply. Absent on single events.
    pub entries: Option<Vec<RawLogRecord>>,
}

impl RawLogRecord {
    /// True when the header marks this record as a batched cache reply.
    pub fn is_cache(&self) -> bool {
        self.header.as_deref() == Some(LOG_CACHE_HEADER)
    }

    /// Validate into a `LogEntry`.
    ///
    /// Returns `None` when any required field (header, time, type, message)
    /// is missing or the severity tag is unrecognised. Callers drop invalid
    /// records before they reach the group buffer.
    pub fn validate(self) -> Option<LogEntry> {
        let header = self.header?;
        let time = self.time?;
        let severity = Severity::from_wire(&self.runlevel?)?;
        let message = self.message?;

        Some(LogEntry::new(header, time, severity, message))
    }

    /// The validated sub-entries of a cache reply, in wire order, for bulk
    /// ingestion. Non-cache records yield an empty list.
    ///
    /// Cache sub-records carry no header of their own; they are stamped as
    /// single events. Invalid sub-records are dropped silently.
    pub fn cache_entries(self) -> Vec<LogEntry> {
        if !self.is_cache() {
            return Vec::new();
        }

        self.entries
            .unwrap_or_default()
            .into_iter()
            .filter_map(|mut raw| {
                raw.header.get_or_insert_with(|| LOG_EVENT_HEADER.to_string());
                raw.validate()
            })
            .collect()
    }
}

// =============================================================================
// Log entry
// =============================================================================

/// One validated log line, optionally owning entries folded into it as
/// duplicates.
///
/// `count` is the number of occurrences this entry represents including
/// itself: 0 while it has no duplicates, 2 after the first fold, then +1
/// per additional fold.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    header: String,
    time: i64,
    severity: Severity,
    message: String,
    readable_time: String,
    duplicates: Vec<LogEntry>,
    count: u32,
}

impl LogEntry {
    pub fn new(header: String, time: i64, severity: Severity, message: String) -> Self {
        let readable_time = readable_time(time);
        Self {
            header,
            time,
            severity,
            message,
            readable_time,
            duplicates: Vec::new(),
            count: 0,
        }
    }

    /// Parse and validate one raw frame. `None` on malformed JSON or
    /// missing required fields; the caller drops such frames.
    pub fn from_json(raw: &str) -> Option<LogEntry> {
        let record: RawLogRecord = match serde_json::from_str(raw) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(error = %e, "Received bad log entry");
                return None;
            }
        };
        record.validate()
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Local wall-clock time of the event, `HH:MM:SS`.
    pub fn readable_time(&self) -> &str {
        &self.readable_time
    }

    /// Number of occurrences this entry represents (0 = no duplicates).
    pub fn num_duplicates(&self) -> u32 {
        self.count
    }

    /// Entries folded into this one, oldest fold first.
    pub fn duplicates(&self) -> &[LogEntry] {
        &self.duplicates
    }

    /// Duplicate test: same severity AND (identical message, or both
    /// messages contain a common recurring phrase for that severity).
    ///
    /// The phrase table lives in `core::dedup`; matching is plain substring
    /// membership, first shared marker wins.
    pub fn is_duplicate_of(&self, other: &LogEntry) -> bool {
        if self.severity != other.severity {
            return false;
        }
        if self.message == other.message {
            return true;
        }

        dedup::common_messages(self.severity)
            .iter()
            .any(|marker| self.message.contains(marker) && other.message.contains(marker))
    }

    /// Fold `entry` into this one. The first fold sets the count to 2
    /// (owner + duplicate); later folds increment by one.
    pub fn add_duplicate(&mut self, entry: LogEntry) {
        self.duplicates.push(entry);
        if self.count == 0 {
            self.count = 2;
        } else {
            self.count += 1;
        }
    }

    /// Drop the most recently folded duplicate. No-op when there are none.
    pub fn remove_duplicate(&mut self) {
        if self.count > 0 {
            self.duplicates.pop();
            self.count -= 1;
        }
    }

    /// Detach and return all folded duplicates, resetting the count.
    /// Returns an empty list when there were none.
    pub fn pop_duplicates(&mut self) -> Vec<LogEntry> {
        if self.count == 0 {
            return Vec::new();
        }
        self.count = 0;
        std::mem::take(&mut self.duplicates)
    }

    /// Display-ready snapshot annotated with the current duplicate count.
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            time: self.time,
            readable_time: self.readable_time.clone(),
            severity: self.severity,
            message: self.message.clone(),
            count: self.count,
        }
    }
}

/// Derive the local `HH:MM:SS` display time from a unix timestamp.
fn readable_time(time: i64) -> String {
    match Local.timestamp_opt(time, 0).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

// =============================================================================
// Entry snapshot (display binding)
// =============================================================================

/// Flattened view of a log entry for direct display binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySnapshot {
    /// Unix timestamp in seconds.
    pub time: i64,
    /// Local wall-clock time, `HH:MM:SS`.
    pub readable_time: String,
    /// Severity runlevel.
    pub severity: Severity,
    /// Message text.
    pub message: String,
    /// Occurrences represented (0 = no duplicates folded in).
    pub count: u32,
}

// =============================================================================
// Bandwidth types
// =============================================================================

/// One bandwidth measurement: bytes read and written during the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BandwidthSample {
    pub read: u64,
    pub written: u64,
}

/// Aggregate bandwidth figures carried alongside live samples.
/// Fields the server does not report stay `None` and are skipped in display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct BandwidthStats {
    /// Bytes read during the last interval.
    pub read: u64,
    /// Bytes written during the last interval.
    pub written: u64,
    pub read_total: Option<u64>,
    pub write_total: Option<u64>,
    pub read_avg: Option<u64>,
    pub write_avg: Option<u64>,
    pub limit: Option<u64>,
    pub burst: Option<u64>,
    pub measured: Option<u64>,
    pub observed: Option<u64>,
}

// =============================================================================
// Relay info
// =============================================================================

/// Latest-value relay identity record from the info feed.
///
/// The defaults double as the fixed fallback used when an info frame
/// cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayInfo {
    pub version: String,
    pub nickname: String,
    pub fingerprint: String,
    pub status: Option<String>,
}

impl Default for RelayInfo {
    fn default() -> Self {
        Self {
            version: "Unknown".to_string(),
            nickname: "Unnamed".to_string(),
            fingerprint: "-".to_string(),
            status: None,
        }
    }
}

// =============================================================================
// Unit tests
// =============================================================================
