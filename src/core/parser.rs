// relaydash - core/parser.rs
//
// Inbound frame decoding for the three telemetry feeds.
//
// Error policy (deliberate, mirrors the dashboard contract):
//   - log frames: malformed or incomplete entries are dropped silently
//     (logged at debug); the buffer only ever sees valid entries.
//   - bandwidth frames: malformed payloads are replaced by a fixed
//     zero-valued event record so the graph keeps ticking.
//   - info frames: malformed payloads are replaced by the fixed
//     placeholder identity record.

use crate::core::model::{
    BandwidthSample, BandwidthStats, LogEntry, RawLogRecord, RelayInfo,
};
use crate::util::constants::BW_CACHE_REPLY;
use serde::Deserialize;

// =============================================================================
// Log frames
// =============================================================================

/// A decoded log feed frame.
#[derive(Debug, Clone, PartialEq)]
pub enum LogFrame {
    /// One live event.
    Event(LogEntry),
    /// A cache snapshot: previously buffered entries in wire order.
    Cache(Vec<LogEntry>),
}

/// Decode one raw log frame.
///
/// Returns `None` for malformed JSON or an event missing required fields;
/// such frames never reach the group buffer. A cache reply whose
/// sub-records are all invalid still decodes (to an empty batch).
pub fn decode_log_frame(raw: &str) -> Option<LogFrame> {
    let record: RawLogRecord = match serde_json::from_str(raw) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(error = %e, "Received bad log entry");
            return None;
        }
    };

    if record.is_cache() {
        Some(LogFrame::Cache(record.cache_entries()))
    } else {
        record.validate().map(LogFrame::Event)
    }
}

// =============================================================================
// Bandwidth frames
// =============================================================================

/// Raw deserialised shape of one inbound bandwidth frame.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBandwidthRecord {
    reply: Option<String>,
    read: Option<u64>,
    written: Option<u64>,
    entries: Option<Vec<BandwidthSample>>,
    read_total: Option<u64>,
    write_total: Option<u64>,
    read_avg: Option<u64>,
    write_avg: Option<u64>,
    limit: Option<u64>,
    burst: Option<u64>,
    measured: Option<u64>,
    observed: Option<u64>,
}

/// A decoded bandwidth feed frame.
///
/// Both variants carry the aggregate stats block: live events report the
/// latest figures, and cache replies reuse whatever aggregates the frame
/// included (zeroes when absent).
#[derive(Debug, Clone, PartialEq)]
pub enum BandwidthFrame {
    /// One live sample.
    Event {
        sample: BandwidthSample,
        stats: BandwidthStats,
    },
    /// A cache snapshot of samples in wire order.
    Cache {
        samples: Vec<BandwidthSample>,
        stats: BandwidthStats,
    },
}

/// Decode one raw bandwidth frame.
///
/// Never fails: a malformed payload is replaced with the default record
/// (`reply: BW-EVENT, read: 0, written: 0`).
pub fn decode_bandwidth_frame(raw: &str) -> BandwidthFrame {
    let record: RawBandwidthRecord = match serde_json::from_str(raw) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(error = %e, "Received bad bandwidth frame; using defaults");
            RawBandwidthRecord::default()
        }
    };

    let stats = BandwidthStats {
        read: record.read.unwrap_or(0),
        written: record.written.unwrap_or(0),
        read_total: record.read_total,
        write_total: record.write_total,
        read_avg: record.read_avg,
        write_avg: record.write_avg,
        limit: record.limit,
        burst: record.burst,
        measured: record.measured,
        observed: record.observed,
    };

    if record.reply.as_deref() == Some(BW_CACHE_REPLY) {
        BandwidthFrame::Cache {
            samples: record.entries.unwrap_or_default(),
            stats,
        }
    } else {
        BandwidthFrame::Event {
            sample: BandwidthSample {
                read: stats.read,
                written: stats.written,
            },
            stats,
        }
    }
}

// =============================================================================
// Info frames
// =============================================================================

/// Decode one raw relay info frame.
///
/// Never fails: a malformed payload yields the fixed placeholder record
/// (`version: Unknown, nickname: Unnamed, fingerprint: -`).
pub fn decode_info_frame(raw: &str) -> RelayInfo {
    match serde_json::from_str(raw) {
        Ok(info) => info,
        Err(e) => {
            tracing::debug!(error = %e, "Received bad info frame; using defaults");
            RelayInfo::default()
        }
    }
}

// =============================================================================
// Unit tests
// =============================================================================
