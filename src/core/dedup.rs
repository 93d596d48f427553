// relaydash - core/dedup.rs
//
// Static table of recurring tor daemon log phrases, keyed by severity.
// Two log messages of the same severity are considered duplicates when
// they share any one of these marker substrings, even though the variable
// parts of the message (counts, addresses, timings) differ.
//
// The phrase list mirrors the messages tor is known to repeat at each
// runlevel; it is fixed at compile time and deliberately not configurable.

use crate::core::model::Severity;

/// Recurring debug-level phrases.
const DEBUG_MESSAGES: &[&str] = &[
    "connection_handle_write(): After TLS write of",
    "flush_chunk_tls(): flushed",
    "conn_read_callback(): socket",
    "conn_write_callback(): socket",
    "connection_remove(): removing socket",
    "connection_or_process_cells_from_inbuf():",
    "pending in tls object). at_most",
    "connection_read_to_buf(): TLS connection closed on read. Closing.",
];

/// Recurring info-level phrases.
const INFO_MESSAGES: &[&str] = &[
    "run_connection_housekeeping(): Expiring",
    "rep_hist_downrate_old_runs(): Discounting all old stability info by a factor of",
    "build time we have ever observed. Capping it to",
];

/// Recurring notice-level phrases.
const NOTICE_MESSAGES: &[&str] = &[
    "build time we have ever observed. Capping it to",
    "We will now assume a circuit is too slow to use after waiting",
    "We stalled too much while trying to write",
    "I learned some more directory information, but not enough to build a circuit",
    "Attempt by",
    "Loading relay descriptors.",
    "Average packaged cell fullness:",
    "Heartbeat: Tor's uptime is",
];

/// Recurring warn-level phrases.
const WARN_MESSAGES: &[&str] = &[
    "You specified a server",
    "I have no descriptor for the router named",
    "Controller gave us config lines that didn't validate",
    "Problem bootstrapping. Stuck at",
    "missing key,",
];

/// Ordered marker phrases for the given severity.
///
/// Severities without known recurring phrases (err) get an empty slice,
/// so their messages only fold on identical text.
pub fn common_messages(severity: Severity) -> &'static [&'static str] {
    match severity {
        Severity::Debug => DEBUG_MESSAGES,
        Severity::Info => INFO_MESSAGES,
        Severity::Notice => NOTICE_MESSAGES,
        Severity::Warn => WARN_MESSAGES,
        Severity::Err => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_runlevel_with_known_phrases_is_non_empty() {
        for severity in [
            Severity::Debug,
            Severity::Info,
            Severity::Notice,
            Severity::Warn,
        ] {
            assert!(
                !common_messages(severity).is_empty(),
                "{severity:?} should have marker phrases"
            );
        }
    }

    #[test]
    fn test_err_has_no_markers() {
        assert!(common_messages(Severity::Err).is_empty());
    }

    #[test]
    fn test_heartbeat_marker_present_at_notice() {
        assert!(common_messages(Severity::Notice)
            .iter()
            .any(|m| m.starts_with("Heartbeat:")));
    }
}
