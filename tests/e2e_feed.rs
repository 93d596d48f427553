// relaydash - tests/e2e_feed.rs
//
// End-to-end tests for the feed pipeline: raw wire frames go through a
// real FeedManager background thread, the decoded messages are applied
// to a real DashboardState, and the resulting display views are checked.
// No mocks beyond the in-memory message source; the source trait is the
// seam for the opaque transport.

use relaydash::app::feed::{FeedKind, FeedManager, FeedProgress, MessageSource};
use relaydash::app::state::DashboardState;
use relaydash::util::error::FeedError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// =============================================================================
// Helpers
// =============================================================================

/// In-memory message source replaying a fixed frame script and recording
/// every outbound request into a shared log.
struct ScriptedSource {
    requests: Arc<Mutex<Vec<String>>>,
    frames: VecDeque<String>,
}

impl ScriptedSource {
    fn new(frames: &[&str]) -> (Self, Arc<Mutex<Vec<String>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let source = Self {
            requests: Arc::clone(&requests),
            frames: frames.iter().map(|f| f.to_string()).collect(),
        };
        (source, requests)
    }
}

impl MessageSource for ScriptedSource {
    fn send_request(&mut self, frame: &str) -> Result<(), FeedError> {
        self.requests.lock().unwrap().push(frame.to_string());
        Ok(())
    }

    fn next_message(&mut self) -> Result<Option<String>, FeedError> {
        Ok(self.frames.pop_front())
    }
}

/// Run one feed over a frame script and apply everything it produces to
/// `state`. Panics if the feed does not terminate within the watchdog.
fn run_feed_into(state: &mut DashboardState, kind: FeedKind, frames: &[&str]) -> Vec<String> {
    let (source, requests) = ScriptedSource::new(frames);
    let mut manager = FeedManager::new(kind);
    manager.start(source);

    let deadline = Instant::now() + Duration::from_secs(5);
    'outer: loop {
        for progress in manager.poll_progress() {
            match progress {
                FeedProgress::Frame(msg) => state.apply(msg),
                FeedProgress::Closed | FeedProgress::Stopped => break 'outer,
                FeedProgress::SourceError { message } => {
                    panic!("unexpected source error: {message}")
                }
                FeedProgress::Started => {}
            }
        }
        assert!(Instant::now() < deadline, "feed did not terminate");
        std::thread::sleep(Duration::from_millis(5));
    }

    let requests = requests.lock().unwrap().clone();
    requests
}

// =============================================================================
// Log feed E2E
// =============================================================================

/// Session start: the cache request goes out first, the cache reply
/// hydrates the buffer, and live events land on top of it.
#[test]
fn e2e_log_cache_hydration_then_live_events() {
    let mut state = DashboardState::default();

    let requests = run_feed_into(
        &mut state,
        FeedKind::Log,
        &[
            r#"{"header": "LOG-CACHE", "entries": [
                {"time": 1700000000, "type": "notice", "message": "Parsing GEOIP file"},
                {"time": 1700000010, "type": "notice", "message": "Bootstrapped 90%"}
            ]}"#,
            r#"{"header": "LOG-ENTRY", "time": 1700000020,
                "type": "notice", "message": "Bootstrapped 100%"}"#,
        ],
    );

    assert_eq!(requests, vec![r#"{"request":"LOG-CACHE"}"#.to_string()]);

    let view = state.visible_entries();
    assert_eq!(view.len(), 3);
    assert_eq!(view[0].message, "Bootstrapped 100%");
    assert_eq!(view[2].message, "Parsing GEOIP file");
}

/// Repeated heartbeat messages fold into one display row whose count
/// keeps climbing, regardless of the variable uptime text.
#[test]
fn e2e_heartbeat_events_fold_into_one_row() {
    let mut state = DashboardState::default();

    let heartbeats: Vec<String> = (1..=4)
        .map(|h| {
            format!(
                r#"{{"header": "LOG-ENTRY", "time": {}, "type": "notice",
                     "message": "Heartbeat: Tor's uptime is {}:00 hours"}}"#,
                1_700_000_000 + h * 3600,
                h
            )
        })
        .collect();
    let frames: Vec<&str> = heartbeats.iter().map(String::as_str).collect();

    run_feed_into(&mut state, FeedKind::Log, &frames);

    let view = state.visible_entries();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].count, 4);
    assert!(view[0].message.contains("uptime is 1:00"));
}

/// Malformed and incomplete frames are dropped without disturbing the
/// valid entries around them.
#[test]
fn e2e_invalid_log_frames_are_dropped_silently() {
    let mut state = DashboardState::default();

    run_feed_into(
        &mut state,
        FeedKind::Log,
        &[
            r#"{"header": "LOG-ENTRY", "time": 1, "type": "info", "message": "first"}"#,
            "complete garbage",
            r#"{"header": "LOG-ENTRY", "time": 2, "type": "info"}"#,
            r#"{"header": "LOG-ENTRY", "time": 3, "type": "info", "message": "second"}"#,
        ],
    );

    let messages: Vec<_> = state
        .visible_entries()
        .into_iter()
        .map(|s| s.message)
        .collect();
    assert_eq!(messages, vec!["second", "first"]);
}

/// A flood of distinct events stays bounded by the buffer capacity.
#[test]
fn e2e_log_buffer_stays_bounded() {
    let mut state = DashboardState::new(10, 60);

    let flood: Vec<String> = (0..50)
        .map(|i| {
            format!(
                r#"{{"header": "LOG-ENTRY", "time": {i}, "type": "debug",
                     "message": "distinct event number {i}"}}"#
            )
        })
        .collect();
    let frames: Vec<&str> = flood.iter().map(String::as_str).collect();

    run_feed_into(&mut state, FeedKind::Log, &frames);

    let view = state.visible_entries();
    assert_eq!(view.len(), 10);
    assert_eq!(view[0].message, "distinct event number 49");
    assert_eq!(view[9].message, "distinct event number 40");
}

// =============================================================================
// Bandwidth feed E2E
// =============================================================================

/// Cache samples hydrate the series, live samples extend it, and the
/// stats block tracks the latest frame.
#[test]
fn e2e_bandwidth_cache_then_live_samples() {
    let mut state = DashboardState::default();

    let requests = run_feed_into(
        &mut state,
        FeedKind::Bandwidth,
        &[
            r#"{"reply": "BW-CACHE", "entries": [
                {"read": 100, "written": 200},
                {"read": 300, "written": 400}
            ]}"#,
            r#"{"reply": "BW-EVENT", "read": 500, "written": 600,
                "read_total": 123456789}"#,
        ],
    );

    assert_eq!(requests, vec![r#"{"request":"BW-CACHE"}"#.to_string()]);

    assert_eq!(state.bandwidth.len(), 3);
    let points = state.bandwidth.points();
    assert_eq!(points[0].read, 500);
    assert_eq!(points[1].read, 300);
    assert_eq!(state.bandwidth.stats().read_total, Some(123_456_789));
}

/// A malformed bandwidth frame turns into the zero-valued default sample
/// instead of an error.
#[test]
fn e2e_bandwidth_garbage_becomes_default_sample() {
    let mut state = DashboardState::default();

    run_feed_into(&mut state, FeedKind::Bandwidth, &["][ not json"]);

    assert_eq!(state.bandwidth.len(), 1);
    let point = state.bandwidth.points()[0];
    assert_eq!((point.read, point.written), (0, 0));
}

// =============================================================================
// Info feed E2E
// =============================================================================

/// The info feed replaces the identity record wholesale; garbage falls
/// back to the placeholder identity.
#[test]
fn e2e_info_updates_and_fallback() {
    let mut state = DashboardState::default();

    let requests = run_feed_into(
        &mut state,
        FeedKind::Info,
        &[r#"{"version": "0.4.8.9", "nickname": "ExampleRelay",
              "fingerprint": "ABCD", "status": "online"}"#],
    );

    assert_eq!(requests, vec![r#"{"request":"INFO"}"#.to_string()]);
    assert_eq!(state.info.nickname, "ExampleRelay");
    assert_eq!(state.info.status.as_deref(), Some("online"));

    run_feed_into(&mut state, FeedKind::Info, &["%%%"]);
    assert_eq!(state.info.nickname, "Unnamed");
    assert_eq!(state.info.fingerprint, "-");
}
