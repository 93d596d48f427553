// relaydash - app/feed.rs
//
// Feed lifecycle: wraps one persistent message source (one per telemetry
// channel) and streams decoded frames to the consumer thread.
//
// Architecture:
//   - `FeedManager` lives on the consumer thread; `run_feed` runs on a
//     background thread blocking on the source.
//   - An `Arc<AtomicBool>` cancel flag allows the consumer to stop the feed;
//     because reads block, the flag is observed between frames, so a clean
//     stop also requires closing the underlying source.
//   - Decoded frames are sent as `FeedProgress::Frame` over an mpsc channel.
//   - The consumer polls the channel without blocking (`poll_progress`),
//     so frames are applied strictly in arrival order, one at a time.
//
// Session start: the fixed cache request for the channel is sent exactly
// once, before the read loop begins, to hydrate state from the server's
// snapshot.

use crate::core::model::RelayInfo;
use crate::core::parser::{self, BandwidthFrame, LogFrame};
use crate::util::constants::{
    BANDWIDTH_FEED_PATH, BW_CACHE_REQUEST, INFO_FEED_PATH, INFO_REQUEST, LOG_CACHE_REQUEST,
    LOG_FEED_PATH,
};
use crate::util::error::FeedError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

// =============================================================================
// Message source abstraction
// =============================================================================

/// An opaque full-duplex message source delivering text frames.
///
/// The dashboard core only ever reads frames from it and writes the fixed
/// cache request to it; connection management, reconnection, and backoff
/// are the adapter's concern.
pub trait MessageSource: Send {
    /// Send one outbound request frame.
    fn send_request(&mut self, frame: &str) -> Result<(), FeedError>;

    /// Block until the next text frame arrives. `Ok(None)` means the
    /// source closed cleanly.
    fn next_message(&mut self) -> Result<Option<String>, FeedError>;
}

// =============================================================================
// Feed kinds
// =============================================================================

/// The three telemetry channels served by the dashboard backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Log,
    Bandwidth,
    Info,
}

impl FeedKind {
    /// Endpoint path of this channel on the server.
    pub fn path(&self) -> &'static str {
        match self {
            FeedKind::Log => LOG_FEED_PATH,
            FeedKind::Bandwidth => BANDWIDTH_FEED_PATH,
            FeedKind::Info => INFO_FEED_PATH,
        }
    }

    /// Label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            FeedKind::Log => "log",
            FeedKind::Bandwidth => "bandwidth",
            FeedKind::Info => "info",
        }
    }

    /// The fixed JSON request sent once at session start to fetch the
    /// channel's cached snapshot.
    pub fn cache_request(&self) -> String {
        let token = match self {
            FeedKind::Log => LOG_CACHE_REQUEST,
            FeedKind::Bandwidth => BW_CACHE_REQUEST,
            FeedKind::Info => INFO_REQUEST,
        };
        serde_json::json!({ "request": token }).to_string()
    }

    /// Decode one raw frame according to the channel's wire format.
    ///
    /// `None` means the frame was invalid and must be dropped (only the
    /// log channel drops frames; the other channels substitute defaults).
    fn decode(&self, raw: &str) -> Option<DashboardMsg> {
        match self {
            FeedKind::Log => parser::decode_log_frame(raw).map(DashboardMsg::Log),
            FeedKind::Bandwidth => {
                Some(DashboardMsg::Bandwidth(parser::decode_bandwidth_frame(raw)))
            }
            FeedKind::Info => Some(DashboardMsg::Info(parser::decode_info_frame(raw))),
        }
    }
}

// =============================================================================
// Progress messages
// =============================================================================

/// A decoded message from any of the three channels.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardMsg {
    Log(LogFrame),
    Bandwidth(BandwidthFrame),
    Info(RelayInfo),
}

/// Progress messages sent from the feed thread to the consumer.
#[derive(Debug)]
pub enum FeedProgress {
    /// The cache request was sent and the read loop is running.
    Started,

    /// One decoded frame.
    Frame(DashboardMsg),

    /// The source failed; the feed has terminated.
    SourceError { message: String },

    /// The source closed cleanly; the feed has terminated.
    Closed,

    /// The consumer requested a stop and the feed observed it.
    Stopped,
}

// =============================================================================
// FeedManager
// =============================================================================

/// Manages one telemetry feed on a background thread.
///
/// The manager lives on the consumer thread and exposes a simple
/// start/stop/poll interface.
pub struct FeedManager {
    kind: FeedKind,
    /// Channel receiver for the consumer to poll progress messages.
    pub progress_rx: Option<mpsc::Receiver<FeedProgress>>,
    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl FeedManager {
    pub fn new(kind: FeedKind) -> Self {
        Self {
            kind,
            progress_rx: None,
            cancel_flag: None,
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    /// Start consuming the given source. Spawns the background thread
    /// immediately; if a feed is already running it is stopped first.
    pub fn start<S: MessageSource + 'static>(&mut self, source: S) {
        self.stop();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        let kind = self.kind;
        std::thread::spawn(move || {
            run_feed(kind, source, tx, cancel);
        });

        tracing::info!(feed = self.kind.label(), "Feed started");
    }

    /// Request the background thread to stop.
    ///
    /// Observed between frames; a blocked read ends only when the source
    /// closes or the process exits.
    pub fn stop(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
        self.cancel_flag = None;
        self.progress_rx = None;
    }

    /// Returns `true` if a feed background thread is currently active.
    pub fn is_active(&self) -> bool {
        self.cancel_flag.is_some()
    }

    /// Poll for pending progress messages without blocking.
    ///
    /// Drains all currently queued messages and returns them.
    pub fn poll_progress(&self) -> Vec<FeedProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }
        messages
    }
}

// =============================================================================
// Background feed loop
// =============================================================================

/// Background loop: request the cache snapshot once, then decode frames
/// until the source closes, errors, or a stop is requested.
fn run_feed<S: MessageSource>(
    kind: FeedKind,
    mut source: S,
    tx: mpsc::Sender<FeedProgress>,
    cancel: Arc<AtomicBool>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                // Consumer channel closed; exit silently.
                return;
            }
        };
    }

    if let Err(e) = source.send_request(&kind.cache_request()) {
        tracing::warn!(feed = kind.label(), error = %e, "Cache request failed");
        send!(FeedProgress::SourceError {
            message: e.to_string(),
        });
        return;
    }

    tracing::debug!(feed = kind.label(), "Cache requested; entering read loop");
    send!(FeedProgress::Started);

    loop {
        if cancel.load(Ordering::SeqCst) {
            send!(FeedProgress::Stopped);
            return;
        }

        match source.next_message() {
            Ok(Some(raw)) => {
                if let Some(msg) = kind.decode(&raw) {
                    send!(FeedProgress::Frame(msg));
                }
                // Invalid frames are dropped; decode already logged them.
            }
            Ok(None) => {
                tracing::info!(feed = kind.label(), "Source closed");
                send!(FeedProgress::Closed);
                return;
            }
            Err(e) => {
                tracing::warn!(feed = kind.label(), error = %e, "Source error");
                send!(FeedProgress::SourceError {
                    message: e.to_string(),
                });
                return;
            }
        }
    }
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::{Duration, Instant};

    /// In-memory source replaying a fixed frame script.
    struct ScriptedSource {
        frames: VecDeque<String>,
    }

    impl ScriptedSource {
        fn new(frames: &[&str]) -> Self {
            Self {
                frames: frames.iter().map(|f| f.to_string()).collect(),
            }
        }
    }

    impl MessageSource for ScriptedSource {
        fn send_request(&mut self, _frame: &str) -> Result<(), FeedError> {
            Ok(())
        }

        fn next_message(&mut self) -> Result<Option<String>, FeedError> {
            Ok(self.frames.pop_front())
        }
    }

    /// Drain one feed until it terminates, with a watchdog timeout.
    fn collect_until_done(manager: &FeedManager) -> Vec<FeedProgress> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut all = Vec::new();
        loop {
            for msg in manager.poll_progress() {
                let done = matches!(
                    msg,
                    FeedProgress::Closed | FeedProgress::Stopped | FeedProgress::SourceError { .. }
                );
                all.push(msg);
                if done {
                    return all;
                }
            }
            assert!(Instant::now() < deadline, "feed did not terminate");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_cache_request_framing() {
        assert_eq!(
            FeedKind::Log.cache_request(),
            r#"{"request":"LOG-CACHE"}"#
        );
        assert_eq!(FeedKind::Bandwidth.cache_request(), r#"{"request":"BW-CACHE"}"#);
        assert_eq!(FeedKind::Info.cache_request(), r#"{"request":"INFO"}"#);
    }

    #[test]
    fn test_feed_decodes_frames_and_closes() {
        let source = ScriptedSource::new(&[
            r#"{"header": "LOG-ENTRY", "time": 1700000000, "type": "notice", "message": "up"}"#,
            "garbage that is not json",
            r#"{"header": "LOG-ENTRY", "time": 1700000001, "type": "warn", "message": "down"}"#,
        ]);

        let mut manager = FeedManager::new(FeedKind::Log);
        manager.start(source);
        assert!(manager.is_active());

        let progress = collect_until_done(&manager);

        assert!(matches!(progress.first(), Some(FeedProgress::Started)));
        let frames = progress
            .iter()
            .filter(|p| matches!(p, FeedProgress::Frame(_)))
            .count();
        // The garbage frame is dropped, not surfaced.
        assert_eq!(frames, 2);
        assert!(matches!(progress.last(), Some(FeedProgress::Closed)));
    }

    #[test]
    fn test_bandwidth_feed_never_drops_frames() {
        let source = ScriptedSource::new(&["garbage"]);
        let mut manager = FeedManager::new(FeedKind::Bandwidth);
        manager.start(source);

        let progress = collect_until_done(&manager);
        let frames = progress
            .iter()
            .filter(|p| matches!(p, FeedProgress::Frame(_)))
            .count();
        // Malformed bandwidth payloads become the default event record.
        assert_eq!(frames, 1);
    }
}
