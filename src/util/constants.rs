// relaydash - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "relaydash";

/// Application identifier used for config directories.
pub const APP_ID: &str = "relaydash";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log buffer limits
// =============================================================================

/// Default number of distinct entries held by the log group buffer.
/// Duplicates folded into an owner do not count against this limit.
pub const DEFAULT_MAX_LOG_SIZE: usize = 10;

/// Minimum sensible log buffer size (an empty buffer is useless).
pub const MIN_MAX_LOG_SIZE: usize = 1;

/// Hard upper bound on the log buffer size (prevents configuration mistakes).
pub const ABSOLUTE_MAX_LOG_SIZE: usize = 1_000;

// =============================================================================
// Bandwidth series limits
// =============================================================================

/// Default number of bandwidth samples kept for the graph (one per second).
pub const DEFAULT_GRAPH_WIDTH: usize = 60;

/// Minimum sensible graph width.
pub const MIN_GRAPH_WIDTH: usize = 10;

/// Hard upper bound on the graph width.
pub const ABSOLUTE_MAX_GRAPH_WIDTH: usize = 3_600;

/// Floor for the auto-adjusted bandwidth axis maximum, in bytes/sec.
/// Keeps the graph scale readable when the relay is idle.
pub const BANDWIDTH_AXIS_FLOOR_BYTES: u64 = 1_024;

// =============================================================================
// Wire vocabulary
// =============================================================================

/// Header tag on a single live log event.
pub const LOG_EVENT_HEADER: &str = "LOG-ENTRY";

/// Header tag on a batched log cache reply.
pub const LOG_CACHE_HEADER: &str = "LOG-CACHE";

/// Reply tag on a single live bandwidth sample.
pub const BW_EVENT_REPLY: &str = "BW-EVENT";

/// Reply tag on a batched bandwidth cache reply.
pub const BW_CACHE_REPLY: &str = "BW-CACHE";

/// Request token for the log cache snapshot.
pub const LOG_CACHE_REQUEST: &str = "LOG-CACHE";

/// Request token for the bandwidth cache snapshot.
pub const BW_CACHE_REQUEST: &str = "BW-CACHE";

/// Request token for the relay info record.
pub const INFO_REQUEST: &str = "INFO";

// =============================================================================
// Feed endpoints
// =============================================================================

/// Default dashboard server address (scheme + host + port, no path).
pub const DEFAULT_SERVER_ADDRESS: &str = "ws://127.0.0.1:8887";

/// Path of the log event feed on the server.
pub const LOG_FEED_PATH: &str = "/log";

/// Path of the bandwidth feed on the server.
pub const BANDWIDTH_FEED_PATH: &str = "/bandwidth";

/// Path of the relay info feed on the server.
pub const INFO_FEED_PATH: &str = "/info";

// =============================================================================
// Configuration
// =============================================================================

/// Name of the configuration file within the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default tracing level when no override is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Main loop
// =============================================================================

/// Interval between feed channel polls in the console loop, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 100;
