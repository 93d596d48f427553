// relaydash - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error keeps its cause
// for diagnostic logging.

use std::fmt;
use std::io;

/// Top-level error type for all relaydash operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum DashboardError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Feed connection or frame transfer failed.
    Feed(FeedError),

    /// Filter operation failed.
    Filter(FilterError),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Feed(e) => write!(f, "Feed error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Feed(e) => Some(e),
            Self::Filter(e) => Some(e),
        }
    }
}

impl From<ConfigError> for DashboardError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<FeedError> for DashboardError {
    fn from(e: FeedError) -> Self {
        Self::Feed(e)
    }
}

impl From<FilterError> for DashboardError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors related to configuration values that cannot be worked around
/// with a default (soft validation problems become warnings instead).
#[derive(Debug)]
pub enum ConfigError {
    /// The server address is not a websocket URL.
    InvalidServerAddress { address: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidServerAddress { address } => write!(
                f,
                "server address '{address}' must start with ws:// or wss://"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Feed errors
// ---------------------------------------------------------------------------

/// Errors produced by the message source layer.
#[derive(Debug)]
pub enum FeedError {
    /// Initial websocket connection failed.
    Connect {
        url: String,
        source: tungstenite::Error,
    },

    /// Sending an outbound request frame failed.
    Send { source: tungstenite::Error },

    /// Reading an inbound frame failed.
    Receive { source: tungstenite::Error },

    /// Low-level socket configuration failed.
    Io { source: io::Error },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { url, source } => {
                write!(f, "cannot connect to '{url}': {source}")
            }
            Self::Send { source } => write!(f, "cannot send request frame: {source}"),
            Self::Receive { source } => write!(f, "cannot read frame: {source}"),
            Self::Io { source } => write!(f, "socket error: {source}"),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Send { source } => Some(source),
            Self::Receive { source } => Some(source),
            Self::Io { source } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to event filter configuration.
#[derive(Debug)]
pub enum FilterError {
    /// A regex pattern failed to compile.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "invalid regex pattern '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_context() {
        let err = ConfigError::InvalidServerAddress {
            address: "http://example.com".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("http://example.com"));
        assert!(msg.contains("ws://"));
    }

    #[test]
    fn test_top_level_error_preserves_source() {
        use std::error::Error;
        let err = DashboardError::Config(ConfigError::InvalidServerAddress {
            address: "bad".to_string(),
        });
        assert!(err.source().is_some());
    }
}
