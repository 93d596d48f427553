// relaydash - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for relaydash configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/relaydash/).
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be
    /// determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[server]` section.
    pub server: ServerSection,
    /// `[log]` section.
    pub log: LogSection,
    /// `[bandwidth]` section.
    pub bandwidth: BandwidthSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[server]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Dashboard server address (ws:// or wss://, no path).
    pub address: Option<String>,
}

/// `[log]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Maximum distinct entries in the log buffer.
    pub max_size: Option<usize>,
}

/// `[bandwidth]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct BandwidthSection {
    /// Number of samples kept for the bandwidth graph.
    pub graph_width: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Dashboard server address (scheme + host + port).
    pub server_address: String,
    /// Maximum distinct entries in the log buffer.
    pub max_log_size: usize,
    /// Number of samples kept for the bandwidth graph.
    pub graph_width: usize,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_address: constants::DEFAULT_SERVER_ADDRESS.to_string(),
            max_log_size: constants::DEFAULT_MAX_LOG_SIZE,
            graph_width: constants::DEFAULT_GRAPH_WIDTH,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. If the file does not exist, returns defaults with no warnings
/// (first run). If the file is unparseable, returns defaults with an error
/// warning -- the application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    // Validate each field against named constants, accumulating all warnings.
    let mut config = AppConfig::default();

    // -- Server: address --
    if let Some(ref address) = raw.server.address {
        if address.starts_with("ws://") || address.starts_with("wss://") {
            config.server_address = address.trim_end_matches('/').to_string();
        } else {
            warnings.push(format!(
                "[server] address = \"{address}\" must start with ws:// or wss://. \
                 Using default ({}).",
                constants::DEFAULT_SERVER_ADDRESS,
            ));
        }
    }

    // -- Log: max_size --
    if let Some(size) = raw.log.max_size {
        if (constants::MIN_MAX_LOG_SIZE..=constants::ABSOLUTE_MAX_LOG_SIZE).contains(&size) {
            config.max_log_size = size;
        } else {
            warnings.push(format!(
                "[log] max_size = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_LOG_SIZE,
                constants::ABSOLUTE_MAX_LOG_SIZE,
                constants::DEFAULT_MAX_LOG_SIZE,
            ));
        }
    }

    // -- Bandwidth: graph_width --
    if let Some(width) = raw.bandwidth.graph_width {
        if (constants::MIN_GRAPH_WIDTH..=constants::ABSOLUTE_MAX_GRAPH_WIDTH).contains(&width) {
            config.graph_width = width;
        } else {
            warnings.push(format!(
                "[bandwidth] graph_width = {width} is out of range ({}-{}). Using default ({}).",
                constants::MIN_GRAPH_WIDTH,
                constants::ABSOLUTE_MAX_GRAPH_WIDTH,
                constants::DEFAULT_GRAPH_WIDTH,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

// =============================================================================
// Unit tests
// =============================================================================
