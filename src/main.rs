// relaydash - main.rs
//
// Console entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. config.toml loading and validation
// 4. Connecting the three telemetry feeds and running the print loop
//
// The console binding is deliberately thin: it prints incoming log lines
// and periodic bandwidth/info summaries. All buffer and series logic
// lives in the library.

use clap::Parser;
use relaydash::app::feed::{DashboardMsg, FeedKind, FeedManager, FeedProgress};
use relaydash::app::state::DashboardState;
use relaydash::core::filter::{self, EventFilter};
use relaydash::core::model::EntrySnapshot;
use relaydash::core::parser::LogFrame;
use relaydash::platform::config::{load_config, PlatformPaths};
use relaydash::platform::socket::WsSource;
use relaydash::util::error::ConfigError;
use relaydash::util::{constants, format, logging};
use std::time::Duration;

/// Bandwidth summary cadence: one printed line per this many frames.
const BANDWIDTH_SUMMARY_EVERY: u64 = 30;

/// relaydash - console dashboard for live tor relay telemetry.
///
/// Connects to a relay dashboard server and follows its log, bandwidth,
/// and relay info feeds.
#[derive(Parser, Debug)]
#[command(name = "relaydash", version, about)]
struct Cli {
    /// Dashboard server address (ws:// or wss://, overrides config.toml).
    #[arg(short = 'a', long = "address")]
    address: Option<String>,

    /// Maximum number of distinct log entries kept in the buffer.
    #[arg(long = "max-log-size")]
    max_log_size: Option<usize>,

    /// Start with duplicate folding disabled (every repeat shown).
    #[arg(long = "show-duplicates")]
    show_duplicates: bool,

    /// Only show warn and err log lines.
    #[arg(long = "problems-only")]
    problems_only: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths and load config before logging init so the
    // configured level can take effect.
    let platform_paths = PlatformPaths::resolve();
    let (config, config_warnings) = load_config(&platform_paths.config_dir);

    logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "relaydash starting"
    );

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    // CLI overrides.
    let address = match resolve_address(cli.address.as_deref(), &config.server_address) {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server address");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut max_log_size = config.max_log_size;
    if let Some(size) = cli.max_log_size {
        if (constants::MIN_MAX_LOG_SIZE..=constants::ABSOLUTE_MAX_LOG_SIZE).contains(&size) {
            max_log_size = size;
        } else {
            tracing::warn!(
                requested = size,
                "--max-log-size out of range; keeping {}",
                max_log_size
            );
        }
    }

    let mut state = DashboardState::new(max_log_size, config.graph_width);
    if cli.show_duplicates {
        state.log.show_duplicates();
    }
    if cli.problems_only {
        state.filter = EventFilter::problems_only();
    }

    // Connect the feeds. The log feed is the dashboard's backbone and is
    // required; bandwidth and info degrade gracefully when unavailable.
    let mut managers: Vec<(FeedManager, bool)> = Vec::new();

    for kind in [FeedKind::Log, FeedKind::Bandwidth, FeedKind::Info] {
        let url = format!("{address}{}", kind.path());
        match WsSource::connect(&url) {
            Ok(source) => {
                let mut manager = FeedManager::new(kind);
                manager.start(source);
                managers.push((manager, false));
            }
            Err(e) if kind == FeedKind::Log => {
                tracing::error!(error = %e, "Log feed connection failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            Err(e) => {
                tracing::warn!(feed = kind.label(), error = %e, "Feed unavailable; continuing");
            }
        }
    }

    run_loop(&mut state, &mut managers);

    tracing::info!("All feeds terminated; exiting");
}

/// Pick the effective server address: CLI override, validated, else config.
fn resolve_address(cli_address: Option<&str>, config_address: &str) -> Result<String, ConfigError> {
    match cli_address {
        Some(a) if a.starts_with("ws://") || a.starts_with("wss://") => {
            Ok(a.trim_end_matches('/').to_string())
        }
        Some(a) => Err(ConfigError::InvalidServerAddress {
            address: a.to_string(),
        }),
        None => Ok(config_address.to_string()),
    }
}

/// Poll all feeds until every one of them has terminated.
fn run_loop(state: &mut DashboardState, managers: &mut [(FeedManager, bool)]) {
    let mut bandwidth_frames: u64 = 0;

    loop {
        for (manager, done) in managers.iter_mut() {
            if *done {
                continue;
            }
            for progress in manager.poll_progress() {
                match progress {
                    FeedProgress::Started => {}
                    FeedProgress::Frame(msg) => {
                        handle_frame(state, msg, &mut bandwidth_frames);
                    }
                    FeedProgress::SourceError { message } => {
                        tracing::warn!(feed = manager.kind().label(), "{}", message);
                        *done = true;
                    }
                    FeedProgress::Closed | FeedProgress::Stopped => {
                        *done = true;
                    }
                }
            }
        }

        if managers.iter().all(|(_, done)| *done) {
            return;
        }

        std::thread::sleep(Duration::from_millis(constants::POLL_INTERVAL_MS));
    }
}

/// Apply one frame to the state and print its console rendition.
fn handle_frame(state: &mut DashboardState, msg: DashboardMsg, bandwidth_frames: &mut u64) {
    match msg {
        DashboardMsg::Log(frame) => {
            // Snapshot the incoming entries before they fold into the
            // buffer, so each arrival prints exactly once.
            let incoming: Vec<EntrySnapshot> = match &frame {
                LogFrame::Event(e) => vec![e.snapshot()],
                LogFrame::Cache(entries) => entries.iter().map(|e| e.snapshot()).collect(),
            };
            state.apply(DashboardMsg::Log(frame));

            let visible = filter::apply_filter(&incoming, &state.filter);
            for idx in visible {
                print_log_line(&incoming[idx]);
            }
        }
        DashboardMsg::Bandwidth(frame) => {
            state.apply(DashboardMsg::Bandwidth(frame));
            *bandwidth_frames += 1;
            if *bandwidth_frames % BANDWIDTH_SUMMARY_EVERY == 1 {
                print_bandwidth_summary(state);
            }
        }
        DashboardMsg::Info(info) => {
            state.apply(DashboardMsg::Info(info));
            let info = &state.info;
            println!(
                "--- relay {} ({}) tor {} {} ---",
                info.nickname,
                info.fingerprint,
                info.version,
                info.status.as_deref().unwrap_or("unknown"),
            );
        }
    }
}

fn print_log_line(entry: &EntrySnapshot) {
    println!(
        "{} [{}] {}",
        entry.readable_time,
        entry.severity.short_label(),
        entry.message,
    );
}

fn print_bandwidth_summary(state: &DashboardState) {
    let stats = state.bandwidth.stats();
    let mut line = format!(
        "--- bw read {} written {}",
        format::format_bytes_per_sec(stats.read, 2),
        format::format_bytes_per_sec(stats.written, 2),
    );
    if let Some(total) = stats.read_total {
        line.push_str(&format!(" | total in {}", format::format_bytes(total, 2)));
    }
    if let Some(total) = stats.write_total {
        line.push_str(&format!(" | total out {}", format::format_bytes(total, 2)));
    }
    line.push_str(" ---");
    println!("{line}");
}
