// relaydash - app/state.rs
//
// Dashboard state: binds decoded feed messages to the display-ready
// collections (log group, bandwidth series, relay info).
// Single-threaded by contract: every message is applied to completion
// before the next one is processed.

use crate::core::bandwidth::BandwidthSeries;
use crate::core::filter::{self, EventFilter};
use crate::core::group::LogGroup;
use crate::core::model::{EntrySnapshot, RelayInfo};
use crate::core::parser::LogFrame;
use crate::util::constants::{DEFAULT_GRAPH_WIDTH, DEFAULT_MAX_LOG_SIZE};

use super::feed::DashboardMsg;

/// Top-level dashboard state.
#[derive(Debug)]
pub struct DashboardState {
    /// Bounded deduplicating log buffer.
    pub log: LogGroup,

    /// Sliding bandwidth sample window.
    pub bandwidth: BandwidthSeries,

    /// Latest relay identity record.
    pub info: RelayInfo,

    /// Display filter for the log view.
    pub filter: EventFilter,
}

impl DashboardState {
    pub fn new(max_log_size: usize, graph_width: usize) -> Self {
        Self {
            log: LogGroup::new(max_log_size),
            bandwidth: BandwidthSeries::new(graph_width),
            info: RelayInfo::default(),
            filter: EventFilter::default(),
        }
    }

    /// Apply one decoded feed message. Cache replies bulk-ingest their
    /// entries in wire order.
    pub fn apply(&mut self, msg: DashboardMsg) {
        match msg {
            DashboardMsg::Log(LogFrame::Event(entry)) => {
                self.log.add(entry);
            }
            DashboardMsg::Log(LogFrame::Cache(entries)) => {
                tracing::debug!(count = entries.len(), "Ingesting log cache");
                for entry in entries {
                    self.log.add(entry);
                }
            }
            DashboardMsg::Bandwidth(frame) => {
                self.bandwidth.apply(frame);
            }
            DashboardMsg::Info(info) => {
                tracing::debug!(nickname = %info.nickname, "Relay info updated");
                self.info = info;
            }
        }
    }

    /// Flip duplicate folding: expand groups when folding was on,
    /// re-fold when it was off.
    pub fn toggle_duplicates(&mut self) {
        if self.log.grouping_duplicates() {
            self.log.show_duplicates();
        } else {
            self.log.hide_duplicates();
        }
    }

    /// The log view after filtering, most recent first.
    pub fn visible_entries(&self) -> Vec<EntrySnapshot> {
        let all = self.log.get_all();
        filter::apply_filter(&all, &self.filter)
            .into_iter()
            .map(|i| all[i].clone())
            .collect()
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOG_SIZE, DEFAULT_GRAPH_WIDTH)
    }
}

// =============================================================================
// Unit tests
// =============================================================================
