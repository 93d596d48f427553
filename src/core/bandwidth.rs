// relaydash - core/bandwidth.rs
//
// Fixed-width bandwidth sample series for the graph, plus the latest
// aggregate stats block. Samples are most-recent-first, like the log
// buffer, and the series is truncated to the graph width on every push.

use crate::core::model::{BandwidthSample, BandwidthStats};
use crate::core::parser::BandwidthFrame;
use crate::util::constants::{BANDWIDTH_AXIS_FLOOR_BYTES, DEFAULT_GRAPH_WIDTH};
use std::collections::VecDeque;

/// One chart-ready point: index from most recent (0) plus both series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandwidthPoint {
    pub x: usize,
    pub read: u64,
    pub written: u64,
}

/// Sliding window of bandwidth samples, newest first.
#[derive(Debug, Clone)]
pub struct BandwidthSeries {
    width: usize,
    samples: VecDeque<BandwidthSample>,
    stats: BandwidthStats,
}

impl BandwidthSeries {
    /// Create an empty series keeping at most `width` samples.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            samples: VecDeque::with_capacity(width),
            stats: BandwidthStats::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Latest aggregate stats block received from the server.
    pub fn stats(&self) -> &BandwidthStats {
        &self.stats
    }

    /// Push one sample as the most recent, truncating to the graph width.
    pub fn push(&mut self, sample: BandwidthSample) {
        self.samples.push_front(sample);
        self.samples.truncate(self.width);
    }

    /// Apply a decoded bandwidth frame: a live event pushes one sample,
    /// a cache reply pushes each snapshot sample in wire order. Either
    /// way the stats block is replaced.
    pub fn apply(&mut self, frame: BandwidthFrame) {
        match frame {
            BandwidthFrame::Event { sample, stats } => {
                self.push(sample);
                self.stats = stats;
            }
            BandwidthFrame::Cache { samples, stats } => {
                for sample in samples {
                    self.push(sample);
                }
                self.stats = stats;
            }
        }
    }

    /// Chart-ready points, most recent first.
    pub fn points(&self) -> Vec<BandwidthPoint> {
        self.samples
            .iter()
            .enumerate()
            .map(|(x, s)| BandwidthPoint {
                x,
                read: s.read,
                written: s.written,
            })
            .collect()
    }

    /// Auto-adjusted axis maximum: the largest sample in either direction,
    /// floored so an idle relay still renders a readable scale.
    pub fn max_value(&self) -> u64 {
        self.samples
            .iter()
            .map(|s| s.read.max(s.written))
            .fold(BANDWIDTH_AXIS_FLOOR_BYTES, u64::max)
    }
}

impl Default for BandwidthSeries {
    fn default() -> Self {
        Self::new(DEFAULT_GRAPH_WIDTH)
    }
}

// =============================================================================
// Unit tests
// =============================================================================
