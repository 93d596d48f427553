// relaydash - core/group.rs
//
// Bounded, order-preserving log buffer with duplicate folding.
//
// Entries are kept most-recent-first. At most `max_size` *distinct*
// entries are held; entries folded into an owner as duplicates do not
// count against the limit. Eviction drains an owner's duplicates before
// the owner itself is removed, so a noisy repeated message survives
// longer than its raw arrival count would suggest.

use crate::core::model::{EntrySnapshot, LogEntry};
use crate::util::constants::DEFAULT_MAX_LOG_SIZE;

/// Bounded deduplicating collection of log entries.
#[derive(Debug, Clone)]
pub struct LogGroup {
    /// When true, new entries fold into an existing duplicate owner.
    group_duplicates: bool,
    /// Maximum number of distinct (top-level) entries.
    max_size: usize,
    /// Owned entries, most recent first.
    entries: Vec<LogEntry>,
    /// Number of top-level entries. Always equals `entries.len()`.
    group_size: usize,
}

impl LogGroup {
    /// Create an empty group with the given distinct-entry capacity.
    /// Duplicate folding starts enabled.
    pub fn new(max_size: usize) -> Self {
        Self {
            group_duplicates: true,
            max_size,
            entries: Vec::new(),
            group_size: 0,
        }
    }

    /// Number of distinct entries currently held.
    pub fn len(&self) -> usize {
        self.group_size
    }

    pub fn is_empty(&self) -> bool {
        self.group_size == 0
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// True while duplicate folding is enabled.
    pub fn grouping_duplicates(&self) -> bool {
        self.group_duplicates
    }

    /// Add one entry.
    ///
    /// In folding mode the existing entries are scanned in current order and
    /// the new entry folds into the first duplicate match; the first match
    /// wins, there is no best-match comparison. Without a match (or with
    /// folding off) the entry is inserted at the front as the most recent.
    /// Afterwards the oldest entries are evicted until the distinct count is
    /// back within `max_size`.
    pub fn add(&mut self, entry: LogEntry) {
        if self.group_duplicates {
            let duplicate = self
                .entries
                .iter()
                .position(|existing| entry.is_duplicate_of(existing));

            match duplicate {
                Some(i) => self.entries[i].add_duplicate(entry),
                None => {
                    self.entries.insert(0, entry);
                    self.group_size += 1;
                }
            }
        } else {
            self.entries.insert(0, entry);
            self.group_size += 1;
        }

        while self.group_size > self.max_size {
            self.pop();
        }
    }

    /// Release one unit of capacity from the oldest end.
    ///
    /// An oldest entry without duplicates is removed outright; one with
    /// duplicates keeps its place and loses its most recently folded
    /// duplicate instead.
    pub fn pop(&mut self) {
        let Some(last) = self.entries.last_mut() else {
            return;
        };

        if last.num_duplicates() == 0 {
            self.entries.pop();
            self.group_size -= 1;
        } else {
            last.remove_duplicate();
        }
    }

    /// Display snapshots, most recent first, annotated with the current
    /// duplicate count.
    pub fn get_all(&self) -> Vec<EntrySnapshot> {
        self.entries.iter().map(LogEntry::snapshot).collect()
    }

    /// Drop every entry and reset the distinct count.
    pub fn empty_log(&mut self) {
        self.entries.clear();
        self.group_size = 0;
    }

    /// Switch to non-folding mode, expanding existing groups back into
    /// individual entries.
    ///
    /// Every owner's duplicates are detached and interleaved (duplicates
    /// first, then the owner), the buffer is cleared, and the flat list is
    /// re-added under the new mode. Capacity eviction applies during the
    /// re-add, so entries beyond `max_size` are lost.
    pub fn show_duplicates(&mut self) {
        self.group_duplicates = false;

        let mut flat = Vec::new();
        for mut entry in std::mem::take(&mut self.entries) {
            flat.extend(entry.pop_duplicates());
            flat.push(entry);
        }

        self.empty_log();
        for entry in flat {
            self.add(entry);
        }
    }

    /// Switch to folding mode, re-grouping the current entries.
    ///
    /// The flat entry list is cleared and re-added through `add` so that
    /// matching entries fold back together. Capacity eviction applies.
    pub fn hide_duplicates(&mut self) {
        self.group_duplicates = true;

        let flat = std::mem::take(&mut self.entries);
        self.empty_log();
        for entry in flat {
            self.add(entry);
        }
    }
}

impl Default for LogGroup {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOG_SIZE)
    }
}

// =============================================================================
// Unit tests
// =============================================================================
