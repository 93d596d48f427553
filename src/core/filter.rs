// relaydash - core/filter.rs
//
// Composable event filter for the log display view.
// All active filters are AND-combined. The filter only shapes what is
// shown; it never mutates the group buffer itself.

use crate::core::model::{EntrySnapshot, Severity};
use crate::util::error::FilterError;
use regex::Regex;
use std::collections::HashSet;

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Severity runlevels to include (empty = all).
    pub severities: HashSet<Severity>,

    /// Substring text search (case-insensitive). Empty = no filter.
    pub text_search: String,

    /// Compiled regex search. None = no regex filter.
    pub regex_search: Option<Regex>,
}

impl EventFilter {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.severities.is_empty() && self.text_search.is_empty() && self.regex_search.is_none()
    }

    /// Set the regex search pattern, compiling it.
    /// Returns an error if the pattern is invalid.
    pub fn set_regex(&mut self, pattern: &str) -> Result<(), FilterError> {
        if pattern.is_empty() {
            self.regex_search = None;
            return Ok(());
        }
        let regex = Regex::new(pattern).map_err(|e| FilterError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })?;
        self.regex_search = Some(regex);
        Ok(())
    }

    /// Quick-filter for warnings and errors only.
    pub fn problems_only() -> Self {
        let mut severities = HashSet::new();
        severities.insert(Severity::Warn);
        severities.insert(Severity::Err);
        Self {
            severities,
            ..Default::default()
        }
    }
}

/// Apply the filter to a display snapshot list, returning indices of
/// matching entries.
///
/// Returns indices into the original slice so callers can keep the
/// most-recent-first ordering without copying.
pub fn apply_filter(entries: &[EntrySnapshot], filter: &EventFilter) -> Vec<usize> {
    if filter.is_empty() {
        return (0..entries.len()).collect();
    }

    let text_lower = filter.text_search.to_lowercase();

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches_all(entry, filter, &text_lower))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check if a single snapshot matches all active filters.
fn matches_all(entry: &EntrySnapshot, filter: &EventFilter, text_lower: &str) -> bool {
    if !filter.severities.is_empty() && !filter.severities.contains(&entry.severity) {
        return false;
    }

    if !text_lower.is_empty() && !entry.message.to_lowercase().contains(text_lower) {
        return false;
    }

    if let Some(ref regex) = filter.regex_search {
        if !regex.is_match(&entry.message) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(severity: Severity, message: &str) -> EntrySnapshot {
        EntrySnapshot {
            time: 1_700_000_000,
            readable_time: "12:00:00".to_string(),
            severity,
            message: message.to_string(),
            count: 0,
        }
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let entries = vec![
            snapshot(Severity::Warn, "problem"),
            snapshot(Severity::Info, "fine"),
        ];
        let result = apply_filter(&entries, &EventFilter::default());
        assert_eq!(result, vec![0, 1]);
    }

    #[test]
    fn test_severity_filter() {
        let entries = vec![
            snapshot(Severity::Warn, "problem"),
            snapshot(Severity::Info, "fine"),
            snapshot(Severity::Err, "broken"),
        ];
        let result = apply_filter(&entries, &EventFilter::problems_only());
        assert_eq!(result, vec![0, 2]);
    }

    #[test]
    fn test_text_search_case_insensitive() {
        let entries = vec![
            snapshot(Severity::Notice, "Bootstrapped 50%"),
            snapshot(Severity::Notice, "Heartbeat: uptime"),
        ];
        let filter = EventFilter {
            text_search: "bootstrapped".to_string(),
            ..Default::default()
        };
        let result = apply_filter(&entries, &filter);
        assert_eq!(result, vec![0]);
    }

    #[test]
    fn test_regex_filter() {
        let entries = vec![
            snapshot(Severity::Notice, "Bootstrapped 50%"),
            snapshot(Severity::Notice, "Bootstrapped 100%"),
        ];
        let mut filter = EventFilter::default();
        filter.set_regex(r"Bootstrapped 1\d{2}%").unwrap();
        let result = apply_filter(&entries, &filter);
        assert_eq!(result, vec![1]);
    }

    #[test]
    fn test_combined_filters() {
        let entries = vec![
            snapshot(Severity::Warn, "Problem bootstrapping. Stuck at 30%"),
            snapshot(Severity::Warn, "missing key, unrelated"),
            snapshot(Severity::Notice, "Problem bootstrapping. Stuck at 80%"),
        ];
        let filter = EventFilter {
            severities: {
                let mut s = HashSet::new();
                s.insert(Severity::Warn);
                s
            },
            text_search: "bootstrapping".to_string(),
            ..Default::default()
        };
        let result = apply_filter(&entries, &filter);
        assert_eq!(result, vec![0]);
    }

    #[test]
    fn test_invalid_regex() {
        let mut filter = EventFilter::default();
        assert!(filter.set_regex("[invalid").is_err());
    }

    #[test]
    fn test_clearing_regex_with_empty_pattern() {
        let mut filter = EventFilter::default();
        filter.set_regex("x+").unwrap();
        filter.set_regex("").unwrap();
        assert!(filter.regex_search.is_none());
        assert!(filter.is_empty());
    }
}
