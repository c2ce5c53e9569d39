//! Draw history for the current session.
//!
//! Newest result first, the order the results list and the results CSV use.
//! Nothing is written to disk; the history lives until it is cleared or the
//! program exits.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::entry::Entry;

/// One completed draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawResult {
    pub time: DateTime<Utc>,
    pub label: String,
    pub hex: String,
}

impl DrawResult {
    pub fn from_entry(entry: &Entry, time: DateTime<Utc>) -> Self {
        Self {
            time,
            label: entry.label.clone(),
            hex: entry.hex.clone(),
        }
    }
}

/// Session-lived draw history
#[derive(Debug, Clone, Default)]
pub struct DrawHistory {
    records: VecDeque<DrawResult>,
}

impl DrawHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a draw as the most recent result
    pub fn record(&mut self, result: DrawResult) {
        self.records.push_front(result);
    }

    /// Results, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &DrawResult> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        let cleared = self.records.len();
        self.records.clear();
        tracing::debug!("Cleared {} history records", cleared);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
