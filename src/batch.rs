//! Result of the most recent batch draw.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::entry::Entry;
use crate::history::DrawResult;

/// How many times one (label, color) came up in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountGroup {
    pub label: String,
    pub hex: String,
    pub count: usize,
}

/// Picks of one batch draw, with per-color counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    time: Option<DateTime<Utc>>,
    items: Vec<DrawResult>,
    counts: Vec<CountGroup>,
}

impl Batch {
    /// Aggregate picks in draw order under one shared timestamp.
    ///
    /// Groups are keyed by label plus lowercase hex: the same color under two
    /// labels stays separate, while equal label and color merge even when they
    /// come from different entries. Groups keep first-occurrence order.
    pub fn from_picks(picks: &[Entry], time: DateTime<Utc>) -> Self {
        let items: Vec<DrawResult> = picks
            .iter()
            .map(|pick| DrawResult::from_entry(pick, time))
            .collect();

        let mut counts: Vec<CountGroup> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();
        for pick in picks {
            let key = (pick.label.clone(), pick.hex.to_lowercase());
            let slot = *index.entry(key).or_insert_with(|| {
                counts.push(CountGroup {
                    label: pick.label.clone(),
                    hex: pick.hex.clone(),
                    count: 0,
                });
                counts.len() - 1
            });
            counts[slot].count += 1;
        }

        Self {
            time: Some(time),
            items,
            counts,
        }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    /// Picks in draw order
    pub fn items(&self) -> &[DrawResult] {
        &self.items
    }

    pub fn counts(&self) -> &[CountGroup] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
