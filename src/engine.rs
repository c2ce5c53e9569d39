//! Draw engine: pool filtering, weighted sampling, single and batch draws.
//!
//! Every draw is split in two steps. Selection picks entries without touching
//! shared state; commit records them in the history and consumes stock. The
//! UI runs its spin animation between the two, and a batch selects all of its
//! picks against a snapshot before anything is committed.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use thiserror::Error;

use crate::batch::Batch;
use crate::entry::{Entry, EntryId};
use crate::history::{DrawHistory, DrawResult};
use crate::store::EntryStore;

/// Why a draw could not produce a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("nothing to draw (all weights are 0 or everything is out of stock)")]
    NoEligibleEntries,
    #[error("draw failed: no valid weights")]
    SamplingFailed,
}

/// Entries that may be drawn next, in store order
pub fn pool_for_draw(entries: &[Entry], respect_stock: bool) -> Vec<&Entry> {
    entries
        .iter()
        .filter(|e| e.is_eligible(respect_stock))
        .collect()
}

pub fn weight_sum(pool: &[&Entry]) -> u64 {
    pool.iter().map(|e| u64::from(e.weight)).sum()
}

/// Pick one entry with probability proportional to its weight.
///
/// Draws `r` in `[0, total)` and walks the pool in order, subtracting weights
/// until the remainder drops to zero or below. Returns `None` only when the
/// total weight is zero.
pub fn weighted_pick<'a, R: Rng + ?Sized>(pool: &[&'a Entry], rng: &mut R) -> Option<&'a Entry> {
    let total = weight_sum(pool);
    if total == 0 {
        return None;
    }

    let mut remainder = rng.random::<f64>() * total as f64;
    for &entry in pool {
        // zero weights never own a slice of [0, total)
        if entry.weight == 0 {
            continue;
        }
        remainder -= f64::from(entry.weight);
        if remainder <= 0.0 {
            return Some(entry);
        }
    }

    // float rounding can leave a sliver past the last boundary
    pool.last().copied()
}

/// Batch draw settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOptions {
    pub count: usize,
    pub no_repeat: bool,
    pub respect_stock: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            count: 1,
            no_repeat: true,
            respect_stock: true,
        }
    }
}

/// A batch ran out of eligible entries before reaching the requested count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub completed: usize,
    pub requested: usize,
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stopped after {} of {} draws: not enough eligible entries (no-repeat / stock limit)",
            self.completed, self.requested
        )
    }
}

/// A single pick waiting to be committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub entry: Entry,
    respect_stock: bool,
}

/// Picks of a batch, selected but not yet committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    picks: Vec<Entry>,
    requested: usize,
    respect_stock: bool,
    truncated: Option<Truncation>,
}

impl BatchPlan {
    /// The pick revealed by the animation
    pub fn last(&self) -> Option<&Entry> {
        self.picks.last()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn truncated(&self) -> Option<Truncation> {
        self.truncated
    }
}

/// Select up to `options.count` picks against `snapshot`, a private copy of
/// the entries.
///
/// Stock taken during the batch only affects the copy. With `no_repeat`, an
/// entry picked earlier in the batch is out of the pool. The batch stops
/// early, reporting a [`Truncation`], when the pool runs dry.
pub fn plan_batch<R: Rng + ?Sized>(
    mut snapshot: Vec<Entry>,
    options: &DrawOptions,
    rng: &mut R,
) -> BatchPlan {
    let requested = options.count.max(1);
    // only repeats can push a batch past the snapshot size
    let mut picks: Vec<Entry> = Vec::with_capacity(requested.min(snapshot.len()));
    let mut picked: Vec<EntryId> = Vec::new();
    let mut truncated = None;

    for i in 0..requested {
        let mut pool = pool_for_draw(&snapshot, options.respect_stock);
        if options.no_repeat {
            pool.retain(|e| !picked.contains(&e.id));
        }
        if pool.is_empty() {
            truncated = Some(Truncation {
                completed: i,
                requested,
            });
            break;
        }

        let Some(pick) = weighted_pick(&pool, rng).cloned() else {
            break;
        };
        if options.respect_stock {
            if let Some(slot) = snapshot.iter_mut().find(|e| e.id == pick.id) {
                slot.consume_one();
            }
        }
        picked.push(pick.id);
        picks.push(pick);
    }

    BatchPlan {
        picks,
        requested,
        respect_stock: options.respect_stock,
        truncated,
    }
}

/// What a committed batch did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub drawn: usize,
    pub truncated: Option<Truncation>,
}

/// Live draw state: entries, history, the latest batch and the random source
pub struct Session<R = StdRng> {
    store: EntryStore,
    history: DrawHistory,
    batch: Batch,
    rng: R,
}

impl Session<StdRng> {
    /// Session with a fixed seed, or seeded from the OS when `seed` is `None`
    pub fn seeded(store: EntryStore, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => {
                tracing::info!("Using fixed draw seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        Self::new(store, rng)
    }
}

impl<R: Rng> Session<R> {
    pub fn new(store: EntryStore, rng: R) -> Self {
        Self {
            store,
            history: DrawHistory::new(),
            batch: Batch::default(),
            rng,
        }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntryStore {
        &mut self.store
    }

    pub fn history(&self) -> &DrawHistory {
        &self.history
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn clear_batch(&mut self) {
        self.batch.clear();
    }

    /// Total weight of the entries currently eligible
    pub fn effective_weight(&self, respect_stock: bool) -> u64 {
        weight_sum(&pool_for_draw(self.store.entries(), respect_stock))
    }

    /// Choose the next single pick without committing it
    pub fn select_once(&mut self, respect_stock: bool) -> Result<Selection, DrawError> {
        let pool = pool_for_draw(self.store.entries(), respect_stock);
        if pool.is_empty() {
            return Err(DrawError::NoEligibleEntries);
        }
        let entry = weighted_pick(&pool, &mut self.rng)
            .cloned()
            .ok_or(DrawError::SamplingFailed)?;
        Ok(Selection {
            entry,
            respect_stock,
        })
    }

    /// Record a selected pick and take its stock
    pub fn commit_single(&mut self, selection: Selection, now: DateTime<Utc>) -> DrawResult {
        let result = DrawResult::from_entry(&selection.entry, now);
        self.history.record(result.clone());
        if selection.respect_stock {
            self.store.consume(selection.entry.id);
        }
        tracing::info!("Drew {} ({})", result.label, result.hex);
        result
    }

    pub fn plan_batch(&mut self, options: &DrawOptions) -> BatchPlan {
        plan_batch(self.store.snapshot(), options, &mut self.rng)
    }

    /// Apply a batch plan to the live state.
    ///
    /// Every pick goes to the history in draw order and takes its stock from
    /// the store. An empty plan leaves the previous batch in place.
    pub fn commit_batch(&mut self, plan: BatchPlan, now: DateTime<Utc>) -> BatchOutcome {
        let outcome = BatchOutcome {
            drawn: plan.picks.len(),
            truncated: plan.truncated,
        };
        if plan.picks.is_empty() {
            return outcome;
        }

        for pick in &plan.picks {
            self.history.record(DrawResult::from_entry(pick, now));
            if plan.respect_stock {
                self.store.consume(pick.id);
            }
        }
        self.batch = Batch::from_picks(&plan.picks, now);

        tracing::info!(
            "Batch drew {} of {} requested",
            outcome.drawn,
            plan.requested
        );
        outcome
    }

    /// Plan and commit a batch in one step
    pub fn draw_batch(&mut self, options: &DrawOptions) -> BatchOutcome {
        let plan = self.plan_batch(options);
        self.commit_batch(plan, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntrySetup;

    fn setup(label: &str, weight: u32, stock: Option<u32>) -> EntrySetup {
        EntrySetup {
            hex: format!("#{:0>6}", label.len()),
            label: label.to_string(),
            weight,
            stock,
        }
    }

    fn draw_once(s: &mut Session, respect_stock: bool) -> Result<DrawResult, DrawError> {
        let selection = s.select_once(respect_stock)?;
        Ok(s.commit_single(selection, Utc::now()))
    }

    fn session(setups: Vec<EntrySetup>) -> Session<StdRng> {
        Session::new(EntryStore::from_setups(setups), StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_pool_filter() {
        let store = EntryStore::from_setups(vec![
            setup("zero", 0, None),
            setup("empty", 1, Some(0)),
            setup("ok", 1, Some(1)),
            setup("free", 2, None),
        ]);
        let labels = |pool: Vec<&Entry>| pool.iter().map(|e| e.label.clone()).collect::<Vec<_>>();

        assert_eq!(labels(pool_for_draw(store.entries(), true)), ["ok", "free"]);
        assert_eq!(labels(pool_for_draw(store.entries(), false)), ["empty", "ok", "free"]);
    }

    #[test]
    fn test_weighted_pick_zero_total() {
        let store = EntryStore::from_setups(vec![setup("a", 0, None)]);
        let pool: Vec<&Entry> = store.entries().iter().collect();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(weighted_pick(&pool, &mut rng).is_none());
        assert!(weighted_pick(&[], &mut rng).is_none());
    }

    #[test]
    fn test_weighted_pick_ratio() {
        let store = EntryStore::from_setups(vec![setup("A", 1, None), setup("B", 3, None)]);
        let pool = pool_for_draw(store.entries(), true);
        let mut rng = StdRng::seed_from_u64(42);

        let trials = 100_000;
        let a_count = (0..trials)
            .filter(|_| weighted_pick(&pool, &mut rng).unwrap().label == "A")
            .count();
        let ratio = a_count as f64 / trials as f64;
        assert!((ratio - 0.25).abs() < 0.01, "A ratio was {ratio}");
    }

    #[test]
    fn test_draw_once_consumes_stock() {
        let mut s = session(vec![setup("a", 1, Some(2))]);
        let result = draw_once(&mut s, true).unwrap();
        assert_eq!(result.label, "a");
        assert_eq!(s.store().entries()[0].stock, Some(1));
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_draw_once_ignoring_stock() {
        let mut s = session(vec![setup("a", 1, Some(0))]);
        draw_once(&mut s, false).unwrap();
        assert_eq!(s.store().entries()[0].stock, Some(0));
    }

    #[test]
    fn test_draw_once_unlimited_untouched() {
        let mut s = session(vec![setup("a", 1, None)]);
        draw_once(&mut s, true).unwrap();
        assert_eq!(s.store().entries()[0].stock, None);
    }

    #[test]
    fn test_draw_once_nothing_eligible() {
        let mut s = session(vec![setup("a", 0, None), setup("b", 1, Some(0))]);
        assert_eq!(draw_once(&mut s, true), Err(DrawError::NoEligibleEntries));
        assert!(s.history().is_empty());
        assert_eq!(s.store().entries()[1].stock, Some(0));
    }

    #[test]
    fn test_select_does_not_commit() {
        let mut s = session(vec![setup("a", 1, Some(1))]);
        let selection = s.select_once(true).unwrap();
        assert!(s.history().is_empty());
        assert_eq!(s.store().entries()[0].stock, Some(1));

        s.commit_single(selection, Utc::now());
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.store().entries()[0].stock, Some(0));
    }

    #[test]
    fn test_batch_no_repeat_truncates() {
        let mut s = session(vec![setup("a", 1, None), setup("bb", 1, None), setup("ccc", 1, None)]);
        let outcome = s.draw_batch(&DrawOptions {
            count: 5,
            no_repeat: true,
            respect_stock: true,
        });

        assert_eq!(outcome.drawn, 3);
        assert_eq!(
            outcome.truncated,
            Some(Truncation {
                completed: 3,
                requested: 5
            })
        );
        assert_eq!(s.batch().total(), 3);
        assert_eq!(s.batch().counts().len(), 3);
        assert!(s.batch().counts().iter().all(|g| g.count == 1));
        assert_eq!(s.history().len(), 3);
    }

    #[test]
    fn test_batch_huge_count_stops_at_pool_size() {
        let mut s = session(vec![setup("a", 1, None), setup("bb", 1, None)]);
        let requested = usize::MAX / 2;
        let outcome = s.draw_batch(&DrawOptions {
            count: requested,
            no_repeat: true,
            respect_stock: true,
        });

        assert_eq!(outcome.drawn, 2);
        assert_eq!(
            outcome.truncated,
            Some(Truncation {
                completed: 2,
                requested
            })
        );
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_batch_no_repeat_keys_on_id() {
        let red = || EntrySetup::new("#ff0000".to_string(), "Red", 1, None);
        let mut s = session(vec![red(), red()]);
        let outcome = s.draw_batch(&DrawOptions {
            count: 3,
            no_repeat: true,
            respect_stock: true,
        });

        // identical twins are still two separate entries
        assert_eq!(outcome.drawn, 2);
        assert_eq!(outcome.truncated.map(|t| t.completed), Some(2));
        assert_eq!(s.batch().counts().len(), 1);
        assert_eq!(s.batch().counts()[0].count, 2);
        assert_eq!(s.batch().counts()[0].hex, "#ff0000");
    }

    #[test]
    fn test_batch_repeats_single_entry() {
        let mut s = session(vec![setup("only", 1, None)]);
        let outcome = s.draw_batch(&DrawOptions {
            count: 3,
            no_repeat: false,
            respect_stock: true,
        });

        assert_eq!(outcome.drawn, 3);
        assert_eq!(outcome.truncated, None);
        assert!(s.batch().items().iter().all(|i| i.label == "only"));
        assert_eq!(s.batch().counts().len(), 1);
        assert_eq!(s.batch().counts()[0].count, 3);
    }

    #[test]
    fn test_batch_stock_depletes_snapshot_then_store() {
        let mut s = session(vec![setup("a", 1, Some(2))]);
        let plan = s.plan_batch(&DrawOptions {
            count: 4,
            no_repeat: false,
            respect_stock: true,
        });

        // planning leaves the live store alone
        assert_eq!(plan.picks.len(), 2);
        assert_eq!(s.store().entries()[0].stock, Some(2));

        let outcome = s.commit_batch(plan, Utc::now());
        assert_eq!(outcome.truncated.unwrap().completed, 2);
        assert_eq!(s.store().entries()[0].stock, Some(0));
    }

    #[test]
    fn test_batch_count_clamped_to_one() {
        let mut s = session(vec![setup("a", 1, None)]);
        let outcome = s.draw_batch(&DrawOptions {
            count: 0,
            no_repeat: false,
            respect_stock: false,
        });
        assert_eq!(outcome.drawn, 1);
        assert_eq!(outcome.truncated, None);
    }

    #[test]
    fn test_empty_batch_keeps_previous() {
        let mut s = session(vec![setup("a", 1, Some(1))]);
        let options = DrawOptions {
            count: 1,
            no_repeat: false,
            respect_stock: true,
        };
        s.draw_batch(&options);
        let previous = s.batch().clone();

        let outcome = s.draw_batch(&options);
        assert_eq!(outcome.drawn, 0);
        assert_eq!(outcome.truncated.unwrap().completed, 0);
        assert_eq!(s.batch(), &previous);
    }

    #[test]
    fn test_seeded_sessions_repeat() {
        let setups = vec![setup("a", 1, None), setup("bb", 2, None), setup("ccc", 3, None)];
        let options = DrawOptions {
            count: 20,
            no_repeat: false,
            respect_stock: false,
        };
        let mut first = Session::seeded(EntryStore::from_setups(setups.clone()), Some(99));
        let mut second = Session::seeded(EntryStore::from_setups(setups), Some(99));

        let labels = |plan: BatchPlan| plan.picks.iter().map(|e| e.label.clone()).collect::<Vec<_>>();
        assert_eq!(labels(first.plan_batch(&options)), labels(second.plan_batch(&options)));
    }

    #[test]
    fn test_effective_weight() {
        let s = session(vec![setup("a", 2, Some(0)), setup("b", 3, None)]);
        assert_eq!(s.effective_weight(true), 3);
        assert_eq!(s.effective_weight(false), 5);
    }
}
