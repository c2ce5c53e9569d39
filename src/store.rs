//! Ordered entry store keyed by stable ids.
//!
//! Entries keep the order they are shown in, which is also the order the
//! weighted walk uses. Ids are handed out from a counter and never reused, so
//! edits and removals stay well defined after the list is replaced.

use crate::entry::{preset, Entry, EntryEdit, EntryId, EntrySetup};

#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    next_id: u64,
}

impl EntryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the preset colors
    pub fn with_preset() -> Self {
        Self::from_setups(preset())
    }

    pub fn from_setups(setups: impl IntoIterator<Item = EntrySetup>) -> Self {
        let mut store = Self::new();
        for setup in setups {
            store.add(setup);
        }
        store
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Display position of an entry
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Append an entry, returning its new id
    pub fn add(&mut self, setup: EntrySetup) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry::from_setup(id, setup));
        id
    }

    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let index = self.position(id)?;
        Some(self.entries.remove(index))
    }

    /// Replace every entry (bulk parse, import, palette, preset)
    pub fn replace_all(&mut self, setups: impl IntoIterator<Item = EntrySetup>) {
        self.entries.clear();
        for setup in setups {
            self.add(setup);
        }
        tracing::debug!("Entry store replaced, {} entries", self.entries.len());
    }

    /// Restore the preset colors
    pub fn reset_preset(&mut self) {
        self.replace_all(preset());
    }

    /// Apply one field edit. Returns false if the id is unknown.
    pub fn edit(&mut self, id: EntryId, edit: EntryEdit) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        match edit {
            EntryEdit::Hex(hex) => entry.hex = hex,
            EntryEdit::Label(label) => entry.label = label,
            EntryEdit::Weight(weight) => entry.weight = weight,
            EntryEdit::Stock(stock) => entry.stock = stock,
        }
        true
    }

    /// Decrement the stock of a drawn entry
    pub fn consume(&mut self, id: EntryId) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.consume_one();
                true
            }
            None => {
                // Removed between selection and commit
                tracing::warn!("Drawn entry {} no longer in store", id);
                false
            }
        }
    }

    /// Deep copy used as the working set of a batch draw
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Sum of finite stock, or `None` when any entry is unlimited
    pub fn stock_total(&self) -> Option<u64> {
        self.entries
            .iter()
            .map(|e| e.stock.map(u64::from))
            .sum::<Option<u64>>()
    }

    pub fn setups(&self) -> Vec<EntrySetup> {
        self.entries.iter().map(Entry::setup).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(label: &str, stock: Option<u32>) -> EntrySetup {
        EntrySetup {
            hex: "#123456".to_string(),
            label: label.to_string(),
            weight: 1,
            stock,
        }
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut store = EntryStore::new();
        let a = store.add(setup("a", None));
        store.remove(a);
        let b = store.add(setup("b", None));
        assert_ne!(a, b);

        store.replace_all(vec![setup("c", None)]);
        assert!(store.get(b).is_none());
        assert_ne!(store.entries()[0].id, b);
    }

    #[test]
    fn test_edit_and_remove() {
        let mut store = EntryStore::new();
        let a = store.add(setup("a", None));
        let b = store.add(setup("b", Some(3)));

        assert!(store.edit(b, EntryEdit::Weight(5)));
        assert!(store.edit(b, EntryEdit::Stock(None)));
        assert_eq!(store.get(b).unwrap().weight, 5);
        assert_eq!(store.get(b).unwrap().stock, None);

        assert_eq!(store.remove(a).unwrap().label, "a");
        assert_eq!(store.position(b), Some(0));
        assert!(!store.edit(a, EntryEdit::Label("x".into())));
    }

    #[test]
    fn test_stock_total() {
        let mut store = EntryStore::from_setups(vec![setup("a", Some(2)), setup("b", Some(3))]);
        assert_eq!(store.stock_total(), Some(5));
        store.add(setup("c", None));
        assert_eq!(store.stock_total(), None);
        assert_eq!(EntryStore::new().stock_total(), Some(0));
    }

    #[test]
    fn test_consume_unknown_id() {
        let mut store = EntryStore::new();
        let a = store.add(setup("a", Some(1)));
        assert!(store.consume(a));
        assert_eq!(store.get(a).unwrap().stock, Some(0));
        store.remove(a);
        assert!(!store.consume(a));
    }

    #[test]
    fn test_preset() {
        let store = EntryStore::with_preset();
        assert_eq!(store.len(), 6);
        assert!(store.entries().iter().all(|e| e.weight == 1 && e.stock.is_none()));
    }
}
