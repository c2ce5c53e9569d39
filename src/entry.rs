//! Colored entries - the things that get drawn.
//!
//! An [`Entry`] lives in the [`EntryStore`](crate::store::EntryStore) and carries
//! a stable id. [`EntrySetup`] is the same data without the id: it is what the
//! bulk parsers produce and what setup files import/export.

use serde::Serialize;
use std::fmt;

/// Opaque entry identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A configured color choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    /// Normalized `#rrggbb`, lowercase
    pub hex: String,
    pub label: String,
    /// Relative likelihood of being drawn
    pub weight: u32,
    /// Remaining draws, `None` means unlimited
    pub stock: Option<u32>,
}

impl Entry {
    pub(crate) fn from_setup(id: EntryId, setup: EntrySetup) -> Self {
        Self {
            id,
            hex: setup.hex,
            label: setup.label,
            weight: setup.weight,
            stock: setup.stock,
        }
    }

    /// Whether this entry may take part in the next draw
    pub fn is_eligible(&self, respect_stock: bool) -> bool {
        self.weight > 0 && (!respect_stock || self.stock.map_or(true, |s| s > 0))
    }

    /// Take one unit of stock. Floors at zero; unlimited stock is untouched.
    pub fn consume_one(&mut self) {
        if let Some(stock) = self.stock.as_mut() {
            *stock = stock.saturating_sub(1);
        }
    }

    /// Label shown on the drawn ball (falls back to the upper-case hex)
    pub fn display_label(&self) -> String {
        if self.label.trim().is_empty() {
            self.hex.to_uppercase()
        } else {
            self.label.clone()
        }
    }

    /// Id-less copy for export
    pub fn setup(&self) -> EntrySetup {
        EntrySetup {
            hex: self.hex.clone(),
            label: self.label.clone(),
            weight: self.weight,
            stock: self.stock,
        }
    }
}

/// Entry data without identity: setup file record and parser output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySetup {
    pub hex: String,
    pub label: String,
    pub weight: u32,
    pub stock: Option<u32>,
}

impl EntrySetup {
    /// Build a setup the way the "add" form does: an empty label becomes the
    /// upper-case hex.
    pub fn new(hex: String, label: &str, weight: u32, stock: Option<u32>) -> Self {
        let label = match label.trim() {
            "" => hex.to_uppercase(),
            trimmed => trimmed.to_string(),
        };
        Self {
            hex,
            label,
            weight,
            stock,
        }
    }

    /// Build a setup from add-form fields. A blank hex is white, a blank
    /// weight is 1 and a blank stock is unlimited. `None` if the hex is invalid.
    pub fn from_form(hex: &str, label: &str, weight: &str, stock: &str) -> Option<Self> {
        let hex = match hex.trim() {
            "" => "#ffffff".to_string(),
            raw => normalize_hex(raw)?,
        };
        let weight = match weight.trim() {
            "" => 1,
            raw => parse_count(raw),
        };
        Some(Self::new(hex, label, weight, parse_stock(stock)))
    }
}

/// One field change on an existing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryEdit {
    Hex(String),
    Label(String),
    Weight(u32),
    Stock(Option<u32>),
}

/// Normalize `#rgb`, `rgb`, `#rrggbb` or `rrggbb` to lowercase `#rrggbb`
pub fn normalize_hex(raw: &str) -> Option<String> {
    let digits = raw.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };
    Some(format!("#{}", expanded.to_ascii_lowercase()))
}

/// Lenient non-negative integer: floors, clamps at zero, and treats anything
/// unparseable as zero.
pub fn parse_count(raw: &str) -> u32 {
    raw.trim().parse::<f64>().map_or(0, clamp_count)
}

/// Floor a number into the `u32` range; NaN and infinities become zero
pub fn clamp_count(v: f64) -> u32 {
    if !v.is_finite() {
        return 0;
    }
    let v = v.floor();
    if v <= 0.0 {
        0
    } else if v >= u32::MAX as f64 {
        u32::MAX
    } else {
        v as u32
    }
}

/// Stock field input: blank means unlimited
pub fn parse_stock(raw: &str) -> Option<u32> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(parse_count(raw))
    }
}

/// Initial set shown on startup and restored by "reset to preset"
pub fn preset() -> Vec<EntrySetup> {
    [
        ("#e74c3c", "Red"),
        ("#3498db", "Blue"),
        ("#2ecc71", "Green"),
        ("#f1c40f", "Yellow"),
        ("#ffffff", "White"),
        ("#9b59b6", "Purple"),
    ]
    .into_iter()
    .map(|(hex, label)| EntrySetup {
        hex: hex.to_string(),
        label: label.to_string(),
        weight: 1,
        stock: None,
    })
    .collect()
}
