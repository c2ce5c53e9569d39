//! Bulk entry input: freeform lines, hex lists and generated palettes.
//!
//! Freeform lines are tokenized on whitespace and the tokens may come in any
//! order:
//!
//! ```text
//! Red #ff0000 5      -> #ff0000 "Red"      stock 5
//! #00ff00 x3         -> #00ff00 "#00ff00"  unlimited
//! Blue 8 #0000ff     -> #0000ff "Blue"     stock 8
//! ```
//!
//! The first all-digit token is the stock. When several appear, only the
//! first counts and the rest stay in the label. Multiplier tokens (`x3`,
//! `*3`, `×3`) are dropped without setting the stock.

use regex::Regex;
use std::sync::LazyLock;

use crate::entry::{normalize_hex, parse_count, EntrySetup};

pub use crate::entry::parse_stock;

/// A hex color anywhere inside a token
static HEX_IN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#?(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{3})").expect("valid regex"));

/// Multiplier markers, with or without digits
static MULTIPLIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[xX＊*×]\d*$").expect("valid regex"));

/// Separators of a hex list: ASCII/full-width commas and whitespace
static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,，\s]+").expect("valid regex"));

const PALETTE_SATURATION: f64 = 70.0;
const PALETTE_LIGHTNESS: f64 = 55.0;
/// One color per degree of hue
pub const MAX_PALETTE: usize = 360;

/// Parse one freeform line. Returns `None` for blank lines and lines without
/// a hex color.
pub fn parse_line(line: &str) -> Option<EntrySetup> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let hex_at = find_hex_token(&tokens)?;
    let hex = normalize_hex(tokens[hex_at])?;

    let mut stock = None;
    let mut label_parts = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if i == hex_at || MULTIPLIER.is_match(token) {
            continue;
        }
        if stock.is_none() && token.chars().all(|c| c.is_ascii_digit()) {
            stock = Some(parse_count(token));
            continue;
        }
        label_parts.push(*token);
    }

    let label = if label_parts.is_empty() {
        hex.clone()
    } else {
        label_parts.join(" ")
    };

    Some(EntrySetup {
        hex,
        label,
        weight: 1,
        stock,
    })
}

/// Index of the color token: `#`-prefixed first, then a bare `rrggbb`, or a
/// bare `rgb` that has a letter in it so plain counts like `100` stay counts.
fn find_hex_token(tokens: &[&str]) -> Option<usize> {
    fn is_hex(token: &str, lens: &[usize]) -> bool {
        lens.contains(&token.len()) && token.chars().all(|c| c.is_ascii_hexdigit())
    }

    tokens
        .iter()
        .position(|&t| t.strip_prefix('#').is_some_and(|rest| is_hex(rest, &[3, 6])))
        .or_else(|| tokens.iter().position(|&t| is_hex(t, &[6])))
        .or_else(|| {
            tokens
                .iter()
                .position(|&t| is_hex(t, &[3]) && t.chars().any(|c| c.is_ascii_alphabetic()))
        })
}

/// Parse every line of a block of text, skipping lines that don't parse
pub fn parse_bulk(text: &str) -> Vec<EntrySetup> {
    text.lines().filter_map(parse_line).collect()
}

/// Parse a comma/whitespace separated list of colors sharing one stock.
/// Tokens without a hex color are skipped.
pub fn parse_hex_list(list: &str, stock: Option<u32>) -> Vec<EntrySetup> {
    LIST_SEPARATOR
        .split(list)
        .filter(|t| !t.is_empty())
        .filter_map(|token| HEX_IN_TOKEN.find(token))
        .filter_map(|m| normalize_hex(m.as_str()))
        .map(|hex| EntrySetup {
            label: hex.to_uppercase(),
            hex,
            weight: 1,
            stock,
        })
        .collect()
}

/// `count` colors with evenly spaced hues, labeled `Color 1..count`.
/// `count` is clamped to `1..=MAX_PALETTE`.
pub fn generate_palette(count: usize, stock: Option<u32>) -> Vec<EntrySetup> {
    let count = count.clamp(1, MAX_PALETTE);
    (0..count)
        .map(|i| {
            let hue = (360.0 * i as f64 / count as f64).round();
            EntrySetup {
                hex: hsl_to_hex(hue, PALETTE_SATURATION, PALETTE_LIGHTNESS),
                label: format!("Color {}", i + 1),
                weight: 1,
                stock,
            }
        })
        .collect()
}

/// HSL (degrees, percent, percent) to `#rrggbb`
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let s = s / 100.0;
    let l = l / 100.0;
    let a = s * l.min(1.0 - l);
    let channel = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let v = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * v).round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0.0), channel(8.0), channel(4.0))
}
