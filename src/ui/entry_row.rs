//! Entry row widget
//!
//! Renders one entry of the table on a single line:
//! prefix, color swatch, label, weight and stock (`∞` when unlimited).

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use super::theme::{swatch_color, Theme};
use crate::entry::Entry;

/// Width of the right-aligned weight and stock columns
pub const NUMBER_COLUMN_WIDTH: u16 = 7;

/// Entry row widget
pub struct EntryRow<'a> {
    entry: &'a Entry,
    selected: bool,
    theme: &'a Theme,
    prefix: &'a str,
    glyph: &'a str,
    /// Dim the row when the entry can't be drawn right now
    eligible: bool,
}

impl<'a> EntryRow<'a> {
    pub fn new(entry: &'a Entry, theme: &'a Theme) -> Self {
        Self {
            entry,
            selected: false,
            theme,
            prefix: "",
            glyph: "●",
            eligible: true,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn glyph(mut self, glyph: &'a str) -> Self {
        self.glyph = glyph;
        self
    }

    pub fn eligible(mut self, eligible: bool) -> Self {
        self.eligible = eligible;
        self
    }
}

impl Widget for EntryRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let bg = if self.selected { self.theme.selection_bg } else { self.theme.background };
        let fg = match (self.selected, self.eligible) {
            (true, _) => self.theme.selection_fg,
            (false, true) => self.theme.foreground,
            (false, false) => self.theme.dimmed_alt,
        };
        let base = Style::default().fg(fg).bg(bg);

        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_bg(bg);
            }
        }

        let right = area.x + area.width;
        let mut x = area.x;

        let (px, _) = buf.set_stringn(x, area.y, self.prefix, area.width as usize, base);
        x = px;
        if x >= right {
            return;
        }

        let swatch = Style::default().fg(swatch_color(&self.entry.hex)).bg(bg);
        let (sx, _) = buf.set_stringn(x, area.y, format!("{} ", self.glyph), (right - x) as usize, swatch);
        x = sx;

        // label takes whatever the number columns leave
        let numbers_width = NUMBER_COLUMN_WIDTH * 2;
        let label_width = right.saturating_sub(x).saturating_sub(numbers_width) as usize;
        let label_style = if self.selected { base.add_modifier(Modifier::BOLD) } else { base };
        buf.set_string(x, area.y, truncate(&self.entry.display_label(), label_width), label_style);

        if right.saturating_sub(x) < numbers_width {
            return;
        }
        let weight_x = right - numbers_width;
        let stock = self
            .entry
            .stock
            .map_or_else(|| "∞".to_string(), |s| s.to_string());
        let dim = Style::default().fg(self.theme.dimmed).bg(bg);
        buf.set_string(weight_x, area.y, right_align(&self.entry.weight.to_string()), dim);
        buf.set_string(weight_x + NUMBER_COLUMN_WIDTH, area.y, right_align(&stock), base);
    }
}

fn right_align(s: &str) -> String {
    format!("{:>width$}", s, width = NUMBER_COLUMN_WIDTH as usize - 1)
}

/// Truncate string to fit within max_width, adding ellipsis if needed
pub(crate) fn truncate(s: &str, max_width: usize) -> String {
    let width = s.width();
    if width <= max_width {
        s.to_string()
    } else if max_width == 0 {
        String::new()
    } else if max_width == 1 {
        "…".to_string()
    } else {
        let mut result = String::new();
        let mut current_width = 0;

        for c in s.chars() {
            let char_width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width + 1 > max_width {
                result.push('…');
                break;
            }
            result.push(c);
            current_width += char_width;
        }

        result
    }
}
