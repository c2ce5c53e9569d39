//! Scrolling list layout for the entry table
//!
//! Provides:
//! - Visible window that keeps the selection on screen
//! - Navigation helpers (up/down, page, home/end, tab wrap)

use std::ops::Range;

/// Single-column list layout
#[derive(Debug, Clone, Copy)]
pub struct ListLayout {
    /// Number of visible rows
    pub visible_rows: u16,
}

impl Default for ListLayout {
    fn default() -> Self {
        Self { visible_rows: 10 }
    }
}

impl ListLayout {
    pub fn new(visible_rows: u16) -> Self {
        Self {
            visible_rows: visible_rows.max(1),
        }
    }

    /// Range of rows to display so that `selected` is visible.
    /// Pages through the list rather than scrolling line by line.
    pub fn visible_range(&self, selected: usize, total: usize) -> Range<usize> {
        if total == 0 {
            return 0..0;
        }

        let page_size = self.visible_rows as usize;
        let page = selected.min(total - 1) / page_size;
        let start = page * page_size;
        let end = (start + page_size).min(total);
        start..end
    }

    pub fn move_up(&self, current: usize) -> usize {
        current.saturating_sub(1)
    }

    pub fn move_down(&self, current: usize, total: usize) -> usize {
        if current + 1 < total {
            current + 1
        } else {
            current
        }
    }

    pub fn page_up(&self, current: usize) -> usize {
        current.saturating_sub(self.visible_rows as usize)
    }

    pub fn page_down(&self, current: usize, total: usize) -> usize {
        (current + self.visible_rows as usize).min(total.saturating_sub(1))
    }

    pub fn move_end(&self, total: usize) -> usize {
        total.saturating_sub(1)
    }

    /// Tab navigation (next with wrap)
    pub fn tab_next(&self, current: usize, total: usize) -> usize {
        if total == 0 {
            0
        } else {
            (current + 1) % total
        }
    }

    /// Clamp a selection after the list shrank
    pub fn clamp(&self, current: usize, total: usize) -> usize {
        current.min(total.saturating_sub(1))
    }
}
