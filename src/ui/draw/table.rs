//! Option header and entry table

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::entry_row::{EntryRow, NUMBER_COLUMN_WIDTH};
use crate::ui::theme::Theme;

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Draw options plus the stock and weight summary
pub(crate) fn draw_header(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let options = app.options();
    let store = app.session().store();
    let stock_total = store
        .stock_total()
        .map_or_else(|| "∞".to_string(), |total| total.to_string());

    let label = Style::default().fg(theme.dimmed).bg(theme.background);
    let value = Style::default()
        .fg(theme.foreground)
        .bg(theme.background)
        .add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        Span::styled("Count ", label),
        Span::styled(options.count.to_string(), value),
        Span::styled("   No-repeat ", label),
        Span::styled(on_off(options.no_repeat), value),
        Span::styled("   Respect stock ", label),
        Span::styled(on_off(options.respect_stock), value),
        Span::styled("   │  Stock left ", label),
        Span::styled(stock_total, value),
        Span::styled("   Weight in pool ", label),
        Span::styled(
            app.session().effective_weight(options.respect_stock).to_string(),
            value,
        ),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" garagara ")
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(header, area);
}

/// Draw the entry table, paging so the selection stays visible
pub(crate) fn draw_entry_table(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed_alt))
        .title(format!(" Entries ({}) ", app.entries().len()))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height < 2 {
        return;
    }

    // column titles line up with EntryRow's right-aligned numbers
    let titles = format!(
        "{:<width$}{:>w$} {:>w$} ",
        "",
        "Weight",
        "Stock",
        width = inner.width.saturating_sub(NUMBER_COLUMN_WIDTH * 2) as usize,
        w = NUMBER_COLUMN_WIDTH as usize - 1,
    );
    f.render_widget(
        Paragraph::new(titles).style(Style::default().fg(theme.dimmed_alt).bg(theme.background)),
        Rect { height: 1, ..inner },
    );

    let rows = inner.height - 1;
    app.set_visible_rows(rows);

    if app.entries().is_empty() {
        let hint = Paragraph::new("No entries. a: add   B/L/P: bulk   I: import   R: preset")
            .style(Style::default().fg(theme.dimmed).bg(theme.background));
        f.render_widget(hint, Rect { y: inner.y + 1, height: 1, ..inner });
        return;
    }

    let appearance = &app.config().appearance;
    let respect_stock = app.options().respect_stock;
    let selected = app.selected_index();
    let range = app.list_layout().visible_range(selected, app.entries().len());

    for (row, index) in range.enumerate() {
        let entry = &app.entries()[index];
        let is_selected = index == selected;
        let prefix = if is_selected {
            appearance.selected_prefix.as_str()
        } else {
            appearance.unselected_prefix.as_str()
        };
        let widget = EntryRow::new(entry, theme)
            .selected(is_selected)
            .prefix(prefix)
            .glyph(&appearance.ball_glyph)
            .eligible(entry.is_eligible(respect_stock));
        let row_area = Rect {
            y: inner.y + 1 + row as u16,
            height: 1,
            ..inner
        };
        f.render_widget(widget, row_area);
    }
}
