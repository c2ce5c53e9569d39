//! Latest batch summary and the draw history

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::theme::{swatch_color, Theme};

fn clock(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn panel<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed_alt))
        .title(title)
        .style(Style::default().bg(theme.background))
}

/// Counts per color, then every pick in draw order
pub(crate) fn draw_batch(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let batch = app.session().batch();
    let glyph = app.config().appearance.ball_glyph.as_str();
    let title = match batch.time() {
        Some(time) => format!(" Batch ({}) {} ", batch.total(), clock(time)),
        None => " Batch ".to_string(),
    };

    let text = Style::default().fg(theme.foreground).bg(theme.background);
    let dim = Style::default().fg(theme.dimmed).bg(theme.background);

    let mut lines: Vec<Line> = batch
        .counts()
        .iter()
        .map(|group| {
            Line::from(vec![
                Span::styled(format!("{glyph} "), Style::default().fg(swatch_color(&group.hex))),
                Span::styled(group.label.clone(), text),
                Span::styled(
                    format!(" ×{}", group.count),
                    text.add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();

    if batch.is_empty() {
        lines.push(Line::from(Span::styled("No batch yet (b to draw)", dim)));
    } else {
        lines.push(Line::raw(""));
        let order: Vec<Span> = batch
            .items()
            .iter()
            .map(|item| Span::styled(glyph.to_string(), Style::default().fg(swatch_color(&item.hex))))
            .collect();
        lines.push(Line::from(order));
    }

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(title, theme));
    f.render_widget(summary, area);
}

/// Every committed draw, most recent first
pub(crate) fn draw_history(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let history = app.session().history();
    let glyph = app.config().appearance.ball_glyph.as_str();
    let dim = Style::default().fg(theme.dimmed).bg(theme.background);
    let text = Style::default().fg(theme.foreground).bg(theme.background);

    let items: Vec<ListItem> = history
        .iter()
        .map(|result| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", clock(result.time)), dim),
                Span::styled(format!("{glyph} "), Style::default().fg(swatch_color(&result.hex))),
                Span::styled(result.label.clone(), text),
                Span::styled(format!("  {}", result.hex.to_uppercase()), dim),
            ]))
        })
        .collect();

    let list = List::new(items).block(panel(format!(" History ({}) ", history.len()), theme));
    f.render_widget(list, area);
}
