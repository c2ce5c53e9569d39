//! Prompt / notice line and the key hint bar

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Notice};
use crate::ui::theme::Theme;

/// Prompt input when one is open, otherwise the latest notice
pub(crate) fn draw_message_line(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    if let Some((kind, buffer)) = app.prompt() {
        let head = format!(" {}: ", kind.title());
        let line = Line::from(vec![
            Span::styled(head.clone(), Style::default().fg(theme.highlight).bg(theme.background)),
            Span::styled(buffer.to_string(), Style::default().fg(theme.foreground).bg(theme.background)),
        ]);
        f.render_widget(Paragraph::new(line), area);

        f.set_cursor_position((prompt_cursor_x(area, head.width() + buffer.width()), area.y));
        return;
    }

    let (text, color) = match app.notice() {
        Some(Notice::Warning(msg)) => (format!(" ⚠ {msg}"), theme.warning),
        Some(Notice::Info(msg)) => (format!(" {msg}"), theme.success),
        None => (String::new(), theme.foreground),
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(color).bg(theme.background)),
        area,
    );
}

/// Cursor column after `used` display cells, kept inside `area`
fn prompt_cursor_x(area: Rect, used: usize) -> u16 {
    let used = u16::try_from(used).unwrap_or(u16::MAX);
    let last = area.x.saturating_add(area.width.saturating_sub(1));
    area.x.saturating_add(used).min(last)
}

/// Draw the key hints
pub(crate) fn draw_status_bar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let status = if app.is_spinning() {
        " Drawing... | q: quit".to_string()
    } else if app.is_prompting() {
        " Enter: apply | Esc: cancel".to_string()
    } else {
        let total = app.entries().len();
        let position = if total == 0 { 0 } else { app.selected_index() + 1 };
        format!(
            " {}/{} | Enter: draw | b: batch | +/-: count | n/s: options | a/d: add/del | \
             e/w/t/h: edit | B/L/P: bulk | I: import | r/X/S: export | c/C: clear | R: preset | q: quit",
            position, total
        )
    };

    let status_bar =
        Paragraph::new(status).style(Style::default().fg(theme.dimmed).bg(theme.background));
    f.render_widget(status_bar, area);
}
