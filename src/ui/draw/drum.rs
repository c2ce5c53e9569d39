//! Drum animation and the revealed ball

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

use crate::app::App;
use crate::ui::theme::{contrast_text, swatch_color, Theme};

const BALL_ROWS: [&str; 3] = [" ▄█████▄ ", "█████████", " ▀█████▀ "];

pub(crate) fn draw_drum(f: &mut Frame, app: &App, area: Rect, theme: &Theme, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.is_spinning() {
            theme.highlight
        } else {
            theme.dimmed_alt
        }))
        .title(" Draw ")
        .style(Style::default().bg(theme.background));

    let lines = match (app.spin_frame(now), app.ball()) {
        (Some(frame), _) => {
            // cycle through the entry colors while spinning
            let entries = app.entries();
            let color = if entries.is_empty() {
                theme.dimmed
            } else {
                swatch_color(&entries[frame % entries.len()].hex)
            };
            let dots = ".".repeat(frame % 4);
            let mut lines = ball_lines(color, theme);
            lines.push(Line::from(Span::styled(
                format!("Drawing{dots:<3}"),
                Style::default().fg(theme.highlight).bg(theme.background),
            )));
            lines
        }
        (None, Some(ball)) => {
            let color = swatch_color(&ball.hex);
            let mut lines = ball_lines(color, theme);
            lines.push(Line::from(Span::styled(
                format!(" {} ", ball.label),
                Style::default()
                    .fg(contrast_text(color))
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            )));
            lines
        }
        (None, None) => vec![
            Line::raw(""),
            Line::from(Span::styled(
                "Enter: draw one   b: draw batch",
                Style::default().fg(theme.dimmed).bg(theme.background),
            )),
        ],
    };

    let drum = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    f.render_widget(drum, area);
}

fn ball_lines(color: Color, theme: &Theme) -> Vec<Line<'static>> {
    BALL_ROWS
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(color).bg(theme.background))))
        .collect()
}
