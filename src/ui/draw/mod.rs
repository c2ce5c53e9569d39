//! Drawing functions for the TUI
//!
//! - `table` - Option header and entry table
//! - `drum` - Spinning drum and revealed ball
//! - `results` - Latest batch and draw history
//! - `status` - Prompt / notice line and key hints

mod drum;
mod results;
mod status;
mod table;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};
use std::time::Instant;

use crate::app::App;

/// Main draw function
pub fn draw(f: &mut Frame, app: &mut App) {
    let now = Instant::now();
    let theme = app.theme().clone();

    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(theme.background)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Options header
            Constraint::Min(6),    // Entries | drum, batch, history
            Constraint::Length(1), // Prompt / notice
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(body[1]);

    table::draw_header(f, app, chunks[0], &theme);
    table::draw_entry_table(f, app, body[0], &theme);
    drum::draw_drum(f, app, side[0], &theme, now);
    results::draw_batch(f, app, side[1], &theme);
    results::draw_history(f, app, side[2], &theme);
    status::draw_message_line(f, app, chunks[2], &theme);
    status::draw_status_bar(f, app, chunks[3], &theme);
}
