pub mod input_line;
pub mod preview;
pub mod status_row;
pub mod suggestions;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function: dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: messages | input box (3 rows) | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    preview::render_messages(frame, app, chunks[0]);
    input_line::render_input_line(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    // Suggestions go last so they draw over the messages
    suggestions::render_suggestions(frame, app, chunks[1]);
}
