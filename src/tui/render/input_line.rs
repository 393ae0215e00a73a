use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::compose::ComposerState;
use crate::tui::app::App;
use crate::util::unicode::{display_col, display_width, next_grapheme_boundary};

/// First byte to draw so that the cursor stays within `width` cells
pub(super) fn visible_from(text: &str, cursor: usize, width: usize) -> usize {
    let mut start = 0;
    while width > 0 && display_width(&text[start..cursor]) >= width {
        match next_grapheme_boundary(text, start) {
            Some(next) if next <= cursor => start = next,
            _ => break,
        }
    }
    start
}

/// Column (relative to the input box) where the active token's `@` is drawn
pub(super) fn token_column(app: &App, input_area: Rect) -> u16 {
    let Some(token) = app.composer.token() else {
        return 0;
    };
    let text = app.composer.text();
    let inner_w = input_area.width.saturating_sub(2) as usize;
    let start = visible_from(text, app.composer.cursor(), inner_w);
    if token.start_index < start {
        return 0;
    }
    display_col(&text[start..], token.start_index - start) as u16
}

/// Render the single-line message input with the active token highlighted
pub fn render_input_line(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let base = Style::default().fg(app.theme.text_bright).bg(bg);
    let token_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::UNDERLINED);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);

    let text = app.composer.text();
    let cursor = app.composer.cursor();
    let start = visible_from(text, cursor, inner.width as usize);

    // Highlight the token only while it is driving a search or the panel
    let token_range = app
        .composer
        .token()
        .filter(|_| app.composer.state() != ComposerState::Idle)
        .map(|t| t.range());

    let mut pieces = Vec::new();
    match token_range {
        Some(range) => {
            pieces.push((0..range.start, base));
            pieces.push((range.clone(), token_style));
            pieces.push((range.end..text.len(), base));
        }
        None => pieces.push((0..text.len(), base)),
    }

    let spans: Vec<Span> = pieces
        .into_iter()
        .filter_map(|(range, style)| {
            let from = range.start.max(start);
            (from < range.end).then(|| Span::styled(text[from..range.end].to_string(), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    let col = display_col(&text[start..], cursor - start) as u16;
    frame.set_cursor_position(Position::new(
        (inner.x + col).min(inner.right().saturating_sub(1)),
        inner.y,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn short_text_starts_at_zero() {
        assert_eq!(visible_from("hello", 5, 10), 0);
    }

    #[test]
    fn long_text_scrolls_to_keep_cursor_visible() {
        let text = "abcdefghij";
        // 10 cells of text, 5 cells of room: cursor at end needs start 6
        let start = visible_from(text, 10, 5);
        assert_eq!(start, 6);
        assert!(display_width(&text[start..10]) < 5);
    }

    #[test]
    fn draws_text_and_highlights_nothing_when_idle() {
        let mut app = test_app();
        app.composer.set_text("hello @bob", 10);
        let output = render_to_string(20, 3, |frame, area| {
            render_input_line(frame, &app, area);
        });
        assert!(output.contains("hello @bob"));
    }

    #[test]
    fn token_column_tracks_the_at_sign() {
        let mut app = test_app();
        app.composer.set_text("cc @al", 6);
        assert_eq!(token_column(&app, Rect::new(0, 0, 30, 3)), 3);
    }
}
