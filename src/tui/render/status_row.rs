use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::compose::ComposerState;
use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = match (&app.status, app.composer.state()) {
        (Some(status), _) => vec![Span::styled(
            status.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )],
        (None, ComposerState::Querying) => vec![Span::styled(
            "searching\u{2026}",
            Style::default().fg(app.theme.dim).bg(bg),
        )],
        (None, ComposerState::Suggesting) => vec![Span::styled(
            "\u{2191}\u{2193} select  Enter/Tab insert  Esc close",
            Style::default().fg(app.theme.dim).bg(bg),
        )],
        (None, ComposerState::Idle) => vec![Span::styled(
            "Enter send  @ mention  Esc quit",
            Style::default().fg(app.theme.dim).bg(bg),
        )],
    };

    // Right-aligned count of people mentioned in this draft
    let count = app.composer.mentioned().len();
    if count > 0 {
        let hint = format!("{} mentioned", count);
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(&hint);
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.mention).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    fn status_text(app: &App) -> String {
        render_to_string(50, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn idle_shows_key_hints() {
        let app = test_app();
        assert_snapshot!(status_text(&app), @"Enter send  @ mention  Esc quit");
    }

    #[test]
    fn querying_shows_spinner_text() {
        let mut app = test_app();
        app.composer.set_text("@al", 3);
        assert_eq!(status_text(&app), "searching\u{2026}");
    }

    #[test]
    fn status_message_wins_and_count_is_right_aligned() {
        let mut app = test_app();
        let request = app.composer.set_text("@bo", 3).unwrap();
        app.composer
            .apply_results(request.seq, Ok(vec![test_users()[2].clone()]));
        let commit = app.composer.commit().unwrap();
        app.on_mention(&commit);
        assert_snapshot!(status_text(&app), @"mentioning Bob Stone                   1 mentioned");
    }
}
