use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::user::MentionableUser;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

use super::input_line::token_column;

/// Maximum number of suggestion rows shown at once
const MAX_VISIBLE: usize = 6;

/// Index of the first visible row so that `selected` stays in view
pub fn scroll_start(selected: usize) -> usize {
    if selected >= MAX_VISIBLE {
        selected + 1 - MAX_VISIBLE
    } else {
        0
    }
}

/// Label plus a dimmed detail (`@username` when it adds anything, and the role)
fn entry_parts(user: &MentionableUser) -> (String, Option<String>) {
    let label = user.label().to_string();
    let mut detail = Vec::new();
    if let Some(username) = user.username.as_deref().filter(|u| !u.is_empty() && *u != label) {
        detail.push(format!("@{}", username));
    }
    if let Some(role) = user.role.as_deref().filter(|r| !r.is_empty()) {
        detail.push(format!("· {}", role));
    }
    let detail = (!detail.is_empty()).then(|| detail.join(" "));
    (label, detail)
}

fn entry_width((label, detail): &(String, Option<String>)) -> usize {
    display_width(label) + detail.as_ref().map_or(0, |d| 1 + display_width(d))
}

/// Render the suggestion panel anchored at the active token.
///
/// Drawn below the input box when it fits, otherwise above it. Records the
/// popup rectangle on the app for mouse hit-testing.
pub fn render_suggestions(frame: &mut Frame, app: &mut App, input_area: Rect) {
    app.popup_area = None;
    if !app.composer.is_open() {
        return;
    }

    let entries: Vec<(String, Option<String>)> =
        app.composer.suggestions().iter().map(entry_parts).collect();
    if entries.is_empty() {
        return;
    }
    let selected = app.composer.selected_index();
    let term = frame.area();

    // Border (2) + selection marker (3) + right pad (1)
    let content_w = entries.iter().map(entry_width).max().unwrap_or(0);
    let popup_w = ((content_w + 6) as u16).max(12).min(term.width);
    let visible = entries.len().min(MAX_VISIBLE);
    let popup_h = (visible as u16 + 2).min(term.height);
    let avail = (popup_w as usize).saturating_sub(6);

    let below = input_area.bottom();
    let y = if below + popup_h <= term.bottom() {
        below
    } else {
        input_area.y.saturating_sub(popup_h)
    };
    let x = (input_area.x + token_column(app, input_area))
        .min(term.right().saturating_sub(popup_w));
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    let bg = app.theme.background;
    let first = scroll_start(selected);
    let lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, entry)| {
            let is_selected = i == selected;
            let row_bg = if is_selected { app.theme.selection_bg } else { bg };
            let mut label_style = Style::default().fg(app.theme.text).bg(row_bg);
            if is_selected {
                label_style = label_style
                    .fg(app.theme.text_bright)
                    .add_modifier(Modifier::BOLD);
            }
            let detail_style = Style::default().fg(app.theme.dim).bg(row_bg);
            let marker = if is_selected { " \u{25B8} " } else { "   " };

            let mut spans = vec![Span::styled(
                marker,
                Style::default().fg(app.theme.highlight).bg(row_bg),
            )];
            let width = entry_width(entry);
            let (label, detail) = entry;
            if width > avail {
                let full = match detail {
                    Some(d) => format!("{} {}", label, d),
                    None => label.clone(),
                };
                let cut = truncate_to_width(&full, avail);
                let pad = avail.saturating_sub(display_width(&cut));
                spans.push(Span::styled(cut, label_style));
                spans.push(Span::styled(" ".repeat(pad + 1), label_style));
            } else {
                spans.push(Span::styled(label.clone(), label_style));
                if let Some(d) = detail {
                    spans.push(Span::styled(" ", label_style));
                    spans.push(Span::styled(d.clone(), detail_style));
                }
                spans.push(Span::styled(" ".repeat(avail - width + 1), label_style));
            }
            Line::from(spans)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    app.popup_area = Some(popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    fn open_with(app: &mut App, text: &str, users: Vec<MentionableUser>) {
        let request = app
            .composer
            .set_text(text, text.len())
            .expect("token should trigger a search");
        app.composer.apply_results(request.seq, Ok(users));
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_start(0), 0);
        assert_eq!(scroll_start(5), 0);
        assert_eq!(scroll_start(6), 1);
        assert_eq!(scroll_start(9), 4);
    }

    #[test]
    fn entry_hides_redundant_username() {
        let alex = MentionableUser::new("u2").with_username("alex");
        assert_eq!(entry_parts(&alex), ("alex".into(), None));

        let jane = MentionableUser::new("u1")
            .with_display_name("Jane Doe")
            .with_username("jane")
            .with_role("admin");
        assert_eq!(
            entry_parts(&jane),
            ("Jane Doe".into(), Some("@jane · admin".into()))
        );
    }

    #[test]
    fn popup_above_input_when_no_room_below() {
        let mut app = test_app();
        open_with(
            &mut app,
            "@a",
            vec![
                MentionableUser::new("u1")
                    .with_display_name("Jane Doe")
                    .with_username("jane"),
                MentionableUser::new("u2").with_username("alex"),
            ],
        );
        let output = render_to_string(30, 7, |frame, _| {
            render_suggestions(frame, &mut app, Rect::new(0, 4, 30, 3));
        });
        assert_snapshot!(output, @r"
        ┌──────────────────┐
        │ ▸ Jane Doe @jane │
        │   alex           │
        └──────────────────┘
        ");
        assert_eq!(app.popup_area, Some(Rect::new(0, 0, 20, 4)));
    }

    #[test]
    fn popup_below_input_anchored_at_token() {
        let mut app = test_app();
        open_with(
            &mut app,
            "hey @b",
            vec![MentionableUser::new("u3").with_username("bob")],
        );
        render_to_string(40, 12, |frame, _| {
            render_suggestions(frame, &mut app, Rect::new(0, 0, 40, 3));
        });
        // Left border sits just before the '@' column
        assert_eq!(app.popup_area, Some(Rect::new(4, 3, 12, 3)));
    }

    #[test]
    fn nothing_drawn_when_closed() {
        let mut app = test_app();
        app.popup_area = Some(Rect::new(0, 0, 5, 5));
        let output = render_to_string(30, 7, |frame, _| {
            render_suggestions(frame, &mut app, Rect::new(0, 4, 30, 3));
        });
        assert_eq!(output, "");
        assert_eq!(app.popup_area, None);
    }
}
