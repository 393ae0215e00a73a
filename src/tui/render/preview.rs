use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{MentionSegment, Segment};
use crate::model::user::MentionableUser;
use crate::parse::render_segments;
use crate::tui::app::App;
use crate::tui::theme::Theme;

/// ` (label · role)` after a resolved chip; the label is left out when the
/// handle already spells it
fn mention_meta(literal: &str, user: &MentionableUser) -> Option<String> {
    let handle = literal.strip_prefix('@').unwrap_or(literal);
    let label = user.label();
    let mut parts = Vec::new();
    if !handle.eq_ignore_ascii_case(label) {
        parts.push(label);
    }
    if let Some(role) = user.role.as_deref().filter(|r| !r.is_empty()) {
        parts.push(role);
    }
    (!parts.is_empty()).then(|| format!(" ({})", parts.join(" \u{b7} ")))
}

/// Spans for one message: known mentions as chips, unknown ones dimmed with a `?`
fn message_line(text: &str, users: &[MentionableUser], theme: &Theme) -> Line<'static> {
    let bg = theme.background;
    let spans: Vec<Span> = render_segments(text, users)
        .flat_map(|segment| match segment {
            Segment::Text(t) => vec![Span::styled(t.to_string(), Style::default().fg(theme.text).bg(bg))],
            Segment::Mention(MentionSegment {
                literal,
                user: Some(user),
                ..
            }) => {
                let mut spans = vec![Span::styled(
                    literal.to_string(),
                    Style::default()
                        .fg(theme.mention)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                )];
                if let Some(meta) = mention_meta(literal, user) {
                    spans.push(Span::styled(meta, Style::default().fg(theme.dim).bg(bg)));
                }
                spans
            }
            Segment::Mention(m) => {
                let style = Style::default()
                    .fg(theme.mention_unknown)
                    .bg(bg)
                    .add_modifier(Modifier::ITALIC);
                vec![Span::styled(m.literal.to_string(), style), Span::styled("?", style)]
            }
        })
        .collect();
    Line::from(spans)
}

/// Render the sent messages, newest at the bottom
pub fn render_messages(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(format!(" {} ", app.workspace_name))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);

    let lines: Vec<Line> = if app.messages.is_empty() {
        vec![Line::from(Span::styled(
            "No messages yet. Type @ to mention someone.",
            Style::default().fg(app.theme.dim).bg(bg),
        ))]
    } else {
        let users = app.users_snapshot();
        let skip = app.messages.len().saturating_sub(inner.height as usize);
        app.messages[skip..]
            .iter()
            .map(|m| message_line(m, &users, &app.theme))
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    #[test]
    fn chips_carry_metadata_and_unknown_mentions_get_a_marker() {
        let mut app = test_app();
        app.messages.push("hi @jane and @ghost".into());
        let output = render_to_string(50, 4, |frame, area| {
            render_messages(frame, &app, area);
        });
        assert_snapshot!(output, @r"
        ┌ Test ──────────────────────────────────────────┐
        │hi @jane (Jane Doe · admin) and @ghost?         │
        │                                                │
        └────────────────────────────────────────────────┘
        ");
    }

    #[test]
    fn resolved_mentions_use_mention_color() {
        let theme = Theme::default();
        let users = test_users();
        let line = message_line("ping @bob", &users, &theme);
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "@bob");
        assert_eq!(line.spans[1].style.fg, Some(theme.mention));
        assert_eq!(line.spans[2].content, " (Bob Stone)");
        assert_eq!(line.spans[2].style.fg, Some(theme.dim));
    }

    #[test]
    fn metadata_skips_label_already_in_the_handle() {
        let alex = MentionableUser::new("u2").with_username("alex");
        assert_eq!(mention_meta("@Alex", &alex), None);

        let lead = MentionableUser::new("u5").with_username("kim").with_role("lead");
        assert_eq!(mention_meta("@kim", &lead), Some(" (lead)".into()));

        let jane = &test_users()[0];
        assert_eq!(
            mention_meta("@jane", jane),
            Some(" (Jane Doe \u{b7} admin)".into())
        );
    }

    #[test]
    fn only_newest_messages_fit() {
        let mut app = test_app();
        for i in 0..5 {
            app.messages.push(format!("message {}", i));
        }
        let output = render_to_string(30, 4, |frame, area| {
            render_messages(frame, &app, area);
        });
        assert!(!output.contains("message 2"));
        assert!(output.contains("message 3"));
        assert!(output.contains("message 4"));
    }

    #[test]
    fn empty_list_shows_hint() {
        let app = test_app();
        let output = render_to_string(60, 3, |frame, area| {
            render_messages(frame, &app, area);
        });
        assert!(output.contains("No messages yet"));
    }
}
