use std::sync::{Arc, RwLock};

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::compose::Composer;
use crate::model::user::MentionableUser;
use crate::tui::app::App;
use crate::tui::theme::Theme;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// The four users every TUI test works against.
pub fn test_users() -> Vec<MentionableUser> {
    vec![
        MentionableUser::new("u1")
            .with_display_name("Jane Doe")
            .with_username("jane")
            .with_role("admin"),
        MentionableUser::new("u2")
            .with_display_name("Alex Kim")
            .with_username("alex"),
        MentionableUser::new("u3")
            .with_display_name("Bob Stone")
            .with_username("bob"),
        MentionableUser::new("u4").with_display_name("Ana Lima"),
    ]
}

/// An app named "Test" over [`test_users`] with a default composer.
pub fn test_app() -> App {
    App::new(
        "Test".into(),
        Arc::new(RwLock::new(test_users())),
        Composer::default(),
        Theme::default(),
    )
}
