use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::compose::{NavKey, NavOutcome};

use super::app::App;

/// Map a key onto the composer's panel navigation, if it is one
fn nav_key(key: &KeyEvent) -> Option<NavKey> {
    if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(NavKey::Up),
        KeyCode::Down => Some(NavKey::Down),
        KeyCode::Enter => Some(NavKey::Enter),
        KeyCode::Tab => Some(NavKey::Tab),
        KeyCode::Esc => Some(NavKey::Escape),
        _ => None,
    }
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // An open panel gets first pick of navigation keys
    if let Some(nav) = nav_key(&key) {
        match app.composer.handle_nav(nav) {
            NavOutcome::Committed(commit) => {
                app.on_mention(&commit);
                return;
            }
            NavOutcome::Moved | NavOutcome::Dismissed => return,
            NavOutcome::Ignored => {}
        }
    }

    app.status = None;
    let request = match (key.modifiers, key.code) {
        (_, KeyCode::Enter) => {
            app.submit();
            None
        }
        (_, KeyCode::Esc) => {
            // Esc first abandons a search still in flight, then quits
            if !app.composer.dismiss() {
                app.should_quit = true;
            }
            None
        }
        (_, KeyCode::Backspace) => app.composer.backspace(),
        (_, KeyCode::Delete) => app.composer.delete_forward(),
        (_, KeyCode::Left) => app.composer.move_left(),
        (_, KeyCode::Right) => app.composer.move_right(),
        (_, KeyCode::Home) => app.composer.move_home(),
        (_, KeyCode::End) => app.composer.move_end(),
        (m, KeyCode::Char(c)) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.composer.insert_char(c)
        }
        _ => None,
    };
    app.queue(request);
}

/// Handle a mouse event: clicking a suggestion commits it, clicking
/// anywhere else closes the panel.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !app.composer.is_open() {
        return;
    }
    let pos = Position::new(mouse.column, mouse.row);
    match app.popup_area {
        Some(area) if area.contains(pos) => {
            // Rows inside the border map onto visible suggestions
            let row = pos.y.saturating_sub(area.y + 1) as usize;
            let first = super::render::suggestions::scroll_start(app.composer.selected_index());
            if pos.y > area.y
                && pos.y < area.bottom().saturating_sub(1)
                && app.composer.select(first + row)
                && let Some(commit) = app.composer.commit()
            {
                app.on_mention(&commit);
            }
        }
        _ => {
            app.composer.dismiss();
        }
    }
}

/// Handle a bracketed paste: inserted at the cursor, newlines flattened
pub fn handle_paste(app: &mut App, text: &str) {
    if text.is_empty() {
        return;
    }
    let clean = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
    let request = app.composer.insert_str(&clean);
    app.queue(request);
}
