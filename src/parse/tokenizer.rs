use crate::model::token::InProgressToken;

/// Clamp a cursor into `text`: past-the-end snaps to `text.len()`, and an
/// offset inside a multi-byte char snaps back to that char's start.
pub fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// Find the `@token` the cursor is currently inside, if any.
///
/// Only the nearest `@` before the cursor is considered, and only when no
/// whitespace separates it from the cursor. The token extends forward from
/// the cursor to the next whitespace (or end of text). A bare `@` yields a
/// token with an empty query; callers decide whether that triggers a search.
pub fn extract_in_progress_token(text: &str, cursor: usize) -> Option<InProgressToken> {
    let cursor = clamp_cursor(text, cursor);
    let before = &text[..cursor];
    let at = before.rfind('@')?;
    let after_at = &before[at + 1..];
    if after_at.chars().any(char::is_whitespace) {
        return None;
    }

    let end_index = text[cursor..]
        .find(char::is_whitespace)
        .map_or(text.len(), |i| cursor + i);

    Some(InProgressToken {
        start_index: at,
        end_index,
        query: after_at.to_lowercase(),
    })
}
