use std::sync::LazyLock;

use regex::Regex;

use crate::model::segment::{MentionSegment, Segment};
use crate::model::user::MentionableUser;

/// A completed mention: `@` plus one or more handle characters
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_.\-]+").expect("valid mention regex"));

/// Lazily split committed text into plain-text and mention segments.
///
/// Unlike the in-progress tokenizer this pass has no cursor: it matches the
/// fixed handle character class greedily, so `@jane.doe,` yields the mention
/// `@jane.doe` followed by the text `,`. The returned iterator is `Clone`;
/// cloning it (or calling this again) restarts the scan with identical output.
pub fn render_segments<'a>(text: &'a str, known_users: &'a [MentionableUser]) -> Segments<'a> {
    Segments {
        text,
        known_users,
        pos: 0,
    }
}

/// Iterator returned by [`render_segments`]
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    known_users: &'a [MentionableUser],
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.pos >= self.text.len() {
            return None;
        }
        match MENTION_RE.find_at(self.text, self.pos) {
            Some(m) if m.start() > self.pos => {
                let plain = &self.text[self.pos..m.start()];
                self.pos = m.start();
                Some(Segment::Text(plain))
            }
            Some(m) => {
                self.pos = m.end();
                let literal = m.as_str();
                let username = literal[1..].to_lowercase();
                let user = resolve_handle(&username, self.known_users);
                Some(Segment::Mention(MentionSegment {
                    literal,
                    username,
                    user,
                }))
            }
            None => {
                let rest = &self.text[self.pos..];
                self.pos = self.text.len();
                Some(Segment::Text(rest))
            }
        }
    }
}

/// Resolve a lowercased handle against the known users.
///
/// Tried in order across all users: username, display name, then display
/// name with spaces turned into underscores. First hit wins.
pub fn resolve_handle<'a>(handle: &str, users: &'a [MentionableUser]) -> Option<&'a MentionableUser> {
    let by_username = || {
        users.iter().find(|u| {
            u.username
                .as_deref()
                .is_some_and(|n| n.to_lowercase() == handle)
        })
    };
    let by_display = || {
        users.iter().find(|u| {
            u.display_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase() == handle)
        })
    };
    let by_underscored = || {
        users.iter().find(|u| {
            u.display_name
                .as_deref()
                .is_some_and(|n| n.replace(' ', "_").to_lowercase() == handle)
        })
    };
    by_username().or_else(by_display).or_else(by_underscored)
}

/// Distinct resolved users in order of first mention
pub fn mentioned_users<'a>(text: &'a str, known_users: &'a [MentionableUser]) -> Vec<&'a MentionableUser> {
    let mut seen: Vec<&MentionableUser> = Vec::new();
    for segment in render_segments(text, known_users) {
        if let Segment::Mention(MentionSegment { user: Some(user), .. }) = segment
            && !seen.iter().any(|u| u.id == user.id)
        {
            seen.push(user);
        }
    }
    seen
}
