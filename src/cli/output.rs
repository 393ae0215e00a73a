use serde::Serialize;

use crate::model::segment::Segment;
use crate::model::token::InProgressToken;
use crate::model::user::MentionableUser;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TokenJson<'a> {
    pub text: &'a str,
    pub cursor: usize,
    pub token: Option<&'a InProgressToken>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SegmentJson<'a> {
    Text {
        text: &'a str,
    },
    Mention {
        text: &'a str,
        username: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        user: Option<&'a MentionableUser>,
    },
}

impl<'a> From<Segment<'a>> for SegmentJson<'a> {
    fn from(segment: Segment<'a>) -> Self {
        match segment {
            Segment::Text(text) => SegmentJson::Text { text },
            Segment::Mention(m) => SegmentJson::Mention {
                text: m.literal,
                username: m.username,
                user: m.user,
            },
        }
    }
}

#[derive(Serialize)]
pub struct RenderJson<'a> {
    pub segments: Vec<SegmentJson<'a>>,
    pub mentioned: Vec<&'a MentionableUser>,
}

#[derive(Serialize)]
pub struct CompleteJson<'a> {
    pub text: &'a str,
    pub cursor: usize,
    pub user: &'a MentionableUser,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One-line summary of a user: `id  label (@username) [role]`
pub fn format_user(user: &MentionableUser) -> String {
    let label = user.label();
    let mut line = format!("{}  {}", user.id, label);
    if let Some(username) = user.username.as_deref().filter(|u| !u.is_empty() && *u != label) {
        line.push_str(&format!(" (@{})", username));
    }
    if let Some(role) = user.role.as_deref().filter(|r| !r.is_empty()) {
        line.push_str(&format!(" [{}]", role));
    }
    line
}

/// Describe a token, or "no active mention"
pub fn format_token(token: Option<&InProgressToken>) -> String {
    match token {
        Some(t) => format!(
            "@{} [{}..{}]",
            t.query, t.start_index, t.end_index
        ),
        None => "no active mention".to_string(),
    }
}

/// The text followed by one indented line per mention showing how it resolved
pub fn format_segments(segments: &[Segment<'_>]) -> Vec<String> {
    let mut text = String::new();
    let mut details = Vec::new();
    for segment in segments {
        match segment {
            Segment::Text(t) => text.push_str(t),
            Segment::Mention(m) => {
                text.push_str(m.literal);
                let resolved = match m.user {
                    Some(user) => match user.role.as_deref().filter(|r| !r.is_empty()) {
                        Some(role) => format!("{} ({})", user.label(), role),
                        None => user.label().to_string(),
                    },
                    None => "(unknown)".to_string(),
                };
                details.push(format!("  {} \u{2192} {}", m.literal, resolved));
            }
        }
    }
    let mut lines = vec![text];
    lines.extend(details);
    lines
}
