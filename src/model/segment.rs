use super::user::MentionableUser;

/// A completed `@handle` found in committed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionSegment<'a> {
    /// The matched text, including the `@`
    pub literal: &'a str,
    /// Lowercased handle without the `@`, used as the lookup key
    pub username: String,
    /// The known user this handle resolved to, if any
    pub user: Option<&'a MentionableUser>,
}

impl MentionSegment<'_> {
    pub fn is_resolved(&self) -> bool {
        self.user.is_some()
    }
}

/// One piece of committed text, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Mention(MentionSegment<'a>),
}
