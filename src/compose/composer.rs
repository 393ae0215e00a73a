use tracing::debug;

use crate::model::config::ComposerConfig;
use crate::model::token::InProgressToken;
use crate::model::user::MentionableUser;
use crate::parse::tokenizer::{clamp_cursor, extract_in_progress_token};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

use super::source::SearchError;

/// Where the composer is in a mention session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    /// No active token, or the user closed the panel
    Idle,
    /// A search has been issued for the active token and not answered yet
    Querying,
    /// Results are showing; there is at least one suggestion
    Suggesting,
}

/// When a token is allowed to trigger a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerPolicy {
    /// Search as soon as `@` is typed, with an empty query
    pub trigger_on_bare_at: bool,
}

/// A search the host must run and answer via [`Composer::apply_results`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// Outcome of a successful commit, delivered to the host once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionCommit {
    /// The user that was inserted
    pub user: MentionableUser,
    /// Text after the splice
    pub text: String,
    /// Cursor just past the inserted trailing space
    pub cursor: usize,
    /// Every user mentioned in this session so far, by first commit
    pub mentioned: Vec<MentionableUser>,
}

/// Keys the composer reacts to while the panel is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Enter,
    Tab,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// The panel is closed; the host should handle the key itself
    Ignored,
    Moved,
    Dismissed,
    Committed(MentionCommit),
}

/// Editing session for a mention-aware text field.
///
/// Every text or cursor change re-runs the tokenizer. When a search is
/// needed the composer hands back a sequence-numbered [`SearchRequest`];
/// results are only applied if they answer the most recent request that is
/// still open, so a slow earlier search can never overwrite a newer one.
#[derive(Debug, Clone)]
pub struct Composer {
    text: String,
    cursor: usize,
    state: ComposerState,
    token: Option<InProgressToken>,
    suggestions: Vec<MentionableUser>,
    selected: usize,
    last_seq: u64,
    pending: Option<u64>,
    policy: TriggerPolicy,
    max_suggestions: usize,
    mentioned: Vec<MentionableUser>,
}

impl Default for Composer {
    fn default() -> Self {
        Composer::new(TriggerPolicy::default(), ComposerConfig::default().max_suggestions)
    }
}

impl Composer {
    pub fn new(policy: TriggerPolicy, max_suggestions: usize) -> Self {
        Composer {
            text: String::new(),
            cursor: 0,
            state: ComposerState::Idle,
            token: None,
            suggestions: Vec::new(),
            selected: 0,
            last_seq: 0,
            pending: None,
            policy,
            max_suggestions: max_suggestions.max(1),
            mentioned: Vec::new(),
        }
    }

    pub fn from_config(config: &ComposerConfig) -> Self {
        Composer::new(
            TriggerPolicy {
                trigger_on_bare_at: config.trigger_on_bare_at,
            },
            config.max_suggestions,
        )
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// The token under the cursor, if any (present even when no search runs)
    pub fn token(&self) -> Option<&InProgressToken> {
        self.token.as_ref()
    }

    pub fn suggestions(&self) -> &[MentionableUser] {
        &self.suggestions
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The highlighted suggestion, while the panel is open
    pub fn selected_user(&self) -> Option<&MentionableUser> {
        match self.state {
            ComposerState::Suggesting => self.suggestions.get(self.selected),
            _ => None,
        }
    }

    /// Whether the suggestion panel should be visible
    pub fn is_open(&self) -> bool {
        self.state == ComposerState::Suggesting
    }

    /// Users committed during this session
    pub fn mentioned(&self) -> &[MentionableUser] {
        &self.mentioned
    }

    /// Replace the text and cursor, as after any edit.
    pub fn set_text(&mut self, text: impl Into<String>, cursor: usize) -> Option<SearchRequest> {
        self.text = text.into();
        self.cursor = clamp_cursor(&self.text, cursor);
        self.refresh()
    }

    /// Move the cursor without editing; may open or close a token.
    pub fn set_cursor(&mut self, cursor: usize) -> Option<SearchRequest> {
        self.cursor = clamp_cursor(&self.text, cursor);
        self.refresh()
    }

    /// Reset to an empty field and forget the session's mentions.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.token = None;
        self.mentioned.clear();
        self.close();
    }

    fn refresh(&mut self) -> Option<SearchRequest> {
        let token = extract_in_progress_token(&self.text, self.cursor);
        let wants_search = token
            .as_ref()
            .is_some_and(|t| !t.query.is_empty() || self.policy.trigger_on_bare_at);

        if !wants_search {
            self.token = token;
            self.close();
            return None;
        }

        // Same token, already searched or showing: nothing new to ask
        if self.state != ComposerState::Idle && self.token == token {
            return None;
        }

        let query = token.as_ref().map(|t| t.query.clone()).unwrap_or_default();
        self.token = token;
        self.last_seq += 1;
        self.pending = Some(self.last_seq);
        self.state = ComposerState::Querying;
        self.suggestions.clear();
        self.selected = 0;
        Some(SearchRequest {
            seq: self.last_seq,
            query,
        })
    }

    fn close(&mut self) {
        self.state = ComposerState::Idle;
        self.pending = None;
        self.suggestions.clear();
        self.selected = 0;
    }

    /// Deliver the answer to a search. Returns false when it was discarded
    /// because a newer request was issued or the panel was closed meanwhile.
    pub fn apply_results(
        &mut self,
        seq: u64,
        result: Result<Vec<MentionableUser>, SearchError>,
    ) -> bool {
        if self.pending != Some(seq) {
            debug!(seq, latest = self.last_seq, "discarding stale user search result");
            return false;
        }
        self.pending = None;

        let mut users = result.unwrap_or_else(|err| {
            debug!(seq, %err, "user search failed; showing no suggestions");
            Vec::new()
        });
        users.truncate(self.max_suggestions);

        self.selected = 0;
        if users.is_empty() {
            self.suggestions.clear();
            self.state = ComposerState::Idle;
        } else {
            self.suggestions = users;
            self.state = ComposerState::Suggesting;
        }
        true
    }

    pub fn move_down(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.selected = (self.selected + 1) % self.suggestions.len();
        true
    }

    pub fn move_up(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        let len = self.suggestions.len();
        self.selected = (self.selected + len - 1) % len;
        true
    }

    /// Point the selection at a given row (e.g. a mouse click on it)
    pub fn select(&mut self, index: usize) -> bool {
        if !self.is_open() || index >= self.suggestions.len() {
            return false;
        }
        self.selected = index;
        true
    }

    /// Close the panel without touching the text. Pending results for the
    /// current token will be ignored.
    pub fn dismiss(&mut self) -> bool {
        if self.state == ComposerState::Idle {
            return false;
        }
        self.close();
        true
    }

    /// Splice the selected suggestion into the text in place of the token.
    pub fn commit(&mut self) -> Option<MentionCommit> {
        let Some(user) = self.selected_user().cloned() else {
            debug!(state = ?self.state, "commit requested with no active mention");
            return None;
        };
        let token = self.token.take()?;

        let label = user.label();
        let mut text = String::with_capacity(self.text.len() + label.len() + 2);
        text.push_str(&self.text[..token.start_index]);
        text.push('@');
        text.push_str(label);
        text.push(' ');
        let cursor = text.len();
        text.push_str(&self.text[token.end_index..]);

        self.text = text;
        self.cursor = cursor;
        if !self.mentioned.iter().any(|u| u.id == user.id) {
            self.mentioned.push(user.clone());
        }
        self.close();

        Some(MentionCommit {
            user,
            text: self.text.clone(),
            cursor,
            mentioned: self.mentioned.clone(),
        })
    }

    /// Route a navigation key. Keys arriving while the panel is closed are
    /// reported as [`NavOutcome::Ignored`] so the host can use them.
    pub fn handle_nav(&mut self, key: NavKey) -> NavOutcome {
        if !self.is_open() {
            return NavOutcome::Ignored;
        }
        match key {
            NavKey::Down => {
                self.move_down();
                NavOutcome::Moved
            }
            NavKey::Up => {
                self.move_up();
                NavOutcome::Moved
            }
            NavKey::Enter | NavKey::Tab => self
                .commit()
                .map_or(NavOutcome::Ignored, NavOutcome::Committed),
            NavKey::Escape => {
                self.dismiss();
                NavOutcome::Dismissed
            }
        }
    }

    // --- Editing helpers ---

    pub fn insert_str(&mut self, s: &str) -> Option<SearchRequest> {
        let mut text = std::mem::take(&mut self.text);
        text.insert_str(self.cursor, s);
        let cursor = self.cursor + s.len();
        self.set_text(text, cursor)
    }

    pub fn insert_char(&mut self, c: char) -> Option<SearchRequest> {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf))
    }

    /// Delete the grapheme before the cursor
    pub fn backspace(&mut self) -> Option<SearchRequest> {
        let start = prev_grapheme_boundary(&self.text, self.cursor)?;
        let mut text = std::mem::take(&mut self.text);
        text.replace_range(start..self.cursor, "");
        self.set_text(text, start)
    }

    /// Delete the grapheme after the cursor
    pub fn delete_forward(&mut self) -> Option<SearchRequest> {
        let end = next_grapheme_boundary(&self.text, self.cursor)?;
        let mut text = std::mem::take(&mut self.text);
        text.replace_range(self.cursor..end, "");
        let cursor = self.cursor;
        self.set_text(text, cursor)
    }

    pub fn move_left(&mut self) -> Option<SearchRequest> {
        let pos = prev_grapheme_boundary(&self.text, self.cursor)?;
        self.set_cursor(pos)
    }

    pub fn move_right(&mut self) -> Option<SearchRequest> {
        let pos = next_grapheme_boundary(&self.text, self.cursor)?;
        self.set_cursor(pos)
    }

    pub fn move_home(&mut self) -> Option<SearchRequest> {
        self.set_cursor(0)
    }

    pub fn move_end(&mut self) -> Option<SearchRequest> {
        self.set_cursor(self.text.len())
    }
}
