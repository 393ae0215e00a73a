use std::sync::{Arc, RwLock};

use crate::compose::source::{SearchError, SuggestionSource};
use crate::model::user::MentionableUser;

/// Known-users snapshot shared between the host (which refreshes it) and
/// the search threads (which read it)
pub type SharedUsers = Arc<RwLock<Vec<MentionableUser>>>;

/// How well a user matched a query; lower ranks sort first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    /// A name field starts with the query
    Prefix,
    /// A later word of the display name starts with the query
    WordPrefix,
    /// The query appears somewhere inside a name field
    Substring,
}

/// Rank a user against a lowercased query, or None if it doesn't match at all
fn match_rank(user: &MentionableUser, query: &str) -> Option<MatchRank> {
    let fields: Vec<String> = [
        user.display_name.as_deref(),
        user.username.as_deref(),
        Some(user.id.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(str::to_lowercase)
    .collect();

    if fields.iter().any(|f| f.starts_with(query)) {
        return Some(MatchRank::Prefix);
    }
    let word_prefix = user.display_name.as_deref().is_some_and(|name| {
        name.split_whitespace()
            .skip(1)
            .any(|w| w.to_lowercase().starts_with(query))
    });
    if word_prefix {
        return Some(MatchRank::WordPrefix);
    }
    if fields.iter().any(|f| f.contains(query)) {
        return Some(MatchRank::Substring);
    }
    None
}

/// Search a user list: prefix hits before word-prefix hits before substring
/// hits, original order kept within each rank, at most `limit` results.
pub fn search_users(users: &[MentionableUser], query: &str, limit: usize) -> Vec<MentionableUser> {
    let query = query.to_lowercase();
    let mut hits: Vec<(MatchRank, &MentionableUser)> = users
        .iter()
        .filter_map(|u| match_rank(u, &query).map(|rank| (rank, u)))
        .collect();
    // sort_by_key is stable
    hits.sort_by_key(|(rank, _)| *rank);
    hits.into_iter().take(limit).map(|(_, u)| u.clone()).collect()
}

/// Suggestion source backed by the workspace's known-users snapshot
#[derive(Debug, Clone)]
pub struct DirectorySource {
    users: SharedUsers,
    limit: usize,
}

impl DirectorySource {
    pub fn new(users: SharedUsers, limit: usize) -> Self {
        DirectorySource { users, limit }
    }
}

impl SuggestionSource for DirectorySource {
    fn search_users(&self, query: &str) -> Result<Vec<MentionableUser>, SearchError> {
        let users = self
            .users
            .read()
            .map_err(|_| SearchError::Failed("user directory lock poisoned".into()))?;
        Ok(search_users(&users, query, self.limit))
    }
}
