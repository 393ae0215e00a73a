use crate::model::user::MentionableUser;

/// Why a suggestion search produced no results
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("user search failed: {0}")]
    Failed(String),
    #[error("user search timed out")]
    TimedOut,
}

/// Maps a typed query to a ranked list of candidate users.
///
/// Implementations may block (network, disk); the composer never calls this
/// directly. A [`SearchWorker`](super::worker::SearchWorker) runs it off the
/// event loop.
pub trait SuggestionSource: Send + Sync {
    fn search_users(&self, query: &str) -> Result<Vec<MentionableUser>, SearchError>;
}

impl<F> SuggestionSource for F
where
    F: Fn(&str) -> Result<Vec<MentionableUser>, SearchError> + Send + Sync,
{
    fn search_users(&self, query: &str) -> Result<Vec<MentionableUser>, SearchError> {
        self(query)
    }
}
