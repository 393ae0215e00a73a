pub mod composer;
pub mod source;
pub mod worker;

pub use composer::{
    Composer, ComposerState, MentionCommit, NavKey, NavOutcome, SearchRequest, TriggerPolicy,
};
pub use source::{SearchError, SuggestionSource};
pub use worker::{SearchOutcome, SearchWorker};
