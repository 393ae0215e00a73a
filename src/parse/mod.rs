pub mod segments;
pub mod tokenizer;

pub use segments::{Segments, mentioned_users, render_segments, resolve_handle};
pub use tokenizer::{clamp_cursor, extract_in_progress_token};
