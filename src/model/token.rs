use std::ops::Range;

use serde::Serialize;

/// The `@token` currently under the cursor.
///
/// Offsets are byte offsets into the edited text. `start_index` points at the
/// `@`, `end_index` is where the token stops (next whitespace or end of text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InProgressToken {
    pub start_index: usize,
    pub end_index: usize,
    /// Text between the `@` and the cursor, lowercased
    pub query: String,
}

impl InProgressToken {
    /// Byte range of the whole token including the `@`
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }
}
