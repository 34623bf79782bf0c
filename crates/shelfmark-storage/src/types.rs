//! Shared parameter types for storage operations.

use serde::{Deserialize, Serialize};

/// Offset/limit window for list operations.
///
/// The default window is the whole list: the HTTP list handlers read
/// everything and cache it as one snapshot, while callers that do want a
/// window (tests, future endpoints) can pass an explicit one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Number of rows to skip from the start of the list.
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of rows to return; `None` means unbounded.
    #[serde(default)]
    pub limit: Option<i64>,
}

impl Page {
    /// Creates a window skipping `skip` rows and returning at most `limit`.
    #[must_use]
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit: Some(limit),
        }
    }

    /// The whole list, in order.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }
}
