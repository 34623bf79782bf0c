//! Error types for catalog storage operations.

/// Errors that can occur during storage operations.
///
/// Missing rows are reported as `Ok(None)` / `Ok(false)` by the trait
/// methods, not as errors; `NotFound` exists for callers that need to
/// surface absence as a failure.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested row was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"Author"`.
        entity: &'static str,
        /// The identifier that was looked up.
        id: i32,
    },

    /// A write referenced a row that does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKey {
        /// Description of the violated reference.
        message: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Creates a new `ForeignKey` error.
    #[must_use]
    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::ForeignKey {
            message: message.into(),
        }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
