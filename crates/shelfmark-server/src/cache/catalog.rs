//! Catalog list snapshots: the cache-aside policy layer.
//!
//! Two well-known keys exist, one per list endpoint:
//!
//! - `authors_list`: all authors with nested book summaries
//! - `books_list`: all books, flat
//!
//! Snapshots are JSON-encoded response lists stored with a fixed TTL
//! (300 seconds by default). They are written on read-after-miss and
//! deleted on any write that could change them; never updated in place.
//!
//! An empty list is a value. It is cached as `[]` and served from cache
//! like any other snapshot; only invalidation deletes a key.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use shelfmark_core::{AuthorResponse, BookResponse};

use super::backend::{CacheBackend, CacheStats};

/// Cache key for the authors list snapshot.
pub const AUTHORS_LIST_KEY: &str = "authors_list";

/// Cache key for the books list snapshot.
pub const BOOKS_LIST_KEY: &str = "books_list";

/// Typed cache over the two catalog list snapshots.
pub struct CatalogCache {
    backend: CacheBackend,
    ttl: Duration,
}

impl CatalogCache {
    /// Create a new catalog cache with the given backend and TTL.
    pub fn new(backend: CacheBackend, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Get the cached authors list, if present.
    pub async fn authors_list(&self) -> Option<Vec<AuthorResponse>> {
        self.get_list(AUTHORS_LIST_KEY).await
    }

    /// Get the cached books list, if present.
    pub async fn books_list(&self) -> Option<Vec<BookResponse>> {
        self.get_list(BOOKS_LIST_KEY).await
    }

    /// Snapshot the authors list.
    pub async fn put_authors_list(&self, authors: &[AuthorResponse]) {
        self.put_list(AUTHORS_LIST_KEY, authors).await;
    }

    /// Snapshot the books list.
    pub async fn put_books_list(&self, books: &[BookResponse]) {
        self.put_list(BOOKS_LIST_KEY, books).await;
    }

    /// Drop the authors list snapshot. Called on every author write, and on
    /// every book write (an author's nested book list changed).
    pub async fn invalidate_authors_list(&self) {
        self.backend.invalidate(AUTHORS_LIST_KEY).await;
    }

    /// Drop the books list snapshot. Called on every book write.
    pub async fn invalidate_books_list(&self) {
        self.backend.invalidate(BOOKS_LIST_KEY).await;
    }

    /// Cache statistics, for readiness reporting.
    pub fn stats(&self) -> CacheStats {
        self.backend.stats()
    }

    async fn get_list<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let data = self.backend.get(key).await?;
        match serde_json::from_slice(&data) {
            Ok(list) => Some(list),
            Err(e) => {
                // A snapshot we cannot decode is useless; drop it and report
                // a miss so the caller re-reads the store.
                tracing::warn!(key = %key, error = %e, "Failed to decode cached snapshot");
                self.backend.invalidate(key).await;
                None
            }
        }
    }

    async fn put_list<T: Serialize>(&self, key: &str, list: &[T]) {
        match serde_json::to_vec(list) {
            Ok(data) => self.backend.set(key, data, self.ttl).await,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode snapshot for cache");
            }
        }
    }
}
