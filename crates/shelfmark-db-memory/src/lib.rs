//! In-memory storage backend for the Shelfmark catalog.
//!
//! Backs tests and local development; nothing is persisted. The maps are
//! keyed by id so listings come back in id order, matching the PostgreSQL
//! backend's `ORDER BY id`.

mod storage;

pub use storage::InMemoryCatalog;
