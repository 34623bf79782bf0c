//! List caching for the catalog.
//!
//! ## Architecture
//!
//! - **L1 (DashMap)**: in-memory, per-process, microsecond latency
//! - **L2 (Redis)**: optional shared tier, millisecond latency
//!
//! ## Graceful Degradation
//!
//! If Redis is disabled or unavailable, the cache falls back to L1-only
//! mode. A cache failure never fails a request; it only costs a store read.
//!
//! The policy layer ([`CatalogCache`]) owns the two well-known keys
//! (`authors_list`, `books_list`), the fixed TTL, and the JSON snapshot
//! encoding. Invalidation is coarse: whole-list deletes on writes.

pub mod backend;
pub mod catalog;

pub use backend::{CacheBackend, CacheStats, CachedEntry};
pub use catalog::{AUTHORS_LIST_KEY, BOOKS_LIST_KEY, CatalogCache};
