//! Shared application state.
//!
//! Everything a handler needs is constructed once at startup and cloned
//! per request: the storage handle and the cache are `Arc`s, so clones are
//! cheap. There is no lazily-initialized global state.

use std::sync::Arc;

use shelfmark_storage::DynCatalogStorage;

use crate::cache::CatalogCache;
use crate::config::AuthConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: DynCatalogStorage,
    pub cache: Arc<CatalogCache>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(storage: DynCatalogStorage, cache: Arc<CatalogCache>, auth: AuthConfig) -> Self {
        Self {
            storage,
            cache,
            auth,
        }
    }
}
