//! Storage abstraction for the Shelfmark catalog.
//!
//! Defines the [`CatalogStorage`] trait that all storage backends implement,
//! along with the error and parameter types shared by backends.

mod error;
mod traits;
mod types;

pub use error::StorageError;
pub use traits::{CatalogStorage, DynCatalogStorage};
pub use types::Page;
