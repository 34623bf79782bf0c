//! The catalog storage contract that all backends implement.

use async_trait::async_trait;

use shelfmark_core::{Author, AuthorPatch, Book, BookPatch, NewAuthor, NewBook};

use crate::error::StorageError;
use crate::types::Page;

/// The data-access contract for the Shelfmark catalog.
///
/// Implementations must be thread-safe (`Send + Sync`). Every write commits
/// before returning, and the returned entity reflects the stored row
/// including store-assigned defaults (the generated id in particular).
///
/// Replace and update are distinct on purpose: `replace_*` overwrites every
/// settable field from a full payload (PUT semantics; absent optionals are
/// cleared), while `update_*` applies a typed patch field-by-field and
/// leaves unset fields untouched.
///
/// # Example
///
/// ```ignore
/// use shelfmark_storage::{CatalogStorage, StorageError};
///
/// async fn author_name(storage: &dyn CatalogStorage, id: i32) -> Result<String, StorageError> {
///     let author = storage
///         .get_author(id)
///         .await?
///         .ok_or_else(|| StorageError::not_found("Author", id))?;
///     Ok(author.name)
/// }
/// ```
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    // ==================== Authors ====================

    /// Lists authors ordered by id within the given window.
    async fn list_authors(&self, page: Page) -> Result<Vec<Author>, StorageError>;

    /// Reads an author by id. Returns `None` if the row does not exist.
    async fn get_author(&self, id: i32) -> Result<Option<Author>, StorageError>;

    /// Inserts a new author and returns the stored row with its assigned id.
    async fn create_author(&self, input: NewAuthor) -> Result<Author, StorageError>;

    /// Fully replaces an author. Every settable field is overwritten from
    /// the payload. Returns `None` if the row does not exist.
    async fn replace_author(&self, id: i32, input: NewAuthor)
    -> Result<Option<Author>, StorageError>;

    /// Partially updates an author; only fields present in the patch are
    /// applied. Returns `None` if the row does not exist.
    async fn update_author(&self, id: i32, patch: AuthorPatch)
    -> Result<Option<Author>, StorageError>;

    /// Deletes an author. Returns whether a row was removed.
    ///
    /// Backends do not enforce the "no delete while books exist" policy;
    /// that rule lives in the HTTP layer, with the store-level foreign key
    /// as backstop.
    async fn delete_author(&self, id: i32) -> Result<bool, StorageError>;

    // ==================== Books ====================

    /// Lists books ordered by id within the given window.
    async fn list_books(&self, page: Page) -> Result<Vec<Book>, StorageError>;

    /// Reads a book by id. Returns `None` if the row does not exist.
    async fn get_book(&self, id: i32) -> Result<Option<Book>, StorageError>;

    /// Inserts a new book and returns the stored row with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ForeignKey`] if `author_id` references no
    /// existing author.
    async fn create_book(&self, input: NewBook) -> Result<Book, StorageError>;

    /// Fully replaces a book (PUT semantics). Returns `None` if the row
    /// does not exist.
    async fn replace_book(&self, id: i32, input: NewBook) -> Result<Option<Book>, StorageError>;

    /// Partially updates a book; only fields present in the patch are
    /// applied. Returns `None` if the row does not exist.
    async fn update_book(&self, id: i32, patch: BookPatch) -> Result<Option<Book>, StorageError>;

    /// Deletes a book. Returns whether a row was removed.
    async fn delete_book(&self, id: i32) -> Result<bool, StorageError>;

    /// Lists all books belonging to the given author, ordered by id.
    ///
    /// Returns an empty list both when the author has no books and when the
    /// author does not exist; callers that care about the difference must
    /// check the author separately.
    async fn list_books_by_author(&self, author_id: i32) -> Result<Vec<Book>, StorageError>;

    // ==================== Metadata ====================

    /// A short name identifying the backend, for logs and readiness checks.
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shareable storage handle.
pub type DynCatalogStorage = std::sync::Arc<dyn CatalogStorage>;
