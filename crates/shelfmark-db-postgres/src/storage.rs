//! PostgreSQL implementation of the `CatalogStorage` trait.

use async_trait::async_trait;
use sqlx_postgres::PgPool;

use shelfmark_core::{Author, AuthorPatch, Book, BookPatch, NewAuthor, NewBook};
use shelfmark_storage::{CatalogStorage, Page, StorageError};

use crate::config::PostgresConfig;
use crate::pool;
use crate::queries;
use crate::schema;

/// PostgreSQL storage backend for the Shelfmark catalog.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new `PostgresCatalog` with the given configuration.
    ///
    /// This will:
    /// 1. Create a connection pool
    /// 2. Run the startup schema pass (if configured)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created or if the
    /// schema pass fails.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            schema::ensure_schema(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresCatalog` from an existing connection pool.
    ///
    /// The schema pass is not run automatically with this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStorage for PostgresCatalog {
    async fn list_authors(&self, page: Page) -> Result<Vec<Author>, StorageError> {
        queries::authors::list(&self.pool, page).await
    }

    async fn get_author(&self, id: i32) -> Result<Option<Author>, StorageError> {
        queries::authors::get(&self.pool, id).await
    }

    async fn create_author(&self, input: NewAuthor) -> Result<Author, StorageError> {
        queries::authors::create(&self.pool, input).await
    }

    async fn replace_author(
        &self,
        id: i32,
        input: NewAuthor,
    ) -> Result<Option<Author>, StorageError> {
        queries::authors::replace(&self.pool, id, input).await
    }

    async fn update_author(
        &self,
        id: i32,
        patch: AuthorPatch,
    ) -> Result<Option<Author>, StorageError> {
        queries::authors::update(&self.pool, id, patch).await
    }

    async fn delete_author(&self, id: i32) -> Result<bool, StorageError> {
        queries::authors::delete(&self.pool, id).await
    }

    async fn list_books(&self, page: Page) -> Result<Vec<Book>, StorageError> {
        queries::books::list(&self.pool, page).await
    }

    async fn get_book(&self, id: i32) -> Result<Option<Book>, StorageError> {
        queries::books::get(&self.pool, id).await
    }

    async fn create_book(&self, input: NewBook) -> Result<Book, StorageError> {
        queries::books::create(&self.pool, input).await
    }

    async fn replace_book(&self, id: i32, input: NewBook) -> Result<Option<Book>, StorageError> {
        queries::books::replace(&self.pool, id, input).await
    }

    async fn update_book(&self, id: i32, patch: BookPatch) -> Result<Option<Book>, StorageError> {
        queries::books::update(&self.pool, id, patch).await
    }

    async fn delete_book(&self, id: i32) -> Result<bool, StorageError> {
        queries::books::delete(&self.pool, id).await
    }

    async fn list_books_by_author(&self, author_id: i32) -> Result<Vec<Book>, StorageError> {
        queries::books::list_by_author(&self.pool, author_id).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
