//! Startup schema creation.
//!
//! The catalog schema is two tables with a foreign key between them; a
//! `CREATE TABLE IF NOT EXISTS` pass at startup stands in for a migration
//! framework. Idempotent and safe to run on every boot.

use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use crate::error::{PostgresError, Result};

const CREATE_AUTHORS: &str = r#"
CREATE TABLE IF NOT EXISTS authors (
    id         SERIAL PRIMARY KEY,
    name       VARCHAR(255) NOT NULL,
    bio        VARCHAR(255),
    birth_date DATE
)
"#;

const CREATE_BOOKS: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    id           SERIAL PRIMARY KEY,
    title        VARCHAR(255) NOT NULL,
    description  VARCHAR(255),
    publish_date DATE,
    author_id    INTEGER NOT NULL REFERENCES authors (id)
)
"#;

const CREATE_BOOKS_AUTHOR_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS books_author_id_idx ON books (author_id)";

/// Creates the catalog tables if they do not already exist.
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for ddl in [CREATE_AUTHORS, CREATE_BOOKS, CREATE_BOOKS_AUTHOR_INDEX] {
        query(ddl)
            .execute(pool)
            .await
            .map_err(|e| PostgresError::schema(e.to_string()))?;
    }

    debug!("Catalog schema ensured");

    Ok(())
}
