//! CRUD queries for the `authors` table.

use chrono::NaiveDate;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use shelfmark_core::{Author, AuthorPatch, NewAuthor};
use shelfmark_storage::{Page, StorageError};

/// Row shape shared by every author query: id, name, bio, birth_date.
type AuthorRow = (i32, String, Option<String>, Option<NaiveDate>);

fn row_to_author(row: AuthorRow) -> Author {
    Author {
        id: row.0,
        name: row.1,
        bio: row.2,
        birth_date: row.3,
    }
}

/// Lists authors ordered by id within the given window.
///
/// A `NULL` bound for `LIMIT` means "no limit" in PostgreSQL, which is
/// exactly the `Page::all()` case.
pub async fn list(pool: &PgPool, page: Page) -> Result<Vec<Author>, StorageError> {
    let rows: Vec<AuthorRow> = query_as(
        "SELECT id, name, bio, birth_date FROM authors ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to list authors: {e}")))?;

    Ok(rows.into_iter().map(row_to_author).collect())
}

/// Reads an author by id. Returns `None` if the row does not exist.
pub async fn get(pool: &PgPool, id: i32) -> Result<Option<Author>, StorageError> {
    let row: Option<AuthorRow> =
        query_as("SELECT id, name, bio, birth_date FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| StorageError::internal(format!("Failed to read author: {e}")))?;

    Ok(row.map(row_to_author))
}

/// Inserts a new author, returning the stored row.
pub async fn create(pool: &PgPool, input: NewAuthor) -> Result<Author, StorageError> {
    let row: AuthorRow = query_as(
        r#"INSERT INTO authors (name, bio, birth_date)
           VALUES ($1, $2, $3)
           RETURNING id, name, bio, birth_date"#,
    )
    .bind(&input.name)
    .bind(&input.bio)
    .bind(input.birth_date)
    .fetch_one(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to create author: {e}")))?;

    Ok(row_to_author(row))
}

/// Fully replaces an author; every column is overwritten from the payload.
/// Returns `None` if the row does not exist.
pub async fn replace(
    pool: &PgPool,
    id: i32,
    input: NewAuthor,
) -> Result<Option<Author>, StorageError> {
    let row: Option<AuthorRow> = query_as(
        r#"UPDATE authors SET name = $2, bio = $3, birth_date = $4
           WHERE id = $1
           RETURNING id, name, bio, birth_date"#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.bio)
    .bind(input.birth_date)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to replace author: {e}")))?;

    Ok(row.map(row_to_author))
}

/// Partially updates an author: reads the row, applies the patch
/// field-by-field, writes the merged row back. Returns `None` if the row
/// does not exist.
pub async fn update(
    pool: &PgPool,
    id: i32,
    patch: AuthorPatch,
) -> Result<Option<Author>, StorageError> {
    let Some(mut author) = get(pool, id).await? else {
        return Ok(None);
    };
    patch.apply_to(&mut author);

    let row: Option<AuthorRow> = query_as(
        r#"UPDATE authors SET name = $2, bio = $3, birth_date = $4
           WHERE id = $1
           RETURNING id, name, bio, birth_date"#,
    )
    .bind(id)
    .bind(&author.name)
    .bind(&author.bio)
    .bind(author.birth_date)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to update author: {e}")))?;

    Ok(row.map(row_to_author))
}

/// Deletes an author. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, StorageError> {
    let result = query("DELETE FROM authors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| crate::error::write_error(e, "Failed to delete author"))?;

    Ok(result.rows_affected() > 0)
}
