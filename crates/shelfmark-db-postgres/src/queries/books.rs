//! CRUD queries for the `books` table.

use chrono::NaiveDate;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use shelfmark_core::{Book, BookPatch, NewBook};
use shelfmark_storage::{Page, StorageError};

use crate::error::write_error;

/// Row shape shared by every book query.
type BookRow = (i32, String, Option<String>, Option<NaiveDate>, i32);

fn row_to_book(row: BookRow) -> Book {
    Book {
        id: row.0,
        title: row.1,
        description: row.2,
        publish_date: row.3,
        author_id: row.4,
    }
}

/// Lists books ordered by id within the given window.
pub async fn list(pool: &PgPool, page: Page) -> Result<Vec<Book>, StorageError> {
    let rows: Vec<BookRow> = query_as(
        r#"SELECT id, title, description, publish_date, author_id
           FROM books ORDER BY id OFFSET $1 LIMIT $2"#,
    )
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to list books: {e}")))?;

    Ok(rows.into_iter().map(row_to_book).collect())
}

/// Reads a book by id. Returns `None` if the row does not exist.
pub async fn get(pool: &PgPool, id: i32) -> Result<Option<Book>, StorageError> {
    let row: Option<BookRow> = query_as(
        "SELECT id, title, description, publish_date, author_id FROM books WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to read book: {e}")))?;

    Ok(row.map(row_to_book))
}

/// Inserts a new book, returning the stored row.
///
/// The `books.author_id` foreign key surfaces as
/// [`StorageError::ForeignKey`] when the author does not exist: the
/// backstop behind the handler-level existence check.
pub async fn create(pool: &PgPool, input: NewBook) -> Result<Book, StorageError> {
    let row: BookRow = query_as(
        r#"INSERT INTO books (title, description, publish_date, author_id)
           VALUES ($1, $2, $3, $4)
           RETURNING id, title, description, publish_date, author_id"#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.publish_date)
    .bind(input.author_id)
    .fetch_one(pool)
    .await
    .map_err(|e| write_error(e, "Failed to create book"))?;

    Ok(row_to_book(row))
}

/// Fully replaces a book; every column is overwritten from the payload.
/// Returns `None` if the row does not exist.
pub async fn replace(pool: &PgPool, id: i32, input: NewBook) -> Result<Option<Book>, StorageError> {
    let row: Option<BookRow> = query_as(
        r#"UPDATE books SET title = $2, description = $3, publish_date = $4, author_id = $5
           WHERE id = $1
           RETURNING id, title, description, publish_date, author_id"#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.publish_date)
    .bind(input.author_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| write_error(e, "Failed to replace book"))?;

    Ok(row.map(row_to_book))
}

/// Partially updates a book: reads the row, applies the patch field-by-
/// field, writes the merged row back. Returns `None` if the row does not
/// exist.
pub async fn update(pool: &PgPool, id: i32, patch: BookPatch) -> Result<Option<Book>, StorageError> {
    let Some(mut book) = get(pool, id).await? else {
        return Ok(None);
    };
    patch.apply_to(&mut book);

    let row: Option<BookRow> = query_as(
        r#"UPDATE books SET title = $2, description = $3, publish_date = $4, author_id = $5
           WHERE id = $1
           RETURNING id, title, description, publish_date, author_id"#,
    )
    .bind(id)
    .bind(&book.title)
    .bind(&book.description)
    .bind(book.publish_date)
    .bind(book.author_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| write_error(e, "Failed to update book"))?;

    Ok(row.map(row_to_book))
}

/// Deletes a book. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, StorageError> {
    let result = query("DELETE FROM books WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to delete book: {e}")))?;

    Ok(result.rows_affected() > 0)
}

/// Lists all books for the given author, ordered by id.
pub async fn list_by_author(pool: &PgPool, author_id: i32) -> Result<Vec<Book>, StorageError> {
    let rows: Vec<BookRow> = query_as(
        r#"SELECT id, title, description, publish_date, author_id
           FROM books WHERE author_id = $1 ORDER BY id"#,
    )
    .bind(author_id)
    .fetch_all(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to list books by author: {e}")))?;

    Ok(rows.into_iter().map(row_to_book).collect())
}
