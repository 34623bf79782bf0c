//! Book CRUD handlers.
//!
//! Every book write invalidates both list snapshots: the books list
//! directly, and the authors list because authors nest their books.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use shelfmark_core::{BookResponse, NewBook};
use shelfmark_storage::Page;

use crate::auth::RequireBearer;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /books/`: list all books, cache-aside.
pub async fn list_books(
    State(state): State<AppState>,
    _auth: RequireBearer,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    if let Some(cached) = state.cache.books_list().await {
        return Ok(Json(cached));
    }

    let books = state.storage.list_books(Page::all()).await?;
    let out: Vec<BookResponse> = books.into_iter().map(BookResponse::from).collect();

    state.cache.put_books_list(&out).await;
    Ok(Json(out))
}

/// `POST /books/`: create a book for an existing author.
///
/// The author-existence check and the insert are separate statements; the
/// window between them is unguarded (no cross-request transaction), and
/// the store foreign key is the backstop if the author vanishes in it.
pub async fn create_book(
    State(state): State<AppState>,
    _auth: RequireBearer,
    Json(payload): Json<NewBook>,
) -> Result<Json<BookResponse>, ApiError> {
    state
        .storage
        .get_author(payload.author_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Author not found"))?;

    let book = state.storage.create_book(payload).await?;
    state.cache.invalidate_books_list().await;
    state.cache.invalidate_authors_list().await;

    Ok(Json(BookResponse::from(book)))
}

/// `GET /books/{id}`: read one book.
pub async fn get_book(
    State(state): State<AppState>,
    _auth: RequireBearer,
    Path(id): Path<i32>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state
        .storage
        .get_book(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;
    Ok(Json(BookResponse::from(book)))
}

/// `PUT /books/{id}`: full overwrite from the create payload.
pub async fn update_book(
    State(state): State<AppState>,
    _auth: RequireBearer,
    Path(id): Path<i32>,
    Json(payload): Json<NewBook>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state
        .storage
        .replace_book(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;
    state.cache.invalidate_books_list().await;
    state.cache.invalidate_authors_list().await;

    Ok(Json(BookResponse::from(book)))
}

/// `DELETE /books/{id}`: delete a book. No restriction mirrors the
/// author side: books are leaves.
pub async fn delete_book(
    State(state): State<AppState>,
    _auth: RequireBearer,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let removed = state.storage.delete_book(id).await?;
    if !removed {
        return Err(ApiError::not_found("Book not found"));
    }
    state.cache.invalidate_books_list().await;
    state.cache.invalidate_authors_list().await;

    Ok(Json(json!({ "message": "Book deleted successfully" })))
}
