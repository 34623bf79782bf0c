//! Author CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use shelfmark_core::{AuthorResponse, BookResponse, NewAuthor};
use shelfmark_storage::Page;

use crate::auth::RequireBearer;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /authors/`: list all authors with nested books, cache-aside.
pub async fn list_authors(
    State(state): State<AppState>,
    _auth: RequireBearer,
) -> Result<Json<Vec<AuthorResponse>>, ApiError> {
    if let Some(cached) = state.cache.authors_list().await {
        return Ok(Json(cached));
    }

    let authors = state.storage.list_authors(Page::all()).await?;
    let mut out = Vec::with_capacity(authors.len());
    for author in authors {
        let books = state.storage.list_books_by_author(author.id).await?;
        out.push(AuthorResponse::from_parts(author, books));
    }

    state.cache.put_authors_list(&out).await;
    Ok(Json(out))
}

/// `POST /authors/`: create an author.
pub async fn create_author(
    State(state): State<AppState>,
    _auth: RequireBearer,
    Json(payload): Json<NewAuthor>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let author = state.storage.create_author(payload).await?;
    state.cache.invalidate_authors_list().await;
    Ok(Json(AuthorResponse::from_parts(author, Vec::new())))
}

/// `GET /authors/{id}`: read one author with nested books.
pub async fn get_author(
    State(state): State<AppState>,
    _auth: RequireBearer,
    Path(id): Path<i32>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let author = state
        .storage
        .get_author(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Author not found"))?;
    let books = state.storage.list_books_by_author(author.id).await?;
    Ok(Json(AuthorResponse::from_parts(author, books)))
}

/// `PUT /authors/{id}`: full overwrite from the create payload.
///
/// Every field is replaced unconditionally; an optional field absent from
/// the body clears the stored value. Partial updates are a storage-level
/// operation only.
pub async fn update_author(
    State(state): State<AppState>,
    _auth: RequireBearer,
    Path(id): Path<i32>,
    Json(payload): Json<NewAuthor>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let author = state
        .storage
        .replace_author(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Author not found"))?;
    state.cache.invalidate_authors_list().await;

    let books = state.storage.list_books_by_author(author.id).await?;
    Ok(Json(AuthorResponse::from_parts(author, books)))
}

/// `DELETE /authors/{id}`: delete an author with no books.
///
/// This route carries no bearer gate: it is the one unauthenticated write
/// on the surface, and existing clients depend on that asymmetry.
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let author = state
        .storage
        .get_author(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Author not found"))?;

    let books = state.storage.list_books_by_author(author.id).await?;
    if !books.is_empty() {
        return Err(ApiError::conflict("Cannot delete author with associated books"));
    }

    state.storage.delete_author(id).await?;
    state.cache.invalidate_authors_list().await;

    Ok(Json(json!({ "detail": "Author deleted successfully" })))
}

/// `GET /authors/{id}/books`: list one author's books.
///
/// Returns 404 when the list is empty, which conflates "author missing"
/// with "author has no books". Wire-compatible behavior; clients treat
/// both the same way.
pub async fn get_books_by_author(
    State(state): State<AppState>,
    _auth: RequireBearer,
    Path(id): Path<i32>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = state.storage.list_books_by_author(id).await?;

    if books.is_empty() {
        return Err(ApiError::not_found("No books found for this author"));
    }

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}
