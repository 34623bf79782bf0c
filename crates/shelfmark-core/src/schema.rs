//! Public response shapes.
//!
//! These are the wire representations handed to clients and snapshotted
//! into the list caches. Dates serialize as ISO-8601 text (`YYYY-MM-DD`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Author, Book};

/// A book as returned by the API. Flat; no nested author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub publish_date: Option<NaiveDate>,
    pub author_id: i32,
}

/// An author as returned by the API, with nested book summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub books: Vec<BookResponse>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            description: book.description,
            publish_date: book.publish_date,
            author_id: book.author_id,
        }
    }
}

impl AuthorResponse {
    /// Assembles the response from an author row and its books.
    pub fn from_parts(author: Author, books: Vec<Book>) -> Self {
        Self {
            id: author.id,
            name: author.name,
            bio: author.bio,
            birth_date: author.birth_date,
            books: books.into_iter().map(BookResponse::from).collect(),
        }
    }
}
