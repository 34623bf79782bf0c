//! Core domain types for the Shelfmark catalog.
//!
//! This crate defines the Author and Book entities, the request payloads
//! used to create and modify them, and the public response shapes. It has
//! no I/O; storage backends and the HTTP layer live in their own crates.

pub mod model;
pub mod schema;

pub use model::{Author, AuthorPatch, Book, BookPatch, NewAuthor, NewBook};
pub use schema::{AuthorResponse, BookResponse};
