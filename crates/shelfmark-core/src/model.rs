//! Catalog entities and their write payloads.
//!
//! Two kinds of write payload exist per entity and they are deliberately
//! not unified:
//!
//! - [`NewAuthor`] / [`NewBook`] carry every settable field and back both
//!   creation and full replacement (PUT). A replace overwrites all columns,
//!   so an optional field absent from the payload ends up cleared.
//! - [`AuthorPatch`] / [`BookPatch`] are typed partial updates: only fields
//!   present in the patch are applied, everything else is left untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An author row as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Store-assigned identifier.
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// A book row as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier.
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub publish_date: Option<NaiveDate>,
    /// References an existing [`Author`].
    pub author_id: i32,
}

/// Payload for creating or fully replacing an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Payload for creating or fully replacing a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
    pub author_id: i32,
}

/// Partial update for an author. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Partial update for a book. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub author_id: Option<i32>,
}

impl Author {
    /// Overwrites every settable field from the payload. Backs PUT.
    pub fn overwrite_with(&mut self, input: NewAuthor) {
        self.name = input.name;
        self.bio = input.bio;
        self.birth_date = input.birth_date;
    }
}

impl Book {
    /// Overwrites every settable field from the payload. Backs PUT.
    pub fn overwrite_with(&mut self, input: NewBook) {
        self.title = input.title;
        self.description = input.description;
        self.publish_date = input.publish_date;
        self.author_id = input.author_id;
    }
}

impl AuthorPatch {
    /// Applies the fields present in the patch, leaving the rest untouched.
    pub fn apply_to(self, author: &mut Author) {
        if let Some(name) = self.name {
            author.name = name;
        }
        if let Some(bio) = self.bio {
            author.bio = Some(bio);
        }
        if let Some(birth_date) = self.birth_date {
            author.birth_date = Some(birth_date);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.birth_date.is_none()
    }
}

impl BookPatch {
    /// Applies the fields present in the patch, leaving the rest untouched.
    pub fn apply_to(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(description) = self.description {
            book.description = Some(description);
        }
        if let Some(publish_date) = self.publish_date {
            book.publish_date = Some(publish_date);
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.publish_date.is_none()
            && self.author_id.is_none()
    }
}
