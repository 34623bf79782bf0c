use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use shelfmark_core::{Author, AuthorPatch, Book, BookPatch, NewAuthor, NewBook};
use shelfmark_storage::{CatalogStorage, Page, StorageError};

/// In-memory catalog backend.
///
/// Authors and books live in `BTreeMap`s behind async `RwLock`s; ids come
/// from atomic counters starting at 1, mirroring a `SERIAL` column. The
/// `books.author_id` reference is checked on insert and reassignment so the
/// backend fails the same way the PostgreSQL foreign key would.
#[derive(Debug)]
pub struct InMemoryCatalog {
    authors: RwLock<BTreeMap<i32, Author>>,
    books: RwLock<BTreeMap<i32, Book>>,
    next_author_id: AtomicI32,
    next_book_id: AtomicI32,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            authors: RwLock::new(BTreeMap::new()),
            books: RwLock::new(BTreeMap::new()),
            next_author_id: AtomicI32::new(1),
            next_book_id: AtomicI32::new(1),
        }
    }

    fn next_author_id(&self) -> i32 {
        self.next_author_id.fetch_add(1, Ordering::SeqCst)
    }

    fn next_book_id(&self) -> i32 {
        self.next_book_id.fetch_add(1, Ordering::SeqCst)
    }
}

fn window<T>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    let skip = usize::try_from(page.skip.max(0)).unwrap_or(0);
    let iter = rows.skip(skip);
    match page.limit {
        Some(limit) => iter.take(usize::try_from(limit.max(0)).unwrap_or(0)).collect(),
        None => iter.collect(),
    }
}

#[async_trait]
impl CatalogStorage for InMemoryCatalog {
    async fn list_authors(&self, page: Page) -> Result<Vec<Author>, StorageError> {
        let authors = self.authors.read().await;
        Ok(window(authors.values().cloned(), page))
    }

    async fn get_author(&self, id: i32) -> Result<Option<Author>, StorageError> {
        let authors = self.authors.read().await;
        Ok(authors.get(&id).cloned())
    }

    async fn create_author(&self, input: NewAuthor) -> Result<Author, StorageError> {
        let author = Author {
            id: self.next_author_id(),
            name: input.name,
            bio: input.bio,
            birth_date: input.birth_date,
        };
        let mut authors = self.authors.write().await;
        authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn replace_author(
        &self,
        id: i32,
        input: NewAuthor,
    ) -> Result<Option<Author>, StorageError> {
        let mut authors = self.authors.write().await;
        match authors.get_mut(&id) {
            Some(author) => {
                author.overwrite_with(input);
                Ok(Some(author.clone()))
            }
            None => Ok(None),
        }
    }

    async fn update_author(
        &self,
        id: i32,
        patch: AuthorPatch,
    ) -> Result<Option<Author>, StorageError> {
        let mut authors = self.authors.write().await;
        match authors.get_mut(&id) {
            Some(author) => {
                patch.apply_to(author);
                Ok(Some(author.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_author(&self, id: i32) -> Result<bool, StorageError> {
        let mut authors = self.authors.write().await;
        Ok(authors.remove(&id).is_some())
    }

    async fn list_books(&self, page: Page) -> Result<Vec<Book>, StorageError> {
        let books = self.books.read().await;
        Ok(window(books.values().cloned(), page))
    }

    async fn get_book(&self, id: i32) -> Result<Option<Book>, StorageError> {
        let books = self.books.read().await;
        Ok(books.get(&id).cloned())
    }

    async fn create_book(&self, input: NewBook) -> Result<Book, StorageError> {
        // Same failure mode as the database foreign key.
        let authors = self.authors.read().await;
        if !authors.contains_key(&input.author_id) {
            return Err(StorageError::foreign_key(format!(
                "books.author_id references missing author {}",
                input.author_id
            )));
        }
        drop(authors);

        let book = Book {
            id: self.next_book_id(),
            title: input.title,
            description: input.description,
            publish_date: input.publish_date,
            author_id: input.author_id,
        };
        let mut books = self.books.write().await;
        books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn replace_book(&self, id: i32, input: NewBook) -> Result<Option<Book>, StorageError> {
        let authors = self.authors.read().await;
        if !authors.contains_key(&input.author_id) {
            return Err(StorageError::foreign_key(format!(
                "books.author_id references missing author {}",
                input.author_id
            )));
        }
        drop(authors);

        let mut books = self.books.write().await;
        match books.get_mut(&id) {
            Some(book) => {
                book.overwrite_with(input);
                Ok(Some(book.clone()))
            }
            None => Ok(None),
        }
    }

    async fn update_book(&self, id: i32, patch: BookPatch) -> Result<Option<Book>, StorageError> {
        if let Some(author_id) = patch.author_id {
            let authors = self.authors.read().await;
            if !authors.contains_key(&author_id) {
                return Err(StorageError::foreign_key(format!(
                    "books.author_id references missing author {author_id}"
                )));
            }
        }

        let mut books = self.books.write().await;
        match books.get_mut(&id) {
            Some(book) => {
                patch.apply_to(book);
                Ok(Some(book.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_book(&self, id: i32) -> Result<bool, StorageError> {
        let mut books = self.books.write().await;
        Ok(books.remove(&id).is_some())
    }

    async fn list_books_by_author(&self, author_id: i32) -> Result<Vec<Book>, StorageError> {
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|book| book.author_id == author_id)
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    fn author_input(name: &str) -> NewAuthor {
        NewAuthor {
            name: name.into(),
            bio: Some("This is a test author.".into()),
            birth_date: Some(date("1980-01-01")),
        }
    }

    fn book_input(title: &str, author_id: i32) -> NewBook {
        NewBook {
            title: title.into(),
            description: None,
            publish_date: Some(date("2024-01-01")),
            author_id,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let catalog = InMemoryCatalog::new();
        let first = catalog.create_author(author_input("A")).await.unwrap();
        let second = catalog.create_author(author_input("B")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn get_returns_created_fields() {
        let catalog = InMemoryCatalog::new();
        let created = catalog
            .create_author(author_input("Test Author"))
            .await
            .unwrap();
        let fetched = catalog.get_author(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn replace_overwrites_all_fields() {
        let catalog = InMemoryCatalog::new();
        let created = catalog.create_author(author_input("A")).await.unwrap();

        let replaced = catalog
            .replace_author(
                created.id,
                NewAuthor {
                    name: "B".into(),
                    bio: None,
                    birth_date: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(replaced.name, "B");
        assert_eq!(replaced.bio, None);
        assert_eq!(replaced.birth_date, None);
    }

    #[tokio::test]
    async fn patch_leaves_unset_fields_alone() {
        let catalog = InMemoryCatalog::new();
        let created = catalog.create_author(author_input("A")).await.unwrap();

        let patched = catalog
            .update_author(
                created.id,
                AuthorPatch {
                    name: Some("Updated".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(patched.name, "Updated");
        assert_eq!(patched.bio.as_deref(), Some("This is a test author."));
        assert_eq!(patched.birth_date, Some(date("1980-01-01")));
    }

    #[tokio::test]
    async fn missing_rows_are_none_not_errors() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.get_author(99).await.unwrap().is_none());
        assert!(
            catalog
                .replace_author(99, author_input("X"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(!catalog.delete_author(99).await.unwrap());
    }

    #[tokio::test]
    async fn create_book_requires_existing_author() {
        let catalog = InMemoryCatalog::new();
        let err = catalog.create_book(book_input("Orphan", 7)).await.unwrap_err();
        assert!(matches!(err, StorageError::ForeignKey { .. }));
        assert!(catalog.list_books(Page::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn books_by_author_filters_and_orders() {
        let catalog = InMemoryCatalog::new();
        let alice = catalog.create_author(author_input("Alice")).await.unwrap();
        let bob = catalog.create_author(author_input("Bob")).await.unwrap();

        catalog.create_book(book_input("A1", alice.id)).await.unwrap();
        catalog.create_book(book_input("B1", bob.id)).await.unwrap();
        catalog.create_book(book_input("A2", alice.id)).await.unwrap();

        let books = catalog.list_books_by_author(alice.id).await.unwrap();
        let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["A1", "A2"]);

        // Unknown author is indistinguishable from an author with no books.
        assert!(catalog.list_books_by_author(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_respects_offset_and_limit() {
        let catalog = InMemoryCatalog::new();
        for name in ["A", "B", "C", "D"] {
            catalog.create_author(author_input(name)).await.unwrap();
        }

        let page = catalog.list_authors(Page::new(1, 2)).await.unwrap();
        let names: Vec<_> = page.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["B", "C"]);

        let all = catalog.list_authors(Page::all()).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn delete_book_then_author() {
        let catalog = InMemoryCatalog::new();
        let author = catalog.create_author(author_input("A")).await.unwrap();
        let book = catalog.create_book(book_input("B", author.id)).await.unwrap();

        assert!(catalog.delete_book(book.id).await.unwrap());
        assert!(catalog.delete_author(author.id).await.unwrap());
        assert!(catalog.get_author(author.id).await.unwrap().is_none());
    }
}
