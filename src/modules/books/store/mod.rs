//! Book persistence contract and its backends.
//!
//! Every store assigns ids on insert and never hands out the same id twice,
//! even after the book holding it was deleted. Lookups that find nothing
//! return `None` or an empty `Vec`, never an error.

mod memory;
mod sqlite;

pub use memory::MemoryBookStore;
pub use sqlite::SqliteBookStore;

use std::sync::Arc;

use anyhow::Context;
use bookshelf_kernel::settings::{DatabaseSettings, StoreBackend};
use thiserror::Error;

use super::models::{Book, BookId};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite failure: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("book store lock poisoned by a panicking writer")]
    Poisoned,
}

/// Durable storage of [`Book`] entities.
///
/// Each call is atomic from the caller's point of view. Results are ordered
/// by ascending id.
pub trait BookStore: Send + Sync {
    /// Persist a new book and return its freshly assigned id. Any `id` on the input is ignored.
    fn insert(&self, book: &Book) -> StoreResult<BookId>;

    fn get_by_id(&self, id: BookId) -> StoreResult<Option<Book>>;

    fn get_all(&self) -> StoreResult<Vec<Book>>;

    /// Overwrite the fields of the stored book with the same id.
    ///
    /// Returns `false` when no such book exists.
    fn update(&self, book: &Book) -> StoreResult<bool>;

    /// Remove the book if present. Missing ids are a no-op.
    fn delete_by_id(&self, id: BookId) -> StoreResult<()>;

    fn find_by_author(&self, author: &str) -> StoreResult<Vec<Book>>;

    fn find_by_published(&self, published: bool) -> StoreResult<Vec<Book>>;

    fn find_by_author_and_published(&self, author: &str, published: bool)
        -> StoreResult<Vec<Book>>;
}

/// Open the store selected by `database.backend`.
pub fn open_store(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn BookStore>> {
    match settings.backend {
        StoreBackend::Memory => {
            tracing::info!(backend = "memory", "opening book store");
            Ok(Arc::new(MemoryBookStore::new()))
        }
        StoreBackend::Sqlite => {
            tracing::info!(backend = "sqlite", path = %settings.path, "opening book store");
            let opened = if settings.is_in_memory_sqlite() {
                bookshelf_db::open_db_in_memory()
            } else {
                bookshelf_db::open_db(&settings.path)
            };
            let conn =
                opened.with_context(|| format!("failed to open database '{}'", settings.path))?;

            let store = SqliteBookStore::new(conn)
                .with_context(|| "failed to prepare book table")?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every [`BookStore`] backend must share.

    use super::*;

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().filter_map(|b| b.title.as_deref()).collect()
    }

    pub fn insert_assigns_sequential_ids(store: &dyn BookStore) {
        let first = store
            .insert(&Book::new("Gary", "Java Programming", true))
            .unwrap();
        let second = store.insert(&Book::new("Tommy", "Python", false)).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let loaded = store.get_by_id(first).unwrap().unwrap();
        assert_eq!(loaded.id, Some(1));
        assert_eq!(loaded.author.as_deref(), Some("Gary"));
        assert_eq!(loaded.title.as_deref(), Some("Java Programming"));
        assert!(loaded.published);
    }

    pub fn insert_ignores_caller_id(store: &dyn BookStore) {
        let mut book = Book::new("Gary", "Java", true);
        book.id = Some(99);

        let id = store.insert(&book).unwrap();

        assert_eq!(id, 1);
        assert!(store.get_by_id(99).unwrap().is_none());
    }

    pub fn missing_id_is_absent(store: &dyn BookStore) {
        assert!(store.get_by_id(1).unwrap().is_none());
        assert!(store.get_all().unwrap().is_empty());
    }

    pub fn absent_fields_round_trip(store: &dyn BookStore) {
        let book = Book {
            id: None,
            author: None,
            title: Some(String::new()),
            published: false,
        };
        let id = store.insert(&book).unwrap();

        let loaded = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.author, None);
        assert_eq!(loaded.title.as_deref(), Some(""));
    }

    pub fn deleted_ids_are_not_reused(store: &dyn BookStore) {
        let first = store.insert(&Book::new("Gary", "Java", true)).unwrap();
        let second = store.insert(&Book::new("Mary", "Rust", true)).unwrap();
        store.delete_by_id(second).unwrap();

        let third = store.insert(&Book::new("Peter", "Go", false)).unwrap();

        assert!(third > second);
        assert!(store.get_by_id(second).unwrap().is_none());
        assert_eq!(
            store
                .get_all()
                .unwrap()
                .iter()
                .map(|b| b.id.unwrap())
                .collect::<Vec<_>>(),
            vec![first, third]
        );
    }

    pub fn delete_missing_is_noop(store: &dyn BookStore) {
        store.insert(&Book::new("Gary", "Java", true)).unwrap();
        let before = store.get_all().unwrap();

        store.delete_by_id(1234).unwrap();

        assert_eq!(store.get_all().unwrap(), before);
    }

    pub fn update_overwrites_fields(store: &dyn BookStore) {
        let id = store.insert(&Book::new("Gary", "Java", false)).unwrap();
        let mut book = store.get_by_id(id).unwrap().unwrap();
        book.title = Some("Java Second Edition".to_string());
        book.published = true;

        assert!(store.update(&book).unwrap());

        let loaded = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(loaded, book);
    }

    pub fn update_missing_reports_false(store: &dyn BookStore) {
        let mut book = Book::new("Gary", "Java", false);
        assert!(!store.update(&book).unwrap());

        book.id = Some(7);
        assert!(!store.update(&book).unwrap());
        assert!(store.get_all().unwrap().is_empty());
    }

    pub fn finders_match_exactly(store: &dyn BookStore) {
        store
            .insert(&Book::new("Mary", "Microservice", true))
            .unwrap();
        store.insert(&Book::new("Mary", "Drafts", false)).unwrap();
        store.insert(&Book::new("Gary", "Java", true)).unwrap();
        store.insert(&Book::new("Maryanne", "Poems", true)).unwrap();

        assert_eq!(
            titles(&store.find_by_author("Mary").unwrap()),
            vec!["Microservice", "Drafts"]
        );
        assert_eq!(
            titles(&store.find_by_published(true).unwrap()),
            vec!["Microservice", "Java", "Poems"]
        );
        assert_eq!(
            titles(&store.find_by_author_and_published("Mary", true).unwrap()),
            vec!["Microservice"]
        );
        assert!(store.find_by_author("mary").unwrap().is_empty());
        assert!(store.find_by_author("Peter").unwrap().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_store_memory_backend() {
        let settings = DatabaseSettings {
            backend: StoreBackend::Memory,
            path: String::new(),
        };
        let store = open_store(&settings).unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn open_store_sqlite_in_memory() {
        let settings = DatabaseSettings {
            backend: StoreBackend::Sqlite,
            path: DatabaseSettings::IN_MEMORY_PATH.to_string(),
        };
        let store = open_store(&settings).unwrap();
        let id = store.insert(&Book::new("Gary", "Java", true)).unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn open_store_sqlite_file_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DatabaseSettings {
            backend: StoreBackend::Sqlite,
            path: dir.path().join("books.db").to_string_lossy().to_string(),
        };

        {
            let store = open_store(&settings).unwrap();
            store.insert(&Book::new("Gary", "Java", true)).unwrap();
        }

        let reopened = open_store(&settings).unwrap();
        let books = reopened.get_all().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author.as_deref(), Some("Gary"));
    }
}
