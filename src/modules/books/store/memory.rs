use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookId};

#[derive(Debug)]
struct State {
    next_id: BookId,
    books: BTreeMap<BookId, Book>,
}

/// Process-local book store. Contents are lost on shutdown.
#[derive(Debug)]
pub struct MemoryBookStore {
    state: RwLock<State>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                books: BTreeMap::new(),
            }),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }

    fn filter<F>(&self, predicate: F) -> StoreResult<Vec<Book>>
    where
        F: Fn(&Book) -> bool,
    {
        let state = self.read()?;
        Ok(state
            .books
            .values()
            .filter(|book| predicate(*book))
            .cloned()
            .collect())
    }
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStore for MemoryBookStore {
    fn insert(&self, book: &Book) -> StoreResult<BookId> {
        let mut state = self.write()?;
        let id = state.next_id;
        state.next_id += 1;

        let mut stored = book.clone();
        stored.id = Some(id);
        state.books.insert(id, stored);
        Ok(id)
    }

    fn get_by_id(&self, id: BookId) -> StoreResult<Option<Book>> {
        Ok(self.read()?.books.get(&id).cloned())
    }

    fn get_all(&self) -> StoreResult<Vec<Book>> {
        self.filter(|_| true)
    }

    fn update(&self, book: &Book) -> StoreResult<bool> {
        let Some(id) = book.id else {
            return Ok(false);
        };

        let mut state = self.write()?;
        match state.books.get_mut(&id) {
            Some(stored) => {
                stored.author = book.author.clone();
                stored.title = book.title.clone();
                stored.published = book.published;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_by_id(&self, id: BookId) -> StoreResult<()> {
        self.write()?.books.remove(&id);
        Ok(())
    }

    fn find_by_author(&self, author: &str) -> StoreResult<Vec<Book>> {
        self.filter(|book| book.author.as_deref() == Some(author))
    }

    fn find_by_published(&self, published: bool) -> StoreResult<Vec<Book>> {
        self.filter(|book| book.published == published)
    }

    fn find_by_author_and_published(
        &self,
        author: &str,
        published: bool,
    ) -> StoreResult<Vec<Book>> {
        self.filter(|book| book.author.as_deref() == Some(author) && book.published == published)
    }
}
