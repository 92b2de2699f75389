//! Book use cases on top of a [`BookStore`].
//!
//! The service owns the not-found and filter-selection policy. Store
//! failures pass through untouched as [`BookError::Store`].

use std::sync::Arc;

use super::error::{BookError, BookResult};
use super::mapper::BookMapper;
use super::models::{Book, BookId, BookSearch, BookView};
use super::store::BookStore;

pub struct BookService {
    store: Arc<dyn BookStore>,
    mapper: BookMapper,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>, mapper: BookMapper) -> Self {
        Self { store, mapper }
    }

    /// Persist a new book and return the id the store assigned.
    pub fn create_new_book(&self, view: BookView) -> BookResult<BookId> {
        let entity = self.mapper.to_entity(view);
        let id = self.store.insert(&entity)?;
        tracing::info!(book_id = id, "book created");
        Ok(id)
    }

    /// Every stored book as a view. An empty store yields an empty list.
    pub fn get_all_books(&self) -> BookResult<Vec<BookView>> {
        let books = self.store.get_all()?;
        Ok(books.iter().map(|book| self.mapper.to_view(book)).collect())
    }

    pub fn get_book_by_id(&self, id: BookId) -> BookResult<BookView> {
        let book = self.store.get_by_id(id)?.ok_or(BookError::NotFound(id))?;
        Ok(self.mapper.to_view(&book))
    }

    /// Run the narrowest query the filters allow.
    ///
    /// Both filters use the combined query, then `published` alone, then
    /// `author` alone. A search without any filter is rejected.
    pub fn search(&self, search: &BookSearch) -> BookResult<Vec<Book>> {
        let books = match (search.author.as_deref(), search.published) {
            (Some(author), Some(published)) => {
                self.store.find_by_author_and_published(author, published)?
            }
            (_, Some(published)) => self.store.find_by_published(published)?,
            (Some(author), None) => self.store.find_by_author(author)?,
            (None, None) => return Err(BookError::MissingSearchFilter),
        };

        tracing::debug!(filter = %search, matches = books.len(), "book search");
        Ok(books)
    }

    /// Overwrite the fields of an existing book, keeping its id.
    pub fn update_book(&self, id: BookId, view: BookView) -> BookResult<BookView> {
        let mut book = self.store.get_by_id(id)?.ok_or(BookError::NotFound(id))?;
        self.mapper.apply_view(view, &mut book);

        // The book may have been deleted between the read and the write.
        if !self.store.update(&book)? {
            return Err(BookError::NotFound(id));
        }

        tracing::info!(book_id = id, "book updated");
        Ok(self.mapper.to_view(&book))
    }

    /// Delete a book. Missing ids are not an error.
    pub fn delete_book_by_id(&self, id: BookId) -> BookResult<()> {
        self.store.delete_by_id(id)?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }
}
