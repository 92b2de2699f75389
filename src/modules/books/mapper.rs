//! Field-by-field conversion between [`BookView`] and [`Book`].

use super::models::{Book, BookView};

/// Converts between the client-facing view and the persisted entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookMapper;

impl BookMapper {
    /// Build a new, not yet persisted entity from a view.
    pub fn to_entity(&self, view: BookView) -> Book {
        Book {
            id: None,
            author: view.author,
            title: view.title,
            published: view.published,
        }
    }

    pub fn to_view(&self, book: &Book) -> BookView {
        BookView {
            author: book.author.clone(),
            title: book.title.clone(),
            published: book.published,
        }
    }

    /// Overwrite the view's fields onto an existing entity. `id` is kept.
    pub fn apply_view(&self, view: BookView, book: &mut Book) {
        book.author = view.author;
        book.title = view.title;
        book.published = view.published;
    }
}
