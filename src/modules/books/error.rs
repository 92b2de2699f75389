use bookshelf_http::AppError;
use thiserror::Error;

use super::models::BookId;
use super::store::StoreError;

pub type BookResult<T> = Result<T, BookError>;

/// Failures raised by [`BookService`](super::service::BookService).
///
/// Empty query results are not errors; only a lookup by id reports absence.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("No such Book for id '{0}'")]
    NotFound(BookId),

    #[error("search requires at least one of `author` or `published`")]
    MissingSearchFilter,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(_) => AppError::not_found(err.to_string()),
            BookError::MissingSearchFilter => AppError::bad_request(err.to_string()),
            BookError::Store(store_err) => AppError::internal(store_err),
        }
    }
}
