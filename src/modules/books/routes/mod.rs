//! HTTP handlers for the book module.
//!
//! Request decoding and validation happen here; the service never sees an
//! invalid view. Empty listings and empty searches are escalated to 404.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bookshelf_http::{router::module_path, AppError};
use serde::Deserialize;

use super::error::BookResult;
use super::models::{Book, BookId, BookIdResponse, BookSearch, BookView};
use super::service::BookService;
use super::MODULE_NAME;

/// Build the module router. Paths are relative to the module mount point.
pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books))
        .route("/create", post(create_book))
        .route("/search", get(search_books))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

/// Raw search query; `published` is parsed leniently by [`parse_flag`].
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub author: Option<String>,
    pub published: Option<String>,
}

impl SearchParams {
    fn into_search(self) -> Result<BookSearch, AppError> {
        // A blank flag counts as not given.
        let published = match self.published.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(raw) => Some(parse_flag(raw).ok_or_else(|| {
                AppError::bad_request(format!("invalid value '{raw}' for `published`"))
            })?),
        };

        Ok(BookSearch {
            author: self.author,
            published,
        })
    }
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, ignoring case.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

async fn health_check() -> &'static str {
    "book module is healthy"
}

async fn create_book(
    State(service): State<Arc<BookService>>,
    payload: Result<Json<BookView>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let view = decode_view(payload)?;
    let book_id = blocking(service, move |service| service.create_new_book(view)).await?;

    let location = format!("{}/create/{}", module_path(MODULE_NAME), book_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BookIdResponse { book_id }),
    ))
}

async fn list_books(
    State(service): State<Arc<BookService>>,
) -> Result<Json<Vec<BookView>>, AppError> {
    let books = blocking(service, |service| service.get_all_books()).await?;
    if books.is_empty() {
        return Err(AppError::not_found("Book Not found"));
    }
    Ok(Json(books))
}

async fn get_book(
    State(service): State<Arc<BookService>>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<BookView>, AppError> {
    let id = decode_id(id)?;
    let view = blocking(service, move |service| service.get_book_by_id(id)).await?;
    Ok(Json(view))
}

async fn search_books(
    State(service): State<Arc<BookService>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let search = params.into_search()?;

    let filter = search.to_string();
    let books = blocking(service, move |service| service.search(&search)).await?;
    if books.is_empty() {
        return Err(AppError::not_found(format!("Book Not found with {filter}")));
    }
    Ok(Json(books))
}

async fn update_book(
    State(service): State<Arc<BookService>>,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<BookView>, JsonRejection>,
) -> Result<Json<BookView>, AppError> {
    let id = decode_id(id)?;
    let view = decode_view(payload)?;
    let updated = blocking(service, move |service| service.update_book(id, view)).await?;
    Ok(Json(updated))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<BookIdResponse>, AppError> {
    let book_id = decode_id(id)?;
    blocking(service, move |service| service.delete_book_by_id(book_id)).await?;
    Ok(Json(BookIdResponse { book_id }))
}

/// Run a service call on the blocking pool. Store calls may wait on SQLite
/// locks for up to the busy timeout.
async fn blocking<T, F>(service: Arc<BookService>, call: F) -> Result<T, AppError>
where
    F: FnOnce(&BookService) -> BookResult<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(AppError::internal)?;
    Ok(result?)
}

fn decode_id(id: Result<Path<BookId>, PathRejection>) -> Result<BookId, AppError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

fn decode_view(payload: Result<Json<BookView>, JsonRejection>) -> Result<BookView, AppError> {
    let Json(view) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    view.validate()
        .map_err(|details| AppError::validation(details, "Validation failed"))?;
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_like_query_booleans() {
        for raw in ["true", "TRUE", "1", "yes", "On"] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["false", "0", "no", "OFF"] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn search_params_reject_bad_flag() {
        let params = SearchParams {
            author: Some("Mary".to_string()),
            published: Some("sometimes".to_string()),
        };
        let err = params.into_search().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn blank_flag_is_no_filter() {
        for blank in ["", "  "] {
            let params = SearchParams {
                author: Some("Mary".to_string()),
                published: Some(blank.to_string()),
            };
            assert_eq!(params.into_search().unwrap(), BookSearch::by_author("Mary"));
        }
    }

    #[test]
    fn search_params_keep_both_filters() {
        let params = SearchParams {
            author: Some("Mary".to_string()),
            published: Some("1".to_string()),
        };
        assert_eq!(
            params.into_search().unwrap(),
            BookSearch::by_author_and_published("Mary", true)
        );
    }
}
