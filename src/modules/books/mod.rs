//! Book records: storage, mapping, use cases and HTTP routes.

pub mod error;
pub mod mapper;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{settings::DatabaseSettings, InitCtx, Module};

pub use error::{BookError, BookResult};
pub use mapper::BookMapper;
pub use models::{Book, BookId, BookIdResponse, BookSearch, BookView};
pub use service::BookService;
pub use store::{BookStore, MemoryBookStore, SqliteBookStore, StoreError};

/// Module name, also the URL segment under `/api/v1`
pub const MODULE_NAME: &str = "book";

/// Book module wiring a [`BookService`] into the HTTP server.
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<BookService> {
        &self.service
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.settings.database.backend,
            "book module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::spec())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book module stopped");
        Ok(())
    }
}

/// Open the configured store and build the book module around it.
pub fn create_module(database: &DatabaseSettings) -> anyhow::Result<Arc<dyn Module>> {
    let store = store::open_store(database)?;
    Ok(module_with_store(store))
}

/// Build the book module on top of an already opened store.
pub fn module_with_store(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    let service = Arc::new(BookService::new(store, BookMapper));
    Arc::new(BooksModule::new(service))
}
