//! Bookshelf HTTP server - catalog API and upload endpoint over bookshelf-core

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use bookshelf_core::{Catalog, CatalogError, FileStore, Ingestor, StagingArea};
use tower_http::trace::TraceLayer;

// Re-export main types
pub use config::{Config, ConfigError};
pub use error::{ApiError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "bookshelf-server";

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub ingestor: Arc<Ingestor>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, staging: StagingArea) -> Self {
        let ingestor = Arc::new(Ingestor::new(catalog.clone(), staging));
        AppState { catalog, ingestor }
    }

    /// File-backed state from configuration. Creates an empty collection
    /// document if none exists yet.
    pub fn from_config(config: &Config) -> std::result::Result<Self, CatalogError> {
        let store = FileStore::new(&config.books_file);
        store.initialize()?;
        let catalog = Arc::new(Catalog::new(Arc::new(store)));
        Ok(Self::new(catalog, StagingArea::new(&config.upload_dir)))
    }
}

/// Build the router
pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::list_books).post(routes::add_book_form))
        .route(
            "/api/books",
            get(routes::list_books).post(routes::add_book_json),
        )
        .route("/upload", post(routes::upload))
        .route("/update", post(routes::update))
        .route("/delete", post(routes::delete))
        .route("/health", get(routes::health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
