// bookshelf-core/src/lib.rs
//! Book catalog core: a single persisted collection of book records, fed
//! manually or from uploaded CSV, XML, JSON and XLSX files.

pub mod book;
pub mod catalog;
pub mod error;
pub mod ingest;
pub mod staging;
pub mod store;

// Public exports
pub use book::{Book, NewBook};
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use ingest::{Format, IngestReport, Ingestor, Normalizer, RawRecord};
pub use staging::StagingArea;
pub use store::{CollectionStore, FileStore, MemoryStore};
