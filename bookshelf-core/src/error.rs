// src/error.rs
//! Error types for the catalog core

use std::path::PathBuf;
use thiserror::Error;

use crate::ingest::Format;

/// Catalog error
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A required field is missing or blank
    #[error("{0}")]
    Validation(String),

    /// The uploaded file extension has no normalizer
    #[error("File type not supported: {0}")]
    UnsupportedFormat(String),

    /// The document is structurally malformed for its claimed format
    #[error("Invalid {format} document: {message}")]
    FormatParse { format: Format, message: String },

    /// The persisted collection exists but cannot be decoded
    #[error("Collection at {} is corrupt: {message}", path.display())]
    StorageCorrupt { path: PathBuf, message: String },

    #[error("Failed to read collection: {0}")]
    StorageRead(#[source] std::io::Error),

    #[error("Failed to write collection: {0}")]
    StorageWrite(#[source] std::io::Error),

    /// Upload staging (write, read back or removal) failed
    #[error("Staging error: {0}")]
    Staging(#[source] std::io::Error),
}

impl CatalogError {
    pub(crate) fn parse(format: Format, err: impl std::fmt::Display) -> Self {
        CatalogError::FormatParse {
            format,
            message: err.to_string(),
        }
    }

    /// True when the caller sent something we cannot accept; storage
    /// failures are server-side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation(_)
                | CatalogError::UnsupportedFormat(_)
                | CatalogError::FormatParse { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
