// bookshelf-core/src/ingest/ingestor.rs
//! Ingestion coordinator: stage, normalize, merge

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::{accept_records, Format};
use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::staging::StagingArea;

/// Outcome of one successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub format: Format,
    pub staged_path: PathBuf,
    /// Records appended to the collection
    pub imported: usize,
    /// Rows/elements dropped for lacking a title
    pub skipped: usize,
}

pub struct Ingestor {
    catalog: Arc<Catalog>,
    staging: StagingArea,
}

impl Ingestor {
    pub fn new(catalog: Arc<Catalog>, staging: StagingArea) -> Self {
        Ingestor { catalog, staging }
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Ingest an uploaded document.
    ///
    /// Unsupported extensions are rejected before anything is written. Once
    /// staged, any failure removes the staged file again and leaves the
    /// collection as it was.
    pub fn ingest(&self, filename: &str, content: &[u8]) -> Result<IngestReport> {
        let format = Format::from_filename(filename)
            .ok_or_else(|| CatalogError::UnsupportedFormat(filename.to_string()))?;

        let staged_path = self.staging.stage(filename, format, content)?;

        match self.process(format, &staged_path) {
            Ok((imported, skipped)) => {
                info!(
                    file = %staged_path.display(),
                    %format,
                    imported,
                    skipped,
                    "upload ingested"
                );
                Ok(IngestReport {
                    format,
                    staged_path,
                    imported,
                    skipped,
                })
            }
            Err(e) => {
                warn!(file = %staged_path.display(), error = %e, "ingestion failed");
                self.staging.discard(&staged_path);
                Err(e)
            }
        }
    }

    fn process(&self, format: Format, staged_path: &Path) -> Result<(usize, usize)> {
        let content = fs::read(staged_path).map_err(CatalogError::Staging)?;
        let records = format.normalizer().normalize(&content)?;
        let (books, skipped) = accept_records(records);
        let imported = self.catalog.append_books(books)?;
        Ok((imported, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Book;
    use crate::store::{CollectionStore, MemoryStore};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<MemoryStore>, Ingestor) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(Catalog::new(store.clone()));
        let ingestor = Ingestor::new(catalog, StagingArea::new(temp_dir.path().join("uploads")));
        (temp_dir, store, ingestor)
    }

    #[test]
    fn test_csv_upload_skips_untitled_rows() {
        let (_temp, store, ingestor) = setup();

        let report = ingestor.ingest("vendor.csv", b"title,author\nA,\n,X\n").unwrap();

        assert_eq!(report.format, Format::Csv);
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);
        assert!(report.staged_path.exists());
        assert_eq!(store.load().unwrap(), vec![Book::new("A", "", "").unwrap()]);
    }

    #[test]
    fn test_unsupported_extension_rejected_before_staging() {
        let (_temp, store, ingestor) = setup();

        let result = ingestor.ingest("notes.txt", b"title\nDune\n");

        assert!(matches!(result, Err(CatalogError::UnsupportedFormat(_))));
        assert!(!ingestor.staging().dir().exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_parse_failure_removes_staged_file() {
        let (_temp, store, ingestor) = setup();

        let result = ingestor.ingest("broken.xml", b"<books><book><title>T</title>");

        assert!(matches!(
            result,
            Err(CatalogError::FormatParse {
                format: Format::Xml,
                ..
            })
        ));
        assert!(!ingestor.staging().dir().join("broken.xml").exists());
        assert!(store.load().unwrap().is_empty());
    }
}
