// store/file_store.rs
//! File-backed collection store
//!
//! The collection lives in a single pretty-printed JSON array. Saves go
//! through a sibling `.tmp` file that is fsynced and renamed over the target,
//! so a reader never observes a half-written document.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::book::Book;
use crate::error::{CatalogError, Result};
use crate::store::CollectionStore;

/// JSON file storage backend (production)
///
/// # Examples
///
/// ```ignore
/// use bookshelf_core::store::FileStore;
///
/// let store = FileStore::new("books.json");
/// store.initialize()?;
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty collection if no document
    /// exists yet. An existing document is left alone.
    pub fn initialize(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "creating empty collection");
        self.save(&[])
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("collection"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_temp(&self, temp_path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut temp_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(temp_path)?;
        temp_file.write_all(data)?;
        temp_file.write_all(b"\n")?;
        temp_file.sync_all()
    }
}

impl CollectionStore for FileStore {
    fn load(&self) -> Result<Vec<Book>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CatalogError::StorageRead(e)),
        };

        serde_json::from_slice(&data).map_err(|e| CatalogError::StorageCorrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn save(&self, books: &[Book]) -> Result<()> {
        let data = serde_json::to_vec_pretty(books).map_err(|e| {
            CatalogError::StorageWrite(std::io::Error::new(ErrorKind::InvalidData, e))
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(CatalogError::StorageWrite)?;
            }
        }

        let temp_path = self.temp_path();
        if let Err(e) = self.write_temp(&temp_path, &data) {
            let _ = fs::remove_file(&temp_path);
            return Err(CatalogError::StorageWrite(e));
        }

        // Atomic rename: temp → final
        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CatalogError::StorageWrite(e)
        })?;

        debug!(path = %self.path.display(), count = books.len(), "collection saved");
        Ok(())
    }
}
