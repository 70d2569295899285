// bookshelf-core/src/staging.rs
//! Upload staging area
//!
//! Uploaded files are written here before they are normalized, so the
//! original vendor file is kept for auditing and reprocessing. A file whose
//! ingestion fails is removed again.
//!
//! Every upload gets its own file (`<stem>-<random>.<ext>`), so uploads that
//! share a client filename never read or remove each other's copy.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use crate::error::{CatalogError, Result};
use crate::ingest::Format;

#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        StagingArea {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `content` to a new file named after a sanitized version of
    /// `filename`. Existing staged files are never replaced.
    pub fn stage(&self, filename: &str, format: Format, content: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(CatalogError::Staging)?;

        let (stem, extension) = staged_name_parts(filename, format);
        let mut staged = tempfile::Builder::new()
            .prefix(&format!("{}-", stem))
            .suffix(&format!(".{}", extension))
            .tempfile_in(&self.dir)
            .map_err(CatalogError::Staging)?;
        staged.write_all(content).map_err(CatalogError::Staging)?;
        let (_, path) = staged.keep().map_err(|e| CatalogError::Staging(e.error))?;

        debug!(path = %path.display(), bytes = content.len(), "upload staged");
        Ok(path)
    }

    /// Remove a staged file; a file that is already gone is not an error
    pub fn discard(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "staged file removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove staged file"),
        }
    }
}

/// Reduce a client-supplied filename to a safe single path component:
/// directories are dropped, accented letters are decomposed to their ASCII
/// base (NFKD), whitespace becomes `_`, and anything outside
/// `[A-Za-z0-9._-]` is removed along with leading/trailing dots and
/// underscores.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let decomposed: String = base.nfkd().collect();

    let cleaned: String = decomposed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Stem and extension of the sanitized name; `upload.<ext>` when
/// sanitizing lost the stem or the format's extension
fn staged_name_parts(filename: &str, format: Format) -> (String, String) {
    let name = sanitize_filename(filename);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && Format::from_extension(ext) == Some(format) => {
            (stem.to_string(), ext.to_string())
        }
        _ => ("upload".to_string(), format.extension().to_string()),
    }
}
