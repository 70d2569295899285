// store/traits.rs
//! Storage abstraction for the book collection
//!
//! The whole collection is one document: callers load it, mutate it in
//! memory and save it back. Implementations do not lock; serialization of
//! writers is the caller's job (see `Catalog`).

use crate::book::Book;
use crate::error::Result;

/// Load/save contract for the persisted collection
///
/// # Implementations
///
/// - **FileStore**: JSON array on disk, atomic replace on save
/// - **MemoryStore**: in-memory, for tests and embedding
pub trait CollectionStore: Send + Sync {
    /// Read the full collection
    ///
    /// Returns an empty collection when nothing has been persisted yet.
    /// Fails with `StorageCorrupt` when a document exists but is not a
    /// sequence of book objects.
    fn load(&self) -> Result<Vec<Book>>;

    /// Replace the full collection
    ///
    /// A concurrent `load` sees either the previous or the new collection,
    /// never a partial write.
    fn save(&self, books: &[Book]) -> Result<()>;
}
