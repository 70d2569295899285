// store/memory_store.rs
//! Pure in-memory collection store for fast testing

use parking_lot::RwLock;

use crate::book::Book;
use crate::error::Result;
use crate::store::CollectionStore;

/// In-memory storage backend (testing)
///
/// Data is lost when the store is dropped. `save` replaces the whole vector
/// under a write lock, matching the all-or-nothing contract of `FileStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: RwLock<Vec<Book>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing collection
    pub fn with_books(books: Vec<Book>) -> Self {
        MemoryStore {
            books: RwLock::new(books),
        }
    }
}

impl CollectionStore for MemoryStore {
    fn load(&self) -> Result<Vec<Book>> {
        Ok(self.books.read().clone())
    }

    fn save(&self, books: &[Book]) -> Result<()> {
        *self.books.write() = books.to_vec();
        Ok(())
    }
}
