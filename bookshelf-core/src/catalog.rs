// bookshelf-core/src/catalog.rs
//! Catalog operations over a collection store
//!
//! Every mutation is a full read-modify-write: load the collection, change
//! it in memory, save it back. A per-catalog write lock makes that sequence
//! one critical section, so concurrent requests in the same process cannot
//! overwrite each other's changes. Reads take no lock.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::book::{Book, NewBook};
use crate::error::{CatalogError, Result};
use crate::store::CollectionStore;

pub struct Catalog {
    store: Arc<dyn CollectionStore>,
    write_lock: Mutex<()>,
}

impl Catalog {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Catalog {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Load, mutate and save under the write lock
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Book>) -> T) -> Result<T> {
        let _guard = self.write_lock.lock();
        let mut books = self.store.load()?;
        let output = f(&mut books);
        self.store.save(&books)?;
        Ok(output)
    }

    /// Append one record. Fails with `Validation` before touching the store
    /// when the title is absent or blank.
    pub fn add_book(&self, new_book: NewBook) -> Result<Book> {
        let book = new_book.into_book()?;
        let added = book.clone();
        self.mutate(|books| books.push(book))?;
        info!(title = %added.title, "book added");
        Ok(added)
    }

    pub fn list_books(&self) -> Result<Vec<Book>> {
        self.store.load()
    }

    /// Rename the first record titled `old_title`. Returns whether a record
    /// matched; the collection is persisted either way.
    pub fn update_title(&self, old_title: &str, new_title: &str) -> Result<bool> {
        if new_title.trim().is_empty() {
            return Err(CatalogError::Validation("New title is required".to_string()));
        }

        let matched = self.mutate(|books| {
            match books.iter_mut().find(|book| book.title == old_title) {
                Some(book) => {
                    book.title = new_title.to_string();
                    true
                }
                None => false,
            }
        })?;

        info!(old_title, new_title, matched, "title updated");
        Ok(matched)
    }

    /// Remove every record titled `title`; returns how many were removed
    pub fn delete_by_title(&self, title: &str) -> Result<usize> {
        let removed = self.mutate(|books| {
            let before = books.len();
            books.retain(|book| book.title != title);
            before - books.len()
        })?;

        info!(title, removed, "books deleted");
        Ok(removed)
    }

    /// Append already-validated records in order; used by ingestion
    pub fn append_books(&self, new_books: Vec<Book>) -> Result<usize> {
        let count = new_books.len();
        self.mutate(|books| books.extend(new_books))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn book(title: &str) -> Book {
        Book::new(title, "", "").unwrap()
    }

    fn catalog_with(books: Vec<Book>) -> (Arc<MemoryStore>, Catalog) {
        let store = Arc::new(MemoryStore::with_books(books));
        let catalog = Catalog::new(store.clone());
        (store, catalog)
    }

    #[test]
    fn test_add_book_appends() {
        let (store, catalog) = catalog_with(vec![book("Dune")]);

        let added = catalog
            .add_book(NewBook {
                title: Some("Emma".to_string()),
                author: Some("Austen".to_string()),
                isbn: None,
            })
            .unwrap();

        assert_eq!(added, Book::new("Emma", "Austen", "").unwrap());
        assert_eq!(store.load().unwrap(), vec![book("Dune"), added]);
    }

    #[test]
    fn test_add_book_without_title_does_not_mutate() {
        let (store, catalog) = catalog_with(vec![book("Dune")]);

        let result = catalog.add_book(NewBook::titled(""));

        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert_eq!(store.load().unwrap(), vec![book("Dune")]);
    }

    #[test]
    fn test_update_renames_first_match_only() {
        let (_store, catalog) = catalog_with(vec![book("X"), book("Z"), book("X")]);

        assert!(catalog.update_title("X", "Y").unwrap());

        let titles: Vec<String> = catalog
            .list_books()
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Y", "Z", "X"]);
    }

    #[test]
    fn test_update_without_match_is_noop() {
        let (store, catalog) = catalog_with(vec![book("Dune")]);

        assert!(!catalog.update_title("Missing", "Other").unwrap());
        assert_eq!(store.load().unwrap(), vec![book("Dune")]);
    }

    #[test]
    fn test_update_to_blank_title_rejected() {
        let (store, catalog) = catalog_with(vec![book("Dune")]);

        let result = catalog.update_title("Dune", "  ");

        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert_eq!(store.load().unwrap(), vec![book("Dune")]);
    }

    #[test]
    fn test_delete_removes_all_matches() {
        let (_store, catalog) = catalog_with(vec![book("X"), book("Dune"), book("X")]);

        assert_eq!(catalog.delete_by_title("X").unwrap(), 2);
        assert_eq!(catalog.list_books().unwrap(), vec![book("Dune")]);
    }

    #[test]
    fn test_delete_without_match() {
        let (_store, catalog) = catalog_with(vec![book("Dune")]);

        assert_eq!(catalog.delete_by_title("X").unwrap(), 0);
        assert_eq!(catalog.list_books().unwrap(), vec![book("Dune")]);
    }

    #[test]
    fn test_append_books_preserves_order() {
        let (_store, catalog) = catalog_with(vec![book("A")]);

        let count = catalog.append_books(vec![book("B"), book("C")]).unwrap();

        assert_eq!(count, 2);
        assert_eq!(catalog.list_books().unwrap(), vec![book("A"), book("B"), book("C")]);
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let (store, catalog) = catalog_with(Vec::new());
        let catalog = Arc::new(catalog);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        catalog
                            .add_book(NewBook::titled(format!("book-{}-{}", i, j)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load().unwrap().len(), 200);
    }
}
