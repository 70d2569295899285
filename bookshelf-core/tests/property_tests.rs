// Property tests for the collection store and catalog
use bookshelf_core::{Book, Catalog, CollectionStore, FileStore, MemoryStore, NewBook};
use proptest::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

fn book_strategy() -> impl Strategy<Value = Book> {
    (
        "[A-Za-z0-9][A-Za-z0-9 ,.'&-]{0,30}",
        "[A-Za-z ,.\u{e9}\u{f6}-]{0,20}",
        "[0-9X-]{0,17}",
    )
        .prop_map(|(title, author, isbn)| Book {
            title,
            author,
            isbn,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_file_store_round_trip(books in prop::collection::vec(book_strategy(), 0..20)) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("books.json"));

        store.save(&books).unwrap();

        prop_assert_eq!(store.load().unwrap(), books);
    }

    #[test]
    fn prop_add_then_list_ends_with_record(
        existing in prop::collection::vec(book_strategy(), 0..10),
        new_book in book_strategy(),
    ) {
        let store = Arc::new(MemoryStore::with_books(existing.clone()));
        let catalog = Catalog::new(store);

        catalog.add_book(NewBook {
            title: Some(new_book.title.clone()),
            author: Some(new_book.author.clone()),
            isbn: Some(new_book.isbn.clone()),
        }).unwrap();

        let books = catalog.list_books().unwrap();
        prop_assert_eq!(books.len(), existing.len() + 1);
        prop_assert_eq!(&books[..existing.len()], &existing[..]);
        prop_assert_eq!(books.last(), Some(&new_book));
    }

    #[test]
    fn prop_blank_title_never_mutates(
        existing in prop::collection::vec(book_strategy(), 0..10),
        blank in "[ \t]{0,4}",
    ) {
        let store = Arc::new(MemoryStore::with_books(existing.clone()));
        let catalog = Catalog::new(store.clone());

        prop_assert!(catalog.add_book(NewBook::titled(blank)).is_err());
        prop_assert_eq!(store.load().unwrap(), existing);
    }
}
