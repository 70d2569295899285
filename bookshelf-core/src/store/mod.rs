// store/mod.rs
//! Collection persistence
//!
//! ```text
//! CollectionStore (trait)
//!   ├── FileStore   (production, one JSON document on disk)
//!   └── MemoryStore (testing, Vec behind a lock)
//! ```

pub mod file_store;
pub mod memory_store;
pub mod traits;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use traits::CollectionStore;
