//! # dorepo-storage
//!
//! Storage provider implementations for dorepo: a local filesystem
//! provider and an in-memory provider, plus the in-memory search index.
//! [`StorageManager`] selects the provider named in configuration.

pub mod index;
pub mod manager;
pub mod providers;

pub use index::MemoryIndex;
pub use manager::StorageManager;
pub use providers::{LocalStorageProvider, MemoryStorageProvider};
