//! Core traits defined in `dorepo-core` and implemented by other crates.

pub mod index;
pub mod storage;

pub use index::{IndexDocument, SearchIndex};
pub use storage::{ByteStream, StorageProvider, StoredBinary, collect_stream, stream_from_bytes};
