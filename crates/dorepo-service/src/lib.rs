//! # dorepo-service
//!
//! Service layer for dorepo. [`IngestService`] fetches submitted files,
//! stores them, rewrites their URIs, and persists the stamped metadata
//! document. [`RetrievalService`] serves what was stored.
//!
//! Services follow constructor injection: storage, index, fetcher, and
//! marshaller are handed in as `Arc` trait objects.

pub mod fetch;
pub mod ingest;
pub mod retrieval;

pub use fetch::{BinaryFetcher, FetchedBinary, RemoteFetcher};
pub use ingest::IngestService;
pub use retrieval::RetrievalService;
