//! Built-in job implementations.

pub mod ingest;
