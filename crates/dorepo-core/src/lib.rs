//! # dorepo-core
//!
//! Core crate for dorepo. Contains the configuration schema, the storage
//! and index traits implemented by `dorepo-storage`, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other dorepo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
