//! Storage provider implementations.

pub mod local;
pub mod memory;

pub use local::LocalStorageProvider;
pub use memory::MemoryStorageProvider;

use dorepo_core::error::AppError;
use dorepo_core::result::AppResult;

/// Split a binary key into its path segments, rejecting anything that
/// could escape the provider's keyspace.
pub(crate) fn key_segments(key: &str) -> AppResult<Vec<&str>> {
    let segments: Vec<&str> = key.split('/').collect();
    let valid = segments.iter().all(|s| {
        !s.is_empty() && *s != "." && *s != ".." && !s.contains('\\') && !s.chars().any(char::is_control)
    });
    if !valid {
        return Err(AppError::validation(format!("Invalid storage key: '{key}'")));
    }
    Ok(segments)
}
