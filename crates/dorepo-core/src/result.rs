//! Convenience result type alias for dorepo.

use crate::error::AppError;

/// A specialized `Result` type for dorepo operations.
pub type AppResult<T> = Result<T, AppError>;
