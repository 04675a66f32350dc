//! Paths that resolve but are not served.

use dorepo_core::error::AppError;

use crate::route::ReservedRoute;

/// Every reserved route answers not-found.
pub fn reserved(route: ReservedRoute, path: &str) -> AppError {
    tracing::debug!(route = %route, path, "Reserved route requested");
    AppError::not_found(format!("Not implemented: {path}"))
}

/// Nothing matched the request.
pub fn unknown(path: &str) -> AppError {
    AppError::not_found(format!("No route for {path}"))
}
