//! # dorepo-api
//!
//! HTTP layer for dorepo built on Axum.
//!
//! Provides the request dispatcher and its closed [`Route`] set, error
//! mapping, request logging, and [`RepositoryServer`], which owns the
//! start/close lifecycle of storage, index, and the async ingest queue.

pub mod app;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod route;
pub mod router;
pub mod state;

pub use app::RepositoryServer;
pub use route::{ReservedRoute, Route};
pub use router::build_router;
pub use state::AppState;
