//! Router construction for the dorepo HTTP surface.
//!
//! There are no per-path routes: the protocol's paths are prefix matches
//! with free-form tails, so every request goes to the fallback dispatcher,
//! which resolves it into a [`Route`](crate::route::Route).

use axum::{Router, extract::DefaultBodyLimit, middleware as axum_middleware};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::dispatch::dispatch;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    Router::new()
        .fallback(dispatch)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CatchPanicLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
