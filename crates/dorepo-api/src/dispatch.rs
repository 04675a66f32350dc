//! Single entry point for every request.
//!
//! The router sends all traffic here; [`Route::resolve`] picks exactly one
//! handler and errors become responses at this boundary.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};

use dorepo_core::error::AppError;

use crate::handlers;
use crate::route::Route;
use crate::state::AppState;

/// Resolve and run the handler for `request`.
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if !matches!(
        method,
        Method::GET | Method::POST | Method::PUT | Method::DELETE
    ) {
        tracing::warn!(method = %method, path = %path, "Unsupported method");
    }

    let route = Route::resolve(&method, &path);
    tracing::debug!(?route, "Resolved route");

    let result: Result<Response, AppError> = match route {
        Route::IngestEntity => match Bytes::from_request(request, &state).await {
            Ok(body) => handlers::entity::ingest_entity(&state, body).await,
            Err(rejection) => return rejection.into_response(),
        },
        Route::GetEntity { id } => handlers::entity::get_entity(&state, &id).await,
        Route::GetRepresentation {
            entity_id,
            representation_id,
        } => {
            handlers::representation::get_representation(&state, &entity_id, &representation_id)
                .await
        }
        Route::GetFile(key) => handlers::file::get_file(&state, &key).await,
        Route::Reserved(reserved) => Err(handlers::reserved::reserved(reserved, &path)),
        Route::Unknown => Err(handlers::reserved::unknown(&path)),
    };

    result.unwrap_or_else(IntoResponse::into_response)
}
