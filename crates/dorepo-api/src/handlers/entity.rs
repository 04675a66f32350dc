//! Entity ingest and retrieval handlers.

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use dorepo_core::error::AppError;

use crate::state::AppState;

/// POST /entity
pub async fn ingest_entity(state: &AppState, body: Bytes) -> Result<Response, AppError> {
    let id = state.ingest_service.ingest(&body).await?;
    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        id,
    )
        .into_response())
}

/// GET /entity/{id}
pub async fn get_entity(state: &AppState, id: &str) -> Result<Response, AppError> {
    let xml = state.retrieval_service.entity(id).await?;
    Ok(xml_response(state, xml))
}

/// 200 response carrying an XML document.
pub(crate) fn xml_response(state: &AppState, xml: Bytes) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, state.retrieval_service.content_type())],
        Body::from(xml),
    )
        .into_response()
}
