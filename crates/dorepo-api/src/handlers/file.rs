//! Binary download handler.

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;

use dorepo_core::error::AppError;
use dorepo_entity::FileKey;

use crate::state::AppState;

/// GET /file/{entityId}/{repId}/{fileId}
pub async fn get_file(state: &AppState, key: &FileKey) -> Result<Response, AppError> {
    let stored = state.retrieval_service.file(key).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, stored.content_type)
        .header(header::CONTENT_LENGTH, stored.size_bytes)
        .body(Body::from_stream(stored.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}
