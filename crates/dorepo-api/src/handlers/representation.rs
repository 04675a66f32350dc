//! Representation retrieval handler.

use axum::response::Response;

use dorepo_core::error::AppError;

use crate::handlers::entity::xml_response;
use crate::state::AppState;

/// GET /representation/{entityId}/{repId}
pub async fn get_representation(
    state: &AppState,
    entity_id: &str,
    representation_id: &str,
) -> Result<Response, AppError> {
    let xml = state
        .retrieval_service
        .representation(entity_id, representation_id)
        .await?;
    Ok(xml_response(state, xml))
}
