use crate::{
    errors::ServiceError,
    handlers::common::{created_response, parse_id, success_response, JsonBody},
    validation::LinkRequest,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;

/// Router for QR code to exit path links
pub fn linked_qr_path_routes() -> Router<AppState> {
    Router::new()
        .route("/link", post(link_qr_code))
        .route("/qr/:qr_code_id", get(paths_for_qr_code))
}

pub async fn link_qr_code(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LinkRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state.linked_qr_path_service().link(payload).await?;
    Ok(created_response(json!({
        "success": true,
        "count": outcome.count,
        "links": outcome.links,
    })))
}

pub async fn paths_for_qr_code(
    State(state): State<AppState>,
    Path(qr_code_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let qr_code_id = parse_id(&qr_code_id, "QR code")?;
    let paths = state.linked_qr_path_service().paths_for_qr(qr_code_id).await?;
    Ok(success_response(json!({ "success": true, "paths": paths })))
}
