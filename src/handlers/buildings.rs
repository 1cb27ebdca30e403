use crate::{
    errors::ServiceError,
    handlers::common::{created_response, success_response, JsonBody},
    services::buildings::RegisterBuildingRequest,
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;

/// Router for building endpoints
pub fn building_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_buildings))
        .route("/register", post(register_building))
}

pub async fn register_building(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterBuildingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let building = state.building_service().register(payload).await?;
    Ok(created_response(json!({ "success": true, "building": building })))
}

pub async fn list_buildings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let buildings = state.building_service().list().await?;
    Ok(success_response(json!({ "success": true, "buildings": buildings })))
}
