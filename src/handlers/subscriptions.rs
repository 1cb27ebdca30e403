use crate::{
    errors::ServiceError,
    handlers::common::{created_response, parse_id, success_response, JsonBody},
    validation::SubscriptionInput,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;

/// Router for customer/building subscription endpoints
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_relations))
        .route("/register", post(register_relation))
        .route("/:id", get(get_relation).delete(delete_relation))
}

pub async fn register_relation(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SubscriptionInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let relation = state.subscription_service().register(payload).await?;
    Ok(created_response(json!({ "success": true, "relation": relation })))
}

pub async fn list_relations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let relations = state.subscription_service().list().await?;
    Ok(success_response(json!({ "success": true, "relations": relations })))
}

pub async fn get_relation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let relation = state
        .subscription_service()
        .get(parse_id(&id, "relation")?)
        .await?;
    Ok(success_response(json!({ "success": true, "relation": relation })))
}

pub async fn delete_relation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let relation = state
        .subscription_service()
        .delete(parse_id(&id, "relation")?)
        .await?;
    Ok(success_response(json!({
        "success": true,
        "message": "Relation deleted successfully",
        "relation": relation,
    })))
}
