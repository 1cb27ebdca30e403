use crate::{
    errors::ServiceError,
    handlers::common::{created_response, success_response, JsonBody},
    services::customers::RegisterCustomerRequest,
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;

/// Router for customer endpoints
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers))
        .route("/register", post(register_customer))
}

pub async fn register_customer(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterCustomerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let customer = state.customer_service().register(payload).await?;
    Ok(created_response(json!({ "success": true, "customer": customer })))
}

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let customers = state.customer_service().list().await?;
    Ok(success_response(json!({ "success": true, "customers": customers })))
}
