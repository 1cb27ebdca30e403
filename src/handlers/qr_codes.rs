use crate::{
    errors::ServiceError,
    handlers::common::{created_response, parse_id, success_response, JsonBody, OneOrMany},
    services::qr_codes::QrCodeInput,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;

/// Router for QR code endpoints
pub fn qr_code_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_qr_codes))
        .route("/register", post(register_qr_codes))
        .route("/floor/:floor_id", get(list_qr_codes_by_floor))
}

pub async fn register_qr_codes(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<OneOrMany<QrCodeInput>>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = state.qr_code_service();
    match payload {
        OneOrMany::One(input) => {
            let qr_code = service.register(input).await?;
            Ok(created_response(json!({ "success": true, "qrCode": qr_code })))
        }
        OneOrMany::Many(inputs) => {
            let qr_codes = service.register_many(inputs).await?;
            Ok(created_response(json!({
                "success": true,
                "count": qr_codes.len(),
                "qrCodes": qr_codes,
            })))
        }
    }
}

pub async fn list_qr_codes(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let qr_codes = state.qr_code_service().list().await?;
    Ok(success_response(json!({ "success": true, "qrCodes": qr_codes })))
}

pub async fn list_qr_codes_by_floor(
    State(state): State<AppState>,
    Path(floor_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let floor_id = parse_id(&floor_id, "floor")?;
    let qr_codes = state.qr_code_service().list_by_floor(floor_id).await?;
    Ok(success_response(json!({ "success": true, "qrCodes": qr_codes })))
}
