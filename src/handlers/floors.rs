use crate::{
    errors::ServiceError,
    handlers::common::{created_response, parse_id, success_response, JsonBody, OneOrMany},
    validation::FloorInput,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;

/// Router for floor endpoints
pub fn floor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_floors))
        .route("/register", post(register_floors))
        .route("/building/:building_id", get(list_floors_by_building))
        .route("/:id", get(get_floor).delete(delete_floor))
}

/// Accepts a single floor or an array; the response shape follows the input.
pub async fn register_floors(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<OneOrMany<FloorInput>>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = state.floor_service();
    let body = match payload {
        OneOrMany::One(input) => {
            let floor = service.register(input).await?;
            json!({ "success": true, "floor": floor })
        }
        OneOrMany::Many(inputs) => {
            let floors = service.register_many(inputs).await?;
            json!({ "success": true, "floors": floors })
        }
    };
    Ok(created_response(body))
}

pub async fn list_floors(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let floors = state.floor_service().list().await?;
    Ok(success_response(json!({ "success": true, "floors": floors })))
}

pub async fn list_floors_by_building(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let building_id = parse_id(&building_id, "building")?;
    let floors = state.floor_service().list_by_building(building_id).await?;
    Ok(success_response(json!({ "success": true, "floors": floors })))
}

pub async fn get_floor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let floor = state.floor_service().get(parse_id(&id, "floor")?).await?;
    Ok(success_response(json!({ "success": true, "floor": floor })))
}

pub async fn delete_floor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let floor = state.floor_service().delete(parse_id(&id, "floor")?).await?;
    Ok(success_response(json!({
        "success": true,
        "message": "Floor deleted successfully",
        "floor": floor,
    })))
}
