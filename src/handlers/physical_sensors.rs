use crate::{
    errors::ServiceError,
    handlers::common::{created_response, parse_id, success_response, JsonBody},
    validation::{Numeric, PhysicalSensorInput},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

/// Router for physical sensor endpoints
pub fn sensor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sensors))
        .route("/register", post(register_sensor))
        .route("/bulk", post(register_sensors_bulk))
        .route("/floor/:floor_id", get(list_sensors_by_floor))
        .route("/:id", get(get_sensor).delete(delete_sensor))
}

/// `{floorId, sensors: [...]}`; every sensor lands on `floorId`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SensorBulkRequest {
    #[serde(rename = "floorId", alias = "floor_id")]
    pub floor_id: Numeric,
    pub sensors: Vec<PhysicalSensorInput>,
}

pub async fn register_sensor(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<PhysicalSensorInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let sensor = state.physical_sensor_service().register(payload).await?;
    Ok(created_response(json!({
        "message": "Sensor registered successfully",
        "sensor": sensor,
    })))
}

pub async fn register_sensors_bulk(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SensorBulkRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let sensors = state
        .physical_sensor_service()
        .register_bulk(payload.floor_id, payload.sensors)
        .await?;
    Ok(created_response(json!({
        "message": "Sensors registered successfully",
        "sensors": sensors,
    })))
}

pub async fn list_sensors(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let sensors = state.physical_sensor_service().list().await?;
    Ok(Json(sensors))
}

pub async fn list_sensors_by_floor(
    State(state): State<AppState>,
    Path(floor_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let floor_id = parse_id(&floor_id, "floor")?;
    let sensors = state.physical_sensor_service().list_by_floor(floor_id).await?;
    Ok(Json(sensors))
}

pub async fn get_sensor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let sensor = state
        .physical_sensor_service()
        .get(parse_id(&id, "sensor")?)
        .await?;
    Ok(Json(sensor))
}

pub async fn delete_sensor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let sensor = state
        .physical_sensor_service()
        .delete(parse_id(&id, "sensor")?)
        .await?;
    Ok(success_response(json!({
        "message": "Sensor deleted successfully",
        "sensor": sensor,
    })))
}
