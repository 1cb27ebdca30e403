use crate::{
    errors::ServiceError,
    handlers::common::{created_response, parse_id, success_response, JsonBody, OneOrMany},
    validation::VirtualSensorInput,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

/// Router for virtual sensor endpoints
pub fn virtual_sensor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_virtual_sensors))
        .route("/register", post(register_virtual_sensor))
        .route("/bulk", post(register_virtual_sensors_bulk))
        .route("/floor/:floor_id", get(list_virtual_sensors_by_floor))
        .route("/:id", get(get_virtual_sensor).delete(delete_virtual_sensor))
}

/// Bulk body: a bare array (or single sensor), or `{sensors: [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VirtualSensorBatch {
    Envelope { sensors: Vec<VirtualSensorInput> },
    Items(OneOrMany<VirtualSensorInput>),
}

impl VirtualSensorBatch {
    pub fn into_vec(self) -> Vec<VirtualSensorInput> {
        match self {
            VirtualSensorBatch::Envelope { sensors } => sensors,
            VirtualSensorBatch::Items(items) => items.into_vec(),
        }
    }
}

pub async fn register_virtual_sensor(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<VirtualSensorInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let sensor = state.virtual_sensor_service().register(payload).await?;
    Ok(created_response(json!({ "success": true, "virtualSensor": sensor })))
}

pub async fn register_virtual_sensors_bulk(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<VirtualSensorBatch>,
) -> Result<impl IntoResponse, ServiceError> {
    let sensors = state
        .virtual_sensor_service()
        .register_bulk(payload.into_vec())
        .await?;
    Ok(created_response(json!({ "success": true, "sensors": sensors })))
}

pub async fn list_virtual_sensors(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let sensors = state.virtual_sensor_service().list().await?;
    Ok(success_response(json!({ "success": true, "virtualSensors": sensors })))
}

pub async fn list_virtual_sensors_by_floor(
    State(state): State<AppState>,
    Path(floor_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let floor_id = parse_id(&floor_id, "floor")?;
    let sensors = state.virtual_sensor_service().list_by_floor(floor_id).await?;
    Ok(success_response(json!({ "success": true, "virtualSensors": sensors })))
}

pub async fn get_virtual_sensor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let sensor = state
        .virtual_sensor_service()
        .get(parse_id(&id, "virtual sensor")?)
        .await?;
    Ok(success_response(json!({ "success": true, "virtualSensor": sensor })))
}

pub async fn delete_virtual_sensor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let sensor = state
        .virtual_sensor_service()
        .delete(parse_id(&id, "virtual sensor")?)
        .await?;
    Ok(success_response(json!({
        "success": true,
        "message": "Virtual sensor deleted successfully",
        "virtualSensor": sensor,
    })))
}
