use crate::{
    errors::ServiceError,
    handlers::common::{created_response, parse_id, success_response, JsonBody, OneOrMany},
    validation::ExitPathInput,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Router for exit path endpoints
pub fn exit_path_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exit_paths))
        .route("/register", post(register_exit_paths))
        .route("/floor/:floor_id", get(list_exit_paths_by_floor))
        .route("/:id", get(get_exit_path).delete(delete_exit_path))
}

/// Accepts a single path, an array of paths, or `{paths: [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ExitPathBody {
    Envelope { paths: Vec<ExitPathInput> },
    Items(OneOrMany<ExitPathInput>),
}

impl ExitPathBody {
    pub fn into_vec(self) -> Vec<ExitPathInput> {
        match self {
            ExitPathBody::Envelope { paths } => paths,
            ExitPathBody::Items(items) => items.into_vec(),
        }
    }
}

pub async fn register_exit_paths(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ExitPathBody>,
) -> Result<impl IntoResponse, ServiceError> {
    let registration = state.exit_path_service().register(payload.into_vec()).await?;

    let mut body = Map::new();
    body.insert("message".into(), json!("Exit paths registered successfully"));
    body.insert("exitPaths".into(), json!(registration.exit_paths));
    if !registration.errors.is_empty() {
        body.insert("errors".into(), json!(registration.errors));
    }
    Ok(created_response(Value::Object(body)))
}

pub async fn list_exit_paths(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let paths = state.exit_path_service().list().await?;
    Ok(success_response(json!({ "exitPaths": paths })))
}

pub async fn list_exit_paths_by_floor(
    State(state): State<AppState>,
    Path(floor_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let floor_id = parse_id(&floor_id, "floor")?;
    let paths = state.exit_path_service().list_by_floor(floor_id).await?;
    Ok(success_response(json!({ "exitPaths": paths })))
}

pub async fn get_exit_path(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let path = state
        .exit_path_service()
        .get(parse_id(&id, "exit path")?)
        .await?;
    Ok(success_response(json!({ "exitPath": path })))
}

pub async fn delete_exit_path(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let path = state
        .exit_path_service()
        .delete(parse_id(&id, "exit path")?)
        .await?;
    Ok(success_response(json!({
        "message": "Exit path deleted successfully",
        "exitPath": path,
    })))
}
