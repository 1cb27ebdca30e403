use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use building_safety_registry::{
    config::{AppConfig, SubscriptionUniqueness},
    db, AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

/// Helper harness for spinning up the application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_subscription_uniqueness(SubscriptionUniqueness::default()).await
    }

    /// Like [`TestApp::new`] with a specific duplicate-subscription policy.
    pub async fn with_subscription_uniqueness(policy: SubscriptionUniqueness) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // One connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.subscription_uniqueness = policy;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = building_safety_registry::app(state.clone(), CorsLayer::permissive());

        Self { router, state }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends a request and returns the status with the decoded JSON body.
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None).await
    }

    /// Registers a customer and returns its id.
    #[allow(dead_code)]
    pub async fn seed_customer(&self, name: &str, email: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/customers/register",
                json!({ "name": name, "email": email }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed customer: {body}");
        body["customer"]["customer_id"]
            .as_i64()
            .expect("customer id in response")
    }

    /// Registers a building and returns its id.
    pub async fn seed_building(&self, name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/buildings/register",
                json!({ "building_name": name, "num_floors": 3 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed building: {body}");
        body["building"]["building_id"]
            .as_i64()
            .expect("building id in response")
    }

    /// Registers a floor in `building_id` and returns its id.
    pub async fn seed_floor(&self, building_id: i64, floor_number: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/floors/register",
                json!({ "building_id": building_id, "floor_number": floor_number }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed floor: {body}");
        body["floor"]["floor_id"].as_i64().expect("floor id in response")
    }

    /// Registers a physical sensor on `floor_id` and returns its id.
    #[allow(dead_code)]
    pub async fn seed_sensor(&self, floor_id: i64, number: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/sensors/register",
                json!({
                    "floorId": floor_id,
                    "sensor_number": number,
                    "type": "Smoke",
                    "sensorStatus": "Active"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed sensor: {body}");
        body["sensor"]["sensor_id"].as_i64().expect("sensor id in response")
    }

    /// Registers one open exit path on `floor_id` and returns its id.
    #[allow(dead_code)]
    pub async fn seed_exit_path(&self, floor_id: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/exit-paths/register",
                json!({
                    "floor_id": floor_id,
                    "start_point": "Room 101",
                    "end_point": "Stairwell A",
                    "path_status": "Open",
                    "path_length": 24.5
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed exit path: {body}");
        body["exitPaths"][0]["path_id"]
            .as_i64()
            .expect("path id in response")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}
