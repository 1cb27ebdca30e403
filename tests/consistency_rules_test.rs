mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn empty_and_blank_exit_path_batches_are_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/exit-paths/register", json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No exit paths provided");
    assert!(!body["errors"].as_array().unwrap().is_empty());

    let (status, body) = app.post("/api/exit-paths/register", json!([{}])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No valid exit paths provided");
    assert!(!body["errors"].as_array().unwrap().is_empty());

    let (_, body) = app.get("/api/exit-paths").await;
    assert!(body["exitPaths"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn exit_path_batch_keeps_valid_items() {
    let app = TestApp::new().await;
    let building_id = app.seed_building("Mill").await;
    let floor_id = app.seed_floor(building_id, 1).await;

    let (status, body) = app
        .post(
            "/api/exit-paths/register",
            json!({"paths": [
                {"floor_id": floor_id, "start_point": "A", "end_point": "B",
                 "path_status": "Closed", "path_length": 3},
                {"floor_id": floor_id, "start_point": "A", "end_point": "C",
                 "path_status": "Blocked", "path_length": 4},
                {"floor_id": 9999, "start_point": "A", "end_point": "D",
                 "path_status": "Open", "path_length": 5}
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["exitPaths"].as_array().unwrap().len(), 1);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].as_str().unwrap().starts_with("Path 2:"));
    assert_eq!(errors[1], "Path 3: Floor 9999 does not exist");
}

#[tokio::test]
async fn failed_bulk_registrations_store_nothing() {
    let app = TestApp::new().await;
    let building_id = app.seed_building("Arcade").await;
    let floor_a = app.seed_floor(building_id, 1).await;
    let floor_b = app.seed_floor(building_id, 2).await;

    let (status, _) = app
        .post(
            "/api/sensors/bulk",
            json!({
                "floorId": 9999,
                "sensors": [{"sensor_number": "S-1", "type": "Smoke", "sensorStatus": "Active"}]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/sensors/bulk",
            json!({
                "floorId": floor_a,
                "sensors": [
                    {"sensor_number": "S-1", "type": "Smoke", "sensorStatus": "Active"},
                    {"sensor_number": "S-2", "sensorStatus": "Active"}
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "Sensor 2: type is required");

    let (_, body) = app.get("/api/sensors").await;
    assert!(body.as_array().unwrap().is_empty());

    // second virtual sensor claims the wrong floor; the first must not persist
    let sensor_id = app.seed_sensor(floor_a, "S-10").await;
    let (status, body) = app
        .post(
            "/api/virtual-sensors/bulk",
            json!([
                {"sensor_id": sensor_id, "floor_id": floor_a, "virtual_sensor_number": "V-1"},
                {"sensor_id": sensor_id, "floor_id": floor_b, "virtual_sensor_number": "V-2"}
            ]),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("does not match"));

    let (_, body) = app.get("/api/virtual-sensors").await;
    assert!(body["virtualSensors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn virtual_sensor_must_share_its_physical_sensor_floor() {
    let app = TestApp::new().await;
    let building_id = app.seed_building("Hangar").await;
    let floor_a = app.seed_floor(building_id, 1).await;
    let floor_b = app.seed_floor(building_id, 2).await;
    let sensor_id = app.seed_sensor(floor_a, "S-1").await;

    let (status, _) = app
        .post(
            "/api/virtual-sensors/register",
            json!({"sensor_id": sensor_id, "floor_id": floor_b, "virtual_sensor_number": "V-9"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/virtual-sensors/register",
            json!({"sensor_id": 4242, "floor_id": floor_a, "virtual_sensor_number": "V-9"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Physical sensor 4242 does not exist");
}

#[tokio::test]
async fn floors_need_a_known_building_and_no_dependents_to_delete() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/floors/register",
            json!({"building_id": 77, "floor_number": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Building 77 does not exist");

    let (status, body) = app.delete("/api/floors/12345").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Floor 12345 not found");

    let building_id = app.seed_building("Works").await;
    let floor_id = app.seed_floor(building_id, 1).await;
    app.seed_exit_path(floor_id).await;

    let (status, _) = app.delete(&format!("/api/floors/{}", floor_id)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_ids_and_bodies_are_client_errors() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/exit-paths/floor/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid floor id");

    let (status, body) = app.get("/api/exit-paths/xyz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid exit path id");

    let response = app
        .request(Method::POST, "/api/buildings/register", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/customers/register", json!({"name": "No Mail"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn link_requires_known_qr_code_and_paths() {
    let app = TestApp::new().await;
    let building_id = app.seed_building("Pier").await;
    let floor_id = app.seed_floor(building_id, 1).await;
    let path_id = app.seed_exit_path(floor_id).await;

    let (status, body) = app
        .post(
            "/api/linked-qr-path/link",
            json!({"qr_code_id": 31, "path_ids": [path_id]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "QR code 31 does not exist");

    let (status, _) = app
        .post(
            "/api/linked-qr-path/link",
            json!({"qr_code_id": 1, "path_ids": "not-a-list"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
