//! Building safety asset registry
//!
//! REST API over customers, buildings, floors, sensors, QR codes and the
//! evacuation exit paths linked to them.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod services;
pub mod tracing;
pub mod validation;

use axum::{routing::get, Router};
use http::HeaderValue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::errors::AppError;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), &config);
        Self {
            db,
            config,
            services,
        }
    }

    pub fn customer_service(&self) -> Arc<services::customers::CustomerService> {
        self.services.customers.clone()
    }

    pub fn building_service(&self) -> Arc<services::buildings::BuildingService> {
        self.services.buildings.clone()
    }

    pub fn floor_service(&self) -> Arc<services::floors::FloorService> {
        self.services.floors.clone()
    }

    pub fn subscription_service(&self) -> Arc<services::subscriptions::SubscriptionService> {
        self.services.subscriptions.clone()
    }

    pub fn physical_sensor_service(
        &self,
    ) -> Arc<services::physical_sensors::PhysicalSensorService> {
        self.services.physical_sensors.clone()
    }

    pub fn virtual_sensor_service(&self) -> Arc<services::virtual_sensors::VirtualSensorService> {
        self.services.virtual_sensors.clone()
    }

    pub fn exit_path_service(&self) -> Arc<services::exit_paths::ExitPathService> {
        self.services.exit_paths.clone()
    }

    pub fn qr_code_service(&self) -> Arc<services::qr_codes::QrCodeService> {
        self.services.qr_codes.clone()
    }

    pub fn linked_qr_path_service(&self) -> Arc<services::linked_qr_paths::LinkedQrPathService> {
        self.services.linked_qr_paths.clone()
    }
}

/// Every resource router, mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/customers", handlers::customers::customer_routes())
        .nest("/buildings", handlers::buildings::building_routes())
        .nest("/floors", handlers::floors::floor_routes())
        .nest(
            "/customer-building",
            handlers::subscriptions::subscription_routes(),
        )
        .nest("/sensors", handlers::physical_sensors::sensor_routes())
        .nest(
            "/virtual-sensors",
            handlers::virtual_sensors::virtual_sensor_routes(),
        )
        .nest("/exit-paths", handlers::exit_paths::exit_path_routes())
        .nest("/qr-codes", handlers::qr_codes::qr_code_routes())
        .nest(
            "/linked-qr-path",
            handlers::linked_qr_paths::linked_qr_path_routes(),
        )
}

/// CORS from configuration: explicit origins first, then the permissive
/// fallback allowed in development or by override.
pub fn cors_layer(cfg: &config::AppConfig) -> Result<CorsLayer, AppError> {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        return Ok(CorsLayer::permissive());
    }

    Err(AppError::InternalError(
        "Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true"
            .to_string(),
    ))
}

/// Full application router with middleware applied.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::<AppState>::new()
        .route("/", get(|| async { "building-safety-registry up" }))
        .nest("/health", health::health_routes(state.db.clone()))
        .nest("/api", api_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_cors_only_when_allowed() {
        let mut cfg = config::AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            0,
            "production".into(),
        );
        assert!(cors_layer(&cfg).is_err());

        cfg.cors_allow_any_origin = true;
        assert!(cors_layer(&cfg).is_ok());

        cfg.cors_allow_any_origin = false;
        cfg.cors_allowed_origins = Some("https://ops.example.com".into());
        assert!(cors_layer(&cfg).is_ok());
    }
}
