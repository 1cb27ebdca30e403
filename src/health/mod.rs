/*!
 * # Health Check Module
 *
 * - Liveness (`/health`): the process is up, no dependencies touched
 * - Readiness (`/health/ready`): the database answers a ping
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, error};

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<HealthStatus>,
    pub timestamp: DateTime<Utc>,
}

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub db_pool: Arc<DatabaseConnection>,
    pub start_time: SystemTime,
}

impl HealthState {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self {
            db_pool,
            start_time: SystemTime::now(),
        }
    }

    pub fn uptime(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or(Duration::from_secs(0))
            .as_secs()
    }

    fn report(&self, database: Option<HealthStatus>) -> HealthReport {
        HealthReport {
            status: database.unwrap_or(HealthStatus::Up),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.uptime(),
            database,
            timestamp: Utc::now(),
        }
    }
}

/// Liveness endpoint
pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Health check endpoint called");
    (StatusCode::OK, Json(state.report(None)))
}

/// Readiness endpoint; 503 when the database is unreachable
pub async fn readiness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Readiness check endpoint called");

    let database = match crate::db::check_connection(&state.db_pool).await {
        Ok(()) => HealthStatus::Up,
        Err(e) => {
            error!("Database health check failed: {}", e);
            HealthStatus::Down
        }
    };

    let status_code = match database {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(state.report(Some(database))))
}

/// Health routes, to be nested under `/health`
pub fn health_routes<S>(db_pool: Arc<DatabaseConnection>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(readiness_check))
        .with_state(Arc::new(HealthState::new(db_pool)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liveness_report_omits_database() {
        let state = HealthState {
            db_pool: Arc::new(DatabaseConnection::Disconnected),
            start_time: SystemTime::now(),
        };
        let report = serde_json::to_value(state.report(None)).unwrap();
        assert_eq!(report["status"], "up");
        assert!(report.get("database").is_none());
    }

    #[test]
    fn readiness_report_follows_database() {
        let state = HealthState::new(Arc::new(DatabaseConnection::Disconnected));
        let report = state.report(Some(HealthStatus::Down));
        assert_eq!(report.status, HealthStatus::Down);
        assert_eq!(report.database, Some(HealthStatus::Down));
    }
}
