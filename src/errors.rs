use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{error::DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::validation::ConsistencyError;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// HTTP reason phrase, e.g. "Not Found"
    pub error: String,
    pub message: String,
    /// Per-item messages for rejected batches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error type for startup and infrastructure helpers.
pub type AppError = ServiceError;

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        ServiceError::db_error(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

/// Domain message for a unique-constraint violation, keyed on the column
/// named in the driver message.
fn unique_violation_message(detail: &str) -> &'static str {
    let detail = detail.to_ascii_lowercase();
    if detail.contains("email") {
        "Email already exists"
    } else if detail.contains("phone") {
        "Phone number already exists"
    } else {
        "Duplicate entry"
    }
}

impl ServiceError {
    /// Translates constraint violations into the domain taxonomy; anything
    /// else stays an opaque database error.
    pub fn db_error(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                ServiceError::Conflict(unique_violation_message(&detail).to_string())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                ServiceError::ValidationError("Referenced record does not exist".to_string())
            }
            _ => ServiceError::DatabaseError(err),
        }
    }

    pub fn not_found(entity: &str, id: i32) -> Self {
        ServiceError::NotFound(format!("{} not found", entity_label(entity, id)))
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::Consistency(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn item_errors(&self) -> Option<Vec<String>> {
        match self {
            Self::Consistency(err) => err.item_errors().map(<[String]>::to_vec),
            _ => None,
        }
    }
}

fn entity_label(entity: &str, id: i32) -> String {
    let mut chars = entity.chars();
    match chars.next() {
        Some(first) => format!("{}{} {}", first.to_uppercase(), chars.as_str(), id),
        None => id.to_string(),
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        }

        let err = ErrorResponse {
            success: false,
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            errors: self.item_errors(),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};

    #[tokio::test]
    async fn service_error_response_includes_request_id() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("req-123"), async {
                ServiceError::NotFound("missing".into()).into_response()
            })
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
        assert!(!payload.success);
    }

    #[tokio::test]
    async fn batch_rejection_carries_item_errors() {
        let response = ServiceError::from(ConsistencyError::NoValidExitPaths {
            errors: vec!["Path 1: start_point is required".into()],
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.message, "No valid exit paths provided");
        assert_eq!(
            payload.errors,
            Some(vec!["Path 1: start_point is required".to_string()])
        );
    }

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Consistency(ConsistencyError::DateRangeInverted).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn service_error_response_message_hides_internal_details() {
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("relation core.floor missing".into()))
                .response_message(),
            "Database error"
        );
        assert_eq!(
            ServiceError::InternalError("pool exhausted".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::Conflict("Email already exists".into()).response_message(),
            "Email already exists"
        );
    }

    #[test]
    fn unique_violations_name_the_column() {
        assert_eq!(
            unique_violation_message("UNIQUE constraint failed: customer.customer_email"),
            "Email already exists"
        );
        assert_eq!(
            unique_violation_message(
                "duplicate key value violates unique constraint \"idx_customer_phone_unique\""
            ),
            "Phone number already exists"
        );
        assert_eq!(unique_violation_message("something else"), "Duplicate entry");
    }

    #[test]
    fn not_found_names_entity_and_id() {
        assert_eq!(
            ServiceError::not_found("floor", 12).response_message(),
            "Floor 12 not found"
        );
    }
}
