// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::store::StoreError;

/// HTTP API error with a status code and a machine-readable code clients can match on
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    DuplicateValue(String),
    InvalidInput {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidPagination(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub const DUPLICATE_VALUE_CODE: &'static str = "entity.duplicate_value_of_unique_field";
    pub const NOT_FOUND_CODE: &'static str = "entity.not_exists_with_id";

    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DuplicateValue(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidPagination(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::DuplicateValue(msg) => msg,
            ApiError::InvalidInput { message, .. } => message,
            ApiError::InvalidPagination(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::DuplicateValue(_) => Self::DUPLICATE_VALUE_CODE,
            ApiError::InvalidInput { .. } => "guard.invalid_input",
            ApiError::InvalidPagination(_) => "guard.invalid_pagination",
            ApiError::NotFound(_) => Self::NOT_FOUND_CODE,
            ApiError::InternalServerError(_) => "unexpected_error",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "code": self.error_code(),
            "message": self.message(),
        });

        if let ApiError::InvalidInput {
            field_errors: Some(field_errors),
            ..
        } = self
        {
            response["data"] = json!(field_errors);
        }

        response
    }
}

// Static constructor methods
impl ApiError {
    pub fn duplicate_value(message: impl Into<String>) -> Self {
        ApiError::DuplicateValue(message.into())
    }

    pub fn invalid_input(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::InvalidInput {
            message: message.into(),
            field_errors,
        }
    }

    pub fn invalid_pagination(message: impl Into<String>) -> Self {
        ApiError::InvalidPagination(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateValue { .. } => ApiError::duplicate_value(err.to_string()),
            StoreError::NotFound { .. } => ApiError::not_found(err.to_string()),
            StoreError::Sqlx(sqlx::Error::PoolTimedOut) | StoreError::Sqlx(sqlx::Error::Io(_)) => {
                tracing::error!("Database unavailable: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
