// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::database::repository::RepositoryError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Serializes to `{"success": false, "error": ..., "message"?: ...}`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest {
        error: String,
        message: Option<String>,
    },
    ValidationError {
        message: String,
        field_errors: BTreeMap<String, String>,
    },
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized {
        error: String,
        message: Option<String>,
    },

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError {
        error: String,
        message: Option<String>,
    },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest { .. } => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized { .. } => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError { .. } => 500,
        }
    }

    /// Short error string placed in the `error` field
    pub fn error(&self) -> &str {
        match self {
            ApiError::BadRequest { error, .. } => error,
            ApiError::ValidationError { .. } => "Invalid request data",
            ApiError::InvalidJson(_) => "Invalid request data",
            ApiError::Unauthorized { error, .. } => error,
            ApiError::NotFound(error) => error,
            ApiError::InternalServerError { error, .. } => error,
        }
    }

    /// Optional detail placed in the `message` field
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { message, .. } => message.as_deref(),
            ApiError::ValidationError { message, .. } => Some(message),
            ApiError::InvalidJson(message) => Some(message),
            ApiError::Unauthorized { message, .. } => message.as_deref(),
            ApiError::NotFound(_) => None,
            ApiError::InternalServerError { message, .. } => message.as_deref(),
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.error(),
            "code": self.error_code(),
        });

        if let Some(message) = self.message() {
            response["message"] = json!(message);
        }

        if let ApiError::ValidationError { field_errors, .. } = self {
            if !field_errors.is_empty() {
                response["field_errors"] = json!(field_errors);
            }
        }

        response
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            message: None,
        }
    }

    pub fn bad_request_with(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            message: Some(message.into()),
        }
    }

    pub fn validation_error(message: impl Into<String>, field_errors: BTreeMap<String, String>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            error: error.into(),
            message: Some(message.into()),
        }
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        ApiError::NotFound(error.into())
    }

    pub fn internal_server_error(error: impl Into<String>, message: Option<String>) -> Self {
        ApiError::InternalServerError {
            error: error.into(),
            message,
        }
    }

    /// Map a repository failure for `entity` during `action` (e.g. "update", "category").
    pub fn from_repository(err: RepositoryError, action: &str, entity: &str) -> Self {
        match err {
            RepositoryError::NotFound => ApiError::not_found(format!("{} not found", capitalize(entity))),
            RepositoryError::NoFieldsToUpdate => ApiError::bad_request("No fields to update"),
            RepositoryError::Database(e) => {
                tracing::error!("Failed to {} {}: {}", action, entity, e);
                ApiError::internal_server_error(format!("Failed to {} {}", action, entity), Some(e.to_string()))
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extension for converting repository results at the handler boundary
pub trait RepositoryResultExt<T> {
    fn or_api_error(self, action: &str, entity: &str) -> Result<T, ApiError>;
}

impl<T> RepositoryResultExt<T> for Result<T, RepositoryError> {
    fn or_api_error(self, action: &str, entity: &str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_repository(e, action, entity))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{}: {}", self.error(), message),
            None => write!(f, "{}", self.error()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
