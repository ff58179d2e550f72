use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// The primary error type for the application.
///
/// Handlers return `AppResult<T>`; the `IntoResponse` impl renders every
/// variant into the same JSON envelope.
#[derive(Debug)]
pub enum AppError {
    /// Unexpected failures. The cause is logged, never returned.
    Internal(anyhow::Error),
    /// Malformed requests (unparseable JSON, bad query strings).
    BadRequest(String),
    /// A record or file that does not exist.
    NotFound(String),
    /// The backing store could not hand out a connection in time.
    ServiceUnavailable(String),
    Database(String),
    /// Input that parsed but is not acceptable, e.g. an unknown status.
    InvalidInput(String),
    /// One or more fields failed validation, keyed by field name.
    Validation {
        errors: BTreeMap<String, String>,
    },
    IoError(String),
}

impl AppError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), message.into());
        AppError::Validation { errors }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::Validation { errors } => {
                let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
                write!(f, "Validation failed for: {}", fields.join(", "))
            }
            AppError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message, details) = match self {
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "The service is temporarily unavailable".to_string(),
                    None,
                )
            }
            AppError::Database(msg) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg, None),
            AppError::Validation { errors } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Invalid data provided".to_string(),
                Some(json!({ "validationErrors": errors })),
            ),
            AppError::IoError(msg) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "I/O error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "An I/O error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": error_message,
            },
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Some(details) = details {
            body["error"]["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(sqlx::Error::PoolTimedOut) => {
                AppError::ServiceUnavailable("Database connection pool timed out".to_string())
            }
            StoreError::Database(sqlx::Error::Database(db_err)) => {
                AppError::Database(db_err.message().to_string())
            }
            StoreError::Database(e) => AppError::Database(e.to_string()),
            StoreError::Corrupt(msg) => AppError::Internal(anyhow::anyhow!("corrupt row: {}", msg)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(format!("{}: {}", err.kind(), err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;

/// Converts an `Option` into a `NotFound` error.
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("{} not found", entity)))
    }
}

/// Helpers for request validation shared by the service and asset handler.
pub mod validation {
    use super::*;

    /// Checks an optional string field against a maximum length in characters.
    pub fn check_max_len(
        errors: &mut BTreeMap<String, String>,
        field: &str,
        label: &str,
        value: Option<&str>,
        max: usize,
    ) {
        if let Some(v) = value {
            if v.chars().count() > max {
                errors.insert(
                    field.to_string(),
                    format!("{} must be at most {} characters", label, max),
                );
            }
        }
    }

    /// Validates a stored file name taken from a URL path segment.
    ///
    /// Only bare names are accepted: no separators, no parent references, no NUL.
    pub fn validate_file_name(name: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::invalid_field("filename", "File name cannot be empty"));
        }
        if name.contains('\0') {
            return Err(AppError::invalid_field("filename", "File name contains null characters"));
        }
        if name.contains(['/', '\\']) || name.contains("..") || name.starts_with('.') {
            return Err(AppError::invalid_field("filename", "File name is not allowed"));
        }
        Ok(())
    }
}
