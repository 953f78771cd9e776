//! Application error type shared by every layer.
//!
//! The core returns [`AppError`]; the HTTP adapter renders it through
//! [`IntoResponse`]. Internal errors never carry backend details to the
//! caller: the cause is logged where the error is created.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload returned to HTTP clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input. Always caller-fixable, never retried internally.
    #[error("{message}")]
    Validation { message: String, details: Value },
    /// Token or URL absent.
    #[error("{message}")]
    NotFound { message: String, details: Value },
    /// The creation retry budget was exhausted.
    #[error("{message}")]
    Conflict { message: String, details: Value },
    /// Backend fault. Details are logged, never exposed.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Shorthand for the "unable to create link" conflict.
    pub fn unable_to_create_link(attempts: u32) -> Self {
        Self::conflict("unable to create link", json!({ "attempts": attempts }))
    }

    /// Shorthand for a missing short link.
    pub fn link_not_found() -> Self {
        Self::not_found("link not found", json!({}))
    }

    /// Machine-readable error code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", json!(errors))
    }
}

/// Maps a database error to an opaque internal error.
///
/// `RowNotFound` never reaches this function: lookups use `fetch_optional`
/// and report absence as `None`.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        tracing::error!(
            constraint = db.constraint().unwrap_or("unknown"),
            "Unique constraint violation: {}",
            e
        );
    } else {
        tracing::error!("Database error: {}", e);
    }

    AppError::internal("internal server error", json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::link_not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::unable_to_create_link(3).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::internal("x", json!({})).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::unable_to_create_link(5);
        assert_eq!(err.to_string(), "unable to create link");
        assert_eq!(err.to_error_info().details["attempts"], 5);
    }

    #[test]
    fn test_sqlx_error_is_opaque() {
        let err = map_sqlx_error(sqlx::Error::PoolClosed);
        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(err.to_string(), "internal server error");
        assert_eq!(err.to_error_info().details, json!({}));
    }
}
