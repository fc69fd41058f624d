//! Typed error handling for the order intake service
//!
//! This module provides the error hierarchy that the HTTP layer maps onto
//! status codes, so clients can handle failures specifically rather than
//! dealing with generic `anyhow::Error` values.
//!
//! # Error Categories
//!
//! - [`ApiError::Validation`]: bad or missing input fields (collected, not fail-fast)
//! - [`ApiError::MissingPhoto`]: order submission without a photo
//! - [`ApiError::NotFound`]: unknown order id
//! - [`ApiError::AlreadyComplete`]: PDF upload against a finished order
//! - [`ApiError::Auth`]: bad admin credential or bearer token
//! - [`ApiError::Storage`] / [`ApiError::Blob`]: backend failures
//!
//! # Example
//!
//! ```rust,ignore
//! use fairytale_orders::prelude::*;
//!
//! match service.get_order("FT000000000").await {
//!     Ok(order) => println!("Found: {:?}", order),
//!     Err(ApiError::NotFound { order_id }) => println!("{} not found", order_id),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::blob::BlobError;
use crate::storage::StorageError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The main error type for order intake operations
///
/// Each variant corresponds to one branch of the HTTP error taxonomy; the
/// mapping to status codes lives in [`ApiError::status_code`].
#[derive(Debug)]
pub enum ApiError {
    /// One or more input fields failed validation
    Validation(Vec<FieldError>),

    /// Order submission carried no photo upload
    MissingPhoto,

    /// No order matches the requested id
    NotFound { order_id: String },

    /// The order already has a PDF attached
    AlreadyComplete { order_id: String },

    /// Credential or bearer-token failure
    Auth { message: String },

    /// Document store failure
    Storage(StorageError),

    /// Blob store failure
    Blob(BlobError),

    /// Internal errors that should not happen in normal operation
    Internal(String),
}

impl ApiError {
    /// Shorthand for a single-field validation failure
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingPhoto => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::AlreadyComplete { .. } => StatusCode::BAD_REQUEST,
            ApiError::Auth { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Blob(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::MissingPhoto => "MISSING_PHOTO",
            ApiError::NotFound { .. } => "ORDER_NOT_FOUND",
            ApiError::AlreadyComplete { .. } => "ORDER_ALREADY_COMPLETE",
            ApiError::Auth { .. } => "UNAUTHORIZED",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Blob(_) => "STORAGE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to the JSON error body
    pub fn to_response_body(&self) -> ErrorResponse {
        let errors = match self {
            ApiError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };

        ErrorResponse {
            success: false,
            code: self.error_code().to_string(),
            message: self.to_string(),
            errors,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation failed: {}", msgs.join(", "))
            }
            ApiError::MissingPhoto => write!(f, "Please upload a photo"),
            ApiError::NotFound { order_id } => {
                write!(f, "Order '{}' not found", order_id)
            }
            ApiError::AlreadyComplete { order_id } => {
                write!(f, "Order '{}' already has a PDF uploaded", order_id)
            }
            ApiError::Auth { message } => write!(f, "{}", message),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Blob(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Storage(e) => Some(e),
            ApiError::Blob(e) => Some(e),
            _ => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`; mirrors the `success` flag of regular responses
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation errors, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, code = self.error_code(), error = %self, "request failed");
        }
        (status, Json(self.to_response_body())).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

impl From<BlobError> for ApiError {
    fn from(err: BlobError) -> Self {
        ApiError::Blob(err)
    }
}

/// A specialized Result type for order intake operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_lists_all_fields() {
        let err = ApiError::Validation(vec![
            FieldError::new("childName", "must be between 2 and 50 characters"),
            FieldError::new("email", "must be a valid email address"),
        ]);
        let display = err.to_string();
        assert!(display.contains("childName"));
        assert!(display.contains("email"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::MissingPhoto.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound {
                order_id: "FT000000001".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::AlreadyComplete {
                order_id: "FT000000001".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Auth {
                message: "Invalid password".to_string()
            }
            .status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::MissingPhoto.error_code(), "MISSING_PHOTO");
        assert_eq!(
            ApiError::NotFound {
                order_id: "x".to_string()
            }
            .error_code(),
            "ORDER_NOT_FOUND"
        );
        assert_eq!(
            ApiError::AlreadyComplete {
                order_id: "x".to_string()
            }
            .error_code(),
            "ORDER_ALREADY_COMPLETE"
        );
    }

    #[test]
    fn test_response_body_includes_field_errors() {
        let err = ApiError::Validation(vec![FieldError::new("storyTemplate", "unknown template")]);
        let body = err.to_response_body();
        assert!(!body.success);
        assert_eq!(body.code, "VALIDATION_ERROR");
        let errors = body.errors.expect("validation body should carry errors");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "storyTemplate");
    }

    #[test]
    fn test_response_body_omits_errors_for_other_variants() {
        let body = ApiError::MissingPhoto.to_response_body();
        assert!(body.errors.is_none());
        assert_eq!(body.message, "Please upload a photo");
    }

    #[test]
    fn test_invalid_field_shorthand() {
        let err = ApiError::invalid_field("photo", "file too large");
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "photo");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_storage_error_conversion() {
        let err: ApiError = StorageError::Duplicate {
            order_id: "FT123456789".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
