/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts to
/// the appropriate HTTP status code with an `{"error": ...}` body.
///
/// Uniformity rules:
/// - failed logins are always the same 401 regardless of cause
/// - absent records and malformed identifiers are the same 404
/// - validation failures are 422 with the complete violation list
/// - a duplicate user email is a 409
/// - storage failures are an opaque 500; detail goes to the log, not the wire

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use linkdesk_shared::auth::verifier::AuthError;
use linkdesk_shared::repository::RepositoryError;
use linkdesk_shared::store::StoreError;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404) - absent record or malformed identifier
    NotFound,

    /// Unprocessable entity (422) - validation errors
    Validation(Vec<ValidationErrorDetail>),

    /// Conflict (409) - uniqueness violation, message is client-visible
    Conflict(String),

    /// Internal server error (500) - detail is logged, never exposed
    Internal(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation, in wire (camelCase) form
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format: `{"error": <message>}` with an optional `details`
/// array for validation failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string(), None),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ApiError::NotFound,
            RepositoryError::Validation(errors) => {
                ApiError::Validation(validation_details(&errors))
            }
            RepositoryError::InvalidPatch(violations) => {
                let mut details: Vec<ValidationErrorDetail> = violations
                    .into_iter()
                    .map(|v| ValidationErrorDetail {
                        field: v.field,
                        message: v.message,
                    })
                    .collect();
                details.sort_by(|a, b| a.field.cmp(&b.field));
                ApiError::Validation(details)
            }
            RepositoryError::Storage(err) => err.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::Store(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            err => ApiError::Internal(err.to_string()),
        }
    }
}

/// Flattens `ValidationErrors` into the wire detail list, sorted by field so
/// responses are deterministic.
pub fn validation_details(errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: wire_field_name(field),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

/// Converts a struct field name (snake_case) into its wire (camelCase) form.
fn wire_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
