// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::auth::TokenError;
use crate::database::DatabaseError;
use crate::filter::error::FilterError;

/// Errors produced by repositories and services
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("your requested item is not found")]
    NotFound,

    #[error("your item already exists")]
    Conflict,

    #[error("wrong password")]
    WrongPassword,

    #[error("given param is not valid: {0}")]
    BadParamInput(String),

    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Database(DatabaseError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<DatabaseError> for DomainError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => DomainError::NotFound,
            other => DomainError::Database(other),
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::from(err).into()
    }
}

impl From<FilterError> for DomainError {
    fn from(err: FilterError) -> Self {
        DomainError::BadParamInput(err.to_string())
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 422 Unprocessable Entity (body could not be bound)
    InvalidJson(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidJson(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError {
                message,
                field_errors,
            } => {
                let mut response = json!({
                    "message": message,
                    "code": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            _ => json!({
                "message": self.message(),
                "code": self.error_code()
            }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Single translation point from domain errors to transport errors
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let api_error = match &err {
            DomainError::NotFound => ApiError::not_found(err.to_string()),
            DomainError::Conflict => ApiError::conflict(err.to_string()),
            // Everything outside the table is a 500; these messages are safe to echo
            DomainError::BadParamInput(_) | DomainError::WrongPassword => {
                ApiError::internal_server_error(err.to_string())
            }
            // Don't expose store or signing internals to clients
            DomainError::Timeout | DomainError::Database(_) | DomainError::Token(_) => {
                ApiError::internal_server_error("Internal Server Error")
            }
        };

        if api_error.status_code().is_server_error() {
            tracing::error!("request failed: {}", err);
        } else {
            tracing::warn!("request rejected: {}", err);
        }

        api_error
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "This field is required".to_string());
                (field.to_string(), message)
            })
            .collect::<HashMap<_, _>>();

        let mut fields: Vec<&str> = field_errors.keys().map(String::as_str).collect();
        fields.sort_unstable();
        tracing::warn!("request rejected: invalid fields {}", fields.join(", "));

        ApiError::validation_error("Missing required fields", Some(field_errors))
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        let message = rejection.body_text();
        tracing::warn!("request rejected: {}", message);
        ApiError::invalid_json(message)
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
