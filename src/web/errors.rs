//! # Web API Error Types
//!
//! Errors that escape a handler and their HTTP response conversions.
//!
//! Authorization failures never show up here: the controller turns them into
//! redirects. What remains are infrastructure failures and misconfiguration.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::ItemsError;
use crate::store::StoreError;

/// Web API specific errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    #[error("Database operation failed: {operation}")]
    DatabaseError { operation: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a BadRequest error with a custom message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a DatabaseError with operation context
    pub fn database_error(operation: impl Into<String>) -> Self {
        Self::DatabaseError {
            operation: operation.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::DatabaseError { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError { .. } => "DATABASE_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<ItemsError> for ApiError {
    fn from(err: ItemsError) -> Self {
        match err {
            ItemsError::Store(StoreError::Database(e)) => {
                error!(error = %e, "Item store database failure");
                Self::database_error("item store query failed")
            }
            ItemsError::Store(StoreError::Migration(e)) => {
                error!(error = %e, "Item store migration failure");
                Self::database_error("item store migration failed")
            }
            ItemsError::Store(other) => {
                error!(error = %other, "Unexpected item store error");
                Self::internal("unexpected item store error")
            }
            ItemsError::Configuration(e) => {
                error!(error = %e, "Configuration error while serving request");
                Self::internal("configuration error")
            }
            ItemsError::Server(message) => Self::internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Internal details stay in the logs
            Self::DatabaseError { .. } | Self::Internal { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for web API operations
pub type ApiResult<T> = Result<T, ApiError>;
