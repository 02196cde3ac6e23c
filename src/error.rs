//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}' ({reason})")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Failure reported by one of the backing stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document store: {0}")]
    Document(#[from] mongodb::error::Error),
    #[error("relational store: {0}")]
    Relational(#[from] sqlx::Error),
    #[error("object storage: {0}")]
    Object(String),
    /// Input the store's model refuses (e.g. a value that cannot be cast to a field type).
    #[error("rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Upload(#[from] axum::extract::multipart::MultipartError),
    #[error("{message}")]
    Internal {
        message: String,
        details: Option<String>,
    },
}

impl AppError {
    /// Log a store failure and turn it into a 500. `expose_details` decides whether the
    /// raw store error text reaches the client.
    pub fn internal(message: impl Into<String>, err: StoreError, expose_details: bool) -> Self {
        let message = message.into();
        tracing::error!(error = %err, "{}", message);
        AppError::Internal {
            message,
            details: expose_details.then(|| err.to_string()),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Upload(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
            }
            AppError::Upload(e) => (e.status(), "bad_request"),
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        let message = self.to_string();
        let details = match self {
            AppError::Internal { details, .. } => details,
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
