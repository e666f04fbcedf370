//! Service error type and its HTTP mapping.
//!
//! The taxonomy is small: missing/invalid request parameters map to 400, a
//! single-entity lookup that matched nothing maps to 404, and everything else
//! (SPARQL parse/eval failures included) maps to 500 carrying the error text.
//! All error bodies are `{"error": <message>}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingParameter(String),

    #[error("invalid value for '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Sparql(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) | ApiError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Sparql(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::MissingParameter(_) | ApiError::InvalidParameter { .. } => "client_error",
            ApiError::NotFound(_) => "resource_not_found",
            ApiError::Sparql(_) => "sparql_error",
            ApiError::Internal(_) => "server_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(category = self.category(), error = %self, "request failed");
        } else {
            tracing::debug!(category = self.category(), error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
