//! # REST API Errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::transpiler::TranspileError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Clone, Error)]
pub enum RestError {
    /// Query parameter that does not parse
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Collection with no configured endpoint
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("{0}")]
    Transpile(#[from] TranspileError),
}

impl RestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            RestError::CollectionNotFound(_) => StatusCode::NOT_FOUND,
            RestError::Transpile(TranspileError::InvalidArgument { .. }) => {
                StatusCode::BAD_REQUEST
            }
            RestError::Transpile(TranspileError::Store(StoreError::Unavailable(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            RestError::Transpile(TranspileError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RestError::InvalidQueryParam(_) => "INVALID_ARGUMENT",
            RestError::CollectionNotFound(_) => "NOT_FOUND",
            RestError::Transpile(err) => err.code(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl From<&RestError> for ErrorResponse {
    fn from(err: &RestError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
