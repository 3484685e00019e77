use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error body returned to webhook senders.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid webhook secret")]
    InvalidSecret,

    /// Body was not valid UTF-8 JSON. The parser detail stays server side.
    #[error("Invalid JSON: {0}")]
    InvalidPayload(String),

    #[error("Endpoint not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Label recorded by the stats aggregator when a webhook is rejected.
    pub fn failure_reason(&self) -> &'static str {
        match self {
            ApiError::InvalidSecret => "invalid_secret",
            ApiError::InvalidPayload(_) => "invalid_json",
            ApiError::NotFound(_) => "not_found",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidSecret => StatusCode::FORBIDDEN,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message exposed in the response body.
    fn public_message(&self) -> String {
        match self {
            ApiError::InvalidSecret => "Invalid webhook secret".to_string(),
            ApiError::InvalidPayload(_) => "Invalid JSON".to_string(),
            ApiError::NotFound(path) => format!("Endpoint not found: {}", path),
        }
    }

    /// Every variant is a client error.
    fn log_error(&self) {
        warn!(
            error = %self,
            status = %self.status_code(),
            reason = self.failure_reason(),
            "Client error occurred"
        );
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_error();

        let body = ErrorResponse {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
