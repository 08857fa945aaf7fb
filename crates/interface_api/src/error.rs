//! API error handling

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain_fund::FundError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Fund(#[from] FundError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub persisted: Option<usize>,
}

impl ApiError {
    /// HTTP status and machine-readable error type
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ApiError::Fund(error) => match error {
                FundError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
                FundError::InvalidSearchRequest(_) => (StatusCode::BAD_REQUEST, "invalid_search_request"),
                FundError::PrimaryStoreWriteFailed { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "primary_store_write_failed")
                }
                FundError::PrimaryStoreReadFailed(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "primary_store_read_failed")
                }
                FundError::SearchExecutionFailed(_) => (StatusCode::BAD_GATEWAY, "search_execution_failed"),
                FundError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.classify();

        if status.is_server_error() {
            error!(error = %self, error_type, "Request failed");
        }

        let persisted = match &self {
            ApiError::Fund(FundError::PrimaryStoreWriteFailed { persisted, .. }) => Some(*persisted),
            _ => None,
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            persisted,
        };

        (status, Json(body)).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
        }
    }
}
