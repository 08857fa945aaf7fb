//! Search engine error types

use core_kernel::PortError;
use thiserror::Error;

/// Errors raised while talking to Elasticsearch
#[derive(Debug, Error)]
pub enum SearchEngineError {
    /// The HTTP client could not be built
    #[error("Invalid search engine configuration: {0}")]
    InvalidConfig(String),

    /// The request did not complete
    #[error("Search engine request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The engine answered with a non-success status
    #[error("Search engine returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A bulk request was accepted but some items were rejected
    #[error("Bulk request rejected {failed} of {total} documents: {reason}")]
    BulkRejected {
        failed: usize,
        total: usize,
        reason: String,
    },

    /// The response body did not have the expected shape
    #[error("Unexpected search engine response: {0}")]
    Decode(String),
}

impl SearchEngineError {
    /// Builds a status error, keeping at most 512 bytes of the body
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > 512 {
            let mut end = 512;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        SearchEngineError::Status { status, body }
    }
}

/// Maps engine errors onto port errors
///
/// - 404 -> `PortError::NotFound`
/// - 400 -> `PortError::Validation`
/// - 408 / timeouts -> `PortError::Timeout`
/// - 429 / 5xx / unreachable -> `PortError::ServiceUnavailable` or `Connection`
impl From<SearchEngineError> for PortError {
    fn from(error: SearchEngineError) -> Self {
        match error {
            SearchEngineError::Status { status: 404, body } => PortError::NotFound {
                entity_type: "Index".to_string(),
                id: body,
            },
            SearchEngineError::Status { status: 400, body } => PortError::validation(body),
            SearchEngineError::Status { status: 408, .. } => PortError::Timeout {
                operation: "search engine request".to_string(),
                duration_ms: 0,
            },
            SearchEngineError::Status { status, .. } if status == 429 || status >= 500 => {
                PortError::ServiceUnavailable {
                    service: format!("elasticsearch ({})", status),
                }
            }
            SearchEngineError::Transport(e) if e.is_timeout() => PortError::Timeout {
                operation: e
                    .url()
                    .map(|url| url.path().to_string())
                    .unwrap_or_else(|| "search engine request".to_string()),
                duration_ms: 0,
            },
            SearchEngineError::Transport(e) if e.is_connect() => PortError::Connection {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
            SearchEngineError::Decode(message) => PortError::transformation(message),
            other => PortError::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}
