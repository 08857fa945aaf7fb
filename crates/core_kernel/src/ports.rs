//! Port infrastructure
//!
//! `domain_fund` declares one trait per collaborator (`FundStore`,
//! `FundSearchIndex`, `SearchCache`). Every such trait extends [`DomainPort`]
//! so services can hold them as `Arc<dyn Trait>`, and adapters that talk to
//! a backing system also implement [`HealthCheckable`] for readiness.
//!
//! Adapters convert their own errors into [`PortError`] at the boundary, so
//! the domain never sees `sqlx` or HTTP client types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Adapter-neutral failure of a port call
#[derive(Debug, Error)]
pub enum PortError {
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// The backing system refused the data or the request
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    /// Overloaded, shutting down, or answering 5xx
    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },

    /// A stored value could not be mapped back into a domain value
    #[error("Transformation error: {message}")]
    Transformation { message: String },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation { message: message.into() }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Whether the same call could succeed later without any data change
    ///
    /// Nothing retries automatically; this only steers logging and the
    /// operator's choice to run a resync.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::Timeout { .. } | PortError::ServiceUnavailable { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker for port traits: shareable across tasks as `Arc<dyn Port>`
pub trait DomainPort: Send + Sync + 'static {}

/// Adapter status reported by readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    /// Serving, but with a warning (e.g. a yellow Elasticsearch cluster)
    Degraded,
    Unhealthy,
}

/// One adapter's answer to a health probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn healthy(adapter_id: impl Into<String>, latency_ms: u64) -> Self {
        Self::with_status(adapter_id, AdapterHealth::Healthy, latency_ms, None)
    }

    pub fn degraded(adapter_id: impl Into<String>, latency_ms: u64, message: impl Into<String>) -> Self {
        Self::with_status(adapter_id, AdapterHealth::Degraded, latency_ms, Some(message.into()))
    }

    pub fn unhealthy(adapter_id: impl Into<String>, latency_ms: u64, message: impl Into<String>) -> Self {
        Self::with_status(adapter_id, AdapterHealth::Unhealthy, latency_ms, Some(message.into()))
    }

    fn with_status(
        adapter_id: impl Into<String>,
        status: AdapterHealth,
        latency_ms: u64,
        message: Option<String>,
    ) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }

    /// Degraded adapters still count as available
    pub fn is_available(&self) -> bool {
        self.status != AdapterHealth::Unhealthy
    }
}

/// Probe used by the readiness endpoint
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}
