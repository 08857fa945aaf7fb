//! PostgreSQL Fund Store Adapter
//!
//! Implements the fund domain's `FundStore` port on top of `FundRepository`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresFundStore;
//! use domain_fund::FundStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn FundStore> = Arc::new(PostgresFundStore::new(pool));
//! let records = store.find_all().await?;
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_fund::{FundRecord, FundStore};

use crate::repositories::FundRepository;

const ADAPTER_ID: &str = "postgres-fund-store";

/// PostgreSQL-backed primary store
///
/// Database errors are translated to `PortError` through
/// `From<DatabaseError>`; connection failures come out transient.
#[derive(Debug, Clone)]
pub struct PostgresFundStore {
    repository: FundRepository,
    pool: PgPool,
}

impl PostgresFundStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FundRepository::new(pool.clone()),
            pool,
        }
    }

    /// Direct access to the repository for queries the port does not expose
    pub fn repository(&self) -> &FundRepository {
        &self.repository
    }
}

impl DomainPort for PostgresFundStore {}

#[async_trait]
impl HealthCheckable for PostgresFundStore {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl FundStore for PostgresFundStore {
    #[instrument(skip(self, records), fields(batch_size = records.len()))]
    async fn save_all(&self, records: Vec<FundRecord>) -> Result<Vec<FundRecord>, PortError> {
        self.repository.upsert_batch(&records).await?;
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<FundRecord>, PortError> {
        let rows = self.repository.find_all().await?;
        rows.into_iter()
            .map(|row| FundRecord::try_from(row).map_err(PortError::from))
            .collect()
    }

    async fn count(&self) -> Result<u64, PortError> {
        let count = self.repository.count().await?;
        Ok(count.max(0) as u64)
    }
}
