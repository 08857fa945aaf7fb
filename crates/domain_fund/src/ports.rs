//! Fund Domain Ports
//!
//! This module defines the port interfaces the fund domain needs from its
//! collaborators, so storage and search technologies stay swappable.
//!
//! # Architecture
//!
//! - **FundStore**: The primary store and source of truth (PostgreSQL in infra_db)
//! - **FundSearchIndex**: The denormalized search index (Elasticsearch in infra_search)
//! - **SearchCache**: The search-result cache cleared after writes
//!
//! Application services receive the ports as trait objects:
//!
//! ```rust,ignore
//! let pipeline = IngestionPipeline::new(
//!     Arc::new(PostgresFundStore::new(pool)),
//!     Arc::new(ElasticsearchFundIndex::new(search_config)?),
//! );
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::document::FundDocument;
use crate::fund::FundRecord;
use crate::query::FundQuery;

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    /// Number of documents matching the query, across all pages
    pub total: u64,
    /// Documents of the requested page, in sort order
    pub documents: Vec<FundDocument>,
}

/// The primary store for fund records
///
/// Records are keyed by fund code. Saving a record whose code already exists
/// replaces the stored row in full.
#[async_trait]
pub trait FundStore: DomainPort + HealthCheckable {
    /// Upserts a batch of records atomically
    ///
    /// Either every record of the batch is persisted or none is.
    ///
    /// # Returns
    ///
    /// The persisted records, in input order
    async fn save_all(&self, records: Vec<FundRecord>) -> Result<Vec<FundRecord>, PortError>;

    /// Loads every stored record, ordered by fund code
    async fn find_all(&self) -> Result<Vec<FundRecord>, PortError>;

    /// Counts stored records
    async fn count(&self) -> Result<u64, PortError>;
}

/// The search index holding `FundDocument`s
#[async_trait]
pub trait FundSearchIndex: DomainPort + HealthCheckable {
    /// Upserts a batch of documents, keyed by fund code
    async fn save_all(&self, documents: Vec<FundDocument>) -> Result<(), PortError>;

    /// Executes a query and returns the requested page
    async fn search(&self, query: &FundQuery) -> Result<SearchHits, PortError>;
}

/// A cache of search results
#[async_trait]
pub trait SearchCache: DomainPort {
    /// Drops every cached entry
    async fn clear_all(&self);
}

/// Mock implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::cmp::Ordering;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};

    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    use crate::document::FieldKind;
    use crate::query::SortOrder;
    use crate::search::SortDirection;

    /// In-memory primary store
    ///
    /// Can be told to fail a given `save_all` call, counting calls from 1.
    #[derive(Debug, Default)]
    pub struct InMemoryFundStore {
        records: RwLock<BTreeMap<String, FundRecord>>,
        save_calls: AtomicUsize,
        fail_on_call: Option<usize>,
        fail_reads: bool,
    }

    impl InMemoryFundStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store
        pub async fn with_records(records: Vec<FundRecord>) -> Self {
            let store = Self::new();
            {
                let mut stored = store.records.write().await;
                for record in records {
                    stored.insert(record.fund_code.to_string(), record);
                }
            }
            store
        }

        /// Fails the `call`-th `save_all` invocation
        pub fn failing_on_save_call(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }

        /// Fails every read
        pub fn failing_reads(mut self) -> Self {
            self.fail_reads = true;
            self
        }

        /// Number of `save_all` invocations so far
        pub fn save_calls(&self) -> usize {
            self.save_calls.load(AtomicOrdering::SeqCst)
        }

        /// Snapshot of one stored record
        pub async fn get(&self, code: &str) -> Option<FundRecord> {
            self.records.read().await.get(code).cloned()
        }

        /// Number of stored records
        pub async fn len(&self) -> usize {
            self.records.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.records.read().await.is_empty()
        }
    }

    impl DomainPort for InMemoryFundStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryFundStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("in-memory-fund-store", 0)
        }
    }

    #[async_trait]
    impl FundStore for InMemoryFundStore {
        async fn save_all(&self, records: Vec<FundRecord>) -> Result<Vec<FundRecord>, PortError> {
            let call = self.save_calls.fetch_add(1, AtomicOrdering::SeqCst) + 1;
            if self.fail_on_call == Some(call) {
                return Err(PortError::connection(format!(
                    "injected store failure on save call {}",
                    call
                )));
            }

            let mut stored = self.records.write().await;
            for record in &records {
                stored.insert(record.fund_code.to_string(), record.clone());
            }
            Ok(records)
        }

        async fn find_all(&self) -> Result<Vec<FundRecord>, PortError> {
            if self.fail_reads {
                return Err(PortError::connection("injected store read failure"));
            }
            Ok(self.records.read().await.values().cloned().collect())
        }

        async fn count(&self) -> Result<u64, PortError> {
            if self.fail_reads {
                return Err(PortError::connection("injected store read failure"));
            }
            Ok(self.records.read().await.len() as u64)
        }
    }

    /// In-memory search index
    ///
    /// Evaluates `FundQuery` criteria directly. Selected `save_all` calls
    /// (counted from 1) and every search can be made to fail.
    #[derive(Debug, Default)]
    pub struct InMemoryFundIndex {
        documents: RwLock<BTreeMap<String, FundDocument>>,
        save_calls: AtomicUsize,
        failing_calls: HashSet<usize>,
        fail_search: AtomicBool,
    }

    impl InMemoryFundIndex {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the index
        pub async fn with_documents(documents: Vec<FundDocument>) -> Self {
            let index = Self::new();
            {
                let mut stored = index.documents.write().await;
                for document in documents {
                    stored.insert(document.id().to_string(), document);
                }
            }
            index
        }

        /// Fails the given `save_all` invocations
        pub fn failing_on_save_calls(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
            self.failing_calls = calls.into_iter().collect();
            self
        }

        /// Makes every search fail until reset
        pub fn set_search_failure(&self, fail: bool) {
            self.fail_search.store(fail, AtomicOrdering::SeqCst);
        }

        pub fn save_calls(&self) -> usize {
            self.save_calls.load(AtomicOrdering::SeqCst)
        }

        pub async fn get(&self, code: &str) -> Option<FundDocument> {
            self.documents.read().await.get(code).cloned()
        }

        pub async fn len(&self) -> usize {
            self.documents.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.documents.read().await.is_empty()
        }

        /// Indexed fund codes in ascending order
        pub async fn codes(&self) -> Vec<String> {
            self.documents.read().await.keys().cloned().collect()
        }
    }

    impl DomainPort for InMemoryFundIndex {}

    #[async_trait]
    impl HealthCheckable for InMemoryFundIndex {
        async fn health_check(&self) -> HealthCheckResult {
            if self.fail_search.load(AtomicOrdering::SeqCst) {
                HealthCheckResult::unhealthy("in-memory-fund-index", 0, "search failure injected")
            } else {
                HealthCheckResult::healthy("in-memory-fund-index", 0)
            }
        }
    }

    #[async_trait]
    impl FundSearchIndex for InMemoryFundIndex {
        async fn save_all(&self, documents: Vec<FundDocument>) -> Result<(), PortError> {
            let call = self.save_calls.fetch_add(1, AtomicOrdering::SeqCst) + 1;
            if self.failing_calls.contains(&call) {
                return Err(PortError::ServiceUnavailable {
                    service: format!("in-memory index (save call {})", call),
                });
            }

            let mut stored = self.documents.write().await;
            for document in documents {
                stored.insert(document.id().to_string(), document);
            }
            Ok(())
        }

        async fn search(&self, query: &FundQuery) -> Result<SearchHits, PortError> {
            if self.fail_search.load(AtomicOrdering::SeqCst) {
                return Err(PortError::ServiceUnavailable {
                    service: "in-memory index".to_string(),
                });
            }

            let stored = self.documents.read().await;
            let mut matching: Vec<FundDocument> = stored
                .values()
                .filter(|document| query.matches(document))
                .cloned()
                .collect();

            if let Some(sort) = query.sort() {
                matching.sort_by(|a, b| compare(a, b, sort));
            }

            let total = matching.len() as u64;
            let page = query.page();
            let documents = matching
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(page.limit() as usize)
                .collect();

            Ok(SearchHits { total, documents })
        }
    }

    /// Orders two documents; documents missing the sort value go last in
    /// either direction
    fn compare(a: &FundDocument, b: &FundDocument, sort: SortOrder) -> Ordering {
        let directed = |ordering: Ordering| match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };

        match sort.field.kind() {
            FieldKind::ScaledDecimal => match (a.decimal(sort.field), b.decimal(sort.field)) {
                (Some(x), Some(y)) => directed(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            FieldKind::Keyword | FieldKind::Text => {
                let x = a.text(sort.field).unwrap_or_default();
                let y = b.text(sort.field).unwrap_or_default();
                directed(x.cmp(y))
            }
        }
    }

    /// Search cache that only counts clears
    #[derive(Debug, Default)]
    pub struct RecordingSearchCache {
        clears: AtomicUsize,
    }

    impl RecordingSearchCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn clears(&self) -> usize {
            self.clears.load(AtomicOrdering::SeqCst)
        }
    }

    impl DomainPort for RecordingSearchCache {}

    #[async_trait]
    impl SearchCache for RecordingSearchCache {
        async fn clear_all(&self) {
            self.clears.fetch_add(1, AtomicOrdering::SeqCst);
        }
    }
}
