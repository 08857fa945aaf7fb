//! Search result cache
//!
//! Read-through cache in front of the search service. Entries are keyed by
//! the canonical JSON of the search request and live until the next
//! `clear_all`, which upload, sync and the manual clear endpoint call.
//!
//! Every `clear_all` bumps a generation. A search records the generation
//! before querying the index and its result is only stored if no clear
//! happened in between, so results read before a write never outlive it.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::DomainPort;
use domain_fund::{FundDocument, SearchCache, SearchRequest};

/// Entries kept before the cache starts over
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    entries: HashMap<String, Vec<FundDocument>>,
}

/// In-process cache of search results
#[derive(Debug)]
pub struct SearchResultCache {
    state: RwLock<CacheState>,
    capacity: usize,
}

impl SearchResultCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            capacity: capacity.max(1),
        }
    }

    /// Cache key of a request
    ///
    /// Absent sections and explicit defaults are different keys; they map to
    /// the same query but are cached separately.
    pub fn key(request: &SearchRequest) -> String {
        serde_json::to_string(request).unwrap_or_default()
    }

    pub async fn get(&self, key: &str) -> Option<Vec<FundDocument>> {
        self.state.read().await.entries.get(key).cloned()
    }

    /// Current generation; pass it back to [`insert`](Self::insert)
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Stores a result computed at `generation`
    ///
    /// Returns `false` and stores nothing when the cache was cleared since.
    /// A full cache is emptied first.
    pub async fn insert(&self, generation: u64, key: String, documents: Vec<FundDocument>) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(
                read_at = generation,
                current = state.generation,
                "Search result predates a cache clear, not stored"
            );
            return false;
        }
        if state.entries.len() >= self.capacity && !state.entries.contains_key(&key) {
            debug!(capacity = self.capacity, "Search cache full, starting over");
            state.entries.clear();
        }
        state.entries.insert(key, documents);
        true
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

impl Default for SearchResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainPort for SearchResultCache {}

#[async_trait]
impl SearchCache for SearchResultCache {
    async fn clear_all(&self) {
        let mut state = self.state.write().await;
        let evicted = state.entries.len();
        state.entries.clear();
        state.generation = state.generation.wrapping_add(1);
        debug!(evicted, generation = state.generation, "Search cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_fund::FundRecord;

    fn documents(code: &str) -> Vec<FundDocument> {
        vec![FundDocument::from(FundRecord::new(code.parse().unwrap(), "Fund", "Hisse"))]
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = SearchResultCache::new();
        let key = SearchResultCache::key(&SearchRequest::default().with_page(1, 10));

        assert!(cache.get(&key).await.is_none());
        assert!(cache.insert(0, key.clone(), documents("DLZ")).await);

        assert_eq!(cache.get(&key).await, Some(documents("DLZ")));
    }

    #[tokio::test]
    async fn test_distinct_requests_have_distinct_keys() {
        let first = SearchResultCache::key(&SearchRequest::default().with_page(1, 10));
        let second = SearchResultCache::key(&SearchRequest::default().with_page(2, 10));

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_clear_all_empties_cache() {
        let cache = SearchResultCache::new();
        cache.insert(0, "a".to_string(), documents("DLZ")).await;
        cache.insert(0, "b".to_string(), documents("UHS")).await;

        cache.clear_all().await;

        assert!(cache.is_empty().await);
        assert_eq!(cache.generation().await, 1);
    }

    #[tokio::test]
    async fn test_result_read_before_clear_is_not_stored() {
        let cache = SearchResultCache::new();
        let read_at = cache.generation().await;

        // A write commits and clears while the search is still running
        cache.clear_all().await;

        assert!(!cache.insert(read_at, "a".to_string(), documents("OLD")).await);
        assert!(cache.get("a").await.is_none());

        let current = cache.generation().await;
        assert!(cache.insert(current, "a".to_string(), documents("NEW")).await);
        assert_eq!(cache.get("a").await, Some(documents("NEW")));
    }

    #[tokio::test]
    async fn test_full_cache_starts_over() {
        let cache = SearchResultCache::with_capacity(2);
        cache.insert(0, "a".to_string(), documents("DLZ")).await;
        cache.insert(0, "b".to_string(), documents("UHS")).await;
        cache.insert(0, "c".to_string(), documents("AAK")).await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.get("c").await.is_some());
    }
}
