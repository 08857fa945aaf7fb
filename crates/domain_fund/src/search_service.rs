//! Search execution

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::document::FundDocument;
use crate::error::FundError;
use crate::ports::FundSearchIndex;
use crate::query::{FundQuery, QueryBuilder};
use crate::search::SearchRequest;

/// Runs fund searches against the search index
#[derive(Clone)]
pub struct FundSearchService {
    index: Arc<dyn FundSearchIndex>,
}

impl FundSearchService {
    pub fn new(index: Arc<dyn FundSearchIndex>) -> Self {
        Self { index }
    }

    /// Builds and executes the query for a request
    ///
    /// # Errors
    ///
    /// - `FundError::InvalidSearchRequest` if the request cannot be built
    /// - `FundError::SearchExecutionFailed` if the engine fails
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<FundDocument>, FundError> {
        let query = QueryBuilder::build(request)?;
        self.execute(&query).await
    }

    /// Executes a built query and returns the documents of its page
    ///
    /// No match is an empty list, not an error.
    pub async fn execute(&self, query: &FundQuery) -> Result<Vec<FundDocument>, FundError> {
        debug!(?query, "Executing fund search");

        let hits = self.index.search(query).await.map_err(|e| {
            error!(error = %e, "Search execution failed");
            FundError::SearchExecutionFailed(e)
        })?;

        info!(
            total = hits.total,
            returned = hits.documents.len(),
            "Fund search completed"
        );
        Ok(hits.documents)
    }
}
