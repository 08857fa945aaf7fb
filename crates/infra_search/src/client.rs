//! Elasticsearch Fund Index Adapter
//!
//! Implements the fund domain's `FundSearchIndex` port over the Elasticsearch
//! REST API with `reqwest`.
//!
//! - Writes use `_bulk` with one `index` action per document, keyed by fund code
//! - Reads use `_search` with the body rendered by [`crate::dsl`]
//! - Health reads `_cluster/health`; `yellow` is degraded, `red` is unhealthy

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_fund::{FundDocument, FundQuery, FundSearchIndex, SearchHits};

use crate::config::SearchConfig;
use crate::dsl::{index_mapping, render_query};
use crate::error::SearchEngineError;

const ADAPTER_ID: &str = "elasticsearch-fund-index";

/// Search index backed by an Elasticsearch cluster
#[derive(Debug, Clone)]
pub struct ElasticsearchFundIndex {
    client: Client,
    config: SearchConfig,
}

impl ElasticsearchFundIndex {
    /// Creates the adapter; no request is sent until first use
    ///
    /// # Errors
    ///
    /// Returns `SearchEngineError::InvalidConfig` if the HTTP client cannot be built
    pub fn new(config: SearchConfig) -> Result<Self, SearchEngineError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchEngineError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Creates the index with the fund mapping when it does not exist
    ///
    /// # Returns
    ///
    /// `true` if the index was created, `false` if it already existed
    pub async fn ensure_index(&self) -> Result<bool, SearchEngineError> {
        let url = self.config.index_url("");

        let exists = self.authorized(self.client.head(&url)).send().await?;
        match exists.status() {
            status if status.is_success() => {
                debug!(index = %self.config.index, "Search index already exists");
                return Ok(false);
            }
            StatusCode::NOT_FOUND => {}
            status => return Err(SearchEngineError::status(status.as_u16(), "index existence check failed")),
        }

        let response = self
            .authorized(self.client.put(&url))
            .json(&index_mapping())
            .send()
            .await?;
        let body = Self::checked(response).await?;

        if body["acknowledged"] == Value::Bool(true) {
            info!(index = %self.config.index, "Search index created");
            Ok(true)
        } else {
            Err(SearchEngineError::Decode(format!("index creation not acknowledged: {}", body)))
        }
    }

    /// Upserts documents with a single `_bulk` request
    pub async fn bulk_index(&self, documents: &[FundDocument]) -> Result<(), SearchEngineError> {
        if documents.is_empty() {
            return Ok(());
        }

        let body = bulk_body(&self.config.index, documents)?;
        let response = self
            .authorized(self.client.post(format!("{}/_bulk", self.config.url)))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        let result: BulkResponse = serde_json::from_value(Self::checked(response).await?)
            .map_err(|e| SearchEngineError::Decode(e.to_string()))?;

        if result.errors {
            let failures: Vec<&BulkItemResult> = result
                .items
                .iter()
                .filter_map(BulkItem::result)
                .filter(|item| item.error.is_some())
                .collect();

            let reason = failures
                .first()
                .and_then(|item| item.error.as_ref())
                .map(|error| error.to_string())
                .unwrap_or_default();

            return Err(SearchEngineError::BulkRejected {
                failed: failures.len(),
                total: documents.len(),
                reason,
            });
        }

        Ok(())
    }

    /// Runs a `_search` request for a query
    pub async fn query(&self, query: &FundQuery) -> Result<SearchHits, SearchEngineError> {
        let body = render_query(query);
        debug!(body = %body, "Search request body");

        let response = self
            .authorized(self.client.post(self.config.index_url("_search")))
            .json(&body)
            .send()
            .await?;

        let result: SearchResponse = serde_json::from_value(Self::checked(response).await?)
            .map_err(|e| SearchEngineError::Decode(e.to_string()))?;

        Ok(SearchHits {
            total: result.hits.total.map(|t| t.value).unwrap_or_default(),
            documents: result.hits.hits.into_iter().map(|hit| hit.source).collect(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.username {
            Some(username) => request.basic_auth(username, self.config.password.as_ref()),
            None => request,
        }
    }

    /// Returns the JSON body of a success response, or a status error
    async fn checked(response: Response) -> Result<Value, SearchEngineError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchEngineError::status(status.as_u16(), body));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchEngineError::Decode(e.to_string()))
    }
}

/// Builds the NDJSON body of a bulk request
pub(crate) fn bulk_body(index: &str, documents: &[FundDocument]) -> Result<String, SearchEngineError> {
    let mut body = String::new();
    for document in documents {
        let action = serde_json::json!({ "index": { "_index": index, "_id": document.id() } });
        let source = serde_json::to_string(document).map_err(|e| SearchEngineError::Decode(e.to_string()))?;
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&source);
        body.push('\n');
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
    #[serde(default)]
    items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    index: Option<BulkItemResult>,
}

impl BulkItem {
    fn result(&self) -> Option<&BulkItemResult> {
        self.index.as_ref()
    }
}

#[derive(Debug, Deserialize)]
struct BulkItemResult {
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: FundDocument,
}

impl DomainPort for ElasticsearchFundIndex {}

#[async_trait]
impl HealthCheckable for ElasticsearchFundIndex {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let url = format!("{}/_cluster/health", self.config.url);

        let result = match self.authorized(self.client.get(&url)).send().await {
            Ok(response) => Self::checked(response).await,
            Err(e) => Err(SearchEngineError::from(e)),
        };
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(body) => match body["status"].as_str() {
                Some("red") => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, "cluster status red"),
                Some("yellow") => HealthCheckResult::degraded(ADAPTER_ID, latency_ms, "cluster status yellow"),
                _ => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            },
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, e.to_string()),
        }
    }
}

#[async_trait]
impl FundSearchIndex for ElasticsearchFundIndex {
    #[instrument(skip(self, documents), fields(batch_size = documents.len()))]
    async fn save_all(&self, documents: Vec<FundDocument>) -> Result<(), PortError> {
        self.bulk_index(&documents).await.map_err(|e| {
            warn!(error = %e, "Bulk index request failed");
            PortError::from(e)
        })
    }

    #[instrument(skip(self, query))]
    async fn search(&self, query: &FundQuery) -> Result<SearchHits, PortError> {
        Ok(self.query(query).await?)
    }
}
