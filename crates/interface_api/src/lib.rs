//! HTTP API Layer
//!
//! This crate provides the REST API of the fund search service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: search, upload, sync, cache control, health
//! - **Middleware**: tracing and audit logging with request ids
//! - **Cache**: read-through search result cache
//! - **Error Handling**: `FundError` mapped onto HTTP statuses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(store, index, config);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod cache;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_fund::{FundSearchIndex, FundSearchService, FundStore, IngestionPipeline};

use crate::cache::SearchResultCache;
use crate::config::ApiConfig;
use crate::handlers::{fund, health};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IngestionPipeline>,
    pub search: FundSearchService,
    pub cache: Arc<SearchResultCache>,
    pub store: Arc<dyn FundStore>,
    pub index: Arc<dyn FundSearchIndex>,
    /// Serializes ingestion and resync
    pub ingest_lock: Arc<Mutex<()>>,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the services over a primary store and a search index
    pub fn new(store: Arc<dyn FundStore>, index: Arc<dyn FundSearchIndex>, config: ApiConfig) -> Self {
        let pipeline = IngestionPipeline::new(store.clone(), index.clone())
            .with_batch_size(config.ingest_batch_size);

        Self {
            pipeline: Arc::new(pipeline),
            search: FundSearchService::new(index.clone()),
            cache: Arc::new(SearchResultCache::new()),
            store,
            index,
            ingest_lock: Arc::new(Mutex::new(())),
            config,
        }
    }
}

/// Creates the main API router
///
/// # Routes
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | GET | `/health` | liveness |
/// | GET | `/health/ready` | store and index health |
/// | POST | `/api/v1/funds/search` | search |
/// | POST | `/api/v1/funds/upload` | spreadsheet ingestion |
/// | POST | `/api/v1/funds/sync` | full resync, then cache clear |
/// | POST | `/api/v1/funds/cache/clear` | cache clear |
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let fund_routes = Router::new()
        .route("/search", post(fund::search_funds))
        .route(
            "/upload",
            post(fund::upload_funds).layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/sync", post(fund::sync_index))
        .route("/cache/clear", post(fund::clear_cache));

    let api_routes = Router::new()
        .nest("/funds", fund_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        // Outermost, so tracing and the audit log already see the id
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
