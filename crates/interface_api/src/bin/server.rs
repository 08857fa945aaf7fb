//! Fund Search Service - API Server Binary
//!
//! This binary starts the HTTP API server for the fund search service.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin fund-search-api
//!
//! # Run with environment variables
//! FUNDS_PORT=8080 FUNDS_DATABASE_URL=postgres://... FUNDS_SEARCH_URL=http://es:9200 cargo run --bin fund-search-api
//! ```
//!
//! # Environment Variables
//!
//! * `FUNDS_HOST` - Server host (default: 0.0.0.0)
//! * `FUNDS_PORT` - Server port (default: 8080)
//! * `FUNDS_DATABASE_URL` - PostgreSQL connection string (`DATABASE_URL` also accepted)
//! * `FUNDS_SEARCH_URL` - Elasticsearch base URL (default: http://localhost:9200)
//! * `FUNDS_SEARCH_INDEX` - Index name (default: funds)
//! * `FUNDS_SEED_DATA_PATH` - Spreadsheet loaded at startup (default: /data/funds_data.xlsx)
//! * `FUNDS_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `FUNDS_MAX_UPLOAD_BYTES` - Upload size limit (default: 20 MiB)
//! * `FUNDS_INGEST_BATCH_SIZE` - Records per write batch (default: 500)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresFundStore};
use infra_search::{ElasticsearchFundIndex, SearchConfig};
use interface_api::{config::ApiConfig, create_router, AppState};

/// Main entry point for the API server.
///
/// Loads configuration, connects the primary store and the search index,
/// runs the seed load and serves until a shutdown signal arrives.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.log_level);
    config.validate().context("invalid configuration")?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        search_url = %config.search_url,
        search_index = %config.search_index,
        "Starting fund search API server"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_url))
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool).await.context("failed to run migrations")?;

    let index = ElasticsearchFundIndex::new(SearchConfig::new(&config.search_url, &config.search_index))
        .context("failed to build search client")?;
    // The index may come up later; searches fail until it does
    if let Err(e) = index.ensure_index().await {
        tracing::warn!(error = %e, "Search index bootstrap failed, continuing");
    }

    let state = AppState::new(Arc::new(PostgresFundStore::new(pool)), Arc::new(index), config.clone());

    if let Some(path) = config.seed_path() {
        let _guard = state.ingest_lock.lock().await;
        if let Some(report) = state.pipeline.initialize_from_seed(&path).await {
            tracing::info!(
                persisted = report.persisted,
                indexed = report.indexed,
                index_failures = report.index_failures.len(),
                "Seed data loaded"
            );
        }
    }

    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
