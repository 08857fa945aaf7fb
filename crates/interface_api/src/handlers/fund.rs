//! Fund handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{debug, info, instrument};

use domain_fund::{FundDocument, SearchCache, SearchRequest};

use crate::cache::SearchResultCache;
use crate::dto::fund::{MessageResponse, SyncResponse, UploadResponse};
use crate::{error::ApiError, AppState};

/// Multipart field holding the spreadsheet
pub const UPLOAD_FIELD: &str = "file";

/// Searches funds, serving repeated requests from the cache
#[instrument(skip(state, request))]
pub async fn search_funds(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<FundDocument>>, ApiError> {
    let key = SearchResultCache::key(&request);

    if let Some(documents) = state.cache.get(&key).await {
        debug!(hits = documents.len(), "Search served from cache");
        return Ok(Json(documents));
    }

    let generation = state.cache.generation().await;
    let documents = state.search.search(&request).await?;
    state.cache.insert(generation, key, documents.clone()).await;

    Ok(Json(documents))
}

/// Ingests an uploaded spreadsheet
#[instrument(skip(state, multipart))]
pub async fn upload_funds(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let file_name = field.file_name().map(str::to_string);
            upload = Some((file_name, field.bytes().await?));
            break;
        }
    }

    let (file_name, bytes) = upload
        .ok_or_else(|| ApiError::BadRequest(format!("Missing multipart field '{}'", UPLOAD_FIELD)))?;
    info!(file_name = ?file_name, size = bytes.len(), "Spreadsheet upload received");

    let report = {
        let _guard = state.ingest_lock.lock().await;
        state.pipeline.ingest_workbook(bytes.to_vec()).await
    };
    // Committed batches are visible even when a later batch failed
    state.cache.clear_all().await;

    Ok(Json(UploadResponse::new(report?)))
}

/// Rebuilds the search index from the primary store, then clears the cache
#[instrument(skip(state))]
pub async fn sync_index(State(state): State<AppState>) -> Result<Json<SyncResponse>, ApiError> {
    let report = {
        let _guard = state.ingest_lock.lock().await;
        state.pipeline.full_resync().await?
    };
    state.cache.clear_all().await;

    Ok(Json(SyncResponse::new(report)))
}

/// Discards every cached search result
pub async fn clear_cache(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.clear_all().await;
    info!("Search cache cleared on request");

    Json(MessageResponse::new("Cache cleared successfully."))
}
