//! HTTP tests against in-memory ports

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_fund::{FundDocument, FundSearchIndex, InMemoryFundIndex, InMemoryFundStore};
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use test_utils::{FundFixtures, RowFixtures, WorkbookBuilder};

struct Harness {
    server: TestServer,
    index: Arc<InMemoryFundIndex>,
}

async fn harness_with(store: InMemoryFundStore, index: InMemoryFundIndex, config: ApiConfig) -> Harness {
    let index = Arc::new(index);
    let state = AppState::new(Arc::new(store), index.clone(), config);
    let server = TestServer::new(create_router(state)).unwrap();
    Harness { server, index }
}

async fn indexed_harness() -> Harness {
    let documents = FundFixtures::all().into_iter().map(FundDocument::from).collect();
    harness_with(
        InMemoryFundStore::with_records(FundFixtures::all()).await,
        InMemoryFundIndex::with_documents(documents).await,
        ApiConfig::default(),
    )
    .await
}

fn codes(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|d| d["fundCode"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let harness = indexed_harness().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_each_adapter() {
    let harness = indexed_harness().await;

    let response = harness.server.get("/health/ready").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_readiness_fails_when_index_is_down() {
    let harness = indexed_harness().await;
    harness.index.set_search_failure(true);

    let response = harness.server.get("/health/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["status"], "unavailable");
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_empty_search_returns_first_page() {
    let harness = indexed_harness().await;

    let response = harness.server.post("/api/v1/funds/search").json(&json!({})).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), FundFixtures::all().len());
}

#[tokio::test]
async fn test_search_filters_and_sorts() {
    let harness = indexed_harness().await;

    let response = harness
        .server
        .post("/api/v1/funds/search")
        .json(&json!({
            "filter": { "umbrellaType": "hisse senedi", "minReturn1Year": "40" },
            "sorting": { "property": "return1Year", "direction": "DESC" }
        }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(codes(&body), vec!["DLZ", "UHS"]);
    assert_eq!(body[0]["return1Year"], "75.7100");
}

#[tokio::test]
async fn test_invalid_page_size_is_bad_request() {
    let harness = indexed_harness().await;

    let response = harness
        .server
        .post("/api/v1/funds/search")
        .json(&json!({ "pagination": { "pageNumber": 1, "pageSize": 0 } }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid_search_request");
}

#[tokio::test]
async fn test_unknown_sort_property_is_bad_request() {
    let harness = indexed_harness().await;

    let response = harness
        .server
        .post("/api/v1/funds/search")
        .json(&json!({ "sorting": { "property": "managerName" } }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_engine_failure_is_bad_gateway() {
    let harness = indexed_harness().await;
    harness.index.set_search_failure(true);

    let response = harness.server.post("/api/v1/funds/search").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>()["error"], "search_execution_failed");
}

#[tokio::test]
async fn test_search_results_are_cached_until_cleared() {
    let harness = indexed_harness().await;
    let request = json!({ "filter": { "fundCode": "ZZZ" } });

    let first = harness.server.post("/api/v1/funds/search").json(&request).await;
    assert!(first.json::<Value>().as_array().unwrap().is_empty());

    let mut late = FundFixtures::new_fund();
    late.fund_code = "ZZZ".parse().unwrap();
    harness.index.save_all(vec![FundDocument::from(late)]).await.unwrap();

    let cached = harness.server.post("/api/v1/funds/search").json(&request).await;
    assert!(cached.json::<Value>().as_array().unwrap().is_empty());

    harness.server.post("/api/v1/funds/cache/clear").await.assert_status_ok();

    let fresh = harness.server.post("/api/v1/funds/search").json(&request).await;
    assert_eq!(codes(&fresh.json::<Value>()), vec!["ZZZ"]);
}

#[tokio::test]
async fn test_failed_search_is_not_cached() {
    let harness = indexed_harness().await;

    harness.index.set_search_failure(true);
    harness
        .server
        .post("/api/v1/funds/search")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_GATEWAY);

    harness.index.set_search_failure(false);
    harness
        .server
        .post("/api/v1/funds/search")
        .json(&json!({}))
        .await
        .assert_status_ok();
}

// ============================================================================
// Sync
// ============================================================================

#[tokio::test]
async fn test_sync_rebuilds_index_from_store() {
    let harness = harness_with(
        InMemoryFundStore::with_records(FundFixtures::all()).await,
        InMemoryFundIndex::new(),
        ApiConfig::default(),
    )
    .await;

    let response = harness.server.post("/api/v1/funds/sync").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["report"]["total"], FundFixtures::all().len());
    assert_eq!(body["report"]["indexed"], FundFixtures::all().len());
    assert_eq!(harness.index.len().await, FundFixtures::all().len());
}

#[tokio::test]
async fn test_sync_clears_cached_results() {
    let harness = harness_with(
        InMemoryFundStore::with_records(FundFixtures::all()).await,
        InMemoryFundIndex::new(),
        ApiConfig::default(),
    )
    .await;

    let before = harness.server.post("/api/v1/funds/search").json(&json!({})).await;
    assert!(before.json::<Value>().as_array().unwrap().is_empty());

    harness.server.post("/api/v1/funds/sync").await.assert_status_ok();

    let after = harness.server.post("/api/v1/funds/search").json(&json!({})).await;
    assert_eq!(after.json::<Value>().as_array().unwrap().len(), FundFixtures::all().len());
}

#[tokio::test]
async fn test_sync_read_failure_is_server_error() {
    let harness = harness_with(
        InMemoryFundStore::new().failing_reads(),
        InMemoryFundIndex::new(),
        ApiConfig::default(),
    )
    .await;

    let response = harness.server.post("/api/v1/funds/sync").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"], "primary_store_read_failed");
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn test_upload_without_file_field_is_bad_request() {
    let harness = indexed_harness().await;
    let form = MultipartForm::new().add_text("name", "funds.xlsx");

    let response = harness.server.post("/api/v1/funds/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "bad_request");
}

#[tokio::test]
async fn test_upload_empty_file_is_invalid_input() {
    let harness = indexed_harness().await;
    let form = MultipartForm::new().add_part("file", Part::bytes(Vec::new()).file_name("funds.xlsx"));

    let response = harness.server.post("/api/v1/funds/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid_input");
}

#[tokio::test]
async fn test_upload_unreadable_workbook_is_invalid_input() {
    let harness = indexed_harness().await;
    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"fund_code;name\nDLZ;Deniz".to_vec()).file_name("funds.csv"));

    let response = harness.server.post("/api/v1/funds/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid_input");
    assert_eq!(harness.index.save_calls(), 0);
}

#[tokio::test]
async fn test_upload_of_report_workbook_is_searchable() {
    let harness = harness_with(InMemoryFundStore::new(), InMemoryFundIndex::new(), ApiConfig::default()).await;

    let before = harness.server.post("/api/v1/funds/search").json(&json!({})).await;
    assert!(before.json::<Value>().as_array().unwrap().is_empty());

    let workbook = WorkbookBuilder::report()
        .sheet_row(&RowFixtures::dlz())
        .sheet_row(&RowFixtures::uhs())
        .sheet_row(&RowFixtures::blank_code(4))
        .build();
    let form = MultipartForm::new().add_part("file", Part::bytes(workbook).file_name("funds.xlsx"));

    let response = harness.server.post("/api/v1/funds/upload").multipart(form).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["report"]["rowsRead"], 3);
    assert_eq!(body["report"]["rowsWithoutCode"], 1);
    assert_eq!(body["report"]["accepted"], 2);
    assert_eq!(body["report"]["persisted"], 2);
    assert_eq!(body["report"]["indexed"], 2);
    assert!(body["message"].as_str().unwrap().starts_with("File processed successfully"));

    let after = harness.server.post("/api/v1/funds/search").json(&json!({})).await;
    let body = after.json::<Value>();
    let mut found = codes(&body);
    found.sort();
    assert_eq!(found, vec!["DLZ", "UHS"]);
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let config = ApiConfig {
        max_upload_bytes: 64,
        ..Default::default()
    };
    let harness = harness_with(InMemoryFundStore::new(), InMemoryFundIndex::new(), config).await;
    let form = MultipartForm::new().add_part("file", Part::bytes(vec![0u8; 4096]).file_name("funds.xlsx"));

    let response = harness.server.post("/api/v1/funds/upload").multipart(form).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_request_id_is_echoed() {
    let harness = indexed_harness().await;

    let response = harness
        .server
        .post("/api/v1/funds/cache/clear")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static("req-42"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), "req-42");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let harness = indexed_harness().await;

    let response = harness.server.post("/api/v1/funds/cache/clear").await;

    let id = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_health_responses_carry_a_request_id() {
    let harness = indexed_harness().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    assert!(!response.header("x-request-id").is_empty());
}
