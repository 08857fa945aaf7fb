//! Ingestion pipeline tests against in-memory ports

use std::sync::Arc;

use rust_decimal_macros::dec;

use domain_fund::{
    CellValue, FundError, FundField, FundSearchIndex, FundStore, InMemoryFundIndex,
    InMemoryFundStore, IngestionPipeline, SearchRequest, SheetRow, BATCH_SIZE,
};

fn row(index: usize, code: &str, name: &str, one_year: &str) -> SheetRow {
    let mut cells = vec![CellValue::Empty; FundField::ALL.len()];
    cells[FundField::FundCode.column()] = CellValue::text(code);
    cells[FundField::FundName.column()] = CellValue::text(name);
    cells[FundField::UmbrellaType.column()] = CellValue::text("Hisse Senedi Şemsiye Fonu");
    cells[FundField::Return1Year.column()] = CellValue::text(one_year);
    SheetRow::new(index, cells)
}

fn numbered_rows(count: usize) -> Vec<SheetRow> {
    (0..count)
        .map(|i| row(i + 2, &format!("F{:03}", i), &format!("Fund {}", i), "1,0"))
        .collect()
}

fn pipeline(
    store: &Arc<InMemoryFundStore>,
    index: &Arc<InMemoryFundIndex>,
) -> IngestionPipeline {
    IngestionPipeline::new(store.clone(), index.clone())
}

// ============================================================================
// Happy path
// ============================================================================

mod happy_path_tests {
    use super::*;

    #[tokio::test]
    async fn test_valid_rows_reach_both_stores_and_blank_code_is_dropped() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());

        let rows = vec![
            row(2, "DLZ", "Deniz Portföy Hisse", "75,71"),
            row(3, "   ", "Nameless", "1,0"),
            row(4, "UHS", "Ünlü Portföy Hisse", "%12,5"),
        ];

        let report = pipeline(&store, &index).ingest_rows(rows).await.unwrap();

        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_without_code, 1);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.persisted, 2);
        assert_eq!(report.indexed, 2);
        assert!(report.is_consistent());

        assert_eq!(store.len().await, 2);
        assert_eq!(index.len().await, 2);
        assert_eq!(
            store.get("DLZ").await.unwrap().return_1_year,
            Some(dec!(75.7100))
        );
        assert_eq!(
            index.get("UHS").await.unwrap().return_1_year,
            Some(dec!(12.5000))
        );
    }

    #[tokio::test]
    async fn test_reingesting_a_code_replaces_the_stored_values() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());
        let pipeline = pipeline(&store, &index);

        pipeline
            .ingest_rows(vec![row(2, "DLZ", "Old name", "1,0")])
            .await
            .unwrap();
        pipeline
            .ingest_rows(vec![row(2, "DLZ", "New name", "2,0")])
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.get("DLZ").await.unwrap();
        assert_eq!(stored.fund_name, "New name");
        assert_eq!(stored.return_1_year, Some(dec!(2.0000)));
        assert_eq!(index.get("DLZ").await.unwrap().fund_name, "New name");
    }

    #[tokio::test]
    async fn test_records_are_written_in_batches_of_five_hundred() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());

        let report = pipeline(&store, &index)
            .ingest_rows(numbered_rows(BATCH_SIZE * 2 + 1))
            .await
            .unwrap();

        assert_eq!(report.persisted, 1001);
        assert_eq!(store.save_calls(), 3);
        assert_eq!(index.save_calls(), 3);
    }

    #[tokio::test]
    async fn test_malformed_row_does_not_abort_the_sheet() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());

        let mut broken = row(3, "BRK", "Broken", "1,0");
        broken.cells[FundField::Return3Year.column()] = CellValue::Error("#VALUE!".into());

        let report = pipeline(&store, &index)
            .ingest_rows(vec![row(2, "DLZ", "Deniz", "1,0"), broken])
            .await
            .unwrap();

        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.persisted, 1);
        assert!(store.get("BRK").await.is_none());
    }

    #[tokio::test]
    async fn test_report_counts_each_kind_of_dropped_row() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());

        let mut broken = row(3, "BRK", "Broken", "1,0");
        broken.cells[FundField::Return5Year.column()] = CellValue::Error("#DIV/0!".into());

        let rows = vec![
            row(2, "DLZ", "Deniz", "1,0"),
            broken,
            row(4, "", "Nameless", "1,0"),
            row(5, "DLZ", "Deniz again", "3,0"),
            row(6, "UHS", "Ünlü", "2,0"),
        ];

        let report = pipeline(&store, &index).ingest_rows(rows).await.unwrap();

        assert_eq!(report.rows_read, 5);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.rows_without_code, 1);
        assert_eq!(report.duplicates_collapsed, 1);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.persisted, 2);
        assert_eq!(store.get("DLZ").await.unwrap().fund_name, "Deniz again");
    }
}

// ============================================================================
// Failure isolation
// ============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_store_failure_on_second_batch_keeps_first_batch() {
        let store = Arc::new(InMemoryFundStore::new().failing_on_save_call(2));
        let index = Arc::new(InMemoryFundIndex::new());

        let result = pipeline(&store, &index)
            .with_batch_size(2)
            .ingest_rows(numbered_rows(6))
            .await;

        match result {
            Err(FundError::PrimaryStoreWriteFailed { batch, persisted, .. }) => {
                assert_eq!(batch, 2);
                assert_eq!(persisted, 2);
            }
            other => panic!("expected PrimaryStoreWriteFailed, got {:?}", other),
        }

        assert_eq!(store.len().await, 2);
        assert_eq!(index.len().await, 2);
        assert!(store.get("F000").await.is_some());
        assert!(store.get("F004").await.is_none());
        assert_eq!(store.save_calls(), 2);
    }

    #[tokio::test]
    async fn test_index_failure_is_reported_and_run_continues() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new().failing_on_save_calls([2]));

        let report = pipeline(&store, &index)
            .with_batch_size(2)
            .ingest_rows(numbered_rows(5))
            .await
            .unwrap();

        assert_eq!(report.persisted, 5);
        assert_eq!(report.indexed, 3);
        assert_eq!(report.index_failures.len(), 1);
        assert_eq!(report.index_failures[0].batch, 2);
        assert_eq!(report.index_failures[0].size, 2);
        assert!(!report.is_consistent());

        assert_eq!(store.len().await, 5);
        assert!(index.get("F002").await.is_none());
        assert!(index.get("F004").await.is_some());
    }

    #[tokio::test]
    async fn test_empty_upload_creates_no_state() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());

        let result = pipeline(&store, &index).ingest_workbook(Vec::new()).await;

        assert!(matches!(result, Err(FundError::InvalidInput(_))));
        assert_eq!(store.save_calls(), 0);
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn test_unreadable_workbook_is_invalid_input() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());

        let result = pipeline(&store, &index)
            .ingest_workbook(b"not a workbook".to_vec())
            .await;

        assert!(matches!(result, Err(FundError::InvalidInput(_))));
        assert!(store.is_empty().await);
    }
}

// ============================================================================
// Resync
// ============================================================================

mod resync_tests {
    use super::*;

    #[tokio::test]
    async fn test_resync_repairs_missed_index_batches() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new().failing_on_save_calls([1]));
        let pipeline = pipeline(&store, &index).with_batch_size(2);

        let report = pipeline.ingest_rows(numbered_rows(4)).await.unwrap();
        assert_eq!(report.indexed, 2);

        let resync = pipeline.full_resync().await.unwrap();

        assert_eq!(resync.total, 4);
        assert_eq!(resync.indexed, 4);
        assert!(resync.failed_batches.is_empty());
        assert_eq!(index.len().await, 4);

        let hits = index
            .search(&domain_fund::QueryBuilder::build(&SearchRequest::default().with_page(1, 50)).unwrap())
            .await
            .unwrap();
        assert_eq!(hits.total, 4);
    }

    #[tokio::test]
    async fn test_resync_store_read_failure() {
        let store = Arc::new(InMemoryFundStore::new().failing_reads());
        let index = Arc::new(InMemoryFundIndex::new());

        let result = pipeline(&store, &index).full_resync().await;

        assert!(matches!(result, Err(FundError::PrimaryStoreReadFailed(_))));
    }

    #[tokio::test]
    async fn test_resync_of_empty_store_is_a_no_op() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());

        let resync = pipeline(&store, &index).full_resync().await.unwrap();

        assert_eq!(resync.total, 0);
        assert_eq!(index.save_calls(), 0);
    }
}
