//! Ingestion and dual-write pipeline
//!
//! Turns a workbook into fund records and writes them, batch by batch, to
//! the primary store and then to the search index.
//!
//! # Failure isolation
//!
//! - A malformed row is dropped and counted; the rest of the sheet goes on.
//! - A primary store failure stops the run. Earlier batches stay committed.
//! - An index failure is recorded in the report and the run continues. The
//!   records it missed are only in the primary store until the next resync.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::document::FundDocument;
use crate::error::FundError;
use crate::fund::FundRecord;
use crate::ports::{FundSearchIndex, FundStore};
use crate::row::{ParsedRows, RowParser};
use crate::spreadsheet::{read_data_rows, SheetRow};

/// Records written per primary store transaction and per index bulk request
pub const BATCH_SIZE: usize = 500;

/// A batch the search index did not accept
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexWriteFailed {
    /// One-based batch number
    pub batch: usize,
    /// Number of documents in the batch
    pub size: usize,
    pub message: String,
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport {
    /// Data rows read from the sheet
    pub rows_read: usize,
    /// Rows dropped because a cell could not be extracted
    pub rows_skipped: usize,
    /// Rows dropped because they had no fund code
    pub rows_without_code: usize,
    /// Rows folded into an earlier row with the same fund code
    pub duplicates_collapsed: usize,
    /// Distinct records that went to the write phase
    pub accepted: usize,
    /// Records committed to the primary store
    pub persisted: usize,
    /// Records accepted by the search index
    pub indexed: usize,
    pub index_failures: Vec<IndexWriteFailed>,
}

impl IngestionReport {
    /// True when every persisted record also reached the index
    pub fn is_consistent(&self) -> bool {
        self.index_failures.is_empty() && self.indexed == self.persisted
    }
}

/// Outcome of a full resync
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResyncReport {
    /// Records read from the primary store
    pub total: usize,
    /// Documents accepted by the index
    pub indexed: usize,
    pub failed_batches: Vec<IndexWriteFailed>,
}

/// Parses workbooks and dual-writes their records
///
/// The pipeline does not serialize concurrent runs itself; callers that can
/// run ingestion and resync at the same time must hold a writer lock.
pub struct IngestionPipeline {
    store: Arc<dyn FundStore>,
    index: Arc<dyn FundSearchIndex>,
    batch_size: usize,
}

impl IngestionPipeline {
    /// Creates a pipeline writing batches of [`BATCH_SIZE`]
    pub fn new(store: Arc<dyn FundStore>, index: Arc<dyn FundSearchIndex>) -> Self {
        Self {
            store,
            index,
            batch_size: BATCH_SIZE,
        }
    }

    /// Overrides the batch size; zero is treated as one
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Ingests an uploaded workbook
    ///
    /// # Errors
    ///
    /// - `FundError::InvalidInput` if the bytes are empty or not a workbook;
    ///   nothing is written in that case
    /// - `FundError::PrimaryStoreWriteFailed` if a batch cannot be committed
    pub async fn ingest_workbook(&self, bytes: Vec<u8>) -> Result<IngestionReport, FundError> {
        if bytes.is_empty() {
            return Err(FundError::invalid_input("Uploaded file is empty."));
        }

        let rows = tokio::task::spawn_blocking(move || read_data_rows(&bytes))
            .await
            .map_err(|e| FundError::Internal(format!("Workbook parsing task failed: {}", e)))??;

        self.ingest_rows(rows).await
    }

    /// Ingests rows that were already read from a sheet
    pub async fn ingest_rows(&self, rows: Vec<SheetRow>) -> Result<IngestionReport, FundError> {
        let parsed = RowParser::parse_all(&rows);
        let rows_skipped = parsed.malformed();
        let rows_without_code = parsed.without_code();
        let ParsedRows { records, .. } = parsed;
        let parsed_count = records.len();
        let records = collapse_duplicates(records);

        let mut report = IngestionReport {
            rows_read: rows.len(),
            rows_skipped,
            rows_without_code,
            duplicates_collapsed: parsed_count - records.len(),
            accepted: records.len(),
            ..Default::default()
        };

        if records.is_empty() {
            warn!(rows = report.rows_read, "No valid fund records found in the workbook");
            return Ok(report);
        }

        let batches = records.len().div_ceil(self.batch_size);
        let mut records = records.into_iter();

        for batch in 1..=batches {
            let chunk: Vec<FundRecord> = records.by_ref().take(self.batch_size).collect();
            let size = chunk.len();

            let saved = self.store.save_all(chunk).await.map_err(|source| {
                error!(
                    batch,
                    size,
                    persisted = report.persisted,
                    error = %source,
                    "Primary store write failed, aborting ingestion"
                );
                FundError::PrimaryStoreWriteFailed {
                    batch,
                    persisted: report.persisted,
                    source,
                }
            })?;
            report.persisted += saved.len();

            match self.index_batch(batch, &saved).await {
                Ok(indexed) => report.indexed += indexed,
                Err(failure) => report.index_failures.push(failure),
            }

            debug!(batch, of = batches, size, "Batch written");
        }

        info!(
            persisted = report.persisted,
            indexed = report.indexed,
            skipped = report.rows_skipped,
            index_failures = report.index_failures.len(),
            "Fund ingestion finished"
        );
        Ok(report)
    }

    /// Loads the seed workbook once at startup
    ///
    /// Never fails: a missing seed is a warning, an unreadable seed or a
    /// failed load is logged as an error, and the service starts regardless.
    pub async fn initialize_from_seed(&self, path: &Path) -> Option<IngestionReport> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Seed workbook not found, starting with an empty store");
                return None;
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read seed workbook");
                return None;
            }
        };

        info!(path = %path.display(), "Loading seed workbook");
        match self.ingest_workbook(bytes).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Seed load failed");
                None
            }
        }
    }

    /// Re-projects the whole primary store into the search index
    ///
    /// # Errors
    ///
    /// Returns `FundError::PrimaryStoreReadFailed` if the store cannot be read.
    /// Index failures are reported per batch.
    pub async fn full_resync(&self) -> Result<ResyncReport, FundError> {
        let records = self
            .store
            .find_all()
            .await
            .map_err(FundError::PrimaryStoreReadFailed)?;

        let mut report = ResyncReport {
            total: records.len(),
            ..Default::default()
        };

        for (position, chunk) in records.chunks(self.batch_size).enumerate() {
            match self.index_batch(position + 1, chunk).await {
                Ok(indexed) => report.indexed += indexed,
                Err(failure) => report.failed_batches.push(failure),
            }
        }

        info!(
            total = report.total,
            indexed = report.indexed,
            failed_batches = report.failed_batches.len(),
            "Search index resync finished"
        );
        Ok(report)
    }

    async fn index_batch(&self, batch: usize, records: &[FundRecord]) -> Result<usize, IndexWriteFailed> {
        let documents: Vec<FundDocument> = records.iter().map(FundDocument::from).collect();
        let size = documents.len();

        self.index.save_all(documents).await.map(|_| size).map_err(|e| {
            error!(batch, size, error = %e, "Search index write failed, batch left for resync");
            IndexWriteFailed {
                batch,
                size,
                message: e.to_string(),
            }
        })
    }
}

/// Keeps one record per fund code: the last values at the first position
fn collapse_duplicates(records: Vec<FundRecord>) -> Vec<FundRecord> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<FundRecord> = Vec::with_capacity(records.len());

    for record in records {
        match positions.get(record.fund_code.as_str()) {
            Some(&position) => {
                debug!(fund_code = %record.fund_code, "Duplicate fund code, later row wins");
                unique[position] = record;
            }
            None => {
                positions.insert(record.fund_code.to_string(), unique.len());
                unique.push(record);
            }
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::document::FundField;
    use crate::ports::mock::{InMemoryFundIndex, InMemoryFundStore};
    use rust_decimal_macros::dec;

    fn row(index: usize, code: &str, one_year: &str) -> SheetRow {
        let mut cells = vec![CellValue::Empty; FundField::ALL.len()];
        cells[0] = CellValue::text(code);
        cells[1] = CellValue::text(format!("{} Fonu", code));
        cells[2] = CellValue::text("Hisse Senedi Şemsiye Fonu");
        cells[FundField::Return1Year.column()] = CellValue::text(one_year);
        SheetRow::new(index, cells)
    }

    #[test]
    fn test_collapse_keeps_first_position_last_values() {
        let first = FundRecord::new("AAA".parse().unwrap(), "first", "");
        let other = FundRecord::new("BBB".parse().unwrap(), "other", "");
        let last = FundRecord::new("AAA".parse().unwrap(), "last", "");

        let unique = collapse_duplicates(vec![first, other, last]);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].fund_code.as_str(), "AAA");
        assert_eq!(unique[0].fund_name, "last");
        assert_eq!(unique[1].fund_code.as_str(), "BBB");
    }

    #[tokio::test]
    async fn test_rows_without_records_are_a_no_op() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());
        let pipeline = IngestionPipeline::new(store.clone(), index.clone());

        let report = pipeline.ingest_rows(vec![row(2, "", "1,0")]).await.unwrap();

        assert_eq!(report.rows_without_code, 1);
        assert_eq!(report.persisted, 0);
        assert_eq!(store.save_calls(), 0);
        assert_eq!(index.save_calls(), 0);
    }

    #[tokio::test]
    async fn test_duplicates_are_counted() {
        let store = Arc::new(InMemoryFundStore::new());
        let index = Arc::new(InMemoryFundIndex::new());
        let pipeline = IngestionPipeline::new(store.clone(), index);

        let report = pipeline
            .ingest_rows(vec![row(2, "DLZ", "1,0"), row(3, "DLZ", "2,5")])
            .await
            .unwrap();

        assert_eq!(report.duplicates_collapsed, 1);
        assert_eq!(report.persisted, 1);
        assert_eq!(
            store.get("DLZ").await.unwrap().return_1_year,
            Some(dec!(2.5000))
        );
    }

    #[tokio::test]
    async fn test_empty_workbook_bytes_rejected() {
        let pipeline = IngestionPipeline::new(
            Arc::new(InMemoryFundStore::new()),
            Arc::new(InMemoryFundIndex::new()),
        );

        let result = pipeline.ingest_workbook(Vec::new()).await;
        assert!(matches!(result, Err(FundError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_seed_is_skipped() {
        let pipeline = IngestionPipeline::new(
            Arc::new(InMemoryFundStore::new()),
            Arc::new(InMemoryFundIndex::new()),
        );

        let report = pipeline
            .initialize_from_seed(Path::new("/nonexistent/funds_data.xlsx"))
            .await;
        assert!(report.is_none());
    }
}
