//! Fund domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the fund domain
///
/// Row-level parse failures and index write failures are not errors: they
/// are collected in the `IngestionReport` and never abort a call.
#[derive(Debug, Error)]
pub enum FundError {
    /// The ingestion source is empty or not a readable workbook
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upserting a batch into the primary store failed
    ///
    /// Batches before `batch` stay committed; `persisted` counts their records.
    #[error("Primary store write failed on batch {batch} after {persisted} records were persisted: {source}")]
    PrimaryStoreWriteFailed {
        batch: usize,
        persisted: usize,
        #[source]
        source: PortError,
    },

    /// Reading the primary store for a resync failed
    #[error("Primary store read failed: {0}")]
    PrimaryStoreReadFailed(#[source] PortError),

    /// The search engine rejected or failed the query
    #[error("Failed to execute search operation: {0}")]
    SearchExecutionFailed(#[source] PortError),

    /// The search request cannot be turned into a query
    #[error("Invalid search request: {0}")]
    InvalidSearchRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FundError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        FundError::InvalidInput(message.into())
    }

    pub fn invalid_search(message: impl Into<String>) -> Self {
        FundError::InvalidSearchRequest(message.into())
    }

    /// Number of records durably saved before the failure, when known
    pub fn persisted_before_failure(&self) -> Option<usize> {
        match self {
            FundError::PrimaryStoreWriteFailed { persisted, .. } => Some(*persisted),
            FundError::InvalidInput(_) => Some(0),
            _ => None,
        }
    }
}
