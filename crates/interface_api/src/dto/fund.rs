//! Fund endpoint DTOs
//!
//! Search takes a `domain_fund::SearchRequest` and returns `FundDocument`s
//! as they are; only the write endpoints need their own bodies.

use serde::{Deserialize, Serialize};

use domain_fund::{IngestionReport, ResyncReport};

/// Response to a spreadsheet upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub report: IngestionReport,
}

impl UploadResponse {
    pub fn new(report: IngestionReport) -> Self {
        let message = if report.index_failures.is_empty() {
            "File processed successfully. Database and search index have been updated.".to_string()
        } else {
            format!(
                "File processed. Database updated; {} search index batch(es) failed and will be repaired by the next sync.",
                report.index_failures.len()
            )
        };
        Self { message, report }
    }
}

/// Response to a full index resync
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub message: String,
    pub report: ResyncReport,
}

impl SyncResponse {
    pub fn new(report: ResyncReport) -> Self {
        Self {
            message: "Full synchronization completed and cache cleared.".to_string(),
            report,
        }
    }
}

/// Plain acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
