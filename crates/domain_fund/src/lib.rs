//! Fund Domain
//!
//! This crate implements the fund search service core: turning spreadsheet
//! reports into validated fund records, writing them to the primary store and
//! the search index, and building search-engine queries from structured
//! search requests.
//!
//! # Key Concepts
//!
//! - **FundRecord**: The canonical fund entity, keyed by its fund code
//! - **FundDocument**: The search-index projection of a record
//! - **IngestionPipeline**: Parse, validate, batch, and dual-write records
//! - **QueryBuilder**: Turn a `SearchRequest` into a `FundQuery`
//!
//! # Consistency
//!
//! The primary store is the source of truth. Index writes are best-effort:
//! a failed index batch is reported and left for the next full resync.

pub mod cell;
pub mod document;
pub mod error;
pub mod fund;
pub mod ingestion;
pub mod numeric;
pub mod ports;
pub mod query;
pub mod row;
pub mod search;
pub mod search_service;
pub mod spreadsheet;

pub use cell::CellValue;
pub use document::{FieldKind, FundDocument, FundField};
pub use error::FundError;
pub use fund::FundRecord;
pub use ingestion::{IndexWriteFailed, IngestionPipeline, IngestionReport, ResyncReport, BATCH_SIZE};
pub use numeric::{normalize_cell, normalize_text, sanitize_number_string};
pub use ports::{FundSearchIndex, FundStore, SearchCache, SearchHits};
pub use query::{Criterion, FundQuery, PageRequest, QueryBuilder, SortOrder};
pub use row::{ParsedRows, RowParseSkipped, RowParser, SkipReason};
pub use search::{Filter, Pagination, SearchRequest, SortDirection, Sorting};
pub use search_service::FundSearchService;
pub use spreadsheet::{read_data_rows, SheetRow, DATA_START_ROW};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{InMemoryFundIndex, InMemoryFundStore, RecordingSearchCache};
