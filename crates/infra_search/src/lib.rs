//! Infrastructure Search Layer
//!
//! The Elasticsearch search index for fund documents. The index is a
//! denormalized projection of the primary store; every write here is
//! best-effort and can be rebuilt with a full resync.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_search::{ElasticsearchFundIndex, SearchConfig};
//!
//! let index = ElasticsearchFundIndex::new(SearchConfig::new("http://localhost:9200", "funds"))?;
//! index.ensure_index().await?;
//! ```

pub mod client;
pub mod config;
pub mod dsl;
pub mod error;

pub use client::ElasticsearchFundIndex;
pub use config::SearchConfig;
pub use dsl::{index_mapping, render_query};
pub use error::SearchEngineError;
