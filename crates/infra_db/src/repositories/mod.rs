//! Repository implementations
//!
//! Repositories hold the SQL and map between database rows and domain types.
//! Queries are built at runtime (`query_as` + `FromRow`), so the crate builds
//! without a live database.

pub mod fund;

pub use fund::{FundRepository, FundRow};
