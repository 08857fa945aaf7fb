//! Test Utilities Crate
//!
//! Shared test infrastructure for the fund search workspace.
//!
//! # Modules
//!
//! - `fixtures`: Known funds and sheet rows
//! - `builders`: Builders for records and sheet rows
//! - `database`: PostgreSQL test containers
//! - `assertions`: Assertions on scaled returns and records
//! - `generators`: Proptest strategies and fake data
//! - `workbook`: In-memory xlsx workbooks

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;
pub mod workbook;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
pub use workbook::*;
