//! Infrastructure Database Layer
//!
//! The PostgreSQL primary store for fund records, built on SQLx. It is the
//! source of truth of the service; the search index is rebuilt from it.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresFundStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/funds")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresFundStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresFundStore;
pub use error::DatabaseError;
pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool, DEFAULT_DATABASE_URL};
pub use repositories::{FundRepository, FundRow};
