//! Domain Adapters
//!
//! Implementations of the fund domain's ports on the PostgreSQL layer.

pub mod fund;

pub use fund::PostgresFundStore;
