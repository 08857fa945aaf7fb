//! Core Kernel - Foundational types for the fund search service
//!
//! This crate provides the building blocks shared by the domain, the
//! infrastructure adapters and the HTTP layer:
//! - `FundCode`, the natural identifier of a fund in every store
//! - Fixed-scale decimal helpers for reported returns
//! - Port infrastructure for the hexagonal architecture

pub mod decimal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use decimal::{checked_scale, parse_decimal, scale_half_up, RETURN_INTEGER_DIGITS, RETURN_SCALE};
pub use identifiers::FundCode;
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use error::CoreError;
