//! Strongly-typed identifiers for domain entities
//!
//! A fund is identified by its short report code (e.g. `"DLZ"`). The code is
//! the primary key in the relational store and the document id in the search
//! index, so a blank code must never be representable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Natural identifier of a fund
///
/// Always trimmed and never blank. Construct with [`FundCode::parse`] or via
/// `FromStr`/`TryFrom<String>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FundCode(String);

impl FundCode {
    /// Parses a fund code, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the code is empty after trimming
    pub fn parse(value: impl AsRef<str>) -> Result<Self, CoreError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("Fund code must not be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier and returns the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FundCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FundCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FundCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FundCode> for String {
    fn from(code: FundCode) -> String {
        code.0
    }
}

impl AsRef<str> for FundCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
