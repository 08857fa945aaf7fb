//! Spreadsheet cell values
//!
//! A format-independent view of one spreadsheet cell. The workbook reader
//! converts engine-specific cells into `CellValue`, so row parsing can be
//! tested without building workbooks.

use std::fmt;

/// The content of one spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank or missing cell
    Empty,
    /// String cell, untrimmed
    Text(String),
    /// Floating-point numeric cell (also dates as serial numbers)
    Number(f64),
    /// Integer numeric cell
    Integer(i64),
    /// Boolean cell
    Bool(bool),
    /// Spreadsheet error value such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// Creates a text cell
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Returns true for spreadsheet error values
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Renders the cell as trimmed text
    ///
    /// Numbers use the shortest decimal text that reads back to the same
    /// value (`0.1` stays `"0.1"`, `42.0` becomes `"42"`), so no binary
    /// floating-point artifacts leak into the output.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(value) => value.trim().to_string(),
            CellValue::Number(value) => number_to_text(*value),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Error(value) => value.trim().to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

/// Lossless number-to-text conversion
///
/// `f64`'s `Display` prints the shortest round-trip representation and never
/// uses exponent notation, which is exactly what a decimal parser needs.
pub(crate) fn number_to_text(value: f64) -> String {
    if value == 0.0 {
        // Avoids "-0"
        return "0".to_string();
    }
    value.to_string()
}
