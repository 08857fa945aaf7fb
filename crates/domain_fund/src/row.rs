//! Row parsing
//!
//! Maps one spreadsheet row (fund code, fund name, umbrella type, then seven
//! return metrics) into a `FundRecord`. A bad row is never fatal: it becomes
//! a `RowParseSkipped` value and the caller moves on.

use std::fmt;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use core_kernel::FundCode;

use crate::cell::CellValue;
use crate::document::FundField;
use crate::fund::FundRecord;
use crate::spreadsheet::SheetRow;

/// Why a row was not turned into a record
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The fund code cell is missing or blank
    BlankFundCode,
    /// A cell could not be extracted
    Malformed {
        field: FundField,
        message: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BlankFundCode => f.write_str("blank fund code"),
            SkipReason::Malformed { field, message } => write!(f, "{}: {}", field, message),
        }
    }
}

/// A row that was dropped during parsing
#[derive(Debug, Clone, PartialEq)]
pub struct RowParseSkipped {
    /// Zero-based sheet row index
    pub row: usize,
    pub reason: SkipReason,
}

impl RowParseSkipped {
    /// True when the row was dropped only for lacking a fund code
    pub fn is_blank_code(&self) -> bool {
        self.reason == SkipReason::BlankFundCode
    }
}

/// Outcome of parsing a whole sheet
#[derive(Debug, Clone, Default)]
pub struct ParsedRows {
    /// Accepted records, in sheet order
    pub records: Vec<FundRecord>,
    /// Rows that were dropped, in sheet order
    pub skipped: Vec<RowParseSkipped>,
}

impl ParsedRows {
    /// Rows dropped because a cell could not be extracted
    pub fn malformed(&self) -> usize {
        self.skipped.iter().filter(|s| !s.is_blank_code()).count()
    }

    /// Rows dropped because they had no fund code
    pub fn without_code(&self) -> usize {
        self.skipped.iter().filter(|s| s.is_blank_code()).count()
    }
}

/// Parser for fund report rows
pub struct RowParser;

impl RowParser {
    /// Parses a single row
    ///
    /// Missing trailing cells read as empty text or absent numbers. A cell
    /// holding a spreadsheet error value makes the row malformed. A row whose
    /// fund code is blank after trimming is rejected with
    /// `SkipReason::BlankFundCode`.
    ///
    /// # Arguments
    ///
    /// * `row` - Zero-based sheet row index, used for reporting
    /// * `cells` - Cells in column order
    pub fn parse(row: usize, cells: &[CellValue]) -> Result<FundRecord, RowParseSkipped> {
        Self::extract(cells).map_err(|reason| RowParseSkipped { row, reason })
    }

    /// Parses every row, collecting accepted records and skipped rows
    ///
    /// Malformed rows are logged with their index; rows without a fund code
    /// are only counted.
    pub fn parse_all(rows: &[SheetRow]) -> ParsedRows {
        let mut parsed = ParsedRows::default();

        for row in rows {
            match Self::parse(row.index, &row.cells) {
                Ok(record) => parsed.records.push(record),
                Err(skipped) => {
                    if skipped.is_blank_code() {
                        debug!(row = skipped.row, "Row without fund code dropped");
                    } else {
                        warn!(row = skipped.row, reason = %skipped.reason, "Row parse error, row skipped");
                    }
                    parsed.skipped.push(skipped);
                }
            }
        }

        parsed
    }

    fn extract(cells: &[CellValue]) -> Result<FundRecord, SkipReason> {
        let fund_code = text_at(cells, FundField::FundCode)?;
        let fund_name = text_at(cells, FundField::FundName)?;
        let umbrella_type = text_at(cells, FundField::UmbrellaType)?;

        let mut returns = Vec::with_capacity(FundField::RETURNS.len());
        for field in FundField::RETURNS {
            returns.push((field, decimal_at(cells, field)?));
        }

        let fund_code = FundCode::parse(fund_code).map_err(|_| SkipReason::BlankFundCode)?;
        let mut record = FundRecord::new(fund_code, fund_name, umbrella_type);
        for (field, value) in returns {
            record.set_return(field, value);
        }
        Ok(record)
    }
}

fn cell_at(cells: &[CellValue], field: FundField) -> Result<Option<&CellValue>, SkipReason> {
    match cells.get(field.column()) {
        Some(CellValue::Error(value)) => Err(SkipReason::Malformed {
            field,
            message: format!("cell holds error value {}", value),
        }),
        cell => Ok(cell),
    }
}

fn text_at(cells: &[CellValue], field: FundField) -> Result<String, SkipReason> {
    Ok(cell_at(cells, field)?.map(CellValue::to_text).unwrap_or_default())
}

fn decimal_at(cells: &[CellValue], field: FundField) -> Result<Option<Decimal>, SkipReason> {
    Ok(cell_at(cells, field)?.and_then(crate::numeric::normalize_cell))
}
