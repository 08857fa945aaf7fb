//! Workbook reading
//!
//! Reads the first worksheet of an xlsx/xls/ods workbook held in memory and
//! returns its data rows as `CellValue`s. The first two sheet rows are report
//! headers and are never returned.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::debug;

use crate::cell::CellValue;
use crate::document::FundField;
use crate::error::FundError;

/// First sheet row (zero-based) holding fund data
pub const DATA_START_ROW: u32 = 2;

/// One data row of the worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// Zero-based row index within the sheet
    pub index: usize,
    /// Cells in column order, starting at column A
    pub cells: Vec<CellValue>,
}

impl SheetRow {
    pub fn new(index: usize, cells: Vec<CellValue>) -> Self {
        Self { index, cells }
    }
}

/// Reads the data rows of the first worksheet
///
/// Rows and columns are addressed by their absolute sheet position, so a
/// sheet whose used range starts below row 1 or right of column A still maps
/// column A to the fund code.
///
/// # Errors
///
/// Returns `FundError::InvalidInput` if the bytes are empty, are not a
/// readable workbook, or the workbook has no worksheet.
pub fn read_data_rows(bytes: &[u8]) -> Result<Vec<SheetRow>, FundError> {
    if bytes.is_empty() {
        return Err(FundError::invalid_input("Uploaded file is empty."));
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| FundError::invalid_input(format!("Failed to read the workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FundError::invalid_input("Workbook has no worksheet"))?
        .map_err(|e| FundError::invalid_input(format!("Failed to read the first worksheet: {}", e)))?;

    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        debug!("First worksheet is empty");
        return Ok(Vec::new());
    };

    let column_count = FundField::ALL.len() as u32;
    let rows = (DATA_START_ROW.max(first_row)..=last_row)
        .map(|row| {
            let cells = (0..column_count)
                .map(|column| {
                    range
                        .get_value((row, column))
                        .map(CellValue::from)
                        .unwrap_or(CellValue::Empty)
                })
                .collect();
            SheetRow::new(row as usize, cells)
        })
        .collect::<Vec<_>>();

    debug!(rows = rows.len(), "Read worksheet data rows");
    Ok(rows)
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(value) => CellValue::Text(value.clone()),
            Data::Float(value) => CellValue::Number(*value),
            Data::Int(value) => CellValue::Integer(*value),
            Data::Bool(value) => CellValue::Bool(*value),
            Data::DateTime(value) => CellValue::Number(value.as_f64()),
            Data::DateTimeIso(value) | Data::DurationIso(value) => CellValue::Text(value.clone()),
            Data::Error(error) => CellValue::Error(error.to_string()),
        }
    }
}
