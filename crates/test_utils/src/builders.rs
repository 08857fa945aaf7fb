//! Test Data Builders
//!
//! Builders that let a test set only the fields it cares about.

use core_kernel::FundCode;
use domain_fund::{CellValue, FundField, FundRecord, SheetRow};
use rust_decimal::Decimal;

use crate::fixtures::EQUITY_UMBRELLA;

/// Builder for fund records
pub struct FundRecordBuilder {
    record: FundRecord,
}

impl FundRecordBuilder {
    /// Starts a record with the given code and default name and umbrella
    ///
    /// # Panics
    ///
    /// Panics if `code` is blank
    pub fn new(code: &str) -> Self {
        let fund_code = FundCode::parse(code).unwrap_or_else(|e| panic!("{}", e));
        Self {
            record: FundRecord::new(fund_code, format!("{} Fonu", code), EQUITY_UMBRELLA),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.fund_name = name.to_string();
        self
    }

    pub fn umbrella(mut self, umbrella: &str) -> Self {
        self.record.umbrella_type = umbrella.to_string();
        self
    }

    /// Sets a return metric; the value is rescaled to four digits
    pub fn return_value(mut self, field: FundField, value: Decimal) -> Self {
        self.record.set_return(field, Some(value));
        self
    }

    pub fn one_year(self, value: Decimal) -> Self {
        self.return_value(FundField::Return1Year, value)
    }

    pub fn build(self) -> FundRecord {
        self.record
    }
}

/// Builder for raw sheet rows
///
/// Cells default to empty; setting a cell beyond the current length pads
/// the row.
pub struct RowBuilder {
    index: usize,
    cells: Vec<CellValue>,
}

impl RowBuilder {
    /// Starts a row at the given zero-based sheet index
    pub fn new(index: usize) -> Self {
        Self {
            index,
            cells: Vec::new(),
        }
    }

    /// Sets the cell of a field
    pub fn cell(mut self, field: FundField, value: impl Into<CellValue>) -> Self {
        let column = field.column();
        if self.cells.len() <= column {
            self.cells.resize(column + 1, CellValue::Empty);
        }
        self.cells[column] = value.into();
        self
    }

    pub fn code(self, code: &str) -> Self {
        self.cell(FundField::FundCode, code)
    }

    pub fn name(self, name: &str) -> Self {
        self.cell(FundField::FundName, name)
    }

    pub fn build(self) -> SheetRow {
        SheetRow::new(self.index, self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_builder_rescales() {
        let record = FundRecordBuilder::new("DLZ").one_year(dec!(1.5)).build();
        assert_eq!(record.return_1_year.map(|v| v.scale()), Some(4));
    }

    #[test]
    fn test_row_builder_pads_cells() {
        let row = RowBuilder::new(7)
            .code("DLZ")
            .cell(FundField::Return1Year, "75,71")
            .build();

        assert_eq!(row.index, 7);
        assert_eq!(row.cells.len(), FundField::Return1Year.column() + 1);
        assert_eq!(row.cells[1], CellValue::Empty);
    }
}
