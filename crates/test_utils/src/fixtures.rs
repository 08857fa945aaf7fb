//! Pre-built Test Fixtures
//!
//! Known funds taken from a typical monthly returns report, as records and
//! as the raw sheet rows that produce them.

use core_kernel::FundCode;
use domain_fund::{CellValue, FundField, FundRecord, SheetRow};
use rust_decimal_macros::dec;

/// Umbrella label of equity funds
pub const EQUITY_UMBRELLA: &str = "Hisse Senedi Şemsiye Fonu";
/// Umbrella label of precious metal funds
pub const METALS_UMBRELLA: &str = "Kıymetli Madenler Şemsiye Fonu";

/// Fixture for fund records
pub struct FundFixtures;

impl FundFixtures {
    /// An equity fund with every return reported
    pub fn dlz() -> FundRecord {
        FundRecord::new(code("DLZ"), "Deniz Portföy Hisse Senedi Fonu", EQUITY_UMBRELLA)
            .with_return(FundField::Return1Month, Some(dec!(2.1500)))
            .with_return(FundField::Return3Month, Some(dec!(5.5000)))
            .with_return(FundField::Return6Month, Some(dec!(9.8000)))
            .with_return(FundField::ReturnYtd, Some(dec!(10.0100)))
            .with_return(FundField::Return1Year, Some(dec!(75.7100)))
            .with_return(FundField::Return3Year, Some(dec!(410.2500)))
            .with_return(FundField::Return5Year, Some(dec!(1000.5000)))
    }

    /// An equity fund exactly on the 50% one-year boundary
    pub fn uhs() -> FundRecord {
        FundRecord::new(code("UHS"), "Ünlü Portföy Hisse Senedi Fonu", EQUITY_UMBRELLA)
            .with_return(FundField::Return1Month, Some(dec!(-1.2000)))
            .with_return(FundField::Return1Year, Some(dec!(50.0000)))
    }

    /// A metals fund below the 50% one-year boundary
    pub fn aak() -> FundRecord {
        FundRecord::new(code("AAK"), "Ata Portföy Altın Fonu", METALS_UMBRELLA)
            .with_return(FundField::Return1Year, Some(dec!(12.3000)))
    }

    /// A new fund without any reported return
    pub fn new_fund() -> FundRecord {
        FundRecord::new(code("YZG"), "Yeni Kurulan Serbest Fon", "Serbest Şemsiye Fonu")
    }

    /// All fixture funds
    pub fn all() -> Vec<FundRecord> {
        vec![Self::dlz(), Self::uhs(), Self::aak(), Self::new_fund()]
    }
}

/// Fixture for raw sheet rows
pub struct RowFixtures;

impl RowFixtures {
    /// The row of [`FundFixtures::dlz`] in its locale-formatted form
    pub fn dlz() -> SheetRow {
        SheetRow::new(
            2,
            vec![
                CellValue::text("DLZ"),
                CellValue::text("Deniz Portföy Hisse Senedi Fonu"),
                CellValue::text(EQUITY_UMBRELLA),
                CellValue::text("%2,15"),
                CellValue::Number(5.5),
                CellValue::text("9,80"),
                CellValue::text("10,01"),
                CellValue::text("75,71"),
                CellValue::text("410,25"),
                CellValue::text("1.000,50"),
            ],
        )
    }

    /// The row of [`FundFixtures::uhs`]
    pub fn uhs() -> SheetRow {
        SheetRow::new(
            3,
            vec![
                CellValue::text("UHS"),
                CellValue::text("Ünlü Portföy Hisse Senedi Fonu"),
                CellValue::text(EQUITY_UMBRELLA),
                CellValue::text("-1,2"),
                CellValue::text("-"),
                CellValue::Empty,
                CellValue::text("-"),
                CellValue::Integer(50),
            ],
        )
    }

    /// A row whose fund code cell is blank
    pub fn blank_code(index: usize) -> SheetRow {
        SheetRow::new(
            index,
            vec![CellValue::text("  "), CellValue::text("Toplam"), CellValue::Empty],
        )
    }

    /// A row holding a spreadsheet error value
    pub fn with_error_cell(index: usize) -> SheetRow {
        SheetRow::new(
            index,
            vec![
                CellValue::text("ERR"),
                CellValue::text("Broken Fund"),
                CellValue::text(EQUITY_UMBRELLA),
                CellValue::Error("#DIV/0!".to_string()),
            ],
        )
    }
}

fn code(value: &str) -> FundCode {
    // Fixture codes are non-blank literals
    FundCode::parse(value).unwrap_or_else(|_| panic!("invalid fixture fund code {}", value))
}
