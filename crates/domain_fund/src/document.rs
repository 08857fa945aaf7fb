//! Search-index projection of a fund
//!
//! `FundDocument` carries the same values as `FundRecord` but is the shape the
//! search index stores. Each field has a fixed index capability:
//!
//! | Field | Kind |
//! |---|---|
//! | `fundCode` | keyword (exact match, document id) |
//! | `fundName` | analyzed text |
//! | `umbrellaType` | keyword (exact or contains) |
//! | `return*` | scaled decimal (range queries) |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::FundCode;

use crate::fund::FundRecord;

/// How a field is stored in the search index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Not analyzed, matched as a whole value
    Keyword,
    /// Tokenized and matched token-wise
    Text,
    /// Fixed-point number supporting range queries
    ScaledDecimal,
}

/// Addressable fields of a fund, in spreadsheet column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundField {
    FundCode,
    FundName,
    UmbrellaType,
    Return1Month,
    Return3Month,
    Return6Month,
    ReturnYtd,
    Return1Year,
    Return3Year,
    Return5Year,
}

impl FundField {
    /// All fields, ordered as the spreadsheet columns
    pub const ALL: [FundField; 10] = [
        FundField::FundCode,
        FundField::FundName,
        FundField::UmbrellaType,
        FundField::Return1Month,
        FundField::Return3Month,
        FundField::Return6Month,
        FundField::ReturnYtd,
        FundField::Return1Year,
        FundField::Return3Year,
        FundField::Return5Year,
    ];

    /// The return metrics, ordered as the spreadsheet columns
    pub const RETURNS: [FundField; 7] = [
        FundField::Return1Month,
        FundField::Return3Month,
        FundField::Return6Month,
        FundField::ReturnYtd,
        FundField::Return1Year,
        FundField::Return3Year,
        FundField::Return5Year,
    ];

    /// Field name as used in JSON payloads and the index mapping
    pub fn name(&self) -> &'static str {
        match self {
            FundField::FundCode => "fundCode",
            FundField::FundName => "fundName",
            FundField::UmbrellaType => "umbrellaType",
            FundField::Return1Month => "return1Month",
            FundField::Return3Month => "return3Month",
            FundField::Return6Month => "return6Month",
            FundField::ReturnYtd => "returnYtd",
            FundField::Return1Year => "return1Year",
            FundField::Return3Year => "return3Year",
            FundField::Return5Year => "return5Year",
        }
    }

    /// Index capability of the field
    pub fn kind(&self) -> FieldKind {
        match self {
            FundField::FundCode | FundField::UmbrellaType => FieldKind::Keyword,
            FundField::FundName => FieldKind::Text,
            _ => FieldKind::ScaledDecimal,
        }
    }

    /// Zero-based spreadsheet column holding this field
    pub fn column(&self) -> usize {
        FundField::ALL
            .iter()
            .position(|field| field == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for FundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FundField {
    type Err = String;

    /// Parses a field name, ignoring ASCII case (`"return1year"` is accepted)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        FundField::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("Unknown fund field '{}'", name))
    }
}

/// A fund as stored in the search index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundDocument {
    pub fund_code: FundCode,
    #[serde(default)]
    pub fund_name: String,
    #[serde(default)]
    pub umbrella_type: String,
    #[serde(default)]
    pub return_1_month: Option<Decimal>,
    #[serde(default)]
    pub return_3_month: Option<Decimal>,
    #[serde(default)]
    pub return_6_month: Option<Decimal>,
    #[serde(default)]
    pub return_ytd: Option<Decimal>,
    #[serde(default)]
    pub return_1_year: Option<Decimal>,
    #[serde(default)]
    pub return_3_year: Option<Decimal>,
    #[serde(default)]
    pub return_5_year: Option<Decimal>,
}

impl FundDocument {
    /// Document id in the index
    pub fn id(&self) -> &str {
        self.fund_code.as_str()
    }

    /// Value of a keyword or text field
    pub fn text(&self, field: FundField) -> Option<&str> {
        match field {
            FundField::FundCode => Some(self.fund_code.as_str()),
            FundField::FundName => Some(&self.fund_name),
            FundField::UmbrellaType => Some(&self.umbrella_type),
            _ => None,
        }
    }

    /// Value of a return field; `None` when not reported
    pub fn decimal(&self, field: FundField) -> Option<Decimal> {
        match field {
            FundField::Return1Month => self.return_1_month,
            FundField::Return3Month => self.return_3_month,
            FundField::Return6Month => self.return_6_month,
            FundField::ReturnYtd => self.return_ytd,
            FundField::Return1Year => self.return_1_year,
            FundField::Return3Year => self.return_3_year,
            FundField::Return5Year => self.return_5_year,
            _ => None,
        }
    }
}

impl From<&FundRecord> for FundDocument {
    fn from(record: &FundRecord) -> Self {
        Self {
            fund_code: record.fund_code.clone(),
            fund_name: record.fund_name.clone(),
            umbrella_type: record.umbrella_type.clone(),
            return_1_month: record.return_1_month,
            return_3_month: record.return_3_month,
            return_6_month: record.return_6_month,
            return_ytd: record.return_ytd,
            return_1_year: record.return_1_year,
            return_3_year: record.return_3_year,
            return_5_year: record.return_5_year,
        }
    }
}

impl From<FundRecord> for FundDocument {
    fn from(record: FundRecord) -> Self {
        Self::from(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_field_columns_follow_spreadsheet_order() {
        assert_eq!(FundField::FundCode.column(), 0);
        assert_eq!(FundField::UmbrellaType.column(), 2);
        assert_eq!(FundField::ReturnYtd.column(), 6);
        assert_eq!(FundField::Return5Year.column(), 9);
    }

    #[test]
    fn test_field_parsing_ignores_case() {
        assert_eq!("return1Year".parse::<FundField>().unwrap(), FundField::Return1Year);
        assert_eq!("FUNDNAME".parse::<FundField>().unwrap(), FundField::FundName);
        assert!("nav".parse::<FundField>().is_err());
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(FundField::FundCode.kind(), FieldKind::Keyword);
        assert_eq!(FundField::FundName.kind(), FieldKind::Text);
        assert_eq!(FundField::UmbrellaType.kind(), FieldKind::Keyword);
        assert!(FundField::RETURNS.iter().all(|f| f.kind() == FieldKind::ScaledDecimal));
    }

    #[test]
    fn test_projection_copies_all_values() {
        let record = FundRecord::new(FundCode::parse("DLZ").unwrap(), "Deniz Portföy Hisse", "Hisse Senedi Şemsiye Fonu")
            .with_return(FundField::Return1Year, Some(dec!(75.7100)));
        let document = FundDocument::from(&record);

        assert_eq!(document.id(), "DLZ");
        assert_eq!(document.text(FundField::FundName), Some("Deniz Portföy Hisse"));
        assert_eq!(document.decimal(FundField::Return1Year), Some(dec!(75.7100)));
        assert_eq!(document.decimal(FundField::Return3Year), None);
    }

    #[test]
    fn test_document_json_uses_camel_case() {
        let record = FundRecord::new(FundCode::parse("UHS").unwrap(), "Fund", "Umbrella")
            .with_return(FundField::Return1Month, Some(dec!(1.5000)));
        let json = serde_json::to_value(FundDocument::from(record)).unwrap();

        assert_eq!(json["fundCode"], "UHS");
        assert_eq!(json["return1Month"], "1.5000");
        assert!(json["return1Year"].is_null());
    }
}
