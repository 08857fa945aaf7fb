//! Fund record
//!
//! This module defines the canonical fund entity persisted in the primary store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{scale_half_up, FundCode};

use crate::document::FundField;

/// A fund as reported in the spreadsheet and persisted in the primary store
///
/// Every return metric is optional (`None` means "not reported") and, when
/// present, carries exactly four fractional digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRecord {
    /// Natural identifier, primary key in both stores
    pub fund_code: FundCode,
    /// Fund name
    pub fund_name: String,
    /// Umbrella fund category label
    pub umbrella_type: String,
    /// 1 month return
    pub return_1_month: Option<Decimal>,
    /// 3 month return
    pub return_3_month: Option<Decimal>,
    /// 6 month return
    pub return_6_month: Option<Decimal>,
    /// Year-to-date return
    pub return_ytd: Option<Decimal>,
    /// 1 year return
    pub return_1_year: Option<Decimal>,
    /// 3 year return
    pub return_3_year: Option<Decimal>,
    /// 5 year return
    pub return_5_year: Option<Decimal>,
}

impl FundRecord {
    /// Creates a record with no reported returns
    ///
    /// # Arguments
    ///
    /// * `fund_code` - Fund identifier
    /// * `fund_name` - Fund name
    /// * `umbrella_type` - Umbrella category
    pub fn new(
        fund_code: FundCode,
        fund_name: impl Into<String>,
        umbrella_type: impl Into<String>,
    ) -> Self {
        Self {
            fund_code,
            fund_name: fund_name.into(),
            umbrella_type: umbrella_type.into(),
            return_1_month: None,
            return_3_month: None,
            return_6_month: None,
            return_ytd: None,
            return_1_year: None,
            return_3_year: None,
            return_5_year: None,
        }
    }

    /// Sets a return metric, rescaling it to four digits
    ///
    /// Non-return fields are ignored.
    pub fn with_return(mut self, field: FundField, value: Option<Decimal>) -> Self {
        self.set_return(field, value);
        self
    }

    /// Sets a return metric in place, rescaling it to four digits
    pub fn set_return(&mut self, field: FundField, value: Option<Decimal>) {
        let value = value.map(scale_half_up);
        match field {
            FundField::Return1Month => self.return_1_month = value,
            FundField::Return3Month => self.return_3_month = value,
            FundField::Return6Month => self.return_6_month = value,
            FundField::ReturnYtd => self.return_ytd = value,
            FundField::Return1Year => self.return_1_year = value,
            FundField::Return3Year => self.return_3_year = value,
            FundField::Return5Year => self.return_5_year = value,
            FundField::FundCode | FundField::FundName | FundField::UmbrellaType => {}
        }
    }

    /// Returns a return metric by field
    pub fn return_value(&self, field: FundField) -> Option<Decimal> {
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

    /// Number of return metrics actually reported
    pub fn reported_returns(&self) -> usize {
        FundField::RETURNS
            .iter()
            .filter(|field| self.return_value(**field).is_some())
            .count()
    }
}
