//! Custom Test Assertions
//!
//! Assertion helpers for fund records that give more useful failure
//! messages than a plain `assert_eq!` on the whole record.

use domain_fund::{FundDocument, FundField, FundRecord};
use rust_decimal::Decimal;

/// Asserts that every reported return of a record has scale 4
pub fn assert_returns_scaled(record: &FundRecord) {
    for field in FundField::RETURNS {
        if let Some(value) = record.return_value(field) {
            assert_eq!(
                value.scale(),
                4,
                "{} of {} has scale {} ({}), expected 4",
                field,
                record.fund_code,
                value.scale(),
                value
            );
        }
    }
}

/// Asserts a single return metric
pub fn assert_return_eq(record: &FundRecord, field: FundField, expected: Option<Decimal>) {
    assert_eq!(
        record.return_value(field),
        expected,
        "{} of {} mismatch",
        field,
        record.fund_code
    );
}

/// Asserts that a document is the exact projection of a record
pub fn assert_document_matches(document: &FundDocument, record: &FundRecord) {
    assert_eq!(
        document,
        &FundDocument::from(record),
        "document {} does not match record {}",
        document.id(),
        record.fund_code
    );
}

/// Asserts that two lists contain the same fund codes, ignoring order
pub fn assert_same_codes<'a>(
    actual: impl IntoIterator<Item = &'a str>,
    expected: impl IntoIterator<Item = &'a str>,
) {
    let mut actual: Vec<&str> = actual.into_iter().collect();
    let mut expected: Vec<&str> = expected.into_iter().collect();
    actual.sort_unstable();
    expected.sort_unstable();
    assert_eq!(actual, expected, "fund codes differ");
}
