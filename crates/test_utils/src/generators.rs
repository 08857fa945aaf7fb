//! Property-Based Test Generators
//!
//! Proptest strategies for fund codes, returns, and their locale-formatted
//! spreadsheet renderings, plus `fake` based fund names.

use core_kernel::FundCode;
use domain_fund::FundRecord;
use fake::faker::company::en::CompanyName;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for valid fund codes (three upper-case letters)
pub fn fund_code_strategy() -> impl Strategy<Value = FundCode> {
    "[A-Z]{3}".prop_filter_map("fund code", |s| FundCode::parse(&s).ok())
}

/// Strategy for returns with four fractional digits, -100% to 10000%
pub fn return_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..=100_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

/// Strategy for optional returns, absent one time in four
pub fn optional_return_strategy() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        1 => Just(None),
        3 => return_strategy().prop_map(Some),
    ]
}

/// Renders a decimal the way the reports do: comma decimal separator, dot
/// thousands separators, optional leading percent sign
pub fn locale_format(value: Decimal, with_percent: bool) -> String {
    let text = value.abs().to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::new();
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    let percent = if with_percent { "%" } else { "" };

    if fraction.is_empty() {
        format!("{}{}{},0", percent, sign, grouped)
    } else {
        format!("{}{}{},{}", percent, sign, grouped, fraction)
    }
}

/// Strategy for a return and its locale-formatted rendering
pub fn locale_return_strategy() -> impl Strategy<Value = (Decimal, String)> {
    (return_strategy(), any::<bool>())
        .prop_map(|(value, with_percent)| (value, locale_format(value, with_percent)))
}

/// Strategy for fund records with arbitrary one-year returns
pub fn fund_record_strategy() -> impl Strategy<Value = FundRecord> {
    (fund_code_strategy(), optional_return_strategy(), optional_return_strategy()).prop_map(
        |(code, one_month, one_year)| {
            let mut record = FundRecord::new(code, fake_fund_name(), "Hisse Senedi Şemsiye Fonu");
            record.return_1_month = one_month;
            record.return_1_year = one_year;
            record
        },
    )
}

/// A plausible fund name
pub fn fake_fund_name() -> String {
    let company: String = CompanyName().fake();
    format!("{} Portföy Hisse Senedi Fonu", company)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_locale_format() {
        assert_eq!(locale_format(dec!(1000.5000), false), "1.000,5000");
        assert_eq!(locale_format(dec!(75.71), true), "%75,71");
        assert_eq!(locale_format(dec!(-1234567.1), false), "-1.234.567,1");
        assert_eq!(locale_format(dec!(12), false), "12,0");
    }

    #[test]
    fn test_fake_fund_name_is_not_blank() {
        assert!(!fake_fund_name().trim().is_empty());
    }
}
