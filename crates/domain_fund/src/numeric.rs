//! Numeric cell normalization
//!
//! Fund reports mix native numeric cells with locale-formatted strings such
//! as `"%75,71"` or `"1.000,50"`. Every value is brought to a canonical
//! decimal with four fractional digits, or reported as absent.

use rust_decimal::Decimal;
use tracing::warn;

use core_kernel::{checked_scale, parse_decimal};

use crate::cell::{number_to_text, CellValue};

/// Marker used by reports for "not reported"
const ABSENT_MARKER: &str = "-";

/// Converts a cell into a scaled decimal
///
/// Returns `None` for blank cells, the `-` marker, booleans, error values,
/// non-finite numbers, magnitudes of `10^16` or more, and anything that does
/// not parse after sanitization.
///
/// # Example
///
/// ```rust
/// use domain_fund::{normalize_cell, CellValue};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(normalize_cell(&CellValue::text("1.000,50")), Some(dec!(1000.5000)));
/// assert_eq!(normalize_cell(&CellValue::text("-")), None);
/// ```
pub fn normalize_cell(cell: &CellValue) -> Option<Decimal> {
    match cell {
        CellValue::Empty | CellValue::Error(_) => None,
        CellValue::Integer(value) => {
            let scaled = checked_scale(Decimal::from(*value));
            if scaled.is_none() {
                warn!(value = %value, "Integer cell out of range, treating as absent");
            }
            scaled
        }
        CellValue::Number(value) => {
            if !value.is_finite() {
                warn!(value = %value, "Non-finite numeric cell, treating as absent");
                return None;
            }
            normalize_text(&number_to_text(*value))
        }
        CellValue::Text(value) => normalize_text(value),
        CellValue::Bool(value) => {
            warn!(value = %value, "Boolean cell in numeric column, treating as absent");
            None
        }
    }
}

/// Converts locale-formatted text into a scaled decimal
pub fn normalize_text(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ABSENT_MARKER {
        return None;
    }

    let sanitized = sanitize_number_string(trimmed);
    let parsed = parse_decimal(&sanitized);
    if parsed.is_none() {
        warn!(raw = %trimmed, "Non-numeric or out-of-range value, treating as absent");
    }
    parsed
}

/// Strips percent signs and normalizes decimal separators
///
/// When a comma is present it is the decimal separator and every dot is a
/// thousands separator: `"1.000,50"` becomes `"1000.50"`. Without a comma the
/// text is already dot-decimal and only `%` is removed.
pub fn sanitize_number_string(value: &str) -> String {
    let clean = value.replace('%', "");
    let clean = clean.trim();

    if clean.contains(',') {
        clean.replace('.', "").replace(',', ".")
    } else {
        clean.to_string()
    }
}
