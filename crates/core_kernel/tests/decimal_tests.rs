//! Tests for fixed-scale decimal helpers

use core_kernel::{parse_decimal, scale_half_up, RETURN_SCALE};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_negative_returns_keep_sign() {
    assert_eq!(parse_decimal("-12.34567"), Some(dec!(-12.3457)));
}

#[test]
fn test_thousands_grouping_is_not_a_number() {
    assert_eq!(parse_decimal("1,000.50"), None);
}

proptest! {
    #[test]
    fn prop_scale_is_always_four(mantissa in -1_000_000_000_000i64..1_000_000_000_000i64, scale in 0u32..10u32) {
        let value = Decimal::new(mantissa, scale);
        prop_assert_eq!(scale_half_up(value).scale(), RETURN_SCALE);
    }

    #[test]
    fn prop_scaling_is_idempotent(mantissa in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..8u32) {
        let once = scale_half_up(Decimal::new(mantissa, scale));
        prop_assert_eq!(scale_half_up(once), once);
    }

    #[test]
    fn prop_rounding_error_is_bounded(mantissa in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..8u32) {
        let value = Decimal::new(mantissa, scale);
        let diff = (scale_half_up(value) - value).abs();
        prop_assert!(diff <= dec!(0.00005));
    }
}
