use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::Signed;
use rust_decimal_macros::dec;

use crate::types::Money;

const ROUNDING_STEP: Decimal = dec!(10);

/// Round to the nearest multiple of 10, ties going up (e.g. 365 -> 370).
///
/// Ties round away from zero, which for the non-negative amounts the loan
/// products produce is the same as round-half-up. Within 5 of
/// `Decimal::MAX` the multiple above is not representable, so the value
/// rounds toward zero instead.
pub fn round_to_nearest_ten(value: Money) -> Money {
    let steps = (value / ROUNDING_STEP)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let rounded = steps
        .checked_mul(ROUNDING_STEP)
        .unwrap_or_else(|| (steps - steps.signum()) * ROUNDING_STEP);
    rounded.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rounds_down_below_midpoint() {
        assert_eq!(round_to_nearest_ten(dec!(10833.33)), dec!(10830));
    }

    #[test]
    fn test_rounds_up_above_midpoint() {
        assert_eq!(round_to_nearest_ten(dec!(366.6667)), dec!(370));
        assert_eq!(round_to_nearest_ten(dec!(1169.23)), dec!(1170));
    }

    #[test]
    fn test_tie_rounds_up() {
        assert_eq!(round_to_nearest_ten(dec!(365)), dec!(370));
        assert_eq!(round_to_nearest_ten(dec!(5)), dec!(10));
    }

    #[test]
    fn test_exact_multiple_unchanged() {
        assert_eq!(round_to_nearest_ten(dec!(6000)), dec!(6000));
        assert_eq!(round_to_nearest_ten(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_top_of_range_rounds_toward_zero() {
        assert_eq!(
            round_to_nearest_ten(Decimal::MAX),
            dec!(79228162514264337593543950330)
        );
        assert_eq!(
            round_to_nearest_ten(Decimal::MIN),
            dec!(-79228162514264337593543950330)
        );
    }

    proptest! {
        #[test]
        fn prop_idempotent(units in 0i64..1_000_000_000, scale in 0u32..6) {
            let x = Decimal::new(units, scale);
            let once = round_to_nearest_ten(x);
            prop_assert_eq!(round_to_nearest_ten(once), once);
        }

        #[test]
        fn prop_multiple_of_ten_within_five(units in 0i64..1_000_000_000, scale in 0u32..6) {
            let x = Decimal::new(units, scale);
            let rounded = round_to_nearest_ten(x);
            prop_assert!((rounded % ROUNDING_STEP).is_zero());
            prop_assert!((rounded - x).abs() <= dec!(5));
        }
    }
}
