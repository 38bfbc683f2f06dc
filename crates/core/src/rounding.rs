//! Half-up decimal rounding shared by the analytics report.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round half-up to `places` decimal places.
///
/// Non-finite values and values outside the decimal range pass through
/// unchanged.
pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(0.135, 2), 0.14);
        assert_eq!(round_to(2.0 / 3.0, 6), 0.666_667);
    }

    #[test]
    fn passes_non_finite_through() {
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
    }
}
