//! Conversions between integer cents and decimal euros.
//!
//! Intermediate arithmetic stays in `Decimal`; rounding back to cents happens
//! once, at the output boundary, with the midpoint rounded away from zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Cents, Money, Rate};

const CENTS_PER_EURO: Decimal = dec!(100);

/// Decimal places kept for reported rates (basis-point precision).
pub const RATE_DECIMAL_PLACES: u32 = 4;

pub fn cents_to_euros(cents: Cents) -> Money {
    Decimal::from(cents) / CENTS_PER_EURO
}

pub fn euros_to_cents(euros: Money) -> Cents {
    round_cents(euros * CENTS_PER_EURO)
}

/// Round a fractional cent amount to whole cents.
pub fn round_cents(cents: Decimal) -> Cents {
    let rounded = cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        Cents::MIN
    } else {
        Cents::MAX
    })
}

/// Round a rate to four decimal places.
pub fn round_rate(rate: Rate) -> Rate {
    rate.round_dp_with_strategy(RATE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// `round(cents × rate)` in whole cents.
pub fn percent_of(cents: Cents, rate: Rate) -> Cents {
    round_cents(Decimal::from(cents) * rate)
}

/// Whole-percent rendering used in user-facing messages.
pub fn whole_percent(ratio: Rate) -> Decimal {
    (ratio * dec!(100)).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_round_trip_exact() {
        assert_eq!(cents_to_euros(12345), dec!(123.45));
        assert_eq!(euros_to_cents(dec!(123.45)), 12345);
    }

    #[test]
    fn test_round_cents_midpoint_away_from_zero() {
        assert_eq!(round_cents(dec!(2.5)), 3);
        assert_eq!(round_cents(dec!(-2.5)), -3);
        assert_eq!(round_cents(dec!(2.49)), 2);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(187_500, dec!(0.25)), 46_875);
        assert_eq!(percent_of(942_309, dec!(0.244)), 229_923);
    }

    #[test]
    fn test_round_rate_basis_points() {
        assert_eq!(round_rate(dec!(0.371449)), dec!(0.3714));
        assert_eq!(round_rate(dec!(0.19032)), dec!(0.1903));
    }
}
