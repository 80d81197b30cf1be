use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::money::{percent_of, round_cents, round_rate};
use crate::rates::YelRates;
use crate::types::{Cents, Rate};

/// Yrittäjän eläkevakuutus (self-employed pension insurance) input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YelParams {
    /// Confirmed YEL work income.
    pub yel_income_cents: Cents,
    /// First 48 months of entrepreneurship.
    #[serde(default)]
    pub is_new_entrepreneur: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YelResult {
    /// Income actually used, after clamping to the statutory range.
    pub yel_income_cents: Cents,
    pub base_rate: Rate,
    pub discount_rate: Rate,
    pub effective_rate: Rate,
    pub annual_contribution_cents: Cents,
    pub monthly_contribution_cents: Cents,
    /// Rough estimate, not an official accrual figure.
    pub annual_pension_accrual_cents: Cents,
}

/// Annual and monthly YEL premium for a confirmed work income.
///
/// Out-of-range incomes are clamped rather than rejected. Unvalidated rates
/// with the minimum above the maximum resolve to the maximum.
pub fn calculate_yel(params: &YelParams, rates: &YelRates) -> YelResult {
    let income = params
        .yel_income_cents
        .max(rates.min_income_cents)
        .min(rates.max_income_cents);

    let discount_rate = if params.is_new_entrepreneur {
        rates.new_entrepreneur_discount
    } else {
        Decimal::ZERO
    };
    let effective_rate = rates.base_rate * (Decimal::ONE - discount_rate);

    let annual = percent_of(income, effective_rate);
    let monthly = round_cents(Decimal::from(annual) / dec!(12));

    YelResult {
        yel_income_cents: income,
        base_rate: rates.base_rate,
        discount_rate,
        effective_rate: round_rate(effective_rate),
        annual_contribution_cents: annual,
        monthly_contribution_cents: monthly,
        annual_pension_accrual_cents: percent_of(income, rates.accrual_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::StatutoryRates;

    fn rates() -> YelRates {
        StatutoryRates::fiscal_2026().yel
    }

    #[test]
    fn test_base_rate_contribution() {
        let r = calculate_yel(
            &YelParams {
                yel_income_cents: 7_000_000,
                is_new_entrepreneur: false,
            },
            &rates(),
        );
        assert_eq!(r.annual_contribution_cents, 1_708_000);
        assert_eq!(r.monthly_contribution_cents, 142_333);
        assert_eq!(r.annual_pension_accrual_cents, 105_000);
        assert_eq!(r.effective_rate, dec!(0.244));
        assert_eq!(r.discount_rate, Decimal::ZERO);
    }

    #[test]
    fn test_new_entrepreneur_discount() {
        let r = calculate_yel(
            &YelParams {
                yel_income_cents: 7_000_000,
                is_new_entrepreneur: true,
            },
            &rates(),
        );
        assert_eq!(r.discount_rate, dec!(0.22));
        assert_eq!(r.effective_rate, dec!(0.1903));
        // 70 000 * 0.244 * 0.78
        assert_eq!(r.annual_contribution_cents, 1_332_240);
    }

    #[test]
    fn test_clamps_to_minimum() {
        let r = calculate_yel(
            &YelParams {
                yel_income_cents: 100,
                is_new_entrepreneur: false,
            },
            &rates(),
        );
        assert_eq!(r.yel_income_cents, 942_309);
    }

    #[test]
    fn test_clamps_to_maximum() {
        let r = calculate_yel(
            &YelParams {
                yel_income_cents: 50_000_000,
                is_new_entrepreneur: false,
            },
            &rates(),
        );
        assert_eq!(r.yel_income_cents, 21_400_000);
        assert_eq!(r.annual_contribution_cents, 5_221_600);
    }

    #[test]
    fn test_inverted_income_range_does_not_panic() {
        let mut inverted = rates();
        inverted.min_income_cents = 5_000_000;
        inverted.max_income_cents = 1_000_000;
        let r = calculate_yel(
            &YelParams {
                yel_income_cents: 3_000_000,
                is_new_entrepreneur: false,
            },
            &inverted,
        );
        assert_eq!(r.yel_income_cents, 1_000_000);
    }
}
