use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{cents_to_euros, euros_to_cents, round_rate};
use crate::rates::IncomeTaxRates;
use crate::types::{Cents, Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxParams {
    /// Business result for the year; negative for a loss.
    pub earned_income_cents: Cents,
    /// Kunnallisvero, e.g. 0.185 for Helsinki.
    pub municipal_rate: Rate,
    /// Zero when not a church member.
    #[serde(default)]
    pub church_rate: Rate,
    /// Apply yrittäjävähennys.
    #[serde(default = "default_true")]
    pub apply_entrepreneur_deduction: bool,
    /// YEL premiums paid, deductible from earned income.
    #[serde(default)]
    pub yel_contribution_cents: Cents,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross_income_cents: Cents,
    pub deductions_cents: Cents,
    pub taxable_income_cents: Cents,
    pub entrepreneur_deduction_cents: Cents,
    pub state_tax_cents: Cents,
    pub municipal_tax_cents: Cents,
    pub church_tax_cents: Cents,
    pub total_tax_cents: Cents,
    /// Total tax / gross income, four decimals.
    pub effective_rate: Rate,
    /// State band rate + municipal + church at the current taxable income.
    pub marginal_rate: Rate,
}

// ---------------------------------------------------------------------------
// Main calculation
// ---------------------------------------------------------------------------

/// Progressive state tax plus flat municipal and church tax on earned income.
///
/// All bracket arithmetic runs in euros as `Decimal`; amounts are rounded to
/// whole cents only when the result is assembled.
pub fn calculate_tax(params: &TaxParams, rates: &IncomeTaxRates) -> TaxResult {
    let gross = cents_to_euros(params.earned_income_cents);
    let yel_deduction = cents_to_euros(params.yel_contribution_cents.max(0));

    // Never applied to a loss.
    let entrepreneur_deduction = if params.apply_entrepreneur_deduction && gross > Decimal::ZERO {
        gross * rates.entrepreneur_deduction_rate
    } else {
        Decimal::ZERO
    };

    let total_deductions = yel_deduction + entrepreneur_deduction;
    let taxable = (gross - total_deductions).max(Decimal::ZERO);

    let state_tax = state_tax(taxable, rates);
    let municipal_tax = taxable * params.municipal_rate;
    let church_tax = taxable * params.church_rate;
    let total_tax = state_tax + municipal_tax + church_tax;

    let effective_rate = if gross > Decimal::ZERO {
        total_tax / gross
    } else {
        Decimal::ZERO
    };
    let marginal_rate = marginal_rate(taxable, params.municipal_rate, params.church_rate, rates);

    tracing::trace!(%gross, %taxable, %total_tax, "income tax calculated");

    TaxResult {
        gross_income_cents: params.earned_income_cents,
        deductions_cents: euros_to_cents(total_deductions),
        taxable_income_cents: euros_to_cents(taxable),
        entrepreneur_deduction_cents: euros_to_cents(entrepreneur_deduction),
        state_tax_cents: euros_to_cents(state_tax),
        municipal_tax_cents: euros_to_cents(municipal_tax),
        church_tax_cents: euros_to_cents(church_tax),
        total_tax_cents: euros_to_cents(total_tax),
        effective_rate: round_rate(effective_rate),
        marginal_rate: round_rate(marginal_rate),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Cumulative base of the containing band plus its rate on the excess.
fn state_tax(taxable: Money, rates: &IncomeTaxRates) -> Money {
    match rates.bracket_containing(taxable) {
        Some(bracket) => bracket.base + (taxable - bracket.lower) * bracket.rate,
        None => Decimal::ZERO,
    }
}

fn marginal_rate(taxable: Money, municipal: Rate, church: Rate, rates: &IncomeTaxRates) -> Rate {
    let state = rates
        .bracket_for(taxable)
        .map(|b| b.rate)
        .unwrap_or(Decimal::ZERO);
    state + municipal + church
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
