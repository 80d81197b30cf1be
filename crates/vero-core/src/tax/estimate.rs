use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::PENSION_CATEGORY;
use crate::ledger::{EntryKind, LedgerEntry};
use crate::rates::StatutoryRates;
use crate::tax::calculator::{calculate_tax, TaxParams, TaxResult};
use crate::tax::yel::{calculate_yel, YelParams, YelResult};
use crate::types::{Cents, Rate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateInput {
    pub fiscal_year: i32,
    /// Entries of any year; only `fiscal_year` is counted.
    pub entries: Vec<LedgerEntry>,
    #[serde(default = "default_municipality")]
    pub municipality: String,
    #[serde(default = "default_true")]
    pub church_member: bool,
    /// Declared YEL work income.
    #[serde(default = "default_yel_income")]
    pub yel_income_cents: Cents,
    #[serde(default)]
    pub is_new_entrepreneur: bool,
}

fn default_municipality() -> String {
    "Helsinki".to_string()
}

fn default_true() -> bool {
    true
}

fn default_yel_income() -> Cents {
    7_000_000
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimate {
    pub fiscal_year: i32,
    pub total_income_cents: Cents,
    /// Business expenses, YEL premiums excluded.
    pub total_expenses_cents: Cents,
    pub yel_paid_cents: Cents,
    pub net_profit_cents: Cents,
    pub municipality: String,
    pub municipal_rate: Rate,
    pub church_member: bool,
    pub yel: YelResult,
    pub tax: TaxResult,
}

/// Year-to-date tax estimate straight from the ledger.
///
/// YEL premiums already booked are deducted; when none are booked yet the
/// premium computed from the declared YEL income is used instead.
pub fn estimate_ytd_tax(input: &EstimateInput, rates: &StatutoryRates) -> TaxEstimate {
    let mut income: Cents = 0;
    let mut expenses: Cents = 0;
    let mut yel_paid: Cents = 0;

    for entry in input.entries.iter().filter(|e| e.fiscal_year == input.fiscal_year) {
        match entry.kind {
            EntryKind::Income => income += entry.amount_cents,
            EntryKind::Expense if entry.category == PENSION_CATEGORY => {
                yel_paid += entry.amount_cents
            }
            EntryKind::Expense => expenses += entry.amount_cents,
        }
    }

    let net_profit = income - expenses;

    let yel = calculate_yel(
        &YelParams {
            yel_income_cents: input.yel_income_cents,
            is_new_entrepreneur: input.is_new_entrepreneur,
        },
        &rates.yel,
    );

    let municipal_rate = rates.municipal_rate(&input.municipality);
    let church_rate = if input.church_member {
        rates.default_church_rate
    } else {
        Decimal::ZERO
    };
    let yel_deduction = if yel_paid > 0 {
        yel_paid
    } else {
        yel.annual_contribution_cents
    };

    let tax = calculate_tax(
        &TaxParams {
            earned_income_cents: net_profit,
            municipal_rate,
            church_rate,
            apply_entrepreneur_deduction: true,
            yel_contribution_cents: yel_deduction,
        },
        &rates.income_tax,
    );

    TaxEstimate {
        fiscal_year: input.fiscal_year,
        total_income_cents: income,
        total_expenses_cents: expenses,
        yel_paid_cents: yel_paid,
        net_profit_cents: net_profit,
        municipality: input.municipality.clone(),
        municipal_rate,
        church_member: input.church_member,
        yel,
        tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::VoucherKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry(id: i64, kind: EntryKind, amount: Cents, category: &str, year: i32) -> LedgerEntry {
        LedgerEntry {
            id,
            kind,
            date: NaiveDate::from_ymd_opt(year, 1, 15).unwrap(),
            fiscal_year: year,
            amount_cents: amount,
            category: category.to_string(),
            description: None,
            voucher_kind: VoucherKind::None,
            depreciation_years: None,
            depreciation_remaining_cents: None,
            bank_ref: None,
            reconciled: false,
        }
    }

    fn input(entries: Vec<LedgerEntry>) -> EstimateInput {
        EstimateInput {
            fiscal_year: 2026,
            entries,
            municipality: "Espoo".to_string(),
            church_member: false,
            yel_income_cents: 7_000_000,
            is_new_entrepreneur: false,
        }
    }

    #[test]
    fn test_splits_yel_from_business_expenses() {
        let est = estimate_ytd_tax(
            &input(vec![
                entry(1, EntryKind::Income, 6_000_000, "clinic_income", 2026),
                entry(2, EntryKind::Expense, 400_000, "tilitoimisto", 2026),
                entry(3, EntryKind::Expense, 300_000, "yel", 2026),
                entry(4, EntryKind::Income, 9_999_999, "clinic_income", 2025),
            ]),
            &StatutoryRates::fiscal_2026(),
        );
        assert_eq!(est.total_income_cents, 6_000_000);
        assert_eq!(est.total_expenses_cents, 400_000);
        assert_eq!(est.yel_paid_cents, 300_000);
        assert_eq!(est.net_profit_cents, 5_600_000);
        assert_eq!(est.municipal_rate, dec!(0.1775));
        assert_eq!(est.tax.church_tax_cents, 0);
        // 5% of 56 000 + booked YEL 3 000
        assert_eq!(est.tax.deductions_cents, 580_000);
    }

    #[test]
    fn test_falls_back_to_computed_yel() {
        let est = estimate_ytd_tax(
            &input(vec![entry(1, EntryKind::Income, 6_000_000, "clinic_income", 2026)]),
            &StatutoryRates::fiscal_2026(),
        );
        assert_eq!(est.yel_paid_cents, 0);
        assert_eq!(est.yel.annual_contribution_cents, 1_708_000);
        assert_eq!(est.tax.deductions_cents, 300_000 + 1_708_000);
    }
}
