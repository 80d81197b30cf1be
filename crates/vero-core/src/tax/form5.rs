use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::categories::{self, Form5Section};
use crate::depreciation::DepreciationPolicy;
use crate::ledger::{EntryKind, LedgerEntry};
use crate::types::Cents;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The slice of a ledger entry the tax return needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form5Entry {
    pub kind: EntryKind,
    pub amount_cents: Cents,
    pub category: String,
    #[serde(default)]
    pub depreciation_years: Option<u32>,
    #[serde(default)]
    pub depreciation_remaining_cents: Option<Cents>,
}

impl From<&LedgerEntry> for Form5Entry {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            kind: entry.kind,
            amount_cents: entry.amount_cents,
            category: entry.category.clone(),
            depreciation_years: entry.depreciation_years,
            depreciation_remaining_cents: entry.depreciation_remaining_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationDetail {
    pub category: String,
    pub original_amount_cents: Cents,
    pub depreciation_years: u32,
    pub remaining_cents: Cents,
    pub annual_depreciation_cents: Cents,
}

/// Elinkeinotoiminnan veroilmoitus (Form 5) line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form5Report {
    /// Liikevaihto.
    pub revenue_cents: Cents,
    /// Materiaalit ja palvelut; always zero for a solo practitioner.
    pub materials_and_services_cents: Cents,
    /// Henkilöstökulut; always zero for a solo practitioner.
    pub personnel_costs_cents: Cents,
    /// Poistot.
    pub depreciation_cents: Cents,
    /// Muut liiketoiminnan kulut.
    pub other_expenses_cents: Cents,
    /// Liikevoitto/-tappio.
    pub operating_profit_cents: Cents,
    /// YEL premiums, deducted in personal taxation.
    pub pension_premiums_cents: Cents,
    /// Elinkeinotoiminnan tulos.
    pub business_result_cents: Cents,
    /// Every expense by category id, whatever its section.
    pub expense_breakdown: BTreeMap<String, Cents>,
    pub depreciation_details: Vec<DepreciationDetail>,
}

// ---------------------------------------------------------------------------
// Main calculation
// ---------------------------------------------------------------------------

/// Aggregate ledger entries into Form 5 line items.
///
/// Equipment above the threshold is depreciated at the policy rate of its
/// remaining balance. Entries that lack a schedule are treated as newly
/// acquired: the full cost is the remaining balance and the default useful
/// life is recorded.
pub fn generate_form5(entries: &[Form5Entry], policy: &DepreciationPolicy) -> Form5Report {
    let mut report = Form5Report::default();

    for entry in entries {
        if entry.kind == EntryKind::Income {
            report.revenue_cents += entry.amount_cents;
            continue;
        }

        *report
            .expense_breakdown
            .entry(entry.category.clone())
            .or_insert(0) += entry.amount_cents;

        match categories::form5_section(&entry.category) {
            Form5Section::Equipment => match depreciation_basis(entry, policy) {
                Some((years, remaining)) => {
                    let annual = policy.annual_depreciation(remaining);
                    report.depreciation_cents += annual;
                    report.depreciation_details.push(DepreciationDetail {
                        category: entry.category.clone(),
                        original_amount_cents: entry.amount_cents,
                        depreciation_years: years,
                        remaining_cents: remaining,
                        annual_depreciation_cents: annual,
                    });
                }
                None => report.other_expenses_cents += entry.amount_cents,
            },
            Form5Section::PensionPremiums => report.pension_premiums_cents += entry.amount_cents,
            Form5Section::Revenue | Form5Section::OtherExpenses => {
                report.other_expenses_cents += entry.amount_cents
            }
        }
    }

    report.operating_profit_cents =
        report.revenue_cents - (report.other_expenses_cents + report.depreciation_cents);
    // Pension premiums stay out of the business result.
    report.business_result_cents = report.operating_profit_cents;

    tracing::debug!(
        entries = entries.len(),
        revenue = report.revenue_cents,
        depreciation = report.depreciation_cents,
        "form 5 generated"
    );

    report
}

/// `(years, remaining balance)` to depreciate, or `None` to expense immediately.
fn depreciation_basis(entry: &Form5Entry, policy: &DepreciationPolicy) -> Option<(u32, Cents)> {
    match (entry.depreciation_years, entry.depreciation_remaining_cents) {
        (Some(years), Some(remaining)) if years > 0 => Some((years, remaining)),
        _ if policy.exceeds_threshold(entry.amount_cents) => {
            Some((policy.default_years, entry.amount_cents))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn line(kind: EntryKind, amount: Cents, category: &str) -> Form5Entry {
        Form5Entry {
            kind,
            amount_cents: amount,
            category: category.to_string(),
            depreciation_years: None,
            depreciation_remaining_cents: None,
        }
    }

    fn equipment(amount: Cents, years: Option<u32>, remaining: Option<Cents>) -> Form5Entry {
        Form5Entry {
            depreciation_years: years,
            depreciation_remaining_cents: remaining,
            ..line(EntryKind::Expense, amount, "laitteet")
        }
    }

    fn policy() -> DepreciationPolicy {
        DepreciationPolicy::statutory_2026()
    }

    #[test]
    fn test_revenue_from_income() {
        let r = generate_form5(
            &[
                line(EntryKind::Income, 500_000, "clinic_income"),
                line(EntryKind::Income, 200_000, "other_income"),
            ],
            &policy(),
        );
        assert_eq!(r.revenue_cents, 700_000);
        assert!(r.expense_breakdown.is_empty());
    }

    #[test]
    fn test_pension_kept_out_of_business_result() {
        let r = generate_form5(
            &[
                line(EntryKind::Income, 1_000_000, "clinic_income"),
                line(EntryKind::Expense, 170_800, "yel"),
            ],
            &policy(),
        );
        assert_eq!(r.pension_premiums_cents, 170_800);
        assert_eq!(r.other_expenses_cents, 0);
        assert_eq!(r.business_result_cents, 1_000_000);
        assert_eq!(r.expense_breakdown["yel"], 170_800);
    }

    #[test]
    fn test_depreciation_uses_remaining_balance() {
        let r = generate_form5(&[equipment(250_000, Some(3), Some(187_500))], &policy());
        assert_eq!(r.depreciation_cents, 46_875);
        assert_eq!(r.other_expenses_cents, 0);
        let d = &r.depreciation_details[0];
        assert_eq!(d.remaining_cents, 187_500);
        assert_eq!(d.original_amount_cents, 250_000);
        assert_eq!(d.annual_depreciation_cents, 46_875);
    }

    #[test]
    fn test_large_equipment_without_schedule() {
        let r = generate_form5(&[equipment(200_000, None, None)], &policy());
        assert_eq!(r.depreciation_cents, 50_000);
        assert_eq!(r.depreciation_details.len(), 1);
        assert_eq!(r.depreciation_details[0].depreciation_years, 3);
        assert_eq!(r.depreciation_details[0].remaining_cents, 200_000);
    }

    #[test]
    fn test_small_equipment_expensed() {
        let r = generate_form5(&[equipment(50_000, None, None)], &policy());
        assert_eq!(r.depreciation_cents, 0);
        assert_eq!(r.other_expenses_cents, 50_000);
        assert!(r.depreciation_details.is_empty());
    }

    #[test]
    fn test_zero_years_is_not_a_schedule() {
        let r = generate_form5(&[equipment(100_000, Some(0), Some(75_000))], &policy());
        assert_eq!(r.other_expenses_cents, 100_000);
        assert_eq!(r.depreciation_cents, 0);
    }

    #[test]
    fn test_operating_profit() {
        let r = generate_form5(
            &[
                line(EntryKind::Income, 1_000_000, "clinic_income"),
                line(EntryKind::Expense, 50_000, "potilasvakuutus"),
                equipment(200_000, Some(3), Some(200_000)),
            ],
            &policy(),
        );
        assert_eq!(r.operating_profit_cents, 900_000);
        assert_eq!(r.business_result_cents, 900_000);
    }

    #[test]
    fn test_breakdown_and_unknown_category() {
        let r = generate_form5(
            &[
                line(EntryKind::Expense, 50_000, "potilasvakuutus"),
                line(EntryKind::Expense, 30_000, "potilasvakuutus"),
                line(EntryKind::Expense, 20_000, "matkakulut"),
                line(EntryKind::Expense, 5_000, "mystery"),
            ],
            &policy(),
        );
        assert_eq!(r.expense_breakdown["potilasvakuutus"], 80_000);
        assert_eq!(r.expense_breakdown["matkakulut"], 20_000);
        assert_eq!(r.expense_breakdown["mystery"], 5_000);
        assert_eq!(r.other_expenses_cents, 105_000);
    }

    #[test]
    fn test_empty() {
        assert_eq!(generate_form5(&[], &policy()), Form5Report::default());
    }
}
