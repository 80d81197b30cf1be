use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories;
use crate::depreciation::DepreciationPolicy;
use crate::ledger::{LedgerEntry, TaxCard, VoucherKind};
use crate::money::whole_percent;
use crate::types::Cents;

const NOT_REGISTERED_WARNING: &str = "Et ole ennakkoperintarekisterissa. Klinikkasi pidattavat \
                                      lahdeveron suoraan tilityspalkkioistasi.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Tosite coverage of a set of ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStatus {
    pub total: usize,
    pub with_proof: usize,
    pub proof_not_required: usize,
    pub missing_proof: usize,
    /// Share of entries that are covered, in whole percent.
    pub compliance_rate_pct: Decimal,
    pub by_voucher_kind: BTreeMap<VoucherKind, usize>,
    pub missing_entry_ids: Vec<i64>,
}

/// An equipment purchase that must be capitalised rather than expensed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationWarning {
    pub entry_id: i64,
    pub category: String,
    pub amount_cents: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepaymentRegisterStatus {
    pub registered: bool,
    pub year: Option<i32>,
    pub warning: Option<String>,
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Classify every entry as proven, exempt or missing its voucher.
///
/// Unknown categories are treated as requiring proof.
pub fn proof_status(entries: &[LedgerEntry]) -> ProofStatus {
    let mut with_proof = 0;
    let mut proof_not_required = 0;
    let mut missing_entry_ids = Vec::new();
    let mut by_voucher_kind: BTreeMap<VoucherKind, usize> = BTreeMap::new();

    for entry in entries {
        *by_voucher_kind.entry(entry.voucher_kind).or_insert(0) += 1;

        if entry.voucher_kind.is_present() {
            with_proof += 1;
        } else if !categories::requires_proof(&entry.category) {
            proof_not_required += 1;
        } else {
            missing_entry_ids.push(entry.id);
        }
    }

    let compliance_rate_pct = if entries.is_empty() {
        Decimal::ONE_HUNDRED
    } else {
        whole_percent(
            Decimal::from(with_proof + proof_not_required) / Decimal::from(entries.len()),
        )
    };

    ProofStatus {
        total: entries.len(),
        with_proof,
        proof_not_required,
        missing_proof: missing_entry_ids.len(),
        compliance_rate_pct,
        by_voucher_kind,
        missing_entry_ids,
    }
}

/// Keep the entries booked to `fiscal_year`; all of them when no year is given.
pub fn entries_in_year(entries: Vec<LedgerEntry>, fiscal_year: Option<i32>) -> Vec<LedgerEntry> {
    match fiscal_year {
        Some(year) => entries.into_iter().filter(|e| e.fiscal_year == year).collect(),
        None => entries,
    }
}

/// Entries in depreciable categories whose amount exceeds the threshold.
pub fn depreciation_warnings(
    entries: &[LedgerEntry],
    policy: &DepreciationPolicy,
) -> Vec<DepreciationWarning> {
    entries
        .iter()
        .filter(|e| policy.requires_depreciation(&e.category, e.amount_cents))
        .map(|e| DepreciationWarning {
            entry_id: e.id,
            category: e.category.clone(),
            amount_cents: e.amount_cents,
            description: e.description.clone(),
        })
        .collect()
}

/// Ennakkoperintärekisteri status from the most recent tax card.
///
/// Without a card the practitioner is assumed unregistered.
pub fn prepayment_register_status(card: Option<&TaxCard>) -> PrepaymentRegisterStatus {
    let registered = card.is_some_and(|c| c.in_prepayment_register);
    PrepaymentRegisterStatus {
        registered,
        year: card.map(|c| c.year),
        warning: (!registered).then(|| NOT_REGISTERED_WARNING.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{EntryKind, TaxCardType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry(id: i64, category: &str, amount: Cents, voucher_kind: VoucherKind) -> LedgerEntry {
        LedgerEntry {
            id,
            kind: if category == "clinic_income" {
                EntryKind::Income
            } else {
                EntryKind::Expense
            },
            date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            fiscal_year: 2026,
            amount_cents: amount,
            category: category.to_string(),
            description: None,
            voucher_kind,
            depreciation_years: None,
            depreciation_remaining_cents: None,
            bank_ref: None,
            reconciled: false,
        }
    }

    fn card(registered: bool) -> TaxCard {
        TaxCard {
            year: 2026,
            card_type: TaxCardType::Entrepreneur,
            base_rate_pct: dec!(30),
            additional_rate_pct: None,
            income_limit_cents: None,
            in_prepayment_register: registered,
        }
    }

    #[test]
    fn test_proof_classification() {
        let status = proof_status(&[
            entry(1, "clinic_income", 500_000, VoucherKind::Settlement),
            entry(2, "tyohuonevahennys", 94_000, VoucherKind::None),
            entry(3, "matkakulut", 4_500, VoucherKind::None),
        ]);
        assert_eq!(status.total, 3);
        assert_eq!(status.with_proof, 1);
        assert_eq!(status.proof_not_required, 1);
        assert_eq!(status.missing_proof, 1);
        assert_eq!(status.missing_entry_ids, vec![3]);
        assert_eq!(status.compliance_rate_pct, dec!(67));
        assert_eq!(status.by_voucher_kind[&VoucherKind::None], 2);
        assert_eq!(status.by_voucher_kind[&VoucherKind::Settlement], 1);
    }

    #[test]
    fn test_unknown_category_needs_proof() {
        let status = proof_status(&[entry(1, "mystery", 100, VoucherKind::None)]);
        assert_eq!(status.missing_proof, 1);
        assert_eq!(status.compliance_rate_pct, dec!(0));
    }

    #[test]
    fn test_empty_is_fully_compliant() {
        let status = proof_status(&[]);
        assert_eq!(status.total, 0);
        assert_eq!(status.compliance_rate_pct, dec!(100));
    }

    #[test]
    fn test_depreciation_warnings_above_threshold_only() {
        let warnings = depreciation_warnings(
            &[
                entry(1, "laitteet", 250_000, VoucherKind::Receipt),
                entry(2, "laitteet", 120_000, VoucherKind::Receipt),
                entry(3, "tilitoimisto", 250_000, VoucherKind::Receipt),
            ],
            &DepreciationPolicy::statutory_2026(),
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].entry_id, 1);
    }

    #[test]
    fn test_entries_in_year() {
        let mut old = entry(1, "matkakulut", 4_500, VoucherKind::Receipt);
        old.fiscal_year = 2025;
        let entries = vec![old, entry(2, "matkakulut", 2_300, VoucherKind::None)];

        let current = entries_in_year(entries.clone(), Some(2026));
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, 2);
        assert_eq!(entries_in_year(entries, None).len(), 2);
    }

    #[test]
    fn test_register_status() {
        let ok = prepayment_register_status(Some(&card(true)));
        assert!(ok.registered);
        assert_eq!(ok.year, Some(2026));
        assert!(ok.warning.is_none());

        let not = prepayment_register_status(Some(&card(false)));
        assert!(!not.registered);
        assert!(not.warning.unwrap().starts_with("Et ole ennakkoperintarekisterissa."));

        let none = prepayment_register_status(None);
        assert!(!none.registered);
        assert_eq!(none.year, None);
        assert!(none.warning.is_some());
    }
}
