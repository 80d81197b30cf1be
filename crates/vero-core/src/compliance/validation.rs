use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::categories;
use crate::depreciation::DepreciationPolicy;
use crate::error::VeroError;
use crate::ledger::{EntryKind, LedgerEntry, VoucherKind};
use crate::types::Cents;
use crate::VeroResult;

pub const MIN_AMOUNT_CENTS: Cents = 1;
/// EUR 1 000 000.
pub const MAX_AMOUNT_CENTS: Cents = 100_000_000;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

static ISO_DATE: OnceLock<Regex> = OnceLock::new();

/// A ledger entry as submitted, before it has an id or a fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
    pub kind: EntryKind,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub amount_cents: Cents,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub voucher_kind: VoucherKind,
}

impl NewEntry {
    /// Validate and turn into a stored entry. Depreciable purchases above the
    /// threshold get their initial schedule here.
    pub fn into_ledger_entry(self, id: i64, policy: &DepreciationPolicy) -> VeroResult<LedgerEntry> {
        validate_new_entry(&self)?;
        let date = parse_iso_date(&self.date)?;
        let schedule = policy.initial_schedule(&self.category, self.amount_cents);

        Ok(LedgerEntry {
            id,
            kind: self.kind,
            date,
            fiscal_year: fiscal_year_of(date),
            amount_cents: self.amount_cents,
            category: self.category,
            description: self.description,
            voucher_kind: self.voucher_kind,
            depreciation_years: schedule.map(|s| s.years),
            depreciation_remaining_cents: schedule.map(|s| s.remaining_cents),
            bank_ref: None,
            reconciled: false,
        })
    }
}

/// Strict `YYYY-MM-DD` that also names a real calendar day.
pub fn parse_iso_date(value: &str) -> VeroResult<NaiveDate> {
    let shape = ISO_DATE
        .get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid regex pattern"));
    if !shape.is_match(value) {
        return Err(VeroError::DateError(format!(
            "{value}: date must be YYYY-MM-DD format"
        )));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| VeroError::DateError(format!("{value}: {e}")))
}

/// Fiscal year equals the calendar year for a sole trader.
pub fn fiscal_year_of(date: NaiveDate) -> i32 {
    date.year()
}

/// Shape checks applied before an entry reaches the ledger.
pub fn validate_new_entry(entry: &NewEntry) -> VeroResult<()> {
    parse_iso_date(&entry.date)?;

    if !(MIN_AMOUNT_CENTS..=MAX_AMOUNT_CENTS).contains(&entry.amount_cents) {
        return Err(VeroError::InvalidInput {
            field: "amount_cents".into(),
            reason: format!(
                "must be between {MIN_AMOUNT_CENTS} and {MAX_AMOUNT_CENTS} cents"
            ),
        });
    }

    let category = categories::category(&entry.category)
        .ok_or_else(|| VeroError::UnknownCategory(entry.category.clone()))?;
    if category.kind != entry.kind {
        return Err(VeroError::CategoryKindMismatch {
            category: entry.category.clone(),
            kind: entry.kind,
        });
    }

    if let Some(description) = &entry.description {
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(VeroError::InvalidInput {
                field: "description".into(),
                reason: format!("must be at most {MAX_DESCRIPTION_CHARS} characters"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_entry(kind: EntryKind, category: &str, amount: Cents) -> NewEntry {
        NewEntry {
            kind,
            date: "2026-03-14".to_string(),
            amount_cents: amount,
            category: category.to_string(),
            description: Some("Stetoskooppi".to_string()),
            voucher_kind: VoucherKind::Receipt,
        }
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2026-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert!(matches!(parse_iso_date("2026-2-28"), Err(VeroError::DateError(_))));
        assert!(matches!(parse_iso_date("2026-02-30"), Err(VeroError::DateError(_))));
        assert!(matches!(parse_iso_date("28.02.2026"), Err(VeroError::DateError(_))));
    }

    #[test]
    fn test_valid_entry() {
        assert!(validate_new_entry(&new_entry(EntryKind::Expense, "laitteet", 45_000)).is_ok());
    }

    #[test]
    fn test_amount_bounds() {
        assert!(validate_new_entry(&new_entry(EntryKind::Expense, "laitteet", 0)).is_err());
        assert!(validate_new_entry(&new_entry(EntryKind::Expense, "laitteet", 1)).is_ok());
        assert!(validate_new_entry(&new_entry(EntryKind::Expense, "laitteet", 100_000_000)).is_ok());
        assert!(validate_new_entry(&new_entry(EntryKind::Expense, "laitteet", 100_000_001)).is_err());
    }

    #[test]
    fn test_category_checks() {
        assert!(matches!(
            validate_new_entry(&new_entry(EntryKind::Expense, "bogus", 100)),
            Err(VeroError::UnknownCategory(_))
        ));
        assert!(matches!(
            validate_new_entry(&new_entry(EntryKind::Income, "laitteet", 100)),
            Err(VeroError::CategoryKindMismatch { .. })
        ));
    }

    #[test]
    fn test_description_length_counts_chars() {
        let mut e = new_entry(EntryKind::Expense, "muut_kulut", 100);
        e.description = Some("ä".repeat(500));
        assert!(validate_new_entry(&e).is_ok());
        e.description = Some("ä".repeat(501));
        assert!(validate_new_entry(&e).is_err());
    }

    #[test]
    fn test_into_ledger_entry_sets_schedule() {
        let policy = DepreciationPolicy::statutory_2026();
        let stored = new_entry(EntryKind::Expense, "laitteet", 250_000)
            .into_ledger_entry(7, &policy)
            .unwrap();
        assert_eq!(stored.id, 7);
        assert_eq!(stored.fiscal_year, 2026);
        assert_eq!(stored.depreciation_years, Some(3));
        assert_eq!(stored.depreciation_remaining_cents, Some(187_500));
        assert!(!stored.reconciled);

        let small = new_entry(EntryKind::Expense, "laitteet", 120_000)
            .into_ledger_entry(8, &policy)
            .unwrap();
        assert_eq!(small.depreciation_years, None);
    }
}
