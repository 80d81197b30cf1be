use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use vero_core::compliance::hetu::{contains_hetu, detect_hetu};
use vero_core::compliance::proof::{depreciation_warnings, proof_status};
use vero_core::compliance::validation::{parse_iso_date, validate_new_entry, NewEntry};
use vero_core::depreciation::DepreciationPolicy;
use vero_core::ledger::{EntryKind, LedgerEntry, VoucherKind};
use vero_core::VeroError;

fn new_entry(kind: EntryKind, category: &str, amount: i64, voucher: VoucherKind) -> NewEntry {
    NewEntry {
        kind,
        date: "2026-04-02".to_string(),
        amount_cents: amount,
        category: category.to_string(),
        description: None,
        voucher_kind: voucher,
    }
}

fn ledger(rows: Vec<NewEntry>) -> Vec<LedgerEntry> {
    let policy = DepreciationPolicy::statutory_2026();
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| row.into_ledger_entry(i as i64 + 1, &policy).unwrap())
        .collect()
}

#[test]
fn test_year_overview() {
    let entries = ledger(vec![
        new_entry(EntryKind::Income, "clinic_income", 820_000, VoucherKind::Settlement),
        new_entry(EntryKind::Expense, "laitteet", 180_000, VoucherKind::Receipt),
        new_entry(EntryKind::Expense, "tyohuonevahennys", 94_000, VoucherKind::None),
        new_entry(EntryKind::Expense, "matkakulut", 2_300, VoucherKind::None),
        new_entry(EntryKind::Expense, "ammattikirjallisuus", 6_500, VoucherKind::EInvoice),
    ]);

    let status = proof_status(&entries);
    assert_eq!(status.total, 5);
    assert_eq!(status.with_proof, 3);
    assert_eq!(status.proof_not_required, 1);
    assert_eq!(status.missing_entry_ids, vec![4]);
    assert_eq!(status.compliance_rate_pct, dec!(80));

    let warnings = depreciation_warnings(&entries, &DepreciationPolicy::statutory_2026());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].entry_id, 2);
    assert_eq!(entries[1].depreciation_remaining_cents, Some(135_000));
}

#[test]
fn test_validation_rejects_bad_shapes() {
    let mut e = new_entry(EntryKind::Expense, "matkakulut", 2_300, VoucherKind::None);
    e.date = "2026-13-01".to_string();
    assert!(matches!(validate_new_entry(&e), Err(VeroError::DateError(_))));

    let e = new_entry(EntryKind::Income, "matkakulut", 2_300, VoucherKind::None);
    assert!(matches!(
        validate_new_entry(&e),
        Err(VeroError::CategoryKindMismatch { .. })
    ));

    let e = new_entry(EntryKind::Expense, "matkakulut", -5, VoucherKind::None);
    assert!(matches!(
        validate_new_entry(&e),
        Err(VeroError::InvalidInput { ref field, .. }) if field == "amount_cents"
    ));
}

#[test]
fn test_leap_day() {
    assert!(parse_iso_date("2028-02-29").is_ok());
    assert!(parse_iso_date("2026-02-29").is_err());
}

#[test]
fn test_hetu_in_free_text() {
    let text = "Kuitti: potilas 010101A123N kaynti";
    assert!(contains_hetu(text));
    let found = detect_hetu(text);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value, "010101A123N");
    assert!(found[0].is_valid);
    assert!(!contains_hetu("Laakariliitto jasenmaksu 2026"));
}
