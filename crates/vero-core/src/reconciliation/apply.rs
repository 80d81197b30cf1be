use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ledger::{BankRecord, LedgerEntry, VoucherKind};
use crate::reconciliation::matcher::MatchCandidate;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Link a bank record to the entry it settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRecordUpdate {
    pub bank_record_id: i64,
    pub matched_entry_id: i64,
}

/// Mark an entry reconciled; attach the bank statement as its voucher when
/// the entry had none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntryUpdate {
    pub ledger_entry_id: i64,
    pub reconciled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_kind: Option<VoucherKind>,
}

/// Everything the host must persist after accepting a set of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteBackPlan {
    pub bank_updates: Vec<BankRecordUpdate>,
    pub entry_updates: Vec<LedgerEntryUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub suggested_matches: usize,
    pub unmatched_bank_records: usize,
    pub unreconciled_entries: usize,
}

// ---------------------------------------------------------------------------
// Write-back
// ---------------------------------------------------------------------------

/// Translate accepted matches into record updates.
///
/// Matches pointing at entries not present in `entries` still update the
/// bank side; the voucher is left alone since its current kind is unknown.
pub fn plan_write_back(matches: &[MatchCandidate], entries: &[LedgerEntry]) -> WriteBackPlan {
    let vouchers: BTreeMap<i64, VoucherKind> =
        entries.iter().map(|e| (e.id, e.voucher_kind)).collect();

    let mut plan = WriteBackPlan::default();
    for m in matches {
        plan.bank_updates.push(BankRecordUpdate {
            bank_record_id: m.bank_record_id,
            matched_entry_id: m.ledger_entry_id,
        });
        let voucher_kind = match vouchers.get(&m.ledger_entry_id) {
            Some(VoucherKind::None) => Some(VoucherKind::BankStatement),
            _ => None,
        };
        plan.entry_updates.push(LedgerEntryUpdate {
            ledger_entry_id: m.ledger_entry_id,
            reconciled: true,
            voucher_kind,
        });
    }

    tracing::debug!(updates = plan.bank_updates.len(), "write-back planned");
    plan
}

/// Counts of what would still be open once `matches` are applied.
pub fn summarize(
    bank_records: &[BankRecord],
    entries: &[LedgerEntry],
    matches: &[MatchCandidate],
) -> ReconciliationSummary {
    let matched_bank: HashSet<i64> = matches.iter().map(|m| m.bank_record_id).collect();
    let matched_entries: HashSet<i64> = matches.iter().map(|m| m.ledger_entry_id).collect();

    ReconciliationSummary {
        suggested_matches: matches.len(),
        unmatched_bank_records: bank_records
            .iter()
            .filter(|b| b.matched_entry_id.is_none() && !matched_bank.contains(&b.id))
            .count(),
        unreconciled_entries: entries
            .iter()
            .filter(|e| !e.reconciled && !matched_entries.contains(&e.id))
            .count(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
