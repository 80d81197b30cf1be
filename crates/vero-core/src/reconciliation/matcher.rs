use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ledger::{BankRecord, EntryKind, LedgerEntry};

/// Points for an exact amount match with the right direction.
const AMOUNT_SCORE: u32 = 50;
const SAME_DAY_SCORE: u32 = 30;
const ONE_DAY_SCORE: u32 = 25;
const THREE_DAY_SCORE: u32 = 15;
const SEVEN_DAY_SCORE: u32 = 5;
/// Pairs further apart than this are never matched.
const MAX_DAY_DISTANCE: i64 = 7;
const REFERENCE_SCORE: u32 = 20;
const TOKEN_SCORE: u32 = 3;
const MAX_DESCRIPTION_SCORE: u32 = 10;
/// Minimum total for a pair to be retained as a candidate.
const MIN_CANDIDATE_SCORE: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A proposed pairing of one bank record with one ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub bank_record_id: i64,
    pub ledger_entry_id: i64,
    pub score: u32,
    /// Human-readable audit trail, in scoring order.
    pub reasons: Vec<String>,
}

// ---------------------------------------------------------------------------
// Main calculation
// ---------------------------------------------------------------------------

/// Pair unmatched bank records with unreconciled ledger entries.
///
/// Every surviving pair is scored, then candidates are accepted greedily from
/// the highest score down, skipping any whose bank record or ledger entry is
/// already taken. The result is one-to-one on both sides but not necessarily
/// the maximum-weight assignment. Equal scores are ordered by bank record id
/// and then ledger entry id.
pub fn find_matches(bank_records: &[BankRecord], entries: &[LedgerEntry]) -> Vec<MatchCandidate> {
    let open_bank: Vec<&BankRecord> = bank_records
        .iter()
        .filter(|b| b.matched_entry_id.is_none())
        .collect();
    let open_entries: Vec<&LedgerEntry> = entries.iter().filter(|e| !e.reconciled).collect();

    let mut candidates: Vec<MatchCandidate> = open_bank
        .iter()
        .flat_map(|bank| open_entries.iter().filter_map(move |entry| score_pair(bank, entry)))
        .filter(|c| c.score >= MIN_CANDIDATE_SCORE)
        .collect();

    candidates.sort_by(rank);

    tracing::debug!(
        bank_records = open_bank.len(),
        ledger_entries = open_entries.len(),
        candidates = candidates.len(),
        "reconciliation candidates scored"
    );

    let mut used_bank: HashSet<i64> = HashSet::new();
    let mut used_entries: HashSet<i64> = HashSet::new();
    let mut accepted = Vec::new();

    for candidate in candidates {
        if used_bank.contains(&candidate.bank_record_id)
            || used_entries.contains(&candidate.ledger_entry_id)
        {
            continue;
        }
        used_bank.insert(candidate.bank_record_id);
        used_entries.insert(candidate.ledger_entry_id);
        tracing::debug!(
            bank_record = candidate.bank_record_id,
            ledger_entry = candidate.ledger_entry_id,
            score = candidate.score,
            "match accepted"
        );
        accepted.push(candidate);
    }

    accepted
}

/// Score one pair, or `None` when the amount, direction or date rules out a
/// match entirely.
pub fn score_pair(bank: &BankRecord, entry: &LedgerEntry) -> Option<MatchCandidate> {
    if u64::try_from(entry.amount_cents).ok() != Some(bank.amount_cents.unsigned_abs()) {
        return None;
    }
    let expected_kind = if bank.amount_cents < 0 {
        EntryKind::Expense
    } else {
        EntryKind::Income
    };
    if entry.kind != expected_kind {
        return None;
    }

    let mut score = AMOUNT_SCORE;
    let mut reasons = vec!["Exact amount match".to_string()];

    let days = (bank.date - entry.date).num_days().abs();
    let (date_score, date_reason) = date_proximity(days)?;
    score += date_score;
    reasons.push(date_reason);

    if let (Some(bank_ref), Some(entry_ref)) = (non_empty(&bank.reference), non_empty(&entry.bank_ref)) {
        if bank_ref == entry_ref {
            score += REFERENCE_SCORE;
            reasons.push("Reference match".to_string());
        }
    }

    if let (Some(bank_desc), Some(entry_desc)) = (&bank.description, &entry.description) {
        let overlap = description_overlap(bank_desc, entry_desc);
        if !overlap.is_empty() {
            let tokens = u32::try_from(overlap.len()).unwrap_or(u32::MAX);
            score += tokens.saturating_mul(TOKEN_SCORE).min(MAX_DESCRIPTION_SCORE);
            reasons.push(format!("Description overlap: {}", overlap.join(", ")));
        }
    }

    tracing::trace!(bank_record = bank.id, ledger_entry = entry.id, score, "pair scored");

    Some(MatchCandidate {
        bank_record_id: bank.id,
        ledger_entry_id: entry.id,
        score,
        reasons,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date_proximity(days: i64) -> Option<(u32, String)> {
    match days {
        0 => Some((SAME_DAY_SCORE, "Same date".to_string())),
        1 => Some((ONE_DAY_SCORE, "Date within 1 day".to_string())),
        2..=3 => Some((THREE_DAY_SCORE, format!("Date within {days} days"))),
        4..=MAX_DAY_DISTANCE => Some((SEVEN_DAY_SCORE, format!("Date within {days} days"))),
        _ => None,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Bank-side tokens contained in, or containing, any entry-side token.
/// Case-insensitive; repeated bank tokens count again.
fn description_overlap(bank: &str, entry: &str) -> Vec<String> {
    let bank = bank.to_lowercase();
    let entry = entry.to_lowercase();
    let entry_tokens: Vec<&str> = entry.split_whitespace().collect();

    bank.split_whitespace()
        .filter(|token| {
            entry_tokens
                .iter()
                .any(|other| other.contains(token) || token.contains(other))
        })
        .map(str::to_string)
        .collect()
}

/// Score descending, then bank record id, then ledger entry id.
fn rank(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(a.bank_record_id.cmp(&b.bank_record_id))
        .then(a.ledger_entry_id.cmp(&b.ledger_entry_id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::VoucherKind;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn bank(id: i64, day: &str, amount: i64) -> BankRecord {
        BankRecord {
            id,
            date: date(day),
            amount_cents: amount,
            description: None,
            counterpart: None,
            reference: None,
            matched_entry_id: None,
        }
    }

    fn entry(id: i64, kind: EntryKind, day: &str, amount: i64) -> LedgerEntry {
        LedgerEntry {
            id,
            kind,
            date: date(day),
            fiscal_year: 2026,
            amount_cents: amount,
            category: "muut_kulut".to_string(),
            description: None,
            voucher_kind: VoucherKind::None,
            depreciation_years: None,
            depreciation_remaining_cents: None,
            bank_ref: None,
            reconciled: false,
        }
    }

    #[test]
    fn test_same_day_outflow_scores_80() {
        let matches = find_matches(
            &[bank(1, "2026-01-15", -45_000)],
            &[entry(10, EntryKind::Expense, "2026-01-15", 45_000)],
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 80);
        assert_eq!(matches[0].reasons, vec!["Exact amount match", "Same date"]);
    }

    #[test]
    fn test_direction_gate() {
        assert!(score_pair(
            &bank(1, "2026-01-15", -45_000),
            &entry(10, EntryKind::Income, "2026-01-15", 45_000)
        )
        .is_none());
        assert!(score_pair(
            &bank(1, "2026-01-15", 45_000),
            &entry(10, EntryKind::Expense, "2026-01-15", 45_000)
        )
        .is_none());
    }

    #[test]
    fn test_amount_gate() {
        assert!(score_pair(
            &bank(1, "2026-01-15", -45_001),
            &entry(10, EntryKind::Expense, "2026-01-15", 45_000)
        )
        .is_none());
    }

    #[test]
    fn test_date_bands() {
        let e = entry(10, EntryKind::Income, "2026-03-10", 1_000);
        let score_at = |day: &str| score_pair(&bank(1, day, 1_000), &e).map(|c| c.score);
        assert_eq!(score_at("2026-03-10"), Some(80));
        assert_eq!(score_at("2026-03-09"), Some(75));
        assert_eq!(score_at("2026-03-13"), Some(65));
        assert_eq!(score_at("2026-03-17"), Some(55));
        assert_eq!(score_at("2026-03-18"), None);
        assert_eq!(score_at("2026-03-02"), None);
    }

    #[test]
    fn test_reference_bonus_requires_non_empty_equal() {
        let mut b = bank(1, "2026-01-15", -45_000);
        let mut e = entry(10, EntryKind::Expense, "2026-01-15", 45_000);
        b.reference = Some(String::new());
        e.bank_ref = Some(String::new());
        assert_eq!(score_pair(&b, &e).unwrap().score, 80);

        b.reference = Some("RF18539007547034".to_string());
        e.bank_ref = Some("RF18539007547034".to_string());
        let c = score_pair(&b, &e).unwrap();
        assert_eq!(c.score, 100);
        assert!(c.reasons.contains(&"Reference match".to_string()));
    }

    #[test]
    fn test_description_overlap_is_bidirectional_and_capped() {
        assert_eq!(
            description_overlap("TERVEYSTALO OY tilitys", "Terveystalo tilitys tammikuu"),
            vec!["terveystalo", "tilitys"]
        );
        // "duo" is contained in "duodecim"
        assert_eq!(description_overlap("duo", "Duodecim lehti"), vec!["duo"]);

        let mut b = bank(1, "2026-01-15", -45_000);
        let mut e = entry(10, EntryKind::Expense, "2026-01-15", 45_000);
        b.description = Some("a b c d".to_string());
        e.description = Some("a b c d".to_string());
        assert_eq!(score_pair(&b, &e).unwrap().score, 90);
    }

    #[test]
    fn test_greedy_prefers_higher_score_and_is_injective() {
        let entries = [
            entry(10, EntryKind::Expense, "2026-01-15", 45_000),
            entry(11, EntryKind::Expense, "2026-01-17", 45_000),
        ];
        let banks = [bank(1, "2026-01-15", -45_000), bank(2, "2026-01-16", -45_000)];
        let matches = find_matches(&banks, &entries);
        assert_eq!(matches.len(), 2);
        // (1,10) scores 80 and wins; (2,11) is the remaining 1-day pair.
        assert_eq!((matches[0].bank_record_id, matches[0].ledger_entry_id), (1, 10));
        assert_eq!((matches[1].bank_record_id, matches[1].ledger_entry_id), (2, 11));
    }

    #[test]
    fn test_ties_break_on_lowest_ids() {
        let entries = [
            entry(20, EntryKind::Income, "2026-02-01", 1_000),
            entry(21, EntryKind::Income, "2026-02-01", 1_000),
        ];
        let banks = [bank(5, "2026-02-01", 1_000), bank(4, "2026-02-01", 1_000)];
        let matches = find_matches(&banks, &entries);
        assert_eq!((matches[0].bank_record_id, matches[0].ledger_entry_id), (4, 20));
        assert_eq!((matches[1].bank_record_id, matches[1].ledger_entry_id), (5, 21));
    }

    #[test]
    fn test_already_matched_records_are_skipped() {
        let mut b = bank(1, "2026-01-15", -45_000);
        b.matched_entry_id = Some(99);
        let mut e = entry(10, EntryKind::Expense, "2026-01-15", 45_000);
        assert!(find_matches(&[b.clone()], &[e.clone()]).is_empty());

        b.matched_entry_id = None;
        e.reconciled = true;
        assert!(find_matches(&[b], &[e]).is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_matches(&[], &[]).is_empty());
        assert!(find_matches(&[bank(1, "2026-01-15", -1)], &[]).is_empty());
    }

    #[test]
    fn test_extreme_amounts_are_gated_without_overflow() {
        let entry = entry(10, EntryKind::Expense, "2026-01-15", i64::MAX);
        assert!(score_pair(&bank(1, "2026-01-15", i64::MIN), &entry).is_none());
        assert!(score_pair(&bank(2, "2026-01-15", -i64::MAX), &entry).is_some());
    }

    #[test]
    fn test_negative_entry_amount_never_matches() {
        assert!(score_pair(
            &bank(1, "2026-01-15", 45_000),
            &entry(10, EntryKind::Income, "2026-01-15", -45_000)
        )
        .is_none());
    }
}
