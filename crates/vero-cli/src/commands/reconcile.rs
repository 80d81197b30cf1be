use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};

use vero_core::ledger::{BankRecord, LedgerEntry};
use vero_core::reconciliation::{apply, matcher};
use vero_core::types::with_metadata;

use super::read_input;

/// Arguments for bank reconciliation
#[derive(Args)]
pub struct ReconcileArgs {
    /// Path to JSON input file with `bank_records` and `entries`
    #[arg(long)]
    pub input: Option<String>,

    /// Omit the write-back plan and list only the suggested matches
    #[arg(long)]
    pub matches_only: bool,
}

#[derive(Deserialize)]
struct ReconcileRequest {
    bank_records: Vec<BankRecord>,
    entries: Vec<LedgerEntry>,
}

pub fn run_reconcile(args: ReconcileArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ReconcileRequest = read_input(args.input.as_deref(), "bank reconciliation")?;

    let matches = matcher::find_matches(&request.bank_records, &request.entries);
    let summary = apply::summarize(&request.bank_records, &request.entries, &matches);

    let mut warnings = Vec::new();
    if summary.unmatched_bank_records > 0 {
        warnings.push(format!(
            "{} bank record(s) have no matching ledger entry",
            summary.unmatched_bank_records
        ));
    }

    let assumptions = json!({
        "max_day_distance": 7,
        "min_score": 50,
        "tie_break": "score desc, bank record id asc, ledger entry id asc",
    });
    let methodology = "Exact-amount gate, date/reference/description scoring, greedy one-to-one assignment";

    let output = if args.matches_only {
        serde_json::to_value(with_metadata(methodology, &assumptions, warnings, matches))?
    } else {
        let write_back = apply::plan_write_back(&matches, &request.entries);
        serde_json::to_value(with_metadata(
            methodology,
            &assumptions,
            warnings,
            json!({ "summary": summary, "matches": matches, "write_back": write_back }),
        ))?
    };
    Ok(output)
}
